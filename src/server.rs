//! The TCP accept loop: binds the listen address, spawns one session task per accepted
//! connection, and shuts down cleanly on Ctrl-C.

use crate::connection;
use crate::error::Error;
use crate::world::World;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::{debug, warn};

/// Binds `config.server_address` and serves connections until Ctrl-C is received.
pub async fn serve(world: Arc<World>) -> Result<(), Error> {
    let listener = TcpListener::bind(&world.config.server_address).await?;
    let backoff = Duration::from_millis(world.config.accept_error_backoff_ms);

    loop {
        let (stream, addr) = tokio::select! {
            accepted = listener.accept() => match accepted {
                Ok(pair) => pair,
                Err(err) => {
                    warn!(cause = %err, "failed to accept a connection, retrying");
                    tokio::time::sleep(backoff).await;
                    continue;
                }
            },
            _ = tokio::signal::ctrl_c() => {
                debug!("received ctrl-c, shutting down accept loop");
                return Ok(());
            },
        };

        let world = Arc::clone(&world);
        tokio::spawn(async move {
            if let Err(err) = connection::handle(stream, addr, world).await {
                if !err.is_connection_closed() {
                    warn!(cause = %err, addr = %addr, "failure communicating with a client");
                }
            }
            debug!(addr = %addr, "closed connection with a client");
        });
    }
}
