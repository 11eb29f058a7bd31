#![deny(clippy::all)]

pub mod chat;
pub mod config;
pub mod connection;
pub mod entity;
pub mod error;
mod keepalive;
mod mojang;
pub mod player;
mod server;
pub mod status;
pub mod world;

use crate::config::Config;
use crate::error::Error;
use crate::world::World;
use std::sync::Arc;
use tracing::info;

/// Builds the process-wide [`World`] and serves connections until Ctrl-C is received.
///
/// Starts the keep-alive/timeout daemon under supervision before accepting the first connection,
/// and stops it by dropping the [`World`] once `server::serve` returns.
pub async fn start(config: Config) -> Result<(), Error> {
    info!(addr = %config.server_address, "starting server core");

    let world = Arc::new(World::new(config)?);
    let keepalive_handle = keepalive::spawn_supervised(Arc::clone(&world));

    let result = server::serve(world).await;

    keepalive_handle.abort();
    info!("server core stopped");
    result
}
