//! The keep-alive broadcaster and timeout sweeper: a single process-wide task woken on a fixed
//! interval that pings every connected player and kicks the ones that have gone silent.

use crate::player::OutboundMessage;
use crate::world::World;
use protocol::crypto::generate_keep_alive_id;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Runs the keep-alive/timeout loop until the world is dropped. Intended to be wrapped by
/// [`spawn_supervised`] so a panic inside one tick doesn't take down liveness tracking for the
/// rest of the process.
pub async fn run(world: Arc<World>) {
    let send_interval = Duration::from_secs(world.config.keep_alive_send_interval);
    let timeout = Duration::from_secs(world.config.player_timeout);
    let mut ticker = tokio::time::interval(send_interval);

    loop {
        ticker.tick().await;
        tick(&world, timeout).await;
    }
}

async fn tick(world: &Arc<World>, timeout: Duration) {
    for player in world.registry.snapshot().await {
        if player.is_timed_out(timeout) {
            info!(player = %player.name, "player timed out, removing from registry");
            player.send(OutboundMessage::Kick("Timed out".to_string()));
            world.registry.remove(player.uuid).await;
            world.entity_ids.release(player.entity_id);
            continue;
        }

        let id = generate_keep_alive_id().expect("failed to generate keep-alive id");
        player.note_keepalive_sent(id);
        player.send(OutboundMessage::KeepAlive(id));
    }
}

/// Spawns [`run`] under a supervision loop: if the task panics, it is logged and immediately
/// respawned, preserving the registry and every other running task.
pub fn spawn_supervised(world: Arc<World>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            let world = Arc::clone(&world);
            let outcome = tokio::spawn(run(world)).await;
            match outcome {
                Ok(()) => break,
                Err(join_error) => {
                    warn!(error = %join_error, "keep-alive task panicked, restarting");
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::player::Player;
    use std::net::{IpAddr, Ipv4Addr};
    use uuid::Uuid;

    fn test_world() -> Arc<World> {
        let mut config = Config::default();
        config.dimension_codec_path = "data/1_19/dimension_codec.json".to_string();
        Arc::new(World {
            config,
            dimension_codec: fastnbt::Value::Compound(Default::default()),
            registry: Default::default(),
            entity_ids: crate::entity::EntityIdAllocator::new(),
        })
    }

    #[tokio::test]
    async fn tick_sends_keepalive_to_every_player() {
        let world = test_world();
        let (player, mut outbound) = Player::new(
            "Alice".to_string(),
            Uuid::new_v4(),
            1,
            IpAddr::V4(Ipv4Addr::LOCALHOST),
        );
        let player = Arc::new(player);
        world.registry.register(Arc::clone(&player)).await;

        tick(&world, Duration::from_secs(30)).await;

        let liveness = player.liveness.lock().unwrap();
        assert!(liveness.last_keepalive_id.is_some());
        drop(liveness);
        assert!(matches!(
            outbound.try_recv(),
            Ok(OutboundMessage::KeepAlive(_))
        ));
    }

    #[tokio::test]
    async fn tick_removes_timed_out_players() {
        let world = test_world();
        let (player, mut outbound) = Player::new(
            "Bob".to_string(),
            Uuid::new_v4(),
            2,
            IpAddr::V4(Ipv4Addr::LOCALHOST),
        );
        player.note_keepalive_sent(1);
        player.note_keepalive_response(1);
        let player = Arc::new(player);
        world.registry.register(Arc::clone(&player)).await;

        tick(&world, Duration::from_millis(0)).await;

        assert_eq!(world.registry.online_count().await, 0);
        assert!(matches!(outbound.try_recv(), Ok(OutboundMessage::Kick(_))));
    }
}
