//! The process-wide [`World`] singleton: immutable startup data, the player registry, and the
//! entity-id allocator. Created once in `main` and shared by `Arc` with every session task.

use crate::config::Config;
use crate::entity::EntityIdAllocator;
use crate::error::Error;
use crate::player::Player;
use fastnbt::Value as NbtValue;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// The single world this core serves. There is exactly one dimension ("minecraft:overworld");
/// multi-world routing is out of scope.
pub const WORLD_NAME: &str = "minecraft:overworld";

/// The immutable, process-wide server state: configuration, the dimension registry blob, the
/// player registry and the entity-id allocator.
pub struct World {
    pub config: Config,
    pub dimension_codec: NbtValue,
    pub registry: PlayerRegistry,
    pub entity_ids: EntityIdAllocator,
}

impl World {
    /// Builds the world, loading the dimension codec from disk. Failure here is fatal to
    /// startup, matching the fatal-startup error category.
    pub fn new(config: Config) -> Result<Self, Error> {
        let dimension_codec = load_dimension_codec(&config.dimension_codec_path)?;

        Ok(Self {
            config,
            dimension_codec,
            registry: PlayerRegistry::default(),
            entity_ids: EntityIdAllocator::new(),
        })
    }
}

fn load_dimension_codec(path: &str) -> Result<NbtValue, Error> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
        Error::DimensionCodec(format!("failed to read {path}: {e}"))
    })?;
    serde_json::from_str(&contents)
        .map_err(|e| Error::DimensionCodec(format!("failed to parse {path}: {e}")))
}

/// A shared, ordered (insertion-order) collection of connected players, guarded by a
/// reader-writer lock. Writers register on entering Play and remove on session exit; readers
/// take a snapshot under the read lock before doing any I/O.
#[derive(Default)]
pub struct PlayerRegistry {
    players: RwLock<HashMap<Uuid, Arc<Player>>>,
}

impl PlayerRegistry {
    /// Registers a player, making it visible to broadcasts and future snapshots.
    pub async fn register(&self, player: Arc<Player>) {
        self.players.write().await.insert(player.uuid, player);
    }

    /// Removes a player from the registry, e.g. on session exit or keep-alive timeout.
    pub async fn remove(&self, uuid: Uuid) -> Option<Arc<Player>> {
        self.players.write().await.remove(&uuid)
    }

    /// Takes a consistent snapshot of every currently registered player.
    pub async fn snapshot(&self) -> Vec<Arc<Player>> {
        self.players.read().await.values().cloned().collect()
    }

    /// The number of players currently registered (i.e. in the Play state).
    pub async fn online_count(&self) -> usize {
        self.players.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::Player;
    use std::net::{IpAddr, Ipv4Addr};

    fn sample_player(name: &str) -> Arc<Player> {
        let (player, _receiver) = Player::new(
            name.to_string(),
            Uuid::new_v4(),
            1,
            IpAddr::V4(Ipv4Addr::LOCALHOST),
        );
        Arc::new(player)
    }

    #[tokio::test]
    async fn register_and_snapshot_round_trips() {
        let registry = PlayerRegistry::default();
        let player = sample_player("Alice");
        registry.register(Arc::clone(&player)).await;

        let snapshot = registry.snapshot().await;
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].uuid, player.uuid);
        assert_eq!(registry.online_count().await, 1);
    }

    #[tokio::test]
    async fn remove_drops_player_from_registry() {
        let registry = PlayerRegistry::default();
        let player = sample_player("Bob");
        registry.register(Arc::clone(&player)).await;

        let removed = registry.remove(player.uuid).await;
        assert!(removed.is_some());
        assert_eq!(registry.online_count().await, 0);
    }
}
