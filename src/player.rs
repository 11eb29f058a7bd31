//! The [`Player`] aggregate: everything known about a connected client once it has entered (or
//! is entering) the Play state.

use packets::play::clientbound::PlayerInfoAddEntry;
use std::net::IpAddr;
use std::sync::Mutex;
use std::time::Instant;
use tokio::sync::mpsc;
use uuid::Uuid;

/// Outbound events a task other than the owning session (e.g. the keep-alive daemon or another
/// player's session) needs delivered over that session's own framed connection. The session task
/// is the sole writer to its socket; every other task reaches it only through this channel.
#[derive(Debug, Clone)]
pub enum OutboundMessage {
    KeepAlive(i64),
    Kick(String),
    PlayerJoined(PlayerInfoAddEntry),
    PlayerLeft(Uuid),
}

/// The client-provided RSA public key used for the signed-proof login path, kept alongside its
/// original DER encoding, issuance timestamp and the signature over that timestamp.
#[derive(Debug, Clone)]
pub struct PlayerPublicKey {
    pub der: Vec<u8>,
    pub timestamp: i64,
    pub signature: Vec<u8>,
}

/// Client-reported display preferences sent via `ClientSettings`.
#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub locale: String,
    pub view_distance: i8,
    pub chat_mode: i32,
    pub chat_colors: bool,
    pub skin_parts: u8,
    pub main_hand: i32,
    pub text_filtering: bool,
    pub allow_server_listings: bool,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            locale: "en_us".to_string(),
            view_distance: 10,
            chat_mode: 0,
            chat_colors: true,
            skin_parts: 0,
            main_hand: 1,
            text_filtering: false,
            allow_server_listings: true,
        }
    }
}

/// The player's position and orientation in the world.
#[derive(Debug, Clone, Copy)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub yaw: f32,
    pub pitch: f32,
    pub on_ground: bool,
}

impl Default for Position {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: 0.0,
            yaw: 0.0,
            pitch: 0.0,
            on_ground: true,
        }
    }
}

/// Mutable keep-alive bookkeeping, separated out so it can be guarded on its own without locking
/// the whole player for a liveness check.
#[derive(Debug, Default)]
pub struct Liveness {
    pub last_keepalive_id: Option<i64>,
    pub last_heartbeat: Option<Instant>,
    pub last_heartbeat_sent: Option<Instant>,
    pub ping_ms: u64,
}

/// Mojang-issued skin/cape texture blob, present only once online-mode verification succeeds.
#[derive(Debug, Clone)]
pub struct Textures {
    pub value: String,
    pub signature: Option<String>,
}

/// A connected player. Position/settings/liveness are mutated exclusively by the owning session
/// task; other tasks only ever read through a shared reference, per the registry's snapshot
/// discipline.
pub struct Player {
    pub name: String,
    pub display_name: String,
    pub uuid: Uuid,
    pub entity_id: i32,
    pub remote_ip: IpAddr,
    pub public_key: Option<PlayerPublicKey>,
    pub textures: Option<Textures>,
    pub game_mode: i8,

    pub settings: Mutex<ClientSettings>,
    pub position: Mutex<Position>,
    pub liveness: Mutex<Liveness>,
    outbound: mpsc::UnboundedSender<OutboundMessage>,
}

impl Player {
    /// Builds a player and the receiving half of its outbound channel; the owning session task
    /// keeps the receiver and is the only task that ever writes to the socket.
    pub fn new(
        name: String,
        uuid: Uuid,
        entity_id: i32,
        remote_ip: IpAddr,
    ) -> (Self, mpsc::UnboundedReceiver<OutboundMessage>) {
        let (outbound, inbound) = mpsc::unbounded_channel();
        let player = Self {
            display_name: name.clone(),
            name,
            uuid,
            entity_id,
            remote_ip,
            public_key: None,
            textures: None,
            game_mode: 0,
            settings: Mutex::new(ClientSettings::default()),
            position: Mutex::new(Position::default()),
            liveness: Mutex::new(Liveness::default()),
            outbound,
        };
        (player, inbound)
    }

    /// Enqueues a message for the owning session task to act on; silently dropped if that task
    /// has already exited (the channel's receiver is gone).
    pub fn send(&self, message: OutboundMessage) {
        let _ = self.outbound.send(message);
    }

    /// Attaches the client-signed public key collected during login, if any. Consumes and
    /// returns `self` so it composes before the player is wrapped in an `Arc`.
    pub fn with_public_key(mut self, public_key: Option<PlayerPublicKey>) -> Self {
        self.public_key = public_key;
        self
    }

    /// Attaches the Mojang-verified texture blob collected during login, if any.
    pub fn with_textures(mut self, textures: Option<Textures>) -> Self {
        self.textures = textures;
        self
    }

    /// Records a freshly sent keep-alive id and the time it was sent.
    pub fn note_keepalive_sent(&self, id: i64) {
        let mut liveness = self.liveness.lock().expect("player liveness poisoned");
        liveness.last_keepalive_id = Some(id);
        liveness.last_heartbeat_sent = Some(Instant::now());
    }

    /// Applies an inbound keep-alive response, updating the ping estimate only if the id
    /// matches the most recently issued one.
    pub fn note_keepalive_response(&self, id: i64) -> bool {
        let mut liveness = self.liveness.lock().expect("player liveness poisoned");
        if liveness.last_keepalive_id != Some(id) {
            return false;
        }
        let now = Instant::now();
        liveness.last_heartbeat = Some(now);
        if let Some(sent) = liveness.last_heartbeat_sent {
            liveness.ping_ms = now.saturating_duration_since(sent).as_millis() as u64;
        }
        true
    }

    /// Whether this player has gone silent for longer than `timeout`.
    pub fn is_timed_out(&self, timeout: std::time::Duration) -> bool {
        let liveness = self.liveness.lock().expect("player liveness poisoned");
        match liveness.last_heartbeat {
            Some(last) => last.elapsed() > timeout,
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;
    use std::time::Duration;

    fn sample() -> Player {
        Player::new(
            "Alice".to_string(),
            Uuid::new_v4(),
            7,
            IpAddr::V4(Ipv4Addr::LOCALHOST),
        )
        .0
    }

    #[test]
    fn send_after_receiver_dropped_does_not_panic() {
        let (player, receiver) = Player::new(
            "Carol".to_string(),
            Uuid::new_v4(),
            9,
            IpAddr::V4(Ipv4Addr::LOCALHOST),
        );
        drop(receiver);
        player.send(OutboundMessage::Kick("bye".to_string()));
    }

    #[test]
    fn keepalive_response_with_matching_id_updates_ping() {
        let player = sample();
        player.note_keepalive_sent(42);
        std::thread::sleep(Duration::from_millis(5));
        assert!(player.note_keepalive_response(42));

        let liveness = player.liveness.lock().unwrap();
        assert!(liveness.last_heartbeat.is_some());
    }

    #[test]
    fn keepalive_response_with_stale_id_is_ignored() {
        let player = sample();
        player.note_keepalive_sent(42);
        assert!(!player.note_keepalive_response(99));

        let liveness = player.liveness.lock().unwrap();
        assert!(liveness.last_heartbeat.is_none());
    }

    #[test]
    fn player_without_heartbeat_is_never_timed_out() {
        let player = sample();
        assert!(!player.is_timed_out(Duration::from_secs(0)));
    }

    #[test]
    fn player_past_timeout_is_flagged() {
        let player = sample();
        player.note_keepalive_sent(1);
        player.note_keepalive_response(1);
        assert!(player.is_timed_out(Duration::from_millis(0)));
    }
}
