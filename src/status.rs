//! The status JSON response sent in reply to `StatusRequest`, matching the shape vanilla clients
//! expect in the server list.

use crate::chat::ChatMessage;
use serde::Serialize;

/// The protocol name and version advertised to the client.
#[derive(Debug, Serialize)]
pub struct ServerVersion {
    pub name: String,
    pub protocol: i64,
}

/// A single sampled player entry (unused by this core, kept empty).
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ServerPlayer {
    pub name: String,
    pub id: String,
}

/// The current, maximum and sampled player counts.
#[derive(Debug, Serialize)]
pub struct ServerPlayers {
    pub max: u32,
    pub online: u32,
    pub sample: Vec<ServerPlayer>,
}

/// The full status response body, serialized as `status_json` in `StatusResponsePacket`.
#[derive(Debug, Serialize)]
pub struct ServerStatus {
    pub version: ServerVersion,
    pub players: ServerPlayers,
    pub description: ChatMessage,
    #[serde(rename = "previewsChat")]
    pub previews_chat: bool,
    #[serde(rename = "enforcesSecureChat")]
    pub enforces_secure_chat: bool,
}

/// Protocol 759 corresponds to vanilla "1.19".
pub const PROTOCOL_VERSION: i64 = 759;
pub const PROTOCOL_NAME: &str = "1.19";

impl ServerStatus {
    pub fn new(description: &str, max_players: u32, online: u32) -> Self {
        Self {
            version: ServerVersion {
                name: PROTOCOL_NAME.to_string(),
                protocol: PROTOCOL_VERSION,
            },
            players: ServerPlayers {
                max: max_players,
                online,
                sample: Vec::new(),
            },
            description: ChatMessage::plain(description),
            previews_chat: true,
            enforces_secure_chat: true,
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).expect("status serialization is infallible")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_reports_protocol_759() {
        let status = ServerStatus::new("A Minecraft Server", 20, 3);
        let json = status.to_json();
        assert!(json.contains("\"protocol\":759"));
        assert!(json.contains("\"name\":\"1.19\""));
        assert!(json.contains("\"online\":3"));
        assert!(json.contains("\"max\":20"));
        assert!(json.contains("\"previewsChat\":true"));
        assert!(json.contains("\"enforcesSecureChat\":true"));
    }
}
