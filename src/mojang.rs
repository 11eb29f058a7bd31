//! The Mojang `hasJoined` session-service probe, used to verify a client's identity once
//! encryption has been negotiated in online mode.

use crate::error::Error;
use serde::Deserialize;
use std::sync::LazyLock;
use std::time::Duration;
use tracing::instrument;
use uuid::Uuid;

/// The shared HTTP client used for every Mojang request, bounded by a 5 second timeout per the
/// protocol's external-interface contract.
static HTTP_CLIENT: LazyLock<reqwest::Client> = LazyLock::new(|| {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(5))
        .build()
        .expect("failed to create http client")
});

#[derive(Debug, Deserialize)]
struct HasJoinedResponse {
    id: String,
    name: String,
    #[serde(default)]
    properties: Vec<HasJoinedProperty>,
}

#[derive(Debug, Deserialize)]
struct HasJoinedProperty {
    name: String,
    value: String,
    signature: Option<String>,
}

/// The verified identity and skin/cape texture blob returned by Mojang.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedProfile {
    pub uuid: Uuid,
    pub textures_value: String,
    pub textures_signature: Option<String>,
}

/// Performs the `hasJoined` lookup against Mojang's session service, as described in the
/// external interfaces section: a non-200 response or a name mismatch means the player could not
/// be verified.
#[instrument(skip(server_hash))]
pub async fn has_joined(username: &str, server_hash: &str) -> Result<VerifiedProfile, Error> {
    let url = format!(
        "https://sessionserver.mojang.com/session/minecraft/hasJoined?username={username}&serverId={server_hash}"
    );

    let response = HTTP_CLIENT.get(&url).send().await?;

    if !response.status().is_success() {
        return Err(Error::MojangVerificationFailed {
            username: username.to_string(),
        });
    }

    let body: HasJoinedResponse = response.json().await?;

    if body.name != username {
        return Err(Error::MojangVerificationFailed {
            username: username.to_string(),
        });
    }

    let uuid = parse_undashed_uuid(&body.id).ok_or_else(|| Error::MojangVerificationFailed {
        username: username.to_string(),
    })?;

    let textures = body
        .properties
        .into_iter()
        .find(|property| property.name == "textures")
        .ok_or_else(|| Error::MojangVerificationFailed {
            username: username.to_string(),
        })?;

    Ok(VerifiedProfile {
        uuid,
        textures_value: textures.value,
        textures_signature: textures.signature,
    })
}

/// Mojang returns ids as a 32-char hex string without dashes.
fn parse_undashed_uuid(id: &str) -> Option<Uuid> {
    if id.len() != 32 {
        return None;
    }
    let high = u64::from_str_radix(&id[0..16], 16).ok()?;
    let low = u64::from_str_radix(&id[16..32], 16).ok()?;
    Some(Uuid::from_u128(((high as u128) << 64) | low as u128))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_undashed_uuid() {
        let uuid = parse_undashed_uuid("069a79f444e94726a5befca90e38aaf5").expect("should parse");
        assert_eq!(uuid.to_string(), "069a79f4-44e9-4726-a5be-fca90e38aaf5");
    }

    #[test]
    fn rejects_malformed_id() {
        assert!(parse_undashed_uuid("not-a-uuid").is_none());
    }
}
