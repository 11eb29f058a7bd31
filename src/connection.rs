//! The per-connection session: the Handshake → Status|Login → [Encryption] → Play state machine.
//! One task owns one socket from accept to disconnect.

use crate::chat::ChatMessage;
use crate::error::Error;
use crate::mojang;
use crate::player::{OutboundMessage, Player, PlayerPublicKey};
use crate::status::ServerStatus;
use crate::world::World;
use packets::handshake::serverbound::HandshakePacket;
use packets::login::clientbound::{
    CancelLoginPacket, EncryptionRequestPacket, LoginSuccessPacket, SetCompressionPacket,
};
use packets::login::serverbound::{EncryptionProof, EncryptionResponsePacket, LoginStartPacket};
use packets::play::clientbound::{
    DisconnectPacket, KeepAlivePacket, PlayPacket, PlayerInfoAddEntry, PlayerInfoPacket,
    SpawnPositionPacket,
};
use packets::play::serverbound::{ClientSettingsPacket, KeepAliveResponsePacket};
use packets::position::Position;
use packets::status::clientbound::{PongResponsePacket, StatusResponsePacket};
use packets::status::serverbound::{PingPacket, StatusRequestPacket};
use packets::{NextState, Packet, ReadPacket, VarInt};
use protocol::Frame;
use protocol::crypto::stream::{Aes128Cfb8Dec, Aes128Cfb8Enc, CipherStream, create_ciphers};
use protocol::crypto::{self, KEY_PAIR};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::mpsc;
use tracing::{debug, info};
use uuid::Uuid;

type SessionStream<S> = CipherStream<S, Aes128Cfb8Enc, Aes128Cfb8Dec>;

/// Runs a single connection end to end. The caller is responsible for logging the terminal
/// result; a peer disconnecting cleanly and a protocol violation are both represented as `Err`
/// here and disambiguated by [`Error::is_connection_closed`].
pub async fn handle<S>(socket: S, remote_addr: SocketAddr, world: Arc<World>) -> Result<(), Error>
where
    S: AsyncRead + AsyncWrite + Unpin + Send + Sync,
{
    let stream = CipherStream::from_stream(socket);
    let mut frame = Frame::new(stream);

    let handshake: HandshakePacket = frame.read_packet().await?;

    match handshake.next_state {
        NextState::Status => handle_status(&mut frame, &world).await,
        NextState::Login => handle_login(&mut frame, &world, remote_addr).await,
    }
}

async fn handle_status<S>(
    frame: &mut Frame<SessionStream<S>>,
    world: &Arc<World>,
) -> Result<(), Error>
where
    S: AsyncRead + AsyncWrite + Unpin + Send + Sync,
{
    let _: StatusRequestPacket = frame.read_packet().await?;

    let online = world.registry.online_count().await as u32;
    let status = ServerStatus::new(&world.config.description, world.config.max_players, online);
    frame
        .write_packet(StatusResponsePacket {
            status_json: status.to_json(),
        })
        .await?;

    if let Ok(ping) = frame.read_packet::<PingPacket>().await {
        frame
            .write_packet(PongResponsePacket {
                payload: ping.payload,
            })
            .await?;
    }

    Ok(())
}

async fn handle_login<S>(
    frame: &mut Frame<SessionStream<S>>,
    world: &Arc<World>,
    remote_addr: SocketAddr,
) -> Result<(), Error>
where
    S: AsyncRead + AsyncWrite + Unpin + Send + Sync,
{
    let login_start: LoginStartPacket = frame.read_packet().await?;
    let name = login_start.name;

    let public_key = login_start.signature.map(|sig| PlayerPublicKey {
        der: sig.public_key_der,
        timestamp: sig.timestamp,
        signature: sig.signature,
    });

    let verify_token = crypto::generate_verify_token(world.config.verify_token_length)?;

    let (uuid, textures_value, textures_signature) = if world.config.online_mode {
        let (shared_secret, server_hash) =
            run_encryption_handshake(frame, &public_key, &verify_token).await?;

        let profile = mojang::has_joined(&name, &server_hash)
            .await
            .map_err(|_| Error::MojangVerificationFailed {
                username: name.clone(),
            })?;

        let (encryptor, decryptor) = create_ciphers(&shared_secret)?;
        frame
            .inner_mut()
            .set_encryption(Some(encryptor), Some(decryptor));

        (
            profile.uuid,
            Some(profile.textures_value),
            profile.textures_signature,
        )
    } else {
        (offline_uuid(&name), None, None)
    };

    if let Some(threshold) = world.config.compression_threshold {
        frame
            .write_packet(SetCompressionPacket { threshold })
            .await?;
        frame.set_compression(Some(threshold));
    }

    frame
        .write_packet(LoginSuccessPacket {
            uuid,
            username: name.clone(),
        })
        .await?;

    let entity_id = world.entity_ids.generate();
    let textures = textures_value.map(|value| crate::player::Textures {
        value,
        signature: textures_signature,
    });
    let (player, outbound) = Player::new(name.clone(), uuid, entity_id, remote_addr.ip());
    let player = Arc::new(
        player
            .with_public_key(public_key)
            .with_textures(textures),
    );

    info!(username = %player.name, uuid = %player.uuid, "player logged in");

    let result = enter_play(frame, world, Arc::clone(&player), outbound).await;

    world.registry.remove(player.uuid).await;
    world.entity_ids.release(player.entity_id);
    debug!(uuid = %player.uuid, "player removed from registry");

    result
}

async fn run_encryption_handshake<S>(
    frame: &mut Frame<SessionStream<S>>,
    public_key: &Option<PlayerPublicKey>,
    verify_token: &[u8],
) -> Result<(Vec<u8>, String), Error>
where
    S: AsyncRead + AsyncWrite + Unpin + Send + Sync,
{
    let verify_token_hex = hex_encode(verify_token);

    frame
        .write_packet(EncryptionRequestPacket {
            server_id: String::new(),
            public_key_der: crypto::ENCODED_PUB.clone(),
            verify_token: verify_token_hex,
        })
        .await?;

    let response: EncryptionResponsePacket = frame.read_packet().await?;

    let shared_secret = crypto::decrypt(&KEY_PAIR.0, &response.shared_secret)?;
    if shared_secret.len() != 16 {
        cancel_login(frame, "Malformed shared secret").await?;
        return Err(Error::InvalidSharedSecretLength {
            actual: shared_secret.len(),
        });
    }

    match response.proof {
        EncryptionProof::VerifyToken(encrypted) => {
            let decrypted = crypto::decrypt(&KEY_PAIR.0, &encrypted)?;
            if !crypto::verify_token(verify_token, &decrypted) {
                cancel_login(frame, "Token mismatch").await?;
                return Err(Error::VerifyTokenMismatch);
            }
        }
        EncryptionProof::SignedSalt {
            salt,
            message_signature,
        } => {
            let Some(public_key) = public_key else {
                cancel_login(frame, "Signature verification error").await?;
                return Err(Error::InvalidSignature);
            };
            if crypto::verify_signed_salt(&public_key.der, salt, verify_token, &message_signature)
                .is_err()
            {
                cancel_login(frame, "Signature verification error").await?;
                return Err(Error::InvalidSignature);
            }
        }
    }

    let hash = crypto::minecraft_hash("", &shared_secret, crypto::ENCODED_PUB.as_slice());
    Ok((shared_secret, hash))
}

async fn cancel_login<S>(frame: &mut Frame<SessionStream<S>>, reason: &str) -> Result<(), Error>
where
    S: AsyncRead + AsyncWrite + Unpin + Send + Sync,
{
    frame
        .write_packet(CancelLoginPacket {
            reason_json: ChatMessage::plain(reason).to_json(),
        })
        .await?;
    Ok(())
}

async fn enter_play<S>(
    frame: &mut Frame<SessionStream<S>>,
    world: &Arc<World>,
    player: Arc<Player>,
    mut outbound: mpsc::UnboundedReceiver<OutboundMessage>,
) -> Result<(), Error>
where
    S: AsyncRead + AsyncWrite + Unpin + Send + Sync,
{
    let config = &world.config;

    frame
        .write_packet(PlayPacket {
            entity_id: player.entity_id,
            is_hardcore: false,
            game_mode: 0,
            previous_game_mode: -1,
            world_names: vec![crate::world::WORLD_NAME.to_string()],
            dimension_codec: world.dimension_codec.clone(),
            world_type: crate::world::WORLD_NAME.to_string(),
            world_name: crate::world::WORLD_NAME.to_string(),
            hashed_seed: 0,
            max_players: config.max_players as VarInt,
            view_distance: config.view_distance,
            simulation_distance: config.simulation_distance,
            reduced_debug_info: config.is_debug,
            enable_respawn_screen: true,
            is_debug: config.is_debug,
            is_flat: false,
            death_location: None,
        })
        .await?;

    frame
        .write_packet(SpawnPositionPacket {
            location: Position::new(0, 64, 0),
            angle: 0.0,
        })
        .await?;

    let existing = world.registry.snapshot().await;
    world.registry.register(Arc::clone(&player)).await;

    frame
        .write_packet(PlayerInfoPacket::Add(
            existing
                .iter()
                .chain(std::iter::once(&player))
                .map(|p| player_info_entry(p))
                .collect(),
        ))
        .await?;

    for other in &existing {
        other.send(OutboundMessage::PlayerJoined(player_info_entry(&player)));
    }

    let outcome = run_play_loop(frame, &player, &mut outbound).await;

    for other in world.registry.snapshot().await {
        if other.uuid != player.uuid {
            other.send(OutboundMessage::PlayerLeft(player.uuid));
        }
    }

    outcome
}

async fn run_play_loop<S>(
    frame: &mut Frame<SessionStream<S>>,
    player: &Arc<Player>,
    outbound: &mut mpsc::UnboundedReceiver<OutboundMessage>,
) -> Result<(), Error>
where
    S: AsyncRead + AsyncWrite + Unpin + Send + Sync,
{
    loop {
        tokio::select! {
            biased;

            message = outbound.recv() => {
                match message {
                    Some(OutboundMessage::KeepAlive(id)) => {
                        frame.write_packet(KeepAlivePacket { keep_alive_id: id }).await?;
                    }
                    Some(OutboundMessage::Kick(reason)) => {
                        frame
                            .write_packet(DisconnectPacket {
                                reason: ChatMessage::plain(reason).to_json(),
                            })
                            .await?;
                        break;
                    }
                    Some(OutboundMessage::PlayerJoined(entry)) => {
                        frame.write_packet(PlayerInfoPacket::Add(vec![entry])).await?;
                    }
                    Some(OutboundMessage::PlayerLeft(uuid)) => {
                        frame.write_packet(PlayerInfoPacket::Remove(vec![uuid])).await?;
                    }
                    None => break,
                }
            }

            raw = frame.read_raw() => {
                let (packet_id, mut body) = match raw {
                    Ok(pair) => pair,
                    Err(err) if err.is_connection_closed() => break,
                    Err(err) => return Err(err.into()),
                };

                match packet_id {
                    id if id == KeepAliveResponsePacket::ID => {
                        let response = KeepAliveResponsePacket::read_from_buffer(&mut body).await?;
                        player.note_keepalive_response(response.keep_alive_id);
                    }
                    id if id == ClientSettingsPacket::ID => {
                        let settings = ClientSettingsPacket::read_from_buffer(&mut body).await?;
                        apply_client_settings(&player, settings);
                    }
                    _ => {
                        debug!(packet_id, "ignoring unhandled play packet");
                    }
                }
            }
        }
    }

    Ok(())
}

fn apply_client_settings(player: &Player, packet: ClientSettingsPacket) {
    let mut settings = player.settings.lock().expect("player settings poisoned");
    settings.locale = packet.locale;
    settings.view_distance = packet.view_distance;
    settings.chat_mode = packet.chat_mode.into();
    settings.chat_colors = packet.chat_colors;
    settings.skin_parts = packet.skin_parts.0;
    settings.main_hand = packet.main_hand.into();
    settings.text_filtering = packet.enable_text_filtering;
    settings.allow_server_listings = packet.enable_server_listing;
}

fn player_info_entry(player: &Player) -> PlayerInfoAddEntry {
    PlayerInfoAddEntry {
        uuid: player.uuid,
        name: player.name.clone(),
        properties: Vec::new(),
        game_mode: player.game_mode as VarInt,
        ping: 0,
        display_name: None,
        sig_data: None,
    }
}

fn offline_uuid(name: &str) -> Uuid {
    Uuid::new_v3(
        &Uuid::NAMESPACE_OID,
        format!("OfflinePlayer:{name}").as_bytes(),
    )
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offline_uuid_is_deterministic_per_name() {
        let a = offline_uuid("Notch");
        let b = offline_uuid("Notch");
        assert_eq!(a, b);
        assert_eq!(a.get_version_num(), 3);
    }

    #[test]
    fn offline_uuid_differs_across_names() {
        assert_ne!(offline_uuid("Notch"), offline_uuid("Jeb_"));
    }

    #[test]
    fn hex_encode_formats_lowercase_padded_bytes() {
        assert_eq!(hex_encode(&[0x00, 0x0f, 0xff, 0xa3]), "000fffa3");
        assert_eq!(hex_encode(&[]), "");
    }
}
