use mcserver::config::Config;
use mcserver::connection;
use mcserver::world::World;
use packets::handshake::serverbound::HandshakePacket;
use packets::login::clientbound as login_out;
use packets::login::serverbound as login_in;
use packets::play::clientbound as play_out;
use packets::play::serverbound as play_in;
use packets::status::clientbound as status_out;
use packets::status::serverbound as status_in;
use packets::{AsyncReadPacket, AsyncWritePacket, NextState};
use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;

fn offline_world() -> Arc<World> {
    let mut config = Config::default();
    config.online_mode = false;
    config.compression_threshold = None;
    Arc::new(World::new(config).expect("failed to build world"))
}

fn client_addr() -> SocketAddr {
    SocketAddr::from_str("127.0.0.1:25565").expect("invalid address")
}

#[tokio::test]
async fn simulate_status_round_trip() {
    let world = offline_world();
    let (mut client_stream, server_stream) = tokio::io::duplex(4096);

    let server = tokio::spawn(async move {
        connection::handle(server_stream, client_addr(), world)
            .await
            .expect("status session should end cleanly")
    });

    client_stream
        .write_packet(HandshakePacket {
            protocol_version: 759,
            server_address: "localhost".to_string(),
            server_port: 25565,
            next_state: NextState::Status,
        })
        .await
        .expect("send handshake failed");

    client_stream
        .write_packet(status_in::StatusRequestPacket)
        .await
        .expect("send status request failed");

    let _response: status_out::StatusResponsePacket = client_stream
        .read_packet()
        .await
        .expect("status response read failed");

    client_stream
        .write_packet(status_in::PingPacket { payload: 42 })
        .await
        .expect("send ping failed");

    let pong: status_out::PongResponsePacket = client_stream
        .read_packet()
        .await
        .expect("pong read failed");
    assert_eq!(pong.payload, 42);

    drop(client_stream);
    server.await.expect("server task panicked");
}

#[tokio::test]
async fn simulate_offline_login_enters_play() {
    let world = offline_world();
    let (mut client_stream, server_stream) = tokio::io::duplex(8192);

    let server = tokio::spawn(async move {
        let result = connection::handle(server_stream, client_addr(), world).await;
        // the client drops its end once it has seen the Play packet, which surfaces as a
        // closed-connection error here rather than a clean `Ok`.
        match result {
            Ok(()) => {}
            Err(err) => assert!(err.is_connection_closed()),
        }
    });

    client_stream
        .write_packet(HandshakePacket {
            protocol_version: 759,
            server_address: "localhost".to_string(),
            server_port: 25565,
            next_state: NextState::Login,
        })
        .await
        .expect("send handshake failed");

    client_stream
        .write_packet(login_in::LoginStartPacket {
            name: "Notch".to_string(),
            signature: None,
        })
        .await
        .expect("send login start failed");

    let success: login_out::LoginSuccessPacket = client_stream
        .read_packet()
        .await
        .expect("login success read failed");
    assert_eq!(success.username, "Notch");

    let play: play_out::PlayPacket = client_stream
        .read_packet()
        .await
        .expect("play packet read failed");
    assert!(!play.world_names.is_empty());
    assert_eq!(play.world_name, play.world_names[0]);

    let _spawn: play_out::SpawnPositionPacket = client_stream
        .read_packet()
        .await
        .expect("spawn position read failed");

    let _info: play_out::PlayerInfoPacket = client_stream
        .read_packet()
        .await
        .expect("player info read failed");

    client_stream
        .write_packet(play_in::ClientSettingsPacket {
            locale: "en_us".to_string(),
            view_distance: 8,
            chat_mode: packets::ChatMode::Enabled,
            chat_colors: true,
            skin_parts: packets::DisplayedSkinParts(0),
            main_hand: packets::MainHand::Right,
            enable_text_filtering: false,
            enable_server_listing: true,
        })
        .await
        .expect("send client settings failed");

    drop(client_stream);
    server.await.expect("server task panicked");
}
