//! The top-level error type for the server core. Every module-level error type composes into
//! this one via `#[from]`, so session/accept-loop code can simply use `?` throughout.

use packets::VarInt;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Packet(#[from] packets::Error),

    #[error(transparent)]
    Transport(#[from] protocol::Error),

    #[error(transparent)]
    Crypto(#[from] protocol::crypto::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("request to mojang's session service failed: {0}")]
    Mojang(#[from] reqwest::Error),

    #[error("failed to load configuration: {0}")]
    Config(#[from] config::ConfigError),

    #[error("failed to read dimension codec: {0}")]
    DimensionCodec(String),

    #[error("received packet id {actual} while in state {state}, expected {expected}")]
    UnexpectedPacket {
        state: &'static str,
        expected: VarInt,
        actual: VarInt,
    },

    #[error("mojang session verification failed for {username}")]
    MojangVerificationFailed { username: String },

    #[error("decrypted shared secret has {actual} bytes, expected 16")]
    InvalidSharedSecretLength { actual: usize },

    #[error("verify token mismatch")]
    VerifyTokenMismatch,

    #[error("signature verification failed")]
    InvalidSignature,

    #[error("encryption response carries neither a verify token nor a signed salt")]
    MalformedEncryptionResponse,
}

impl Error {
    /// Whether this error merely reflects the peer going away, as opposed to a protocol
    /// violation worth logging loudly.
    pub fn is_connection_closed(&self) -> bool {
        match self {
            Error::Packet(err) => err.is_connection_closed(),
            Error::Io(err) => {
                use std::io::ErrorKind;
                matches!(
                    err.kind(),
                    ErrorKind::UnexpectedEof
                        | ErrorKind::ConnectionReset
                        | ErrorKind::ConnectionAborted
                        | ErrorKind::BrokenPipe
                )
            }
            _ => false,
        }
    }
}
