//! The combined error type for the transport layer: packet codec failures, cryptography
//! failures and the framing invariants specific to this crate (compression, length bounds).

use packets::VarInt;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Packet(#[from] packets::Error),

    #[error(transparent)]
    Crypto(#[from] crate::crypto::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The zlib-decompressed body did not match the `uncompressedDataSize` the sender declared.
    #[error("decompressed packet length of {actual} does not match declared length {expected}")]
    DecompressionMismatch { expected: VarInt, actual: VarInt },

    /// A packet below the compression threshold arrived with a nonzero `uncompressedDataSize`.
    #[error("packet of {actual} bytes is below the compression threshold of {threshold}")]
    BelowThreshold { threshold: VarInt, actual: VarInt },
}
