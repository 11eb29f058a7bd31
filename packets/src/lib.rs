#[cfg(test)]
use fake::Dummy;
use std::fmt::Debug;
use std::io::ErrorKind;
use tokio::io::{AsyncRead, AsyncWrite};
use uuid::Uuid;

pub mod handshake;
pub mod login;
pub mod play;
pub mod position;
pub mod reader;
pub mod slot;
pub mod status;
pub mod writer;

pub type VarInt = i32;

pub type VarLong = i64;

/// The maximum number of bytes a VarInt may occupy before the reader gives up.
pub const VARINT_MAX_BYTES: usize = 5;

/// The maximum number of bytes a VarLong may occupy before the reader gives up.
pub const VARLONG_MAX_BYTES: usize = 10;

/// The largest framing length this server will accept, in bytes. Always fits a 3-byte VarInt.
pub const MAX_PACKET_SIZE: VarInt = 2_097_151;

/// The internal error type for all errors related to the protocol communication.
///
/// This includes errors with the expected packets, packet contents or encoding of the exchanged fields. Errors of the
/// underlying data layer (for byte exchange) are wrapped from the underlying IO errors.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// An error occurred while reading or writing to the underlying byte stream.
    #[error("error reading or writing data: {0}")]
    Io(#[from] std::io::Error),

    /// A VarInt or VarLong ran past its maximum byte length without a terminating byte.
    #[error("malformed varint")]
    MalformedVarInt,

    /// The received packet is of an invalid length that we cannot process.
    #[error("illegal packet length")]
    IllegalPacketLength,

    /// The received value index cannot be mapped to an existing enum.
    #[error("illegal enum value index for {kind}: {value}")]
    IllegalEnumValue {
        /// The enum kind which was parsed.
        kind: &'static str,
        /// The value that was received.
        value: VarInt,
    },

    /// The received packet ID is not mapped to an expected packet.
    #[error("illegal packet ID: {actual} (expected {expected})")]
    IllegalPacketId {
        /// The expected value that should be present.
        expected: VarInt,
        /// The actual value that was observed.
        actual: VarInt,
    },

    /// A response body is incorrectly encoded (not UTF-8, or otherwise malformed).
    #[error("invalid encoding")]
    InvalidEncoding,

    /// Some array conversion failed (e.g. a byte array did not fit the fixed-size target).
    #[error("could not convert into array")]
    ArrayConversionFailed,

    /// An embedded NBT blob could not be decoded or encoded.
    #[error("nbt error: {0}")]
    Nbt(String),
}

impl Error {
    /// Whether this error represents the remote peer going away rather than a protocol
    /// violation. Connection loops use this to decide whether to log at `warn` or stay quiet.
    pub fn is_connection_closed(&self) -> bool {
        let Error::Io(err) = self else {
            return false;
        };
        err.kind() == ErrorKind::UnexpectedEof
            || err.kind() == ErrorKind::ConnectionReset
            || err.kind() == ErrorKind::ConnectionAborted
            || err.kind() == ErrorKind::BrokenPipe
    }
}

/// The state a connection requests to move into after the initial handshake.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(test, derive(Dummy))]
pub enum NextState {
    /// Query the server information without logging in.
    Status,
    /// Log into the Minecraft server, establishing a connection.
    Login,
}

impl From<NextState> for VarInt {
    fn from(state: NextState) -> Self {
        match state {
            NextState::Status => 1,
            NextState::Login => 2,
        }
    }
}

impl TryFrom<VarInt> for NextState {
    type Error = Error;

    fn try_from(value: VarInt) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(NextState::Status),
            2 => Ok(NextState::Login),
            _ => Err(Error::IllegalEnumValue {
                kind: "NextState",
                value,
            }),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(test, derive(Dummy))]
pub enum ChatMode {
    Enabled,
    CommandsOnly,
    Hidden,
}

impl From<ChatMode> for VarInt {
    fn from(value: ChatMode) -> Self {
        match value {
            ChatMode::Enabled => 0,
            ChatMode::CommandsOnly => 1,
            ChatMode::Hidden => 2,
        }
    }
}

impl TryFrom<VarInt> for ChatMode {
    type Error = Error;

    fn try_from(value: VarInt) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ChatMode::Enabled),
            1 => Ok(ChatMode::CommandsOnly),
            2 => Ok(ChatMode::Hidden),
            _ => Err(Error::IllegalEnumValue {
                kind: "ChatMode",
                value,
            }),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(test, derive(Dummy))]
pub struct DisplayedSkinParts(pub u8);

impl DisplayedSkinParts {
    pub fn cape_enabled(&self) -> bool {
        self.0 & 0x01 != 0
    }

    pub fn jacket_enabled(&self) -> bool {
        self.0 & 0x02 != 0
    }

    pub fn left_sleeve_enabled(&self) -> bool {
        self.0 & 0x04 != 0
    }

    pub fn right_sleeve_enabled(&self) -> bool {
        self.0 & 0x08 != 0
    }

    pub fn left_pants_enabled(&self) -> bool {
        self.0 & 0x10 != 0
    }

    pub fn right_pants_enabled(&self) -> bool {
        self.0 & 0x20 != 0
    }

    pub fn hat_enabled(&self) -> bool {
        self.0 & 0x40 != 0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(test, derive(Dummy))]
pub enum MainHand {
    Left,
    Right,
}

impl From<MainHand> for VarInt {
    fn from(value: MainHand) -> Self {
        match value {
            MainHand::Left => 0,
            MainHand::Right => 1,
        }
    }
}

impl TryFrom<VarInt> for MainHand {
    type Error = Error;

    fn try_from(value: VarInt) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(MainHand::Left),
            1 => Ok(MainHand::Right),
            _ => Err(Error::IllegalEnumValue {
                kind: "MainHand",
                value,
            }),
        }
    }
}

/// Packets are network packets that are part of the protocol definition and identified by a state-scoped ID.
pub trait Packet {
    /// Returns the defined ID of this network packet.
    const ID: VarInt;
}

/// `WritePacket`s are packets that can be written to a buffer.
pub trait WritePacket: Packet {
    /// Writes the data from this packet into the supplied [`S`].
    fn write_to_buffer<S>(&self, buffer: &mut S) -> impl Future<Output = Result<(), Error>>
    where
        S: AsyncWrite + Unpin + Send + Sync;
}

/// `ReadPacket`s are packets that can be read from a buffer.
pub trait ReadPacket: Packet + Sized {
    /// Creates a new instance of this packet with the data from the buffer.
    fn read_from_buffer<S>(buffer: &mut S) -> impl Future<Output = Result<Self, Error>>
    where
        S: AsyncRead + Unpin + Send + Sync;
}

/// `AsyncWritePacket` allows writing a specific [`WritePacket`] to an [`AsyncWrite`].
///
/// Only [`WritePacket`s](WritePacket) can be written as only those packets are sent. There are additional
/// methods to write the data that is encoded in a Minecraft-specific manner. Their implementation is analogous to the
/// [read implementation](AsyncReadPacket).
pub trait AsyncWritePacket {
    /// Writes a [`WritePacket`] onto this object, length-prefixed and preceded by its packet ID.
    fn write_packet<T: WritePacket + Send + Sync + Debug>(
        &mut self,
        packet: T,
    ) -> impl Future<Output = Result<(), Error>>;

    /// Writes a [`VarInt`] onto this object.
    fn write_varint(&mut self, int: VarInt) -> impl Future<Output = Result<(), Error>>;

    /// Writes a [`VarLong`] onto this object.
    fn write_varlong(&mut self, int: VarLong) -> impl Future<Output = Result<(), Error>>;

    /// Writes a length-prefixed UTF-8 `String` onto this object.
    fn write_string(&mut self, string: &str) -> impl Future<Output = Result<(), Error>>;

    /// Writes a `Uuid` onto this object as two big-endian 64-bit halves.
    fn write_uuid(&mut self, uuid: &Uuid) -> impl Future<Output = Result<(), Error>>;

    /// Writes a `bool` as a single byte onto this object.
    fn write_bool(&mut self, value: bool) -> impl Future<Output = Result<(), Error>>;

    /// Writes a length-prefixed byte array onto this object.
    fn write_bytes(&mut self, arr: &[u8]) -> impl Future<Output = Result<(), Error>>;
}

/// `AsyncReadPacket` allows reading a specific [`ReadPacket`] from an [`AsyncRead`].
///
/// Only [`ReadPacket`s](ReadPacket) can be read as only those packets are received. There are additional
/// methods to read the data that is encoded in a Minecraft-specific manner. Their implementation is analogous to the
/// [write implementation](AsyncWritePacket).
pub trait AsyncReadPacket {
    /// Reads the supplied [`ReadPacket`] type from this object, including its length prefix and packet ID.
    fn read_packet<T: ReadPacket + Send + Sync>(
        &mut self,
    ) -> impl Future<Output = Result<T, Error>>;

    /// Reads a [`VarInt`] from this object.
    fn read_varint(&mut self) -> impl Future<Output = Result<VarInt, Error>>;

    /// Reads a [`VarLong`] from this object.
    fn read_varlong(&mut self) -> impl Future<Output = Result<VarLong, Error>>;

    /// Reads a length-prefixed UTF-8 `String` from this object.
    fn read_string(&mut self) -> impl Future<Output = Result<String, Error>>;

    /// Reads a `bool` from a single byte.
    fn read_bool(&mut self) -> impl Future<Output = Result<bool, Error>>;

    /// Reads a `Uuid` as two big-endian 64-bit halves.
    fn read_uuid(&mut self) -> impl Future<Output = Result<Uuid, Error>>;

    /// Reads a length-prefixed byte array from this object.
    fn read_bytes(&mut self) -> impl Future<Output = Result<Vec<u8>, Error>>;
}

#[cfg(test)]
pub(crate) mod tests {
    use crate::{ReadPacket, VarInt, WritePacket};
    use fake::{Dummy, Fake, Faker};
    use std::fmt::Debug;
    use std::io::Cursor;

    pub async fn assert_packet<T>(packet_id: VarInt)
    where
        T: PartialEq + Eq + Dummy<Faker> + ReadPacket + WritePacket + Send + Sync + Debug + Clone,
    {
        let expected: T = Faker.fake();

        let mut writer: Cursor<Vec<u8>> = Cursor::new(Vec::new());
        expected
            .write_to_buffer(&mut writer)
            .await
            .expect("failed to write packet");

        let mut reader: Cursor<Vec<u8>> = Cursor::new(writer.into_inner());
        let actual = T::read_from_buffer(&mut reader)
            .await
            .expect("failed to read packet");

        assert_eq!(T::ID, packet_id, "mismatching packet id");
        assert_eq!(expected, actual);
        assert_eq!(
            reader.position() as usize,
            reader.get_ref().len(),
            "there are remaining bytes in the buffer"
        );
    }
}
