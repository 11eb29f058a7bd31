#[cfg(any(feature = "server", feature = "client"))]
use crate::Error;
use crate::{Packet, VarInt};
#[cfg(test)]
use fake::Dummy;

pub mod clientbound {
    use super::*;
    #[cfg(feature = "client")]
    use crate::{AsyncReadPacket, ReadPacket};
    #[cfg(feature = "server")]
    use crate::{AsyncWritePacket, WritePacket};
    #[cfg(feature = "client")]
    use tokio::io::{AsyncRead, AsyncReadExt};
    #[cfg(feature = "server")]
    use tokio::io::{AsyncWrite, AsyncWriteExt};

    /// The [`StatusResponsePacket`].
    ///
    /// Sent in reply to a [`StatusRequestPacket`]; does not close the connection, so a ping
    /// exchange may still follow.
    ///
    /// [Minecraft Docs](https://minecraft.wiki/w/Java_Edition_protocol#Status_Response)
    #[derive(Debug, Clone, Eq, PartialEq)]
    #[cfg_attr(test, derive(Dummy))]
    pub struct StatusResponsePacket {
        /// The JSON response body that contains all self-reported server metadata.
        pub status_json: String,
    }

    impl Packet for StatusResponsePacket {
        const ID: VarInt = 0x00;
    }

    #[cfg(feature = "server")]
    impl WritePacket for StatusResponsePacket {
        async fn write_to_buffer<S>(&self, buffer: &mut S) -> Result<(), Error>
        where
            S: AsyncWrite + Unpin + Send + Sync,
        {
            buffer.write_string(&self.status_json).await?;

            Ok(())
        }
    }

    #[cfg(feature = "client")]
    impl ReadPacket for StatusResponsePacket {
        async fn read_from_buffer<S>(buffer: &mut S) -> Result<Self, Error>
        where
            S: AsyncRead + Unpin + Send + Sync,
        {
            let status_json = buffer.read_string().await?;

            Ok(Self { status_json })
        }
    }

    /// The reply to a [`PingPacket`], carrying the same payload back so the client can measure
    /// round-trip time. Ends the Server List Ping sequence.
    #[derive(Debug, Clone, Eq, PartialEq)]
    #[cfg_attr(test, derive(Dummy))]
    pub struct PongResponsePacket {
        /// The arbitrary payload that was sent with the request.
        pub payload: i64,
    }

    impl Packet for PongResponsePacket {
        const ID: VarInt = 0x01;
    }

    #[cfg(feature = "server")]
    impl WritePacket for PongResponsePacket {
        async fn write_to_buffer<S>(&self, buffer: &mut S) -> Result<(), Error>
        where
            S: AsyncWrite + Unpin + Send + Sync,
        {
            buffer.write_i64(self.payload).await?;

            Ok(())
        }
    }

    #[cfg(feature = "client")]
    impl ReadPacket for PongResponsePacket {
        async fn read_from_buffer<S>(buffer: &mut S) -> Result<Self, Error>
        where
            S: AsyncRead + Unpin + Send + Sync,
        {
            let payload = buffer.read_i64().await?;

            Ok(Self { payload })
        }
    }
}

pub mod serverbound {
    use super::*;
    #[cfg(feature = "server")]
    use crate::{AsyncReadPacket, ReadPacket};
    #[cfg(feature = "client")]
    use crate::{AsyncWritePacket, WritePacket};
    #[cfg(feature = "server")]
    use tokio::io::{AsyncRead, AsyncReadExt};
    #[cfg(feature = "client")]
    use tokio::io::{AsyncWrite, AsyncWriteExt};

    /// The [`StatusRequestPacket`].
    ///
    /// May only be sent once, immediately after the handshake and before any ping; the server
    /// does not respond to a second request on the same connection.
    ///
    /// [Minecraft Docs](https://minecraft.wiki/w/Java_Edition_protocol#Status_Request)
    #[derive(Debug, Clone, Eq, PartialEq)]
    #[cfg_attr(test, derive(Dummy))]
    pub struct StatusRequestPacket;

    impl Packet for StatusRequestPacket {
        const ID: VarInt = 0x00;
    }

    #[cfg(feature = "client")]
    impl WritePacket for StatusRequestPacket {
        async fn write_to_buffer<S>(&self, _buffer: &mut S) -> Result<(), Error>
        where
            S: AsyncWrite + Unpin + Send + Sync,
        {
            Ok(())
        }
    }

    #[cfg(feature = "server")]
    impl ReadPacket for StatusRequestPacket {
        async fn read_from_buffer<S>(_buffer: &mut S) -> Result<Self, Error>
        where
            S: AsyncRead + Unpin + Send + Sync,
        {
            Ok(Self)
        }
    }

    /// The [`PingPacket`].
    ///
    /// [Minecraft Docs](https://minecraft.wiki/w/Java_Edition_protocol#Ping_Request_(status))
    #[derive(Debug, Clone, Eq, PartialEq)]
    #[cfg_attr(test, derive(Dummy))]
    pub struct PingPacket {
        /// An arbitrary payload, echoed back unchanged in the [`super::clientbound::PongResponsePacket`].
        pub payload: i64,
    }

    impl Packet for PingPacket {
        const ID: VarInt = 0x01;
    }

    #[cfg(feature = "client")]
    impl WritePacket for PingPacket {
        async fn write_to_buffer<S>(&self, buffer: &mut S) -> Result<(), Error>
        where
            S: AsyncWrite + Unpin + Send + Sync,
        {
            buffer.write_i64(self.payload).await?;

            Ok(())
        }
    }

    #[cfg(feature = "server")]
    impl ReadPacket for PingPacket {
        async fn read_from_buffer<S>(buffer: &mut S) -> Result<Self, Error>
        where
            S: AsyncRead + Unpin + Send + Sync,
        {
            let payload = buffer.read_i64().await?;

            Ok(Self { payload })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::assert_packet;

    #[tokio::test]
    async fn write_read_clientbound_status_response_packet() {
        assert_packet::<clientbound::StatusResponsePacket>(0x00).await;
    }

    #[tokio::test]
    async fn write_read_clientbound_pong_response_packet() {
        assert_packet::<clientbound::PongResponsePacket>(0x01).await;
    }

    #[tokio::test]
    async fn write_read_serverbound_status_request_packet() {
        assert_packet::<serverbound::StatusRequestPacket>(0x00).await;
    }

    #[tokio::test]
    async fn write_read_serverbound_ping_packet() {
        assert_packet::<serverbound::PingPacket>(0x01).await;
    }
}
