//! The packet framing layer: length-prefixing every packet and, once negotiated, transparently
//! zlib-compressing its body. Encryption is a separate, lower concern — wrap `S` in a
//! [`crate::crypto::stream::CipherStream`] before handing it to [`Frame`] and every byte this
//! type reads or writes already passes through the cipher.

use crate::{Error, compression};
use packets::{AsyncReadPacket, AsyncWritePacket, MAX_PACKET_SIZE, ReadPacket, VarInt, WritePacket};
use std::fmt::Debug;
use std::io::Cursor;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// A framed connection. Wraps any byte stream and speaks the length-prefixed, optionally
/// zlib-compressed packet framing used once a connection has passed the handshake.
pub struct Frame<S> {
    inner: S,
    compression_threshold: Option<VarInt>,
}

impl<S> Frame<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send + Sync,
{
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            compression_threshold: None,
        }
    }

    /// Enables (or disables) compression for every packet framed from this point on, following a
    /// `SetCompression` exchange.
    pub fn set_compression(&mut self, threshold: Option<VarInt>) {
        self.compression_threshold = threshold;
    }

    pub fn is_compressed(&self) -> bool {
        self.compression_threshold.is_some()
    }

    pub fn into_inner(self) -> S {
        self.inner
    }

    /// Gives mutable access to the wrapped stream, used to flip on encryption mid-session
    /// (`CipherStream::set_encryption`) without tearing down the frame's own state.
    pub fn inner_mut(&mut self) -> &mut S {
        &mut self.inner
    }

    /// Writes a packet, transparently compressing its body if compression is active and the
    /// body is at or above the negotiated threshold.
    pub async fn write_packet<T: WritePacket + Send + Sync + Debug>(
        &mut self,
        packet: T,
    ) -> Result<(), Error> {
        let mut body = Vec::new();
        body.write_varint(T::ID).await?;
        packet.write_to_buffer(&mut body).await?;

        let mut framed = Vec::with_capacity(body.len() + 4);

        match self.compression_threshold {
            None => {
                framed.write_varint(body.len() as VarInt).await?;
                framed.extend_from_slice(&body);
            }
            Some(threshold) => {
                let mut payload = Vec::with_capacity(body.len() + 4);
                if (body.len() as VarInt) >= threshold {
                    let compressed = compression::compress(&body)?;
                    payload.write_varint(body.len() as VarInt).await?;
                    payload.extend_from_slice(&compressed);
                } else {
                    // below the threshold: sent uncompressed, signalled by a zero data length
                    payload.write_varint(0).await?;
                    payload.extend_from_slice(&body);
                }
                framed.write_varint(payload.len() as VarInt).await?;
                framed.extend_from_slice(&payload);
            }
        }

        self.inner.write_all(&framed).await?;
        Ok(())
    }

    /// Reads a packet, transparently decompressing its body if compression is active.
    pub async fn read_packet<T: ReadPacket + Send + Sync>(&mut self) -> Result<T, Error> {
        let (packet_id, mut cursor) = self.read_raw().await?;
        if packet_id != T::ID {
            return Err(packets::Error::IllegalPacketId {
                expected: T::ID,
                actual: packet_id,
            }
            .into());
        }

        Ok(T::read_from_buffer(&mut cursor).await?)
    }

    /// Reads one frame off the wire and returns its packet id alongside a cursor positioned at
    /// the start of the id-specific body, without assuming which packet type it decodes to. Used
    /// by dispatch loops (e.g. the `Play` state) that branch on the id before choosing how to
    /// decode the rest.
    pub async fn read_raw(&mut self) -> Result<(VarInt, Cursor<Vec<u8>>), Error> {
        let length = self.inner.read_varint().await?;
        if length <= 0 || length > MAX_PACKET_SIZE {
            return Err(packets::Error::IllegalPacketLength.into());
        }

        let mut take = (&mut self.inner).take(length as u64);

        let body = match self.compression_threshold {
            None => {
                let mut body = Vec::with_capacity(length as usize);
                take.read_to_end(&mut body).await?;
                body
            }
            Some(threshold) => {
                let data_len = take.read_varint().await?;
                let mut rest = Vec::new();
                take.read_to_end(&mut rest).await?;

                if data_len == 0 {
                    rest
                } else {
                    if data_len < threshold {
                        return Err(Error::BelowThreshold {
                            threshold,
                            actual: data_len,
                        });
                    }
                    compression::decompress(&rest, data_len as usize)?
                }
            }
        };

        let mut cursor = Cursor::new(body);
        let packet_id = cursor.read_varint().await?;
        Ok((packet_id, cursor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use packets::login::clientbound::SetCompressionPacket;
    use packets::status::clientbound::{PongResponsePacket, StatusResponsePacket};

    #[tokio::test]
    async fn round_trips_uncompressed() {
        let (client, server) = tokio::io::duplex(4096);
        let mut client = Frame::new(client);
        let mut server = Frame::new(server);
        assert!(!client.is_compressed());

        let packet = PongResponsePacket { payload: 42 };
        client.write_packet(packet.clone()).await.expect("write");
        let received: PongResponsePacket = server.read_packet().await.expect("read");
        assert_eq!(packet, received);
    }

    #[tokio::test]
    async fn round_trips_small_packet_below_threshold() {
        let (client, server) = tokio::io::duplex(4096);
        let mut client = Frame::new(client);
        let mut server = Frame::new(server);

        client.set_compression(Some(256));
        server.set_compression(Some(256));
        assert!(client.is_compressed());

        let packet = SetCompressionPacket { threshold: 256 };
        client.write_packet(packet.clone()).await.expect("write");
        let received: SetCompressionPacket = server.read_packet().await.expect("read");
        assert_eq!(packet, received);
    }

    #[tokio::test]
    async fn round_trips_large_packet_above_threshold() {
        let (client, server) = tokio::io::duplex(1 << 20);
        let mut client = Frame::new(client);
        let mut server = Frame::new(server);

        client.set_compression(Some(16));
        server.set_compression(Some(16));

        let packet = StatusResponsePacket {
            status_json: "x".repeat(4096),
        };
        client.write_packet(packet.clone()).await.expect("write");
        let received: StatusResponsePacket = server.read_packet().await.expect("read");
        assert_eq!(packet, received);
    }
}
