use crate::{AsyncWritePacket, Error, VarInt, VarLong, WritePacket};
use std::fmt::Debug;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use uuid::Uuid;

/// Packets on this protocol are small; this is just a sizing hint for the scratch buffer.
const INITIAL_BUFFER_SIZE: usize = 48;

impl<W: AsyncWrite + Unpin + Send + Sync> AsyncWritePacket for W {
    async fn write_packet<T: WritePacket + Send + Sync + Debug>(
        &mut self,
        packet: T,
    ) -> Result<(), Error> {
        // build the packet id + body in a scratch buffer so the length prefix can be computed
        let mut buffer = Vec::with_capacity(INITIAL_BUFFER_SIZE);
        buffer.write_varint(T::ID).await?;
        packet.write_to_buffer(&mut buffer).await?;

        // prepend the length prefix and flush as a single write so packets never interleave
        let mut final_buffer = Vec::with_capacity(buffer.len() + 2);
        final_buffer.write_varint(buffer.len() as VarInt).await?;
        final_buffer.extend_from_slice(&buffer);

        self.write_all(&final_buffer).await?;

        Ok(())
    }

    async fn write_varint(&mut self, value: VarInt) -> Result<(), Error> {
        let mut value = value;
        let mut buf = [0];
        loop {
            buf[0] = (value & 0b0111_1111) as u8;
            value = (value >> 7) & (i32::MAX >> 6);
            if value != 0 {
                buf[0] |= 0b1000_0000;
            }
            self.write_all(&buf).await?;

            if value == 0 {
                break;
            }
        }
        Ok(())
    }

    async fn write_varlong(&mut self, value: VarLong) -> Result<(), Error> {
        let mut value = value;
        let mut buf = [0];
        loop {
            buf[0] = (value & 0b0111_1111) as u8;
            value = (value >> 7) & (i64::MAX >> 6);
            if value != 0 {
                buf[0] |= 0b1000_0000;
            }
            self.write_all(&buf).await?;

            if value == 0 {
                break;
            }
        }
        Ok(())
    }

    async fn write_string(&mut self, string: &str) -> Result<(), Error> {
        self.write_varint(string.len() as VarInt).await?;
        self.write_all(string.as_bytes()).await?;

        Ok(())
    }

    async fn write_uuid(&mut self, id: &Uuid) -> Result<(), Error> {
        self.write_u128(id.as_u128()).await?;

        Ok(())
    }

    async fn write_bool(&mut self, value: bool) -> Result<(), Error> {
        self.write_u8(value as u8).await?;

        Ok(())
    }

    async fn write_bytes(&mut self, arr: &[u8]) -> Result<(), Error> {
        self.write_varint(arr.len() as VarInt).await?;
        self.write_all(arr).await?;

        Ok(())
    }
}
