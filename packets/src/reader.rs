use crate::{AsyncReadPacket, Error, ReadPacket, VarInt, VarLong, MAX_PACKET_SIZE, VARINT_MAX_BYTES, VARLONG_MAX_BYTES};
use tokio::io::{AsyncRead, AsyncReadExt};
use uuid::Uuid;

impl<R: AsyncRead + Unpin + Send + Sync> AsyncReadPacket for R {
    async fn read_packet<T: ReadPacket + Send + Sync>(&mut self) -> Result<T, Error> {
        // extract the length of the packet and check it against the framing bounds
        let length = self.read_varint().await?;
        if length <= 0 || length > MAX_PACKET_SIZE {
            return Err(Error::IllegalPacketLength);
        }

        // extract the encoded packet id and validate it against what the caller expects
        let packet_id = self.read_varint().await?;
        let expected_packet_id = T::ID;
        if packet_id != expected_packet_id {
            return Err(Error::IllegalPacketId {
                expected: expected_packet_id,
                actual: packet_id,
            });
        }

        // bound the remaining reads to this packet's declared payload
        let mut take = self.take(length as u64);

        T::read_from_buffer(&mut take).await
    }

    async fn read_varint(&mut self) -> Result<VarInt, Error> {
        let mut buf = [0];
        let mut ans: i32 = 0;
        for i in 0..VARINT_MAX_BYTES {
            self.read_exact(&mut buf).await?;
            ans |= ((buf[0] & 0b0111_1111) as i32) << (7 * i);
            if buf[0] & 0b1000_0000 == 0 {
                return Ok(ans);
            }
        }
        Err(Error::MalformedVarInt)
    }

    async fn read_varlong(&mut self) -> Result<VarLong, Error> {
        let mut buf = [0];
        let mut ans: i64 = 0;
        for i in 0..VARLONG_MAX_BYTES {
            self.read_exact(&mut buf).await?;
            ans |= ((buf[0] & 0b0111_1111) as i64) << (7 * i);
            if buf[0] & 0b1000_0000 == 0 {
                return Ok(ans);
            }
        }
        Err(Error::MalformedVarInt)
    }

    async fn read_string(&mut self) -> Result<String, Error> {
        let length = self.read_varint().await? as usize;

        let mut buffer = vec![0; length];
        self.read_exact(&mut buffer).await?;

        String::from_utf8(buffer).map_err(|_| Error::InvalidEncoding)
    }

    async fn read_bool(&mut self) -> Result<bool, Error> {
        let value = self.read_u8().await?;
        Ok(value != 0)
    }

    async fn read_uuid(&mut self) -> Result<Uuid, Error> {
        let value = self.read_u128().await?;

        Ok(Uuid::from_u128(value))
    }

    async fn read_bytes(&mut self) -> Result<Vec<u8>, Error> {
        let length = self.read_varint().await? as usize;

        let mut buffer = vec![0; length];
        self.read_exact(&mut buffer).await?;

        Ok(buffer)
    }
}
