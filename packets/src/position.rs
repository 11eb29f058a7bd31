//! The "Position" wire primitive: a block coordinate packed into a single 64-bit integer.

use crate::{AsyncReadPacket, AsyncWritePacket, Error};
#[cfg(test)]
use fake::Dummy;
use tokio::io::{AsyncRead, AsyncWrite};

/// A block position, as used by e.g. `SpawnPosition` and the Play packet's death location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(test, derive(Dummy))]
pub struct Position {
    #[cfg_attr(test, dummy(faker = "-33_554_432..=33_554_431"))]
    pub x: i32,
    #[cfg_attr(test, dummy(faker = "-2048..=2047"))]
    pub y: i32,
    #[cfg_attr(test, dummy(faker = "-33_554_432..=33_554_431"))]
    pub z: i32,
}

impl Position {
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Packs this position as `((x & 0x3FFFFFF)<<38) | ((z & 0x3FFFFFF)<<12) | (y & 0xFFF)`.
    pub fn to_bits(self) -> u64 {
        ((self.x as u64 & 0x3FF_FFFF) << 38)
            | ((self.z as u64 & 0x3FF_FFFF) << 12)
            | (self.y as u64 & 0xFFF)
    }

    /// Unpacks a position from its bit layout, sign-extending each field via arithmetic shifts.
    pub fn from_bits(value: u64) -> Self {
        let value = value as i64;
        let x = (value >> 38) as i32;
        let y = ((value << 52) >> 52) as i32;
        let z = ((value << 26) >> 38) as i32;
        Self { x, y, z }
    }

    pub async fn write<S>(&self, buffer: &mut S) -> Result<(), Error>
    where
        S: AsyncWrite + Unpin + Send + Sync,
    {
        use tokio::io::AsyncWriteExt;
        buffer.write_u64(self.to_bits()).await?;
        Ok(())
    }

    pub async fn read<S>(buffer: &mut S) -> Result<Self, Error>
    where
        S: AsyncRead + Unpin + Send + Sync,
    {
        use tokio::io::AsyncReadExt;
        let value = buffer.read_u64().await?;
        Ok(Self::from_bits(value))
    }
}

/// A `VarInt`-prefixed set of 64-bit words, as used by the light masks in `MapChunk`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(test, derive(Dummy))]
pub struct BitSet(pub Vec<i64>);

impl BitSet {
    pub fn is_set(&self, bit: usize) -> bool {
        self.0
            .get(bit / 64)
            .map(|word| (word >> (bit % 64)) & 1 != 0)
            .unwrap_or(false)
    }

    pub async fn write<S>(&self, buffer: &mut S) -> Result<(), Error>
    where
        S: AsyncWrite + Unpin + Send + Sync,
    {
        use tokio::io::AsyncWriteExt;
        buffer.write_varint(self.0.len() as crate::VarInt).await?;
        for word in &self.0 {
            buffer.write_i64(*word).await?;
        }
        Ok(())
    }

    pub async fn read<S>(buffer: &mut S) -> Result<Self, Error>
    where
        S: AsyncRead + Unpin + Send + Sync,
    {
        use tokio::io::AsyncReadExt;
        let count = buffer.read_varint().await?;
        let mut words = Vec::with_capacity(count.max(0) as usize);
        for _ in 0..count {
            words.push(buffer.read_i64().await?);
        }
        Ok(Self(words))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_round_trips_within_bounds() {
        let cases = [
            (0, 0, 0),
            (1, 1, 1),
            (-1, -1, -1),
            (33_554_431, 2047, 33_554_431),
            (-33_554_432, -2048, -33_554_432),
        ];

        for (x, y, z) in cases {
            let pos = Position::new(x, y, z);
            let decoded = Position::from_bits(pos.to_bits());
            assert_eq!(pos, decoded);
        }
    }

    #[test]
    fn bitset_bit_lookup() {
        let set = BitSet(vec![0b1010]);
        assert!(!set.is_set(0));
        assert!(set.is_set(1));
        assert!(!set.is_set(2));
        assert!(set.is_set(3));
        assert!(!set.is_set(64));
    }
}
