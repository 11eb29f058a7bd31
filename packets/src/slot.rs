//! The "Slot" wire primitive: the on-wire representation of an inventory item.

use crate::{AsyncReadPacket, AsyncWritePacket, Error, VarInt};
use fastnbt::Value;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// An inventory slot. `None` is encoded as a single absent-bit; `Some` carries the item id, the
/// stack count and an arbitrary NBT tag (an empty compound is written as a bare `TagEnd`).
#[derive(Debug, Clone, PartialEq)]
pub struct Slot(pub Option<SlotItem>);

// `fastnbt::Value` has no generic `Dummy` impl, so round-trip tests exercise the always-valid
// empty slot rather than deriving arbitrary NBT payloads.
#[cfg(test)]
impl fake::Dummy<fake::Faker> for Slot {
    fn dummy_with_rng<R: rand::Rng + ?Sized>(_config: &fake::Faker, _rng: &mut R) -> Self {
        Slot(None)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SlotItem {
    pub item_id: VarInt,
    pub count: u8,
    pub tag: Value,
}

impl Slot {
    pub const EMPTY: Slot = Slot(None);

    pub async fn write<S>(&self, buffer: &mut S) -> Result<(), Error>
    where
        S: AsyncWrite + Unpin + Send + Sync,
    {
        match &self.0 {
            None => {
                buffer.write_bool(false).await?;
            }
            Some(item) => {
                buffer.write_bool(true).await?;
                buffer.write_varint(item.item_id).await?;
                buffer.write_u8(item.count).await?;
                match item.tag {
                    Value::Compound(ref map) if map.is_empty() => {
                        buffer.write_u8(0x00).await?;
                    }
                    ref tag => {
                        let bytes = fastnbt::to_bytes(tag).map_err(|e| Error::Nbt(e.to_string()))?;
                        buffer.write_all(&bytes).await?;
                    }
                }
            }
        }
        Ok(())
    }

    pub async fn read<S>(buffer: &mut S) -> Result<Self, Error>
    where
        S: AsyncRead + Unpin + Send + Sync,
    {
        let present = buffer.read_bool().await?;
        if !present {
            return Ok(Slot(None));
        }

        let item_id = buffer.read_varint().await?;
        let count = buffer.read_u8().await?;

        let tag_id = buffer.read_u8().await?;
        let tag = if tag_id == 0x00 {
            Value::Compound(Default::default())
        } else {
            let mut rest = Vec::new();
            buffer.read_to_end(&mut rest).await?;

            let mut full = Vec::with_capacity(rest.len() + 1);
            full.push(tag_id);
            full.extend_from_slice(&rest);

            fastnbt::from_bytes(&full).map_err(|e| Error::Nbt(e.to_string()))?
        };

        Ok(Slot(Some(SlotItem {
            item_id,
            count,
            tag,
        })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[tokio::test]
    async fn write_read_populated_slot_round_trips() {
        let mut tag = std::collections::HashMap::new();
        tag.insert("Damage".to_string(), Value::Int(3));

        let slot = Slot(Some(SlotItem {
            item_id: 7,
            count: 12,
            tag: Value::Compound(tag),
        }));

        let mut writer: Cursor<Vec<u8>> = Cursor::new(Vec::new());
        slot.write(&mut writer).await.expect("failed to write slot");

        let mut reader: Cursor<Vec<u8>> = Cursor::new(writer.into_inner());
        let decoded = Slot::read(&mut reader).await.expect("failed to read slot");

        assert_eq!(slot, decoded);
        assert_eq!(
            reader.position() as usize,
            reader.get_ref().len(),
            "there are remaining bytes in the buffer"
        );
    }

    #[tokio::test]
    async fn write_read_empty_compound_slot_is_distinct_from_populated() {
        let empty = Slot(Some(SlotItem {
            item_id: 1,
            count: 1,
            tag: Value::Compound(Default::default()),
        }));

        let mut writer: Cursor<Vec<u8>> = Cursor::new(Vec::new());
        empty.write(&mut writer).await.expect("failed to write slot");

        let mut reader: Cursor<Vec<u8>> = Cursor::new(writer.into_inner());
        let decoded = Slot::read(&mut reader).await.expect("failed to read slot");

        assert_eq!(empty, decoded);
    }
}
