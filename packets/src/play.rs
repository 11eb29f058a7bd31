//! Packets exchanged once a session has entered the `Play` state.

#[cfg(any(feature = "server", feature = "client"))]
use crate::Error;
use crate::position::{BitSet, Position};
use crate::slot::Slot;
use crate::{Packet, VarInt};
#[cfg(test)]
use fake::Dummy;
use uuid::Uuid;

pub mod clientbound {
    use super::*;
    #[cfg(feature = "client")]
    use crate::{AsyncReadPacket, ReadPacket};
    #[cfg(feature = "server")]
    use crate::{AsyncWritePacket, WritePacket};
    use fastnbt::Value as NbtValue;
    #[cfg(feature = "client")]
    use tokio::io::{AsyncRead, AsyncReadExt};
    #[cfg(feature = "server")]
    use tokio::io::{AsyncWrite, AsyncWriteExt};

    /// The [`DisconnectPacket`].
    ///
    /// Ends a `Play` session with a JSON chat message explaining why.
    ///
    /// [Minecraft Docs](https://minecraft.wiki/w/Java_Edition_protocol#Disconnect_(play))
    #[derive(Debug, Clone, Eq, PartialEq)]
    #[cfg_attr(test, derive(Dummy))]
    pub struct DisconnectPacket {
        pub reason: String,
    }

    impl Packet for DisconnectPacket {
        const ID: VarInt = 0x17;
    }

    #[cfg(feature = "server")]
    impl WritePacket for DisconnectPacket {
        async fn write_to_buffer<S>(&self, buffer: &mut S) -> Result<(), Error>
        where
            S: AsyncWrite + Unpin + Send + Sync,
        {
            buffer.write_string(&self.reason).await?;
            Ok(())
        }
    }

    #[cfg(feature = "client")]
    impl ReadPacket for DisconnectPacket {
        async fn read_from_buffer<S>(buffer: &mut S) -> Result<Self, Error>
        where
            S: AsyncRead + Unpin + Send + Sync,
        {
            Ok(Self {
                reason: buffer.read_string().await?,
            })
        }
    }

    /// The [`KeepAlivePacket`].
    ///
    /// Expects a [`super::serverbound::KeepAliveResponsePacket`] carrying the same id back.
    ///
    /// [Minecraft Docs](https://minecraft.wiki/w/Java_Edition_protocol#Keep_Alive_(clientbound))
    #[derive(Debug, Clone, Eq, PartialEq)]
    #[cfg_attr(test, derive(Dummy))]
    pub struct KeepAlivePacket {
        pub keep_alive_id: i64,
    }

    impl Packet for KeepAlivePacket {
        const ID: VarInt = 0x1e;
    }

    #[cfg(feature = "server")]
    impl WritePacket for KeepAlivePacket {
        async fn write_to_buffer<S>(&self, buffer: &mut S) -> Result<(), Error>
        where
            S: AsyncWrite + Unpin + Send + Sync,
        {
            buffer.write_i64(self.keep_alive_id).await?;
            Ok(())
        }
    }

    #[cfg(feature = "client")]
    impl ReadPacket for KeepAlivePacket {
        async fn read_from_buffer<S>(buffer: &mut S) -> Result<Self, Error>
        where
            S: AsyncRead + Unpin + Send + Sync,
        {
            Ok(Self {
                keep_alive_id: buffer.read_i64().await?,
            })
        }
    }

    /// Reads exactly one NBT value starting at the cursor's current position, leaving the
    /// cursor positioned right after it so the remaining fields of the packet can still be read.
    /// `fastnbt`'s reader-based deserializer stops as soon as the root tag is complete; it does
    /// not require (or consume) the rest of the buffer.
    fn read_nbt_value(cursor: &mut std::io::Cursor<Vec<u8>>) -> Result<NbtValue, Error> {
        let start = cursor.position() as usize;
        let mut sub = std::io::Cursor::new(&cursor.get_ref()[start..]);
        let value: NbtValue =
            fastnbt::from_reader(&mut sub).map_err(|e| Error::Nbt(e.to_string()))?;
        cursor.set_position(start as u64 + sub.position());
        Ok(value)
    }

    /// A block entity entry embedded in a [`MapChunkPacket`].
    #[derive(Debug, Clone, PartialEq)]
    pub struct BlockEntity {
        /// Packed `(x << 4) | z`, relative to the chunk.
        pub packed_xz: u8,
        pub y: i16,
        pub kind: VarInt,
        pub data: NbtValue,
    }

    /// The [`MapChunkPacket`].
    ///
    /// Sends a full chunk column's block and light data. This core treats block/light payloads
    /// as opaque bytes prepared by the world; it only frames them.
    ///
    /// [Minecraft Docs](https://minecraft.wiki/w/Java_Edition_protocol#Chunk_Data_and_Update_Light)
    #[derive(Debug, Clone, PartialEq)]
    pub struct MapChunkPacket {
        pub x: i32,
        pub z: i32,
        pub heightmaps: NbtValue,
        pub data: Vec<u8>,
        pub block_entities: Vec<BlockEntity>,
        pub trust_edges: bool,
        pub sky_light_mask: BitSet,
        pub block_light_mask: BitSet,
        pub empty_sky_light_mask: BitSet,
        pub empty_block_light_mask: BitSet,
        pub sky_lights: Vec<Vec<u8>>,
        pub block_lights: Vec<Vec<u8>>,
    }

    impl Packet for MapChunkPacket {
        const ID: VarInt = 0x1f;
    }

    #[cfg(feature = "server")]
    impl WritePacket for MapChunkPacket {
        async fn write_to_buffer<S>(&self, buffer: &mut S) -> Result<(), Error>
        where
            S: AsyncWrite + Unpin + Send + Sync,
        {
            buffer.write_i32(self.x).await?;
            buffer.write_i32(self.z).await?;
            let heightmaps_bytes =
                fastnbt::to_bytes(&self.heightmaps).map_err(|e| Error::Nbt(e.to_string()))?;
            buffer.write_all(&heightmaps_bytes).await?;
            buffer.write_bytes(&self.data).await?;

            buffer
                .write_varint(self.block_entities.len() as VarInt)
                .await?;
            for entity in &self.block_entities {
                buffer.write_u8(entity.packed_xz).await?;
                buffer.write_i16(entity.y).await?;
                buffer.write_varint(entity.kind).await?;
                let data_bytes =
                    fastnbt::to_bytes(&entity.data).map_err(|e| Error::Nbt(e.to_string()))?;
                buffer.write_all(&data_bytes).await?;
            }

            buffer.write_bool(self.trust_edges).await?;
            self.sky_light_mask.write(buffer).await?;
            self.block_light_mask.write(buffer).await?;
            self.empty_sky_light_mask.write(buffer).await?;
            self.empty_block_light_mask.write(buffer).await?;

            buffer.write_varint(self.sky_lights.len() as VarInt).await?;
            for light in &self.sky_lights {
                buffer.write_bytes(light).await?;
            }

            buffer
                .write_varint(self.block_lights.len() as VarInt)
                .await?;
            for light in &self.block_lights {
                buffer.write_bytes(light).await?;
            }

            Ok(())
        }
    }

    #[cfg(feature = "client")]
    impl ReadPacket for MapChunkPacket {
        async fn read_from_buffer<S>(buffer: &mut S) -> Result<Self, Error>
        where
            S: AsyncRead + Unpin + Send + Sync,
        {
            let x = buffer.read_i32().await?;
            let z = buffer.read_i32().await?;

            // Everything from here on is bounded by the packet's own framing (see
            // `AsyncReadPacket::read_packet`'s `.take(length)`), so it's safe to pull the rest
            // into memory once and parse the remaining fields off that buffer in order.
            let mut raw = Vec::new();
            buffer.read_to_end(&mut raw).await?;
            let mut rest = std::io::Cursor::new(raw);

            let heightmaps = read_nbt_value(&mut rest)?;
            let data = rest.read_bytes().await?;

            let block_entity_count = rest.read_varint().await?;
            let mut block_entities = Vec::with_capacity(block_entity_count.max(0) as usize);
            for _ in 0..block_entity_count {
                let packed_xz = rest.read_u8().await?;
                let y = rest.read_i16().await?;
                let kind = rest.read_varint().await?;
                let data = read_nbt_value(&mut rest)?;
                block_entities.push(BlockEntity {
                    packed_xz,
                    y,
                    kind,
                    data,
                });
            }

            let trust_edges = rest.read_bool().await?;
            let sky_light_mask = BitSet::read(&mut rest).await?;
            let block_light_mask = BitSet::read(&mut rest).await?;
            let empty_sky_light_mask = BitSet::read(&mut rest).await?;
            let empty_block_light_mask = BitSet::read(&mut rest).await?;

            let sky_light_count = rest.read_varint().await?;
            let mut sky_lights = Vec::with_capacity(sky_light_count.max(0) as usize);
            for _ in 0..sky_light_count {
                sky_lights.push(rest.read_bytes().await?);
            }

            let block_light_count = rest.read_varint().await?;
            let mut block_lights = Vec::with_capacity(block_light_count.max(0) as usize);
            for _ in 0..block_light_count {
                block_lights.push(rest.read_bytes().await?);
            }

            Ok(Self {
                x,
                z,
                heightmaps,
                data,
                block_entities,
                trust_edges,
                sky_light_mask,
                block_light_mask,
                empty_sky_light_mask,
                empty_block_light_mask,
                sky_lights,
                block_lights,
            })
        }
    }

    /// The [`PlayPacket`] (aka "Login (play)" / "Join Game").
    ///
    /// Sent once to a joining player immediately after `Play` begins.
    ///
    /// [Minecraft Docs](https://minecraft.wiki/w/Java_Edition_protocol#Login_(play))
    #[derive(Debug, Clone, PartialEq)]
    pub struct PlayPacket {
        pub entity_id: i32,
        pub is_hardcore: bool,
        pub game_mode: u8,
        pub previous_game_mode: i8,
        pub world_names: Vec<String>,
        pub dimension_codec: NbtValue,
        pub world_type: String,
        pub world_name: String,
        pub hashed_seed: i64,
        pub max_players: VarInt,
        pub view_distance: VarInt,
        pub simulation_distance: VarInt,
        pub reduced_debug_info: bool,
        pub enable_respawn_screen: bool,
        pub is_debug: bool,
        pub is_flat: bool,
        pub death_location: Option<(String, Position)>,
    }

    impl Packet for PlayPacket {
        const ID: VarInt = 0x23;
    }

    #[cfg(feature = "server")]
    impl WritePacket for PlayPacket {
        async fn write_to_buffer<S>(&self, buffer: &mut S) -> Result<(), Error>
        where
            S: AsyncWrite + Unpin + Send + Sync,
        {
            buffer.write_i32(self.entity_id).await?;
            buffer.write_bool(self.is_hardcore).await?;
            buffer.write_u8(self.game_mode).await?;
            buffer.write_i8(self.previous_game_mode).await?;

            buffer
                .write_varint(self.world_names.len() as VarInt)
                .await?;
            for name in &self.world_names {
                buffer.write_string(name).await?;
            }

            let codec_bytes = fastnbt::to_bytes(&self.dimension_codec)
                .map_err(|e| Error::Nbt(e.to_string()))?;
            buffer.write_all(&codec_bytes).await?;

            buffer.write_string(&self.world_type).await?;
            buffer.write_string(&self.world_name).await?;
            buffer.write_i64(self.hashed_seed).await?;
            buffer.write_varint(self.max_players).await?;
            buffer.write_varint(self.view_distance).await?;
            buffer.write_varint(self.simulation_distance).await?;
            buffer.write_bool(self.reduced_debug_info).await?;
            buffer.write_bool(self.enable_respawn_screen).await?;
            buffer.write_bool(self.is_debug).await?;
            buffer.write_bool(self.is_flat).await?;

            buffer.write_bool(self.death_location.is_some()).await?;
            if let Some((dimension, location)) = &self.death_location {
                buffer.write_string(dimension).await?;
                location.write(buffer).await?;
            }

            Ok(())
        }
    }

    #[cfg(feature = "client")]
    impl ReadPacket for PlayPacket {
        async fn read_from_buffer<S>(buffer: &mut S) -> Result<Self, Error>
        where
            S: AsyncRead + Unpin + Send + Sync,
        {
            let entity_id = buffer.read_i32().await?;
            let is_hardcore = buffer.read_bool().await?;
            let game_mode = buffer.read_u8().await?;
            let previous_game_mode = buffer.read_i8().await?;

            let world_count = buffer.read_varint().await?;
            let mut world_names = Vec::with_capacity(world_count.max(0) as usize);
            for _ in 0..world_count {
                world_names.push(buffer.read_string().await?);
            }

            // Everything from here on is bounded by the packet's own framing (see
            // `AsyncReadPacket::read_packet`'s `.take(length)`), so it's safe to pull the rest
            // into memory once and parse the remaining fields off that buffer in order.
            let mut raw = Vec::new();
            buffer.read_to_end(&mut raw).await?;
            let mut rest = std::io::Cursor::new(raw);

            let dimension_codec = read_nbt_value(&mut rest)?;

            let world_type = rest.read_string().await?;
            let world_name = rest.read_string().await?;
            let hashed_seed = rest.read_i64().await?;
            let max_players = rest.read_varint().await?;
            let view_distance = rest.read_varint().await?;
            let simulation_distance = rest.read_varint().await?;
            let reduced_debug_info = rest.read_bool().await?;
            let enable_respawn_screen = rest.read_bool().await?;
            let is_debug = rest.read_bool().await?;
            let is_flat = rest.read_bool().await?;

            let has_death_location = rest.read_bool().await?;
            let death_location = if has_death_location {
                let dimension = rest.read_string().await?;
                let location = Position::read(&mut rest).await?;
                Some((dimension, location))
            } else {
                None
            };

            Ok(Self {
                entity_id,
                is_hardcore,
                game_mode,
                previous_game_mode,
                world_names,
                dimension_codec,
                world_type,
                world_name,
                hashed_seed,
                max_players,
                view_distance,
                simulation_distance,
                reduced_debug_info,
                enable_respawn_screen,
                is_debug,
                is_flat,
                death_location,
            })
        }
    }

    /// The [`SpawnPositionPacket`].
    ///
    /// [Minecraft Docs](https://minecraft.wiki/w/Java_Edition_protocol#Set_Default_Spawn_Position)
    #[derive(Debug, Clone, PartialEq)]
    #[cfg_attr(test, derive(Dummy))]
    pub struct SpawnPositionPacket {
        pub location: Position,
        pub angle: f32,
    }

    impl Packet for SpawnPositionPacket {
        const ID: VarInt = 0x4a;
    }

    #[cfg(feature = "server")]
    impl WritePacket for SpawnPositionPacket {
        async fn write_to_buffer<S>(&self, buffer: &mut S) -> Result<(), Error>
        where
            S: AsyncWrite + Unpin + Send + Sync,
        {
            self.location.write(buffer).await?;
            buffer.write_f32(self.angle).await?;
            Ok(())
        }
    }

    #[cfg(feature = "client")]
    impl ReadPacket for SpawnPositionPacket {
        async fn read_from_buffer<S>(buffer: &mut S) -> Result<Self, Error>
        where
            S: AsyncRead + Unpin + Send + Sync,
        {
            let location = Position::read(buffer).await?;
            let angle = buffer.read_f32().await?;
            Ok(Self { location, angle })
        }
    }

    /// A chat/Mojang session property, as embedded in [`PlayerInfoAddEntry`].
    #[derive(Debug, Clone, Eq, PartialEq)]
    #[cfg_attr(test, derive(Dummy))]
    pub struct PlayerProperty {
        pub name: String,
        pub value: String,
        pub signature: Option<String>,
    }

    /// The public key signature data optionally attached to a [`PlayerInfoAddEntry`].
    #[derive(Debug, Clone, Eq, PartialEq)]
    #[cfg_attr(test, derive(Dummy))]
    pub struct PlayerSigData {
        pub timestamp: i64,
        pub public_key_der: Vec<u8>,
        pub signature: Vec<u8>,
    }

    #[derive(Debug, Clone, Eq, PartialEq)]
    #[cfg_attr(test, derive(Dummy))]
    pub struct PlayerInfoAddEntry {
        pub uuid: Uuid,
        pub name: String,
        pub properties: Vec<PlayerProperty>,
        pub game_mode: VarInt,
        pub ping: VarInt,
        pub display_name: Option<String>,
        pub sig_data: Option<PlayerSigData>,
    }

    #[derive(Debug, Clone, Eq, PartialEq)]
    #[cfg_attr(test, derive(Dummy))]
    pub struct PlayerInfoGameModeEntry {
        pub uuid: Uuid,
        pub game_mode: VarInt,
    }

    #[derive(Debug, Clone, Eq, PartialEq)]
    #[cfg_attr(test, derive(Dummy))]
    pub struct PlayerInfoLatencyEntry {
        pub uuid: Uuid,
        pub ping: VarInt,
    }

    #[derive(Debug, Clone, Eq, PartialEq)]
    #[cfg_attr(test, derive(Dummy))]
    pub struct PlayerInfoDisplayNameEntry {
        pub uuid: Uuid,
        pub display_name: Option<String>,
    }

    /// The [`PlayerInfoPacket`].
    ///
    /// The variant in use determines which single array is present on the wire; the other four
    /// sibling arrays are always empty for a given `actionId`.
    ///
    /// [Minecraft Docs](https://minecraft.wiki/w/Java_Edition_protocol#Player_Info)
    #[derive(Debug, Clone, Eq, PartialEq)]
    #[cfg_attr(test, derive(Dummy))]
    pub enum PlayerInfoPacket {
        Add(Vec<PlayerInfoAddEntry>),
        UpdateGameMode(Vec<PlayerInfoGameModeEntry>),
        UpdateLatency(Vec<PlayerInfoLatencyEntry>),
        UpdateDisplayName(Vec<PlayerInfoDisplayNameEntry>),
        Remove(Vec<Uuid>),
    }

    impl Packet for PlayerInfoPacket {
        const ID: VarInt = 0x34;
    }

    #[cfg(feature = "server")]
    impl WritePacket for PlayerInfoPacket {
        async fn write_to_buffer<S>(&self, buffer: &mut S) -> Result<(), Error>
        where
            S: AsyncWrite + Unpin + Send + Sync,
        {
            async fn write_properties<S>(
                buffer: &mut S,
                properties: &[PlayerProperty],
            ) -> Result<(), Error>
            where
                S: AsyncWrite + Unpin + Send + Sync,
            {
                buffer.write_varint(properties.len() as VarInt).await?;
                for prop in properties {
                    buffer.write_string(&prop.name).await?;
                    buffer.write_string(&prop.value).await?;
                    buffer.write_bool(prop.signature.is_some()).await?;
                    if let Some(signature) = &prop.signature {
                        buffer.write_string(signature).await?;
                    }
                }
                Ok(())
            }

            match self {
                PlayerInfoPacket::Add(entries) => {
                    buffer.write_varint(0).await?;
                    buffer.write_varint(entries.len() as VarInt).await?;
                    for entry in entries {
                        buffer.write_uuid(&entry.uuid).await?;
                        buffer.write_string(&entry.name).await?;
                        write_properties(buffer, &entry.properties).await?;
                        buffer.write_varint(entry.game_mode).await?;
                        buffer.write_varint(entry.ping).await?;
                        buffer.write_bool(entry.display_name.is_some()).await?;
                        if let Some(name) = &entry.display_name {
                            buffer.write_string(name).await?;
                        }
                        buffer.write_bool(entry.sig_data.is_some()).await?;
                        if let Some(sig) = &entry.sig_data {
                            buffer.write_i64(sig.timestamp).await?;
                            buffer.write_bytes(&sig.public_key_der).await?;
                            buffer.write_bytes(&sig.signature).await?;
                        }
                    }
                }
                PlayerInfoPacket::UpdateGameMode(entries) => {
                    buffer.write_varint(1).await?;
                    buffer.write_varint(entries.len() as VarInt).await?;
                    for entry in entries {
                        buffer.write_uuid(&entry.uuid).await?;
                        buffer.write_varint(entry.game_mode).await?;
                    }
                }
                PlayerInfoPacket::UpdateLatency(entries) => {
                    buffer.write_varint(2).await?;
                    buffer.write_varint(entries.len() as VarInt).await?;
                    for entry in entries {
                        buffer.write_uuid(&entry.uuid).await?;
                        buffer.write_varint(entry.ping).await?;
                    }
                }
                PlayerInfoPacket::UpdateDisplayName(entries) => {
                    buffer.write_varint(3).await?;
                    buffer.write_varint(entries.len() as VarInt).await?;
                    for entry in entries {
                        buffer.write_uuid(&entry.uuid).await?;
                        buffer.write_bool(entry.display_name.is_some()).await?;
                        if let Some(name) = &entry.display_name {
                            buffer.write_string(name).await?;
                        }
                    }
                }
                PlayerInfoPacket::Remove(uuids) => {
                    buffer.write_varint(4).await?;
                    buffer.write_varint(uuids.len() as VarInt).await?;
                    for uuid in uuids {
                        buffer.write_uuid(uuid).await?;
                    }
                }
            }

            Ok(())
        }
    }

    #[cfg(feature = "client")]
    impl ReadPacket for PlayerInfoPacket {
        async fn read_from_buffer<S>(buffer: &mut S) -> Result<Self, Error>
        where
            S: AsyncRead + Unpin + Send + Sync,
        {
            async fn read_properties<S>(buffer: &mut S) -> Result<Vec<PlayerProperty>, Error>
            where
                S: AsyncRead + Unpin + Send + Sync,
            {
                let count = buffer.read_varint().await?;
                let mut properties = Vec::with_capacity(count.max(0) as usize);
                for _ in 0..count {
                    let name = buffer.read_string().await?;
                    let value = buffer.read_string().await?;
                    let signature = if buffer.read_bool().await? {
                        Some(buffer.read_string().await?)
                    } else {
                        None
                    };
                    properties.push(PlayerProperty {
                        name,
                        value,
                        signature,
                    });
                }
                Ok(properties)
            }

            let action_id = buffer.read_varint().await?;
            let count = buffer.read_varint().await?;

            match action_id {
                0 => {
                    let mut entries = Vec::with_capacity(count.max(0) as usize);
                    for _ in 0..count {
                        let uuid = buffer.read_uuid().await?;
                        let name = buffer.read_string().await?;
                        let properties = read_properties(buffer).await?;
                        let game_mode = buffer.read_varint().await?;
                        let ping = buffer.read_varint().await?;
                        let display_name = if buffer.read_bool().await? {
                            Some(buffer.read_string().await?)
                        } else {
                            None
                        };
                        let sig_data = if buffer.read_bool().await? {
                            Some(PlayerSigData {
                                timestamp: buffer.read_i64().await?,
                                public_key_der: buffer.read_bytes().await?,
                                signature: buffer.read_bytes().await?,
                            })
                        } else {
                            None
                        };
                        entries.push(PlayerInfoAddEntry {
                            uuid,
                            name,
                            properties,
                            game_mode,
                            ping,
                            display_name,
                            sig_data,
                        });
                    }
                    Ok(PlayerInfoPacket::Add(entries))
                }
                1 => {
                    let mut entries = Vec::with_capacity(count.max(0) as usize);
                    for _ in 0..count {
                        entries.push(PlayerInfoGameModeEntry {
                            uuid: buffer.read_uuid().await?,
                            game_mode: buffer.read_varint().await?,
                        });
                    }
                    Ok(PlayerInfoPacket::UpdateGameMode(entries))
                }
                2 => {
                    let mut entries = Vec::with_capacity(count.max(0) as usize);
                    for _ in 0..count {
                        entries.push(PlayerInfoLatencyEntry {
                            uuid: buffer.read_uuid().await?,
                            ping: buffer.read_varint().await?,
                        });
                    }
                    Ok(PlayerInfoPacket::UpdateLatency(entries))
                }
                3 => {
                    let mut entries = Vec::with_capacity(count.max(0) as usize);
                    for _ in 0..count {
                        let uuid = buffer.read_uuid().await?;
                        let display_name = if buffer.read_bool().await? {
                            Some(buffer.read_string().await?)
                        } else {
                            None
                        };
                        entries.push(PlayerInfoDisplayNameEntry { uuid, display_name });
                    }
                    Ok(PlayerInfoPacket::UpdateDisplayName(entries))
                }
                4 => {
                    let mut uuids = Vec::with_capacity(count.max(0) as usize);
                    for _ in 0..count {
                        uuids.push(buffer.read_uuid().await?);
                    }
                    Ok(PlayerInfoPacket::Remove(uuids))
                }
                other => Err(Error::IllegalEnumValue {
                    kind: "PlayerInfoAction",
                    value: other,
                }),
            }
        }
    }

    /// The [`UpdatePositionPacket`] (aka "Synchronize Player Position").
    ///
    /// [Minecraft Docs](https://minecraft.wiki/w/Java_Edition_protocol#Synchronize_Player_Position)
    #[derive(Debug, Clone, PartialEq)]
    #[cfg_attr(test, derive(Dummy))]
    pub struct UpdatePositionPacket {
        pub x: f64,
        pub y: f64,
        pub z: f64,
        pub yaw: f32,
        pub pitch: f32,
        pub flags: u8,
        pub teleport_id: VarInt,
        pub dismount_vehicle: bool,
    }

    impl Packet for UpdatePositionPacket {
        const ID: VarInt = 0x36;
    }

    #[cfg(feature = "server")]
    impl WritePacket for UpdatePositionPacket {
        async fn write_to_buffer<S>(&self, buffer: &mut S) -> Result<(), Error>
        where
            S: AsyncWrite + Unpin + Send + Sync,
        {
            buffer.write_f64(self.x).await?;
            buffer.write_f64(self.y).await?;
            buffer.write_f64(self.z).await?;
            buffer.write_f32(self.yaw).await?;
            buffer.write_f32(self.pitch).await?;
            buffer.write_u8(self.flags).await?;
            buffer.write_varint(self.teleport_id).await?;
            buffer.write_bool(self.dismount_vehicle).await?;
            Ok(())
        }
    }

    #[cfg(feature = "client")]
    impl ReadPacket for UpdatePositionPacket {
        async fn read_from_buffer<S>(buffer: &mut S) -> Result<Self, Error>
        where
            S: AsyncRead + Unpin + Send + Sync,
        {
            Ok(Self {
                x: buffer.read_f64().await?,
                y: buffer.read_f64().await?,
                z: buffer.read_f64().await?,
                yaw: buffer.read_f32().await?,
                pitch: buffer.read_f32().await?,
                flags: buffer.read_u8().await?,
                teleport_id: buffer.read_varint().await?,
                dismount_vehicle: buffer.read_bool().await?,
            })
        }
    }

    /// The [`SystemChatPacket`].
    ///
    /// [Minecraft Docs](https://minecraft.wiki/w/Java_Edition_protocol#System_Chat_Message)
    #[derive(Debug, Clone, Eq, PartialEq)]
    #[cfg_attr(test, derive(Dummy))]
    pub struct SystemChatPacket {
        /// JSON-encoded chat message.
        pub content: String,
        /// `0` renders in the chat box, `1` above the hotbar.
        pub kind: VarInt,
    }

    impl Packet for SystemChatPacket {
        const ID: VarInt = 0x5f;
    }

    #[cfg(feature = "server")]
    impl WritePacket for SystemChatPacket {
        async fn write_to_buffer<S>(&self, buffer: &mut S) -> Result<(), Error>
        where
            S: AsyncWrite + Unpin + Send + Sync,
        {
            buffer.write_string(&self.content).await?;
            buffer.write_varint(self.kind).await?;
            Ok(())
        }
    }

    #[cfg(feature = "client")]
    impl ReadPacket for SystemChatPacket {
        async fn read_from_buffer<S>(buffer: &mut S) -> Result<Self, Error>
        where
            S: AsyncRead + Unpin + Send + Sync,
        {
            Ok(Self {
                content: buffer.read_string().await?,
                kind: buffer.read_varint().await?,
            })
        }
    }
}

pub mod serverbound {
    use super::*;
    use crate::{ChatMode, DisplayedSkinParts, MainHand};
    #[cfg(feature = "server")]
    use crate::{AsyncReadPacket, ReadPacket};
    #[cfg(feature = "client")]
    use crate::{AsyncWritePacket, WritePacket};
    #[cfg(feature = "server")]
    use tokio::io::{AsyncRead, AsyncReadExt};
    #[cfg(feature = "client")]
    use tokio::io::{AsyncWrite, AsyncWriteExt};

    /// The [`TeleportConfirmPacket`].
    ///
    /// [Minecraft Docs](https://minecraft.wiki/w/Java_Edition_protocol#Confirm_Teleportation)
    #[derive(Debug, Clone, Eq, PartialEq)]
    #[cfg_attr(test, derive(Dummy))]
    pub struct TeleportConfirmPacket {
        pub teleport_id: VarInt,
    }

    impl Packet for TeleportConfirmPacket {
        const ID: VarInt = 0x00;
    }

    #[cfg(feature = "client")]
    impl WritePacket for TeleportConfirmPacket {
        async fn write_to_buffer<S>(&self, buffer: &mut S) -> Result<(), Error>
        where
            S: AsyncWrite + Unpin + Send + Sync,
        {
            buffer.write_varint(self.teleport_id).await?;
            Ok(())
        }
    }

    #[cfg(feature = "server")]
    impl ReadPacket for TeleportConfirmPacket {
        async fn read_from_buffer<S>(buffer: &mut S) -> Result<Self, Error>
        where
            S: AsyncRead + Unpin + Send + Sync,
        {
            Ok(Self {
                teleport_id: buffer.read_varint().await?,
            })
        }
    }

    /// A signed command-argument entry embedded in a [`ChatCommandPacket`].
    #[derive(Debug, Clone, Eq, PartialEq)]
    #[cfg_attr(test, derive(Dummy))]
    pub struct SignedArgument {
        pub name: String,
        pub signature: Vec<u8>,
    }

    /// The [`ChatCommandPacket`].
    ///
    /// This server parses only the command envelope; interpreting `message` as a command is
    /// out of scope.
    ///
    /// [Minecraft Docs](https://minecraft.wiki/w/Java_Edition_protocol#Chat_Command)
    #[derive(Debug, Clone, Eq, PartialEq)]
    #[cfg_attr(test, derive(Dummy))]
    pub struct ChatCommandPacket {
        pub message: String,
        pub timestamp: i64,
        pub salt: i64,
        pub arguments: Vec<SignedArgument>,
        pub signature: Vec<u8>,
    }

    impl Packet for ChatCommandPacket {
        const ID: VarInt = 0x03;
    }

    #[cfg(feature = "client")]
    impl WritePacket for ChatCommandPacket {
        async fn write_to_buffer<S>(&self, buffer: &mut S) -> Result<(), Error>
        where
            S: AsyncWrite + Unpin + Send + Sync,
        {
            buffer.write_string(&self.message).await?;
            buffer.write_i64(self.timestamp).await?;
            buffer.write_i64(self.salt).await?;
            buffer.write_varint(self.arguments.len() as VarInt).await?;
            for arg in &self.arguments {
                buffer.write_string(&arg.name).await?;
                buffer.write_bytes(&arg.signature).await?;
            }
            buffer.write_bytes(&self.signature).await?;
            Ok(())
        }
    }

    #[cfg(feature = "server")]
    impl ReadPacket for ChatCommandPacket {
        async fn read_from_buffer<S>(buffer: &mut S) -> Result<Self, Error>
        where
            S: AsyncRead + Unpin + Send + Sync,
        {
            let message = buffer.read_string().await?;
            let timestamp = buffer.read_i64().await?;
            let salt = buffer.read_i64().await?;

            let count = buffer.read_varint().await?;
            let mut arguments = Vec::with_capacity(count.max(0) as usize);
            for _ in 0..count {
                arguments.push(SignedArgument {
                    name: buffer.read_string().await?,
                    signature: buffer.read_bytes().await?,
                });
            }

            let signature = buffer.read_bytes().await?;

            Ok(Self {
                message,
                timestamp,
                salt,
                arguments,
                signature,
            })
        }
    }

    /// The [`ChatMessagePacket`].
    ///
    /// [Minecraft Docs](https://minecraft.wiki/w/Java_Edition_protocol#Chat_Message_(serverbound))
    #[derive(Debug, Clone, Eq, PartialEq)]
    #[cfg_attr(test, derive(Dummy))]
    pub struct ChatMessagePacket {
        pub message: String,
        pub timestamp: i64,
        pub salt: i64,
        pub signature: Vec<u8>,
        pub signed_preview: bool,
    }

    impl Packet for ChatMessagePacket {
        const ID: VarInt = 0x04;
    }

    #[cfg(feature = "client")]
    impl WritePacket for ChatMessagePacket {
        async fn write_to_buffer<S>(&self, buffer: &mut S) -> Result<(), Error>
        where
            S: AsyncWrite + Unpin + Send + Sync,
        {
            buffer.write_string(&self.message).await?;
            buffer.write_i64(self.timestamp).await?;
            buffer.write_i64(self.salt).await?;
            buffer.write_bytes(&self.signature).await?;
            buffer.write_bool(self.signed_preview).await?;
            Ok(())
        }
    }

    #[cfg(feature = "server")]
    impl ReadPacket for ChatMessagePacket {
        async fn read_from_buffer<S>(buffer: &mut S) -> Result<Self, Error>
        where
            S: AsyncRead + Unpin + Send + Sync,
        {
            Ok(Self {
                message: buffer.read_string().await?,
                timestamp: buffer.read_i64().await?,
                salt: buffer.read_i64().await?,
                signature: buffer.read_bytes().await?,
                signed_preview: buffer.read_bool().await?,
            })
        }
    }

    /// The [`ClientSettingsPacket`].
    ///
    /// [Minecraft Docs](https://minecraft.wiki/w/Java_Edition_protocol#Client_Information_(play))
    #[derive(Debug, Clone, Eq, PartialEq)]
    #[cfg_attr(test, derive(Dummy))]
    pub struct ClientSettingsPacket {
        pub locale: String,
        pub view_distance: i8,
        pub chat_mode: ChatMode,
        pub chat_colors: bool,
        pub skin_parts: DisplayedSkinParts,
        pub main_hand: MainHand,
        pub enable_text_filtering: bool,
        pub enable_server_listing: bool,
    }

    impl Packet for ClientSettingsPacket {
        const ID: VarInt = 0x07;
    }

    #[cfg(feature = "client")]
    impl WritePacket for ClientSettingsPacket {
        async fn write_to_buffer<S>(&self, buffer: &mut S) -> Result<(), Error>
        where
            S: AsyncWrite + Unpin + Send + Sync,
        {
            buffer.write_string(&self.locale).await?;
            buffer.write_i8(self.view_distance).await?;
            buffer.write_varint(self.chat_mode.into()).await?;
            buffer.write_bool(self.chat_colors).await?;
            buffer.write_u8(self.skin_parts.0).await?;
            buffer.write_varint(self.main_hand.into()).await?;
            buffer.write_bool(self.enable_text_filtering).await?;
            buffer.write_bool(self.enable_server_listing).await?;
            Ok(())
        }
    }

    #[cfg(feature = "server")]
    impl ReadPacket for ClientSettingsPacket {
        async fn read_from_buffer<S>(buffer: &mut S) -> Result<Self, Error>
        where
            S: AsyncRead + Unpin + Send + Sync,
        {
            let locale = buffer.read_string().await?;
            let view_distance = buffer.read_i8().await?;
            let chat_mode = buffer.read_varint().await?.try_into()?;
            let chat_colors = buffer.read_bool().await?;
            let skin_parts = DisplayedSkinParts(buffer.read_u8().await?);
            let main_hand = buffer.read_varint().await?.try_into()?;
            let enable_text_filtering = buffer.read_bool().await?;
            let enable_server_listing = buffer.read_bool().await?;

            Ok(Self {
                locale,
                view_distance,
                chat_mode,
                chat_colors,
                skin_parts,
                main_hand,
                enable_text_filtering,
                enable_server_listing,
            })
        }
    }

    /// The [`CloseWindowPacket`].
    ///
    /// [Minecraft Docs](https://minecraft.wiki/w/Java_Edition_protocol#Close_Container_(serverbound))
    #[derive(Debug, Clone, Eq, PartialEq)]
    #[cfg_attr(test, derive(Dummy))]
    pub struct CloseWindowPacket {
        pub window_id: u8,
    }

    impl Packet for CloseWindowPacket {
        const ID: VarInt = 0x0b;
    }

    #[cfg(feature = "client")]
    impl WritePacket for CloseWindowPacket {
        async fn write_to_buffer<S>(&self, buffer: &mut S) -> Result<(), Error>
        where
            S: AsyncWrite + Unpin + Send + Sync,
        {
            buffer.write_u8(self.window_id).await?;
            Ok(())
        }
    }

    #[cfg(feature = "server")]
    impl ReadPacket for CloseWindowPacket {
        async fn read_from_buffer<S>(buffer: &mut S) -> Result<Self, Error>
        where
            S: AsyncRead + Unpin + Send + Sync,
        {
            Ok(Self {
                window_id: buffer.read_u8().await?,
            })
        }
    }

    /// The [`CustomPayloadPacket`] (plugin channel message).
    ///
    /// Only the envelope is parsed; `data` is passed through opaquely.
    ///
    /// [Minecraft Docs](https://minecraft.wiki/w/Java_Edition_protocol#Plugin_Message_(serverbound))
    #[derive(Debug, Clone, Eq, PartialEq)]
    #[cfg_attr(test, derive(Dummy))]
    pub struct CustomPayloadPacket {
        pub channel: String,
        pub data: Vec<u8>,
    }

    impl Packet for CustomPayloadPacket {
        const ID: VarInt = 0x0c;
    }

    #[cfg(feature = "client")]
    impl WritePacket for CustomPayloadPacket {
        async fn write_to_buffer<S>(&self, buffer: &mut S) -> Result<(), Error>
        where
            S: AsyncWrite + Unpin + Send + Sync,
        {
            buffer.write_string(&self.channel).await?;
            buffer.write_all(&self.data).await?;
            Ok(())
        }
    }

    #[cfg(feature = "server")]
    impl ReadPacket for CustomPayloadPacket {
        async fn read_from_buffer<S>(buffer: &mut S) -> Result<Self, Error>
        where
            S: AsyncRead + Unpin + Send + Sync,
        {
            let channel = buffer.read_string().await?;
            let mut data = Vec::new();
            buffer.read_to_end(&mut data).await?;
            Ok(Self { channel, data })
        }
    }

    /// The [`KeepAliveResponsePacket`].
    ///
    /// [Minecraft Docs](https://minecraft.wiki/w/Java_Edition_protocol#Keep_Alive_(serverbound))
    #[derive(Debug, Clone, Eq, PartialEq)]
    #[cfg_attr(test, derive(Dummy))]
    pub struct KeepAliveResponsePacket {
        pub keep_alive_id: i64,
    }

    impl Packet for KeepAliveResponsePacket {
        const ID: VarInt = 0x11;
    }

    #[cfg(feature = "client")]
    impl WritePacket for KeepAliveResponsePacket {
        async fn write_to_buffer<S>(&self, buffer: &mut S) -> Result<(), Error>
        where
            S: AsyncWrite + Unpin + Send + Sync,
        {
            buffer.write_i64(self.keep_alive_id).await?;
            Ok(())
        }
    }

    #[cfg(feature = "server")]
    impl ReadPacket for KeepAliveResponsePacket {
        async fn read_from_buffer<S>(buffer: &mut S) -> Result<Self, Error>
        where
            S: AsyncRead + Unpin + Send + Sync,
        {
            Ok(Self {
                keep_alive_id: buffer.read_i64().await?,
            })
        }
    }

    /// The [`PositionPacket`].
    ///
    /// [Minecraft Docs](https://minecraft.wiki/w/Java_Edition_protocol#Set_Player_Position)
    #[derive(Debug, Clone, PartialEq)]
    #[cfg_attr(test, derive(Dummy))]
    pub struct PositionPacket {
        pub x: f64,
        pub y: f64,
        pub z: f64,
        pub on_ground: bool,
    }

    impl Packet for PositionPacket {
        const ID: VarInt = 0x13;
    }

    #[cfg(feature = "client")]
    impl WritePacket for PositionPacket {
        async fn write_to_buffer<S>(&self, buffer: &mut S) -> Result<(), Error>
        where
            S: AsyncWrite + Unpin + Send + Sync,
        {
            buffer.write_f64(self.x).await?;
            buffer.write_f64(self.y).await?;
            buffer.write_f64(self.z).await?;
            buffer.write_bool(self.on_ground).await?;
            Ok(())
        }
    }

    #[cfg(feature = "server")]
    impl ReadPacket for PositionPacket {
        async fn read_from_buffer<S>(buffer: &mut S) -> Result<Self, Error>
        where
            S: AsyncRead + Unpin + Send + Sync,
        {
            Ok(Self {
                x: buffer.read_f64().await?,
                y: buffer.read_f64().await?,
                z: buffer.read_f64().await?,
                on_ground: buffer.read_bool().await?,
            })
        }
    }

    /// The [`PositionLookPacket`].
    ///
    /// [Minecraft Docs](https://minecraft.wiki/w/Java_Edition_protocol#Set_Player_Position_and_Rotation_(serverbound))
    #[derive(Debug, Clone, PartialEq)]
    #[cfg_attr(test, derive(Dummy))]
    pub struct PositionLookPacket {
        pub x: f64,
        pub y: f64,
        pub z: f64,
        pub yaw: f32,
        pub pitch: f32,
        pub on_ground: bool,
    }

    impl Packet for PositionLookPacket {
        const ID: VarInt = 0x14;
    }

    #[cfg(feature = "client")]
    impl WritePacket for PositionLookPacket {
        async fn write_to_buffer<S>(&self, buffer: &mut S) -> Result<(), Error>
        where
            S: AsyncWrite + Unpin + Send + Sync,
        {
            buffer.write_f64(self.x).await?;
            buffer.write_f64(self.y).await?;
            buffer.write_f64(self.z).await?;
            buffer.write_f32(self.yaw).await?;
            buffer.write_f32(self.pitch).await?;
            buffer.write_bool(self.on_ground).await?;
            Ok(())
        }
    }

    #[cfg(feature = "server")]
    impl ReadPacket for PositionLookPacket {
        async fn read_from_buffer<S>(buffer: &mut S) -> Result<Self, Error>
        where
            S: AsyncRead + Unpin + Send + Sync,
        {
            Ok(Self {
                x: buffer.read_f64().await?,
                y: buffer.read_f64().await?,
                z: buffer.read_f64().await?,
                yaw: buffer.read_f32().await?,
                pitch: buffer.read_f32().await?,
                on_ground: buffer.read_bool().await?,
            })
        }
    }

    /// The [`LookPacket`].
    ///
    /// [Minecraft Docs](https://minecraft.wiki/w/Java_Edition_protocol#Set_Player_Rotation)
    #[derive(Debug, Clone, PartialEq)]
    #[cfg_attr(test, derive(Dummy))]
    pub struct LookPacket {
        pub yaw: f32,
        pub pitch: f32,
        pub on_ground: bool,
    }

    impl Packet for LookPacket {
        const ID: VarInt = 0x15;
    }

    #[cfg(feature = "client")]
    impl WritePacket for LookPacket {
        async fn write_to_buffer<S>(&self, buffer: &mut S) -> Result<(), Error>
        where
            S: AsyncWrite + Unpin + Send + Sync,
        {
            buffer.write_f32(self.yaw).await?;
            buffer.write_f32(self.pitch).await?;
            buffer.write_bool(self.on_ground).await?;
            Ok(())
        }
    }

    #[cfg(feature = "server")]
    impl ReadPacket for LookPacket {
        async fn read_from_buffer<S>(buffer: &mut S) -> Result<Self, Error>
        where
            S: AsyncRead + Unpin + Send + Sync,
        {
            Ok(Self {
                yaw: buffer.read_f32().await?,
                pitch: buffer.read_f32().await?,
                on_ground: buffer.read_bool().await?,
            })
        }
    }

    /// The [`AbilitiesPacket`] (serverbound "Player Abilities").
    ///
    /// [Minecraft Docs](https://minecraft.wiki/w/Java_Edition_protocol#Player_Abilities_(serverbound))
    #[derive(Debug, Clone, Eq, PartialEq)]
    #[cfg_attr(test, derive(Dummy))]
    pub struct AbilitiesPacket {
        pub flags: u8,
    }

    impl Packet for AbilitiesPacket {
        const ID: VarInt = 0x1b;
    }

    #[cfg(feature = "client")]
    impl WritePacket for AbilitiesPacket {
        async fn write_to_buffer<S>(&self, buffer: &mut S) -> Result<(), Error>
        where
            S: AsyncWrite + Unpin + Send + Sync,
        {
            buffer.write_u8(self.flags).await?;
            Ok(())
        }
    }

    #[cfg(feature = "server")]
    impl ReadPacket for AbilitiesPacket {
        async fn read_from_buffer<S>(buffer: &mut S) -> Result<Self, Error>
        where
            S: AsyncRead + Unpin + Send + Sync,
        {
            Ok(Self {
                flags: buffer.read_u8().await?,
            })
        }
    }

    /// The [`EntityActionPacket`].
    ///
    /// [Minecraft Docs](https://minecraft.wiki/w/Java_Edition_protocol#Player_Command)
    #[derive(Debug, Clone, Eq, PartialEq)]
    #[cfg_attr(test, derive(Dummy))]
    pub struct EntityActionPacket {
        pub entity_id: VarInt,
        pub action_id: VarInt,
        pub jump_boost: VarInt,
    }

    impl Packet for EntityActionPacket {
        const ID: VarInt = 0x1d;
    }

    #[cfg(feature = "client")]
    impl WritePacket for EntityActionPacket {
        async fn write_to_buffer<S>(&self, buffer: &mut S) -> Result<(), Error>
        where
            S: AsyncWrite + Unpin + Send + Sync,
        {
            buffer.write_varint(self.entity_id).await?;
            buffer.write_varint(self.action_id).await?;
            buffer.write_varint(self.jump_boost).await?;
            Ok(())
        }
    }

    #[cfg(feature = "server")]
    impl ReadPacket for EntityActionPacket {
        async fn read_from_buffer<S>(buffer: &mut S) -> Result<Self, Error>
        where
            S: AsyncRead + Unpin + Send + Sync,
        {
            Ok(Self {
                entity_id: buffer.read_varint().await?,
                action_id: buffer.read_varint().await?,
                jump_boost: buffer.read_varint().await?,
            })
        }
    }

    /// The [`SetCreativeSlotPacket`].
    ///
    /// [Minecraft Docs](https://minecraft.wiki/w/Java_Edition_protocol#Set_Creative_Mode_Slot)
    #[derive(Debug, Clone, PartialEq)]
    #[cfg_attr(test, derive(Dummy))]
    pub struct SetCreativeSlotPacket {
        pub slot: i16,
        pub item: Slot,
    }

    impl Packet for SetCreativeSlotPacket {
        const ID: VarInt = 0x2a;
    }

    #[cfg(feature = "client")]
    impl WritePacket for SetCreativeSlotPacket {
        async fn write_to_buffer<S>(&self, buffer: &mut S) -> Result<(), Error>
        where
            S: AsyncWrite + Unpin + Send + Sync,
        {
            buffer.write_i16(self.slot).await?;
            self.item.write(buffer).await?;
            Ok(())
        }
    }

    #[cfg(feature = "server")]
    impl ReadPacket for SetCreativeSlotPacket {
        async fn read_from_buffer<S>(buffer: &mut S) -> Result<Self, Error>
        where
            S: AsyncRead + Unpin + Send + Sync,
        {
            let slot = buffer.read_i16().await?;
            let item = Slot::read(buffer).await?;
            Ok(Self { slot, item })
        }
    }

    /// The [`ArmAnimationPacket`] ("Swing Arm").
    ///
    /// [Minecraft Docs](https://minecraft.wiki/w/Java_Edition_protocol#Swing_Arm)
    #[derive(Debug, Clone, Eq, PartialEq)]
    #[cfg_attr(test, derive(Dummy))]
    pub struct ArmAnimationPacket {
        pub hand: VarInt,
    }

    impl Packet for ArmAnimationPacket {
        const ID: VarInt = 0x2e;
    }

    #[cfg(feature = "client")]
    impl WritePacket for ArmAnimationPacket {
        async fn write_to_buffer<S>(&self, buffer: &mut S) -> Result<(), Error>
        where
            S: AsyncWrite + Unpin + Send + Sync,
        {
            buffer.write_varint(self.hand).await?;
            Ok(())
        }
    }

    #[cfg(feature = "server")]
    impl ReadPacket for ArmAnimationPacket {
        async fn read_from_buffer<S>(buffer: &mut S) -> Result<Self, Error>
        where
            S: AsyncRead + Unpin + Send + Sync,
        {
            Ok(Self {
                hand: buffer.read_varint().await?,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::assert_packet;

    #[tokio::test]
    async fn write_read_clientbound_disconnect_packet() {
        assert_packet::<clientbound::DisconnectPacket>(0x17).await;
    }

    #[tokio::test]
    async fn write_read_clientbound_keep_alive_packet() {
        assert_packet::<clientbound::KeepAlivePacket>(0x1e).await;
    }

    #[tokio::test]
    async fn write_read_clientbound_spawn_position_packet() {
        assert_packet::<clientbound::SpawnPositionPacket>(0x4a).await;
    }

    #[tokio::test]
    async fn write_read_clientbound_update_position_packet() {
        assert_packet::<clientbound::UpdatePositionPacket>(0x36).await;
    }

    #[tokio::test]
    async fn write_read_clientbound_system_chat_packet() {
        assert_packet::<clientbound::SystemChatPacket>(0x5f).await;
    }

    #[tokio::test]
    async fn write_read_clientbound_player_info_packet() {
        assert_packet::<clientbound::PlayerInfoPacket>(0x34).await;
    }

    #[tokio::test]
    async fn write_read_serverbound_teleport_confirm_packet() {
        assert_packet::<serverbound::TeleportConfirmPacket>(0x00).await;
    }

    #[tokio::test]
    async fn write_read_serverbound_chat_command_packet() {
        assert_packet::<serverbound::ChatCommandPacket>(0x03).await;
    }

    #[tokio::test]
    async fn write_read_serverbound_chat_message_packet() {
        assert_packet::<serverbound::ChatMessagePacket>(0x04).await;
    }

    #[tokio::test]
    async fn write_read_serverbound_client_settings_packet() {
        assert_packet::<serverbound::ClientSettingsPacket>(0x07).await;
    }

    #[tokio::test]
    async fn write_read_serverbound_close_window_packet() {
        assert_packet::<serverbound::CloseWindowPacket>(0x0b).await;
    }

    #[tokio::test]
    async fn write_read_serverbound_custom_payload_packet() {
        assert_packet::<serverbound::CustomPayloadPacket>(0x0c).await;
    }

    #[tokio::test]
    async fn write_read_serverbound_keep_alive_response_packet() {
        assert_packet::<serverbound::KeepAliveResponsePacket>(0x11).await;
    }

    #[tokio::test]
    async fn write_read_serverbound_position_packet() {
        assert_packet::<serverbound::PositionPacket>(0x13).await;
    }

    #[tokio::test]
    async fn write_read_serverbound_position_look_packet() {
        assert_packet::<serverbound::PositionLookPacket>(0x14).await;
    }

    #[tokio::test]
    async fn write_read_serverbound_look_packet() {
        assert_packet::<serverbound::LookPacket>(0x15).await;
    }

    #[tokio::test]
    async fn write_read_serverbound_abilities_packet() {
        assert_packet::<serverbound::AbilitiesPacket>(0x1b).await;
    }

    #[tokio::test]
    async fn write_read_serverbound_entity_action_packet() {
        assert_packet::<serverbound::EntityActionPacket>(0x1d).await;
    }

    #[tokio::test]
    async fn write_read_serverbound_set_creative_slot_packet() {
        assert_packet::<serverbound::SetCreativeSlotPacket>(0x2a).await;
    }

    #[tokio::test]
    async fn write_read_serverbound_arm_animation_packet() {
        assert_packet::<serverbound::ArmAnimationPacket>(0x2e).await;
    }

    // `clientbound::PlayPacket` and `clientbound::MapChunkPacket` carry a `fastnbt::Value`
    // field, which can't implement `Eq` (it has float variants), so `assert_packet`'s `T: Eq`
    // bound rules it out here. These round-trip manually instead, asserting field equality via
    // `PartialEq` and that every byte written was consumed back out.

    #[tokio::test]
    async fn write_read_clientbound_play_packet_round_trips_all_fields() {
        use crate::{ReadPacket, WritePacket};
        use std::io::Cursor;

        let packet = clientbound::PlayPacket {
            entity_id: 42,
            is_hardcore: true,
            game_mode: 1,
            previous_game_mode: -1,
            world_names: vec!["minecraft:overworld".to_string()],
            dimension_codec: fastnbt::Value::Compound(Default::default()),
            world_type: "minecraft:overworld".to_string(),
            world_name: "minecraft:overworld".to_string(),
            hashed_seed: 123,
            max_players: 20,
            view_distance: 10,
            simulation_distance: 10,
            reduced_debug_info: false,
            enable_respawn_screen: true,
            is_debug: false,
            is_flat: false,
            death_location: Some(("minecraft:overworld".to_string(), Position::new(1, 2, 3))),
        };

        let mut writer: Cursor<Vec<u8>> = Cursor::new(Vec::new());
        packet
            .write_to_buffer(&mut writer)
            .await
            .expect("failed to write packet");

        let mut reader: Cursor<Vec<u8>> = Cursor::new(writer.into_inner());
        let decoded = clientbound::PlayPacket::read_from_buffer(&mut reader)
            .await
            .expect("failed to read packet");

        assert_eq!(clientbound::PlayPacket::ID, 0x23);
        assert_eq!(packet, decoded);
        assert_eq!(
            reader.position() as usize,
            reader.get_ref().len(),
            "there are remaining bytes in the buffer"
        );
    }

    #[tokio::test]
    async fn write_read_clientbound_map_chunk_packet_round_trips_all_fields() {
        use crate::{ReadPacket, WritePacket};
        use std::io::Cursor;

        let packet = clientbound::MapChunkPacket {
            x: 3,
            z: -3,
            heightmaps: fastnbt::Value::Compound(Default::default()),
            data: vec![1, 2, 3, 4, 5],
            block_entities: vec![clientbound::BlockEntity {
                packed_xz: 0x12,
                y: 64,
                kind: 3,
                data: fastnbt::Value::Compound(Default::default()),
            }],
            trust_edges: true,
            sky_light_mask: BitSet(vec![1, 2]),
            block_light_mask: BitSet(vec![3]),
            empty_sky_light_mask: BitSet(vec![]),
            empty_block_light_mask: BitSet(vec![4]),
            sky_lights: vec![vec![0u8; 2048]],
            block_lights: vec![vec![1u8; 2048], vec![2u8; 2048]],
        };

        let mut writer: Cursor<Vec<u8>> = Cursor::new(Vec::new());
        packet
            .write_to_buffer(&mut writer)
            .await
            .expect("failed to write packet");

        let mut reader: Cursor<Vec<u8>> = Cursor::new(writer.into_inner());
        let decoded = clientbound::MapChunkPacket::read_from_buffer(&mut reader)
            .await
            .expect("failed to read packet");

        assert_eq!(clientbound::MapChunkPacket::ID, 0x1f);
        assert_eq!(packet, decoded);
        assert_eq!(
            reader.position() as usize,
            reader.get_ref().len(),
            "there are remaining bytes in the buffer"
        );
    }
}
