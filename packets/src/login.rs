//! Packets exchanged in the `Login` and `Encryption` states, before a session reaches `Play`.

#[cfg(any(feature = "server", feature = "client"))]
use crate::Error;
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
    #[cfg(feature = "client")]
    use tokio::io::{AsyncRead, AsyncReadExt};
    #[cfg(feature = "server")]
    use tokio::io::{AsyncWrite, AsyncWriteExt};

    /// The [`CancelLoginPacket`].
    ///
    /// Closes the connection during the `Login` or `Encryption` sub-state with a JSON chat
    /// message explaining why.
    ///
    /// [Minecraft Docs](https://minecraft.wiki/w/Java_Edition_protocol#Disconnect_(login))
    #[derive(Debug, Clone, Eq, PartialEq)]
    #[cfg_attr(test, derive(Dummy))]
    pub struct CancelLoginPacket {
        /// The JSON-encoded chat message describing the disconnect reason.
        pub reason_json: String,
    }

    impl Packet for CancelLoginPacket {
        const ID: VarInt = 0x00;
    }

    #[cfg(feature = "server")]
    impl WritePacket for CancelLoginPacket {
        async fn write_to_buffer<S>(&self, buffer: &mut S) -> Result<(), Error>
        where
            S: AsyncWrite + Unpin + Send + Sync,
        {
            buffer.write_string(&self.reason_json).await?;

            Ok(())
        }
    }

    #[cfg(feature = "client")]
    impl ReadPacket for CancelLoginPacket {
        async fn read_from_buffer<S>(buffer: &mut S) -> Result<Self, Error>
        where
            S: AsyncRead + Unpin + Send + Sync,
        {
            let reason_json = buffer.read_string().await?;

            Ok(Self { reason_json })
        }
    }

    /// The [`EncryptionRequestPacket`].
    ///
    /// Starts the encryption handshake: the client is expected to generate a shared secret,
    /// encrypt it (and the verify token) with `public_key_der`, and answer with an
    /// `EncryptionResponse`.
    ///
    /// [Minecraft Docs](https://minecraft.wiki/w/Java_Edition_protocol#Encryption_Request)
    #[derive(Debug, Clone, Eq, PartialEq)]
    #[cfg_attr(test, derive(Dummy))]
    pub struct EncryptionRequestPacket {
        /// Arbitrary identifier used only to namespace the SHA-1 server id hash; vanilla servers
        /// send an empty string.
        pub server_id: String,
        /// The server's RSA public key, encoded as a DER `SubjectPublicKeyInfo`.
        pub public_key_der: Vec<u8>,
        /// Random bytes, hex-encoded, that the client must echo back encrypted.
        pub verify_token: String,
    }

    impl Packet for EncryptionRequestPacket {
        const ID: VarInt = 0x01;
    }

    #[cfg(feature = "server")]
    impl WritePacket for EncryptionRequestPacket {
        async fn write_to_buffer<S>(&self, buffer: &mut S) -> Result<(), Error>
        where
            S: AsyncWrite + Unpin + Send + Sync,
        {
            buffer.write_string(&self.server_id).await?;
            buffer.write_bytes(&self.public_key_der).await?;
            buffer.write_string(&self.verify_token).await?;

            Ok(())
        }
    }

    #[cfg(feature = "client")]
    impl ReadPacket for EncryptionRequestPacket {
        async fn read_from_buffer<S>(buffer: &mut S) -> Result<Self, Error>
        where
            S: AsyncRead + Unpin + Send + Sync,
        {
            let server_id = buffer.read_string().await?;
            let public_key_der = buffer.read_bytes().await?;
            let verify_token = buffer.read_string().await?;

            Ok(Self {
                server_id,
                public_key_der,
                verify_token,
            })
        }
    }

    /// The [`LoginSuccessPacket`].
    ///
    /// Sent once identity has been established; the client transitions to `Play` upon receiving
    /// it. The properties array is always empty — this server does not relay Mojang profile
    /// properties beyond the textures already folded into the player's identity.
    ///
    /// [Minecraft Docs](https://minecraft.wiki/w/Java_Edition_protocol#Login_Success)
    #[derive(Debug, Clone, Eq, PartialEq)]
    #[cfg_attr(test, derive(Dummy))]
    pub struct LoginSuccessPacket {
        pub uuid: Uuid,
        pub username: String,
    }

    impl Packet for LoginSuccessPacket {
        const ID: VarInt = 0x02;
    }

    #[cfg(feature = "server")]
    impl WritePacket for LoginSuccessPacket {
        async fn write_to_buffer<S>(&self, buffer: &mut S) -> Result<(), Error>
        where
            S: AsyncWrite + Unpin + Send + Sync,
        {
            buffer.write_uuid(&self.uuid).await?;
            buffer.write_string(&self.username).await?;
            buffer.write_varint(0).await?;

            Ok(())
        }
    }

    #[cfg(feature = "client")]
    impl ReadPacket for LoginSuccessPacket {
        async fn read_from_buffer<S>(buffer: &mut S) -> Result<Self, Error>
        where
            S: AsyncRead + Unpin + Send + Sync,
        {
            let uuid = buffer.read_uuid().await?;
            let username = buffer.read_string().await?;
            let props_len = buffer.read_varint().await?;
            for _ in 0..props_len {
                let _name = buffer.read_string().await?;
                let _value = buffer.read_string().await?;
                let is_signed = buffer.read_bool().await?;
                if is_signed {
                    let _signature = buffer.read_string().await?;
                }
            }

            Ok(Self { uuid, username })
        }
    }

    /// The [`SetCompressionPacket`].
    ///
    /// Once sent, every subsequent frame in both directions on this connection uses the
    /// compressed packet format, with `threshold` as the minimum uncompressed size that
    /// actually gets deflated.
    ///
    /// [Minecraft Docs](https://minecraft.wiki/w/Java_Edition_protocol#Set_Compression)
    #[derive(Debug, Clone, Eq, PartialEq)]
    #[cfg_attr(test, derive(Dummy))]
    pub struct SetCompressionPacket {
        pub threshold: VarInt,
    }

    impl Packet for SetCompressionPacket {
        const ID: VarInt = 0x03;
    }

    #[cfg(feature = "server")]
    impl WritePacket for SetCompressionPacket {
        async fn write_to_buffer<S>(&self, buffer: &mut S) -> Result<(), Error>
        where
            S: AsyncWrite + Unpin + Send + Sync,
        {
            buffer.write_varint(self.threshold).await?;

            Ok(())
        }
    }

    #[cfg(feature = "client")]
    impl ReadPacket for SetCompressionPacket {
        async fn read_from_buffer<S>(buffer: &mut S) -> Result<Self, Error>
        where
            S: AsyncRead + Unpin + Send + Sync,
        {
            let threshold = buffer.read_varint().await?;

            Ok(Self { threshold })
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

    /// The signature data optionally carried by a [`LoginStartPacket`], present only when the
    /// client has enabled Mojang's chat-signing key exchange.
    #[derive(Debug, Clone, Eq, PartialEq)]
    #[cfg_attr(test, derive(Dummy))]
    pub struct LoginStartSignature {
        pub timestamp: i64,
        pub public_key_der: Vec<u8>,
        pub signature: Vec<u8>,
    }

    /// The [`LoginStartPacket`].
    ///
    /// The first packet sent once a connection has requested the `Login` state.
    ///
    /// [Minecraft Docs](https://minecraft.wiki/w/Java_Edition_protocol#Login_Start)
    #[derive(Debug, Clone, Eq, PartialEq)]
    #[cfg_attr(test, derive(Dummy))]
    pub struct LoginStartPacket {
        pub name: String,
        pub signature: Option<LoginStartSignature>,
    }

    impl Packet for LoginStartPacket {
        const ID: VarInt = 0x00;
    }

    #[cfg(feature = "client")]
    impl WritePacket for LoginStartPacket {
        async fn write_to_buffer<S>(&self, buffer: &mut S) -> Result<(), Error>
        where
            S: AsyncWrite + Unpin + Send + Sync,
        {
            buffer.write_string(&self.name).await?;
            buffer.write_bool(self.signature.is_some()).await?;
            if let Some(sig) = &self.signature {
                buffer.write_i64(sig.timestamp).await?;
                buffer.write_bytes(&sig.public_key_der).await?;
                buffer.write_bytes(&sig.signature).await?;
            }

            Ok(())
        }
    }

    #[cfg(feature = "server")]
    impl ReadPacket for LoginStartPacket {
        async fn read_from_buffer<S>(buffer: &mut S) -> Result<Self, Error>
        where
            S: AsyncRead + Unpin + Send + Sync,
        {
            let name = buffer.read_string().await?;
            let has_sig = buffer.read_bool().await?;
            let signature = if has_sig {
                Some(LoginStartSignature {
                    timestamp: buffer.read_i64().await?,
                    public_key_der: buffer.read_bytes().await?,
                    signature: buffer.read_bytes().await?,
                })
            } else {
                None
            };

            Ok(Self { name, signature })
        }
    }

    /// The proof a client offers back to the server during [`EncryptionResponsePacket`]: either
    /// the encrypted verify token, or (when the client signs its own key) a salt and message
    /// signature instead.
    #[derive(Debug, Clone, Eq, PartialEq)]
    #[cfg_attr(test, derive(Dummy))]
    pub enum EncryptionProof {
        VerifyToken(Vec<u8>),
        SignedSalt { salt: i64, message_signature: Vec<u8> },
    }

    /// The [`EncryptionResponsePacket`].
    ///
    /// [Minecraft Docs](https://minecraft.wiki/w/Java_Edition_protocol#Encryption_Response)
    #[derive(Debug, Clone, Eq, PartialEq)]
    #[cfg_attr(test, derive(Dummy))]
    pub struct EncryptionResponsePacket {
        pub shared_secret: Vec<u8>,
        pub proof: EncryptionProof,
    }

    impl Packet for EncryptionResponsePacket {
        const ID: VarInt = 0x01;
    }

    #[cfg(feature = "client")]
    impl WritePacket for EncryptionResponsePacket {
        async fn write_to_buffer<S>(&self, buffer: &mut S) -> Result<(), Error>
        where
            S: AsyncWrite + Unpin + Send + Sync,
        {
            buffer.write_bytes(&self.shared_secret).await?;
            match &self.proof {
                EncryptionProof::VerifyToken(token) => {
                    buffer.write_bool(true).await?;
                    buffer.write_bytes(token).await?;
                }
                EncryptionProof::SignedSalt {
                    salt,
                    message_signature,
                } => {
                    buffer.write_bool(false).await?;
                    buffer.write_i64(*salt).await?;
                    buffer.write_bytes(message_signature).await?;
                }
            }

            Ok(())
        }
    }

    #[cfg(feature = "server")]
    impl ReadPacket for EncryptionResponsePacket {
        async fn read_from_buffer<S>(buffer: &mut S) -> Result<Self, Error>
        where
            S: AsyncRead + Unpin + Send + Sync,
        {
            let shared_secret = buffer.read_bytes().await?;
            let has_verify_token = buffer.read_bool().await?;
            let proof = if has_verify_token {
                EncryptionProof::VerifyToken(buffer.read_bytes().await?)
            } else {
                let salt = buffer.read_i64().await?;
                let message_signature = buffer.read_bytes().await?;
                EncryptionProof::SignedSalt {
                    salt,
                    message_signature,
                }
            };

            Ok(Self {
                shared_secret,
                proof,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::assert_packet;

    #[tokio::test]
    async fn write_read_clientbound_cancel_login_packet() {
        assert_packet::<clientbound::CancelLoginPacket>(0x00).await;
    }

    #[tokio::test]
    async fn write_read_clientbound_encryption_request_packet() {
        assert_packet::<clientbound::EncryptionRequestPacket>(0x01).await;
    }

    #[tokio::test]
    async fn write_read_clientbound_login_success_packet() {
        assert_packet::<clientbound::LoginSuccessPacket>(0x02).await;
    }

    #[tokio::test]
    async fn write_read_clientbound_set_compression_packet() {
        assert_packet::<clientbound::SetCompressionPacket>(0x03).await;
    }

    #[tokio::test]
    async fn write_read_serverbound_login_start_packet() {
        assert_packet::<serverbound::LoginStartPacket>(0x00).await;
    }

    #[tokio::test]
    async fn write_read_serverbound_encryption_response_packet() {
        assert_packet::<serverbound::EncryptionResponsePacket>(0x01).await;
    }
}
