//! RSA keying, the Minecraft "server id" hash, and the verify-token / signed-proof checks used
//! during the `Login`/`Encryption` sub-states.

pub mod stream;

use num_bigint::BigInt;
use rand::TryRng;
use rand::rand_core::UnwrapErr;
use rand::rngs::SysRng;
use rsa::pkcs1v15::VerifyingKey;
use rsa::pkcs8::{DecodePublicKey, EncodePublicKey};
use rsa::signature::Verifier;
use rsa::{Pkcs1v15Encrypt, RsaPrivateKey, RsaPublicKey};
use sha1::Sha1;
use sha2::{Digest, Sha256};
use std::sync::LazyLock;

/// Errors produced while generating keys, (de)crypting, or verifying a login signature.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("rsa error: {0}")]
    Rsa(#[from] rsa::Error),

    #[error("pkcs8 encoding error: {0}")]
    Pkcs8(#[from] rsa::pkcs8::spki::Error),

    #[error("cipher key/iv has the wrong length: {0}")]
    InvalidCipherLength(#[from] cfb8::cipher::InvalidLength),

    #[error("signature verification failed: {0}")]
    InvalidSignature(#[from] rsa::signature::Error),

    #[error("failed to generate random bytes: {0}")]
    Rng(#[from] rand::rngs::SysError),
}

/// The RSA keypair of the application, generated once at startup and reused for every
/// connection's encryption handshake.
pub static KEY_PAIR: LazyLock<(RsaPrivateKey, RsaPublicKey)> =
    LazyLock::new(|| generate_keypair().expect("failed to generate server keypair"));

/// The DER-encoded `SubjectPublicKeyInfo` of [`KEY_PAIR`], sent verbatim in `EncryptionRequest`.
pub static ENCODED_PUB: LazyLock<Vec<u8>> =
    LazyLock::new(|| encode_public_key(&KEY_PAIR.1).expect("failed to encode server public key"));

/// Generates a new 1024-bit RSA keypair, as used by vanilla Minecraft servers.
fn generate_keypair() -> Result<(RsaPrivateKey, RsaPublicKey), Error> {
    let mut rng = UnwrapErr(SysRng);

    let private_key = RsaPrivateKey::new(&mut rng, 1024)?;
    let public_key = RsaPublicKey::from(&private_key);

    Ok((private_key, public_key))
}

/// Encodes an RSA public key as a DER `SubjectPublicKeyInfo`, as required by the protocol.
fn encode_public_key(key: &RsaPublicKey) -> Result<Vec<u8>, Error> {
    Ok(key.to_public_key_der()?.to_vec())
}

/// Encrypts `value` (the shared secret or verify token) with the client-visible public key.
pub fn encrypt(key: &RsaPublicKey, value: &[u8]) -> Result<Vec<u8>, Error> {
    let mut rng = UnwrapErr(SysRng);

    Ok(key.encrypt(&mut rng, Pkcs1v15Encrypt, value)?)
}

/// Decrypts a value (the shared secret or verify token) with the server's private key.
pub fn decrypt(key: &RsaPrivateKey, value: &[u8]) -> Result<Vec<u8>, Error> {
    Ok(key.decrypt(Pkcs1v15Encrypt, value)?)
}

/// Generates `length` cryptographically random bytes for use as a session's verify token.
pub fn generate_verify_token(length: usize) -> Result<Vec<u8>, Error> {
    let mut rng = SysRng;
    let mut data = vec![0u8; length];
    rng.try_fill_bytes(&mut data)?;
    Ok(data)
}

/// Generates a random `i64` id for a keep-alive round-trip.
pub fn generate_keep_alive_id() -> Result<i64, Error> {
    let mut rng = SysRng;
    let mut bytes = [0u8; 8];
    rng.try_fill_bytes(&mut bytes)?;
    Ok(i64::from_be_bytes(bytes))
}

/// Checks whether a decrypted verify token round-trips to the value the server issued.
#[must_use]
pub fn verify_token(expected: &[u8], actual: &[u8]) -> bool {
    expected == actual
}

/// Verifies a client's message-signature proof against its previously-declared public key, used
/// on the alternate `EncryptionResponse` path where the client signs its own verify instead of
/// echoing the server's token back encrypted.
pub fn verify_signed_salt(
    public_key_der: &[u8],
    salt: i64,
    verify_token: &[u8],
    signature: &[u8],
) -> Result<(), Error> {
    let public_key = RsaPublicKey::from_public_key_der(public_key_der)?;
    let verifying_key = VerifyingKey::<Sha256>::new(public_key);

    let mut message = Vec::with_capacity(8 + verify_token.len());
    message.extend_from_slice(&salt.to_be_bytes());
    message.extend_from_slice(verify_token);

    let signature = rsa::pkcs1v15::Signature::try_from(signature)?;
    verifying_key.verify(&message, &signature)?;

    Ok(())
}

/// Computes the SHA-1 "server id" hash used to authenticate a login against Mojang's session
/// service, formatted as a Minecraft-style signed hex string.
#[must_use]
pub fn minecraft_hash(server_id: &str, shared_secret: &[u8], encoded_public: &[u8]) -> String {
    let mut hasher = Sha1::new();

    hasher.update(server_id);
    hasher.update(shared_secret);
    hasher.update(encoded_public);

    BigInt::from_signed_bytes_be(&hasher.finalize()).to_str_radix(16)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_keypair() {
        generate_keypair().expect("failed to generate keypair");
    }

    #[test]
    fn can_encode_keypair() {
        let (_, key) = generate_keypair().expect("failed to generate keypair");
        encode_public_key(&key).expect("failed to encode keypair");
    }

    #[test]
    fn generate_different_tokens() {
        let token1 = generate_verify_token(4).expect("failed to generate token");
        let token2 = generate_verify_token(4).expect("failed to generate token");
        assert_eq!(token1.len(), 4);
        assert_ne!(token1, token2);
    }

    #[test]
    fn verify_valid_token() {
        let token = generate_verify_token(4).expect("failed to generate token");
        assert!(verify_token(&token, &token));
    }

    #[test]
    fn verify_invalid_token() {
        let token1 = generate_verify_token(4).expect("failed to generate token");
        let token2 = generate_verify_token(4).expect("failed to generate token");
        assert!(!verify_token(&token1, &token2));
    }

    #[test]
    fn encrypt_decrypt_round_trips() {
        let (private_key, public_key) = generate_keypair().expect("failed to generate keypair");
        let secret = b"0123456789abcdef";
        let encrypted = encrypt(&public_key, secret).expect("failed to encrypt");
        let decrypted = decrypt(&private_key, &encrypted).expect("failed to decrypt");
        assert_eq!(secret.as_slice(), decrypted.as_slice());
    }

    #[test]
    fn hash_is_deterministic() {
        let shared_secret = b"verysecuresecret";
        let (_, key) = generate_keypair().expect("failed to generate keypair");
        let encoded = encode_public_key(&key).expect("failed to encode keypair");
        let hash_a = minecraft_hash("", shared_secret, &encoded);
        let hash_b = minecraft_hash("", shared_secret, &encoded);
        assert_eq!(hash_a, hash_b);
    }

    /// Reference vectors published for the vanilla ("Notchian") server id hash, with an empty
    /// shared secret and public key so the hash reduces to `sha1(server_id)`.
    #[test]
    fn hash_matches_notchian_reference_vectors() {
        assert_eq!(
            minecraft_hash("Notch", &[], &[]),
            "4ed1f46bbe04bc756bcb17c0c7ce3e4632f06a48"
        );
        assert_eq!(
            minecraft_hash("jeb_", &[], &[]),
            "-7c9d5b0044c130109a5d7b5fb5c317c02b4e28c1"
        );
        assert_eq!(
            minecraft_hash("simon", &[], &[]),
            "88e16a1019277b15d58faf0541e11910eb756f6"
        );
    }

    #[test]
    fn signed_salt_round_trips() {
        let (private_key, public_key) = generate_keypair().expect("failed to generate keypair");
        let der = public_key
            .to_public_key_der()
            .expect("failed to encode public key")
            .to_vec();

        let signing_key = rsa::pkcs1v15::SigningKey::<Sha256>::new(private_key);
        let verify_token = b"abcd";
        let salt: i64 = 42;

        let mut message = Vec::new();
        message.extend_from_slice(&salt.to_be_bytes());
        message.extend_from_slice(verify_token);

        use rsa::signature::Signer;
        let signature = signing_key.sign(&message);

        verify_signed_salt(&der, salt, verify_token, &signature.to_bytes())
            .expect("signature should verify");

        // double check the parsed key round trips
        RsaPublicKey::from_public_key_der(&der).expect("should parse DER key");
    }
}
