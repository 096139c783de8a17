//! Sealed-box backend.
//!
//! Anonymous sealed boxes compatible with libsodium `crypto_box_seal`,
//! base64-encoded with the standard alphabet.

use base64::{engine::general_purpose::STANDARD, Engine};
use crypto_box::aead::OsRng;
use crypto_box::{PublicKey, SecretKey, KEY_SIZE};
use tracing::trace;

use super::Cipher;
use crate::error::{CipherError, Result};

/// libsodium-compatible sealed box.
pub struct SealedBox;

impl Cipher for SealedBox {
    type Recipient = PublicKey;
    type Identity = SecretKey;

    fn encrypt(&self, plaintext: &str, recipient: &PublicKey) -> Result<String> {
        trace!(plaintext_len = plaintext.len(), "encrypting");

        let sealed = recipient
            .seal(&mut OsRng, plaintext.as_bytes())
            .map_err(|e| CipherError::EncryptionFailed(format!("{}", e)))?;

        trace!(ciphertext_len = sealed.len(), "encrypted");
        Ok(STANDARD.encode(sealed))
    }

    fn decrypt(&self, encrypted: &str, identity: &SecretKey) -> Result<String> {
        trace!(ciphertext_len = encrypted.len(), "decrypting");

        let sealed = STANDARD
            .decode(encrypted)
            .map_err(|e| CipherError::DecryptionFailed(format!("{}", e)))?;
        let opened = identity
            .unseal(&sealed)
            .map_err(|e| CipherError::DecryptionFailed(format!("{}", e)))?;

        String::from_utf8(opened)
            .map_err(|e| CipherError::DecryptionFailed(format!("UTF-8 error: {}", e)).into())
    }
}

/// Parse a base64 public key into a sealed-box recipient.
///
/// Only the first 32 decoded bytes are used.
///
/// # Errors
///
/// Returns `CipherError::InvalidKey` if the key is not base64 or is too short.
pub fn parse_recipient(key: &str, key_id: &str) -> Result<PublicKey> {
    let invalid = |reason: String| CipherError::InvalidKey {
        key_id: key_id.to_string(),
        reason,
    };

    let bytes = STANDARD
        .decode(key.trim())
        .map_err(|e| invalid(format!("not base64: {}", e)))?;
    let raw: [u8; KEY_SIZE] = bytes
        .get(..KEY_SIZE)
        .and_then(|b| b.try_into().ok())
        .ok_or_else(|| invalid(format!("expected {} bytes, got {}", KEY_SIZE, bytes.len())))?;

    Ok(PublicKey::from(raw))
}
