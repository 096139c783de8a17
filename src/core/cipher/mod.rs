//! Cryptographic operations.
//!
//! Secret values are sealed under a per-scope public key before they leave
//! the process. The platform only accepts libsodium anonymous sealed boxes
//! (X25519 + XSalsa20-Poly1305), so that is the single backend.

use tracing::trace;

use crate::core::domain::{EncryptedPayload, PublicKey};
use crate::error::Result;

mod sealed;

pub use sealed::{parse_recipient, SealedBox};

/// Cryptographic backend trait.
pub trait Cipher {
    /// Type representing a recipient public key.
    type Recipient;

    /// Type representing a private identity/key.
    type Identity;

    /// Encrypt plaintext for a recipient.
    ///
    /// # Returns
    ///
    /// Encrypted string (format depends on backend implementation).
    ///
    /// # Errors
    ///
    /// Returns `CipherError` if encryption fails.
    fn encrypt(&self, plaintext: &str, recipient: &Self::Recipient) -> Result<String>;

    /// Decrypt an encrypted string using a private identity.
    ///
    /// # Errors
    ///
    /// Returns `CipherError` if decryption fails.
    fn decrypt(&self, encrypted: &str, identity: &Self::Identity) -> Result<String>;
}

/// Seal one entry under a scope's public key.
///
/// The key id is carried through unchanged so the platform can pick the
/// matching private key.
///
/// # Errors
///
/// Returns `CipherError::InvalidKey` if the key is not usable, or
/// `CipherError::EncryptionFailed` if sealing fails.
pub fn seal(key: &PublicKey, name: &str, value: &str) -> Result<EncryptedPayload> {
    let recipient = parse_recipient(&key.key, &key.key_id)?;
    let encrypted_value = SealedBox.encrypt(value, &recipient)?;
    trace!(name, key_id = %key.key_id, "sealed");

    Ok(EncryptedPayload {
        name: name.to_string(),
        encrypted_value,
        key_id: key.key_id.clone(),
    })
}
