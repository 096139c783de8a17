//! Type aliases for domain concepts.
//!
//! Provides semantic type aliases to make function signatures more descriptive.

/// An entry name as stored remotely (e.g., DATABASE_URL, API_KEY).
///
/// Always upper-cased.
pub type EntryName = String;

/// Identifier of a public key, echoed back on every sealed write.
pub type KeyId = String;

/// Base64-encoded sealed-box ciphertext.
pub type EncryptedValue = String;

/// Deployment environment name (e.g., production).
pub type EnvironmentName = String;
