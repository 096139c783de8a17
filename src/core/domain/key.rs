//! Public key and sealed payload types.

use serde::{Deserialize, Serialize};

use crate::core::types::{EncryptedValue, EntryName, KeyId};

/// Per-scope sealing key.
///
/// Fetched once per repository and scope per sync.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PublicKey {
    pub key_id: KeyId,
    /// Base64-encoded X25519 public key.
    pub key: String,
}

/// A sealed value ready to be written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EncryptedPayload {
    #[serde(skip)]
    pub name: EntryName,
    pub encrypted_value: EncryptedValue,
    pub key_id: KeyId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_key_deserialize() {
        let key: PublicKey =
            serde_json::from_str(r#"{"key_id":"568250167242549743","key":"AAAA","url":"x"}"#)
                .unwrap();
        assert_eq!(key.key_id, "568250167242549743");
        assert_eq!(key.key, "AAAA");
    }

    #[test]
    fn test_payload_body_omits_name() {
        let payload = EncryptedPayload {
            name: "TOKEN".into(),
            encrypted_value: "c2VhbGVk".into(),
            key_id: "1".into(),
        };
        let body = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"encrypted_value": "c2VhbGVk", "key_id": "1"})
        );
    }
}
