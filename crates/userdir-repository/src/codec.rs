//! Record codec for stored user records.
//!
//! Records are stored as JSON under their key. The byte encoding is a
//! bit-exact contract shared with whatever seeded the store, so both
//! directions go through this module.

use thiserror::Error;
use userdir_types::User;

/// Stored bytes did not parse as a well-formed user record.
///
/// Missing required fields are an error; they are never coerced to defaults.
#[derive(Debug, Error)]
#[error("invalid user record: {0}")]
pub struct DecodeError(#[source] serde_json::Error);

/// Serialize a user record to its stored byte form.
pub fn encode(user: &User) -> serde_json::Result<Vec<u8>> {
    serde_json::to_vec(user)
}

/// Deserialize a user record from its stored byte form.
pub fn decode(bytes: &[u8]) -> Result<User, DecodeError> {
    serde_json::from_slice(bytes).map_err(DecodeError)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_decode_reference_encoding() {
        let user = decode(br#"{"id":1,"name":"alpha"}"#).unwrap();
        assert_eq!(user, User::new(1, "alpha"));
    }

    #[test]
    fn test_decode_rejects_malformed_json() {
        assert!(decode(b"not json").is_err());
        assert!(decode(b"").is_err());
    }

    #[test]
    fn test_decode_rejects_missing_fields() {
        assert!(decode(br#"{"id":1}"#).is_err());
        assert!(decode(br#"{"name":"alpha"}"#).is_err());
        assert!(decode(br#"{}"#).is_err());
    }

    #[test]
    fn test_decode_rejects_wrong_field_types() {
        assert!(decode(br#"{"id":"1","name":"alpha"}"#).is_err());
        assert!(decode(br#"{"id":1,"name":2}"#).is_err());
    }

    proptest! {
        #[test]
        fn round_trip_law(id in any::<u64>(), name in ".{0,64}") {
            let user = User::new(id, name);
            let bytes = encode(&user).unwrap();
            let decoded = decode(&bytes).unwrap();
            prop_assert_eq!(user, decoded);
        }
    }
}
