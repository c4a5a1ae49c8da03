//! Keyed-hash tag construction: HMAC-SHA256 over the payload.
//!
//! Hardened alternative to the deployed ciphered-digest format. A proper
//! MAC: no padding oracle surface, no deterministic-padding artifact, and
//! the tag is a single hash output. Not wire compatible with
//! [`crate::TagScheme::CipheredDigest`] — both parties must opt in
//! together, the same way they agree on the key.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::{error::IntegrityError, key::SharedKey};

type HmacSha256 = Hmac<Sha256>;

/// HMAC-SHA256 tag size in bytes.
pub const KEYED_HASH_TAG_SIZE: usize = 32;

/// Compute the HMAC-SHA256 tag for `payload` under `key`.
pub(crate) fn sign(payload: &[u8], key: &SharedKey) -> Result<Vec<u8>, IntegrityError> {
    let mut mac = HmacSha256::new_from_slice(key.as_bytes())
        .map_err(|_| IntegrityError::InvalidKeyLength { actual: key.len() })?;
    mac.update(payload);
    Ok(mac.finalize().into_bytes().to_vec())
}

/// Check `tag` against the HMAC recomputed over `payload`.
///
/// The comparison inside `verify_slice` is constant-time.
///
/// # Errors
///
/// - `MalformedTag` if the tag is not exactly 32 bytes
pub(crate) fn verify(payload: &[u8], tag: &[u8], key: &SharedKey) -> Result<bool, IntegrityError> {
    if tag.len() != KEYED_HASH_TAG_SIZE {
        return Err(IntegrityError::MalformedTag {
            reason: "length is not a valid HMAC-SHA256 output",
            len: tag.len(),
        });
    }

    let mut mac = HmacSha256::new_from_slice(key.as_bytes())
        .map_err(|_| IntegrityError::InvalidKeyLength { actual: key.len() })?;
    mac.update(payload);
    Ok(mac.verify_slice(tag).is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_key() -> SharedKey {
        SharedKey::from_bytes(&hex::decode("000102030405060708090a0b0c0d0e0f").unwrap()).unwrap()
    }

    #[test]
    fn known_answer_tag() {
        let key = test_key();
        let payload =
            hex::decode("a26b737570706c6965725f69646253316870726f647563747380").unwrap();

        let tag = sign(&payload, &key).unwrap();

        assert_eq!(
            hex::encode(&tag),
            "502ca302e8e7494b58b3c977213750f13538e94b4d27099a0c4f7c3c9cc3c4d5"
        );
        assert!(verify(&payload, &tag, &key).unwrap());
    }

    #[test]
    fn round_trip() {
        let key = test_key();
        let payload = b"keyed hash payload";

        let tag = sign(payload, &key).unwrap();

        assert_eq!(tag.len(), KEYED_HASH_TAG_SIZE);
        assert!(verify(payload, &tag, &key).unwrap());
    }

    #[test]
    fn empty_payload_round_trip() {
        let key = test_key();
        let tag = sign(&[], &key).unwrap();
        assert!(verify(&[], &tag, &key).unwrap());
    }

    #[test]
    fn tampered_payload_rejects() {
        let key = test_key();
        let tag = sign(b"payload", &key).unwrap();
        assert!(!verify(b"pAyload", &tag, &key).unwrap());
    }

    #[test]
    fn wrong_key_rejects() {
        let key = test_key();
        let other = SharedKey::from_bytes(&[0x99; 32]).unwrap();
        let tag = sign(b"payload", &key).unwrap();
        assert!(!verify(b"payload", &tag, &other).unwrap());
    }

    #[test]
    fn wrong_length_tag_is_malformed() {
        let key = test_key();
        for len in [0, 16, 31, 33, 48] {
            let result = verify(b"payload", &vec![0u8; len], &key);
            assert!(
                matches!(result, Err(IntegrityError::MalformedTag { .. })),
                "length {len} must be malformed"
            );
        }
    }
}
