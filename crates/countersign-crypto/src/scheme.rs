//! Tag scheme selection and dispatch.

use crate::{ciphered_digest, error::IntegrityError, key::SharedKey, keyed_hash};

/// Tag construction scheme, agreed out of band by signer and verifier.
///
/// The scheme is not carried in the envelope and is not negotiated: both
/// sides configure it the same way they configure the shared key. A tag
/// produced under one scheme never verifies under the other.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TagScheme {
    /// SHA-256 digest encrypted with AES-ECB + PKCS#7. The deployed wire
    /// format: deterministic, 48-byte tags, no semantic security.
    #[default]
    CipheredDigest,

    /// HMAC-SHA256 over the payload. Hardened deviation from the deployed
    /// format; 32-byte tags.
    KeyedHash,
}

impl TagScheme {
    /// Compute the authentication tag for `payload` under `key`.
    ///
    /// Pure and deterministic: no randomness, no side effects, safe to
    /// call concurrently.
    ///
    /// # Errors
    ///
    /// - `InvalidKeyLength` if the key does not fit the scheme's cipher
    pub fn sign(self, payload: &[u8], key: &SharedKey) -> Result<Vec<u8>, IntegrityError> {
        match self {
            Self::CipheredDigest => ciphered_digest::sign(payload, key),
            Self::KeyedHash => keyed_hash::sign(payload, key),
        }
    }

    /// Check `tag` against the tag recomputed over `payload` under `key`.
    ///
    /// `Ok(true)` is the only accepting outcome. `Ok(false)` means the tag
    /// is structurally valid but does not match the payload;
    /// `Err(MalformedTag)` means the tag bytes could not be processed at
    /// all. Callers must treat anything other than `Ok(true)` as rejection.
    ///
    /// # Errors
    ///
    /// - `InvalidKeyLength` if the key does not fit the scheme's cipher
    /// - `MalformedTag` if the tag has an impossible length or invalid
    ///   padding
    pub fn verify(self, payload: &[u8], tag: &[u8], key: &SharedKey) -> Result<bool, IntegrityError> {
        match self {
            Self::CipheredDigest => ciphered_digest::verify(payload, tag, key),
            Self::KeyedHash => keyed_hash::verify(payload, tag, key),
        }
    }

    /// Tag length in bytes produced by this scheme.
    pub fn tag_size(self) -> usize {
        match self {
            Self::CipheredDigest => ciphered_digest::CIPHERED_DIGEST_TAG_SIZE,
            Self::KeyedHash => keyed_hash::KEYED_HASH_TAG_SIZE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_key() -> SharedKey {
        SharedKey::from_bytes(&[0x0F; 16]).unwrap()
    }

    #[test]
    fn schemes_produce_their_declared_tag_size() {
        let key = test_key();
        for scheme in [TagScheme::CipheredDigest, TagScheme::KeyedHash] {
            let tag = scheme.sign(b"payload", &key).unwrap();
            assert_eq!(tag.len(), scheme.tag_size());
        }
    }

    #[test]
    fn schemes_are_not_interoperable() {
        let key = test_key();
        let payload = b"cross scheme payload";

        let ciphered = TagScheme::CipheredDigest.sign(payload, &key).unwrap();
        let keyed = TagScheme::KeyedHash.sign(payload, &key).unwrap();

        // A 48-byte ciphered tag has an impossible length for HMAC-SHA256.
        assert!(matches!(
            TagScheme::KeyedHash.verify(payload, &ciphered, &key),
            Err(IntegrityError::MalformedTag { .. })
        ));

        // A 32-byte HMAC tag is block-aligned, so it decrypts, but the
        // result is not the payload digest.
        let accepted = matches!(TagScheme::CipheredDigest.verify(payload, &keyed, &key), Ok(true));
        assert!(!accepted);
    }

    #[test]
    fn default_scheme_is_the_deployed_wire_format() {
        assert_eq!(TagScheme::default(), TagScheme::CipheredDigest);
    }
}
