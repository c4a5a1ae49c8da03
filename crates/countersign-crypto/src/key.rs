//! Pre-shared symmetric key material.

use std::fmt;

use zeroize::Zeroize;

use crate::error::IntegrityError;

/// A pre-shared symmetric key, validated at construction.
///
/// Both parties hold the same key, distributed out of band. The key is
/// loaded once per process and treated as immutable for the process
/// lifetime; there is no rotation within a session.
///
/// # Security
///
/// - Key bytes are zeroized when the key is dropped
/// - `Debug` output redacts the key material; only the length is shown
#[derive(Clone, PartialEq, Eq)]
pub struct SharedKey {
    bytes: Vec<u8>,
}

impl SharedKey {
    /// Key lengths accepted by the codec (AES-128/192/256).
    pub const VALID_LENGTHS: [usize; 3] = [16, 24, 32];

    /// Create a key from raw bytes.
    ///
    /// # Errors
    ///
    /// - `InvalidKeyLength` if the input is not 16, 24, or 32 bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, IntegrityError> {
        if !Self::VALID_LENGTHS.contains(&bytes.len()) {
            return Err(IntegrityError::InvalidKeyLength { actual: bytes.len() });
        }
        Ok(Self { bytes: bytes.to_vec() })
    }

    /// Raw key bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Key length in bytes (16, 24, or 32).
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Always `false`; a constructed key is never empty.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl Drop for SharedKey {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

impl fmt::Debug for SharedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SharedKey({} bytes, redacted)", self.bytes.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_all_aes_key_lengths() {
        for len in SharedKey::VALID_LENGTHS {
            let key = SharedKey::from_bytes(&vec![0xAB; len]).unwrap();
            assert_eq!(key.len(), len);
        }
    }

    #[test]
    fn rejects_wrong_lengths() {
        for len in [0, 1, 15, 17, 23, 31, 33, 64] {
            let result = SharedKey::from_bytes(&vec![0u8; len]);
            assert!(
                matches!(result, Err(IntegrityError::InvalidKeyLength { actual }) if actual == len),
                "length {len} must be rejected"
            );
        }
    }

    #[test]
    fn debug_output_redacts_key_material() {
        let key = SharedKey::from_bytes(&[0x5A; 16]).unwrap();
        let debug = format!("{key:?}");
        assert!(!debug.contains("5a"), "debug output must not leak key bytes");
        assert!(!debug.contains("5A"), "debug output must not leak key bytes");
        assert!(debug.contains("16 bytes"));
    }

    #[test]
    fn keys_with_same_bytes_compare_equal() {
        let a = SharedKey::from_bytes(&[1u8; 24]).unwrap();
        let b = SharedKey::from_bytes(&[1u8; 24]).unwrap();
        assert_eq!(a, b);
    }
}
