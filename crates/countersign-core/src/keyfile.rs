//! Pre-shared key loading.
//!
//! The key file contains exactly the raw key bytes (16, 24, or 32 of
//! them) - no encoding, no framing. It is read once at process startup
//! and the resulting [`SharedKey`] is shared read-only for the process
//! lifetime.

use std::path::Path;

use countersign_crypto::SharedKey;

use crate::error::KeyFileError;

/// Load the shared key from `path`.
///
/// # Errors
///
/// - `Unavailable` if the file cannot be read
/// - `Malformed` if its length is not a supported key size
pub fn load(path: impl AsRef<Path>) -> Result<SharedKey, KeyFileError> {
    let path = path.as_ref();
    let display = path.display().to_string();

    let bytes = std::fs::read(path)
        .map_err(|source| KeyFileError::Unavailable { path: display.clone(), source })?;

    SharedKey::from_bytes(&bytes)
        .map_err(|source| KeyFileError::Malformed { path: display, source })
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn loads_a_valid_key_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&[0xAB; 16]).unwrap();

        let key = load(file.path()).unwrap();
        assert_eq!(key.as_bytes(), &[0xAB; 16]);
    }

    #[test]
    fn missing_file_is_unavailable() {
        let result = load("/nonexistent/secret.key");
        assert!(matches!(result, Err(KeyFileError::Unavailable { .. })));
    }

    #[test]
    fn wrong_length_is_malformed() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&[0u8; 15]).unwrap();

        let result = load(file.path());
        assert!(matches!(result, Err(KeyFileError::Malformed { .. })));
    }

    #[test]
    fn empty_file_is_malformed() {
        let file = tempfile::NamedTempFile::new().unwrap();

        let result = load(file.path());
        assert!(matches!(result, Err(KeyFileError::Malformed { .. })));
    }
}
