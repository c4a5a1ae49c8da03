//! Integrity codec error types.

use thiserror::Error;

/// Errors produced by the integrity codec.
///
/// Both variants end in rejection when they surface during verification,
/// but they are kept distinct: a key problem is a configuration fault that
/// should be fixed and will affect every call, while a malformed tag is a
/// per-message condition indistinguishable in outcome from a forgery.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IntegrityError {
    /// Key material has a length no supported cipher accepts.
    #[error("invalid key length: {actual} bytes (expected 16, 24, or 32)")]
    InvalidKeyLength {
        /// Length of the rejected key material in bytes.
        actual: usize,
    },

    /// Tag bytes are not valid ciphertext for the configured scheme.
    ///
    /// Wrong length or bad block padding. Distinct from a digest mismatch,
    /// which is reported as a clean `false` from verification.
    #[error("malformed tag ({len} bytes): {reason}")]
    MalformedTag {
        /// Why the tag could not be processed.
        reason: &'static str,
        /// Length of the rejected tag in bytes.
        len: usize,
    },
}
