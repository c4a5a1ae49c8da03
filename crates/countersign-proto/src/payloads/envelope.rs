//! The signed envelope: the integrity-protected transmission unit.

use serde::{Deserialize, Serialize};

/// A catalog response packaged with its authentication tag.
///
/// The `payload` field carries the canonical serialized bytes of a
/// [`crate::CatalogResponse`] exactly as the signer produced them. The
/// verifier recomputes the tag over these bytes as received; decoding and
/// re-encoding the response would not be byte-stable across
/// implementations and must never feed verification.
///
/// # Security
///
/// `signer_id` is informational only. It is not covered by the tag, not
/// authenticated, and not used to select a key - the protocol has a
/// single shared key. Multi-signer key lookup by identity is an explicit
/// extension point, not part of this contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedEnvelope {
    /// Canonical serialized response bytes (the exact bytes that were
    /// hashed and tagged).
    pub payload: Vec<u8>,

    /// Authentication tag over `payload`.
    pub tag: Vec<u8>,

    /// Identity of the principal that produced the tag.
    pub signer_id: String,
}
