//! Countersign Integrity Primitives
//!
//! Pure functions for computing and checking the authentication tag that
//! protects catalog responses in transit. No I/O, no shared state. All
//! operations are deterministic for fixed inputs, which makes them safe to
//! call concurrently from any number of tasks without synchronization.
//!
//! # Tag Construction
//!
//! The deployed wire format ([`TagScheme::CipheredDigest`]) derives the tag
//! in two steps:
//!
//! ```text
//! Payload (canonical bytes)
//!        │
//!        ▼
//! SHA-256 → 32-byte digest
//!        │
//!        ▼
//! AES-ECB + PKCS#7 (shared key) → 48-byte tag
//! ```
//!
//! The verifier recomputes the digest over the received payload bytes,
//! decrypts the tag, and accepts only if the two match byte for byte.
//!
//! # Security
//!
//! - ECB mode has no semantic security: identical digests under the same
//!   key produce identical tags, and every tag ends in the same encrypted
//!   padding block. This construction is kept bit-for-bit for wire
//!   compatibility with existing deployments; [`TagScheme::KeyedHash`]
//!   (HMAC-SHA256) is the hardened alternative for deployments that do not
//!   need it.
//! - The tag authenticates the payload under a single pre-shared key. It is
//!   not a digital signature: anyone holding the key can produce valid
//!   tags, so there is no non-repudiation.
//! - There is no nonce or timestamp. A captured (payload, tag) pair can be
//!   replayed indefinitely; replay protection is out of scope here.
//! - Verification failure is indistinguishable from forgery by design:
//!   malformed tag bytes and digest mismatches both end in rejection.
//! - Digest comparison is constant-time to avoid leaking the position of
//!   the first mismatching byte.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod ciphered_digest;
mod error;
mod key;
mod keyed_hash;
mod scheme;

pub use ciphered_digest::CIPHERED_DIGEST_TAG_SIZE;
pub use error::IntegrityError;
pub use key::SharedKey;
pub use keyed_hash::KEYED_HASH_TAG_SIZE;
pub use scheme::TagScheme;
