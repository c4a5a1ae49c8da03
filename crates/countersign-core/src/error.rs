//! Core error types.

use countersign_crypto::IntegrityError;
use countersign_proto::ProtocolError;
use thiserror::Error;

/// Errors loading the pre-shared key from a file.
#[derive(Debug, Error)]
pub enum KeyFileError {
    /// The key file is missing or unreadable.
    ///
    /// Startup-fatal for the server; fatal before connecting for the
    /// client.
    #[error("key file '{path}' unavailable: {source}")]
    Unavailable {
        /// Path that was attempted.
        path: String,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The key file exists but does not contain valid key material.
    #[error("key file '{path}' malformed: {source}")]
    Malformed {
        /// Path that was read.
        path: String,
        /// Why the bytes were rejected.
        #[source]
        source: IntegrityError,
    },
}

/// Errors producing a signed envelope.
///
/// Any of these means the responder delivers nothing for the request; the
/// server maps them to a protocol-level Error frame. A partially built or
/// unsigned envelope is never returned.
#[derive(Debug, Error)]
pub enum ResponderError {
    /// The response could not be serialized to canonical bytes.
    #[error("failed to serialize response: {0}")]
    Serialize(#[from] ProtocolError),

    /// The integrity codec could not produce a tag.
    #[error("failed to sign response: {0}")]
    Sign(#[from] IntegrityError),
}

/// Errors verifying a received envelope.
#[derive(Debug, Error)]
pub enum VerifyError {
    /// The tag did not verify against the received payload bytes.
    ///
    /// This is the expected outcome for tampered or forged responses, not
    /// a bug. Covers both a clean digest mismatch and structurally
    /// malformed tag bytes - the two are indistinguishable in outcome by
    /// design.
    #[error("signature invalid: response rejected")]
    SignatureInvalid,

    /// The tag verified but the payload bytes do not decode as a catalog
    /// response.
    ///
    /// The signer authenticated bytes that are not a valid response
    /// encoding; the payload is authentic but unusable.
    #[error("accepted payload failed to decode: {0}")]
    Decode(#[source] ProtocolError),
}
