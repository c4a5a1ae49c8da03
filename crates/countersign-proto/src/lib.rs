//! Countersign wire format.
//!
//! Defines what travels between the catalog server and its clients:
//!
//! - [`FrameHeader`]: fixed 16-byte binary header (big endian), parsed
//!   zero-copy, carrying the opcode, a request-correlation id, and the
//!   payload size
//! - [`Frame`]: header plus raw payload bytes
//! - [`Payload`]: CBOR-encoded message bodies, keyed by the header opcode
//! - [`SignedEnvelope`]: the integrity-protected unit — canonical response
//!   bytes, authentication tag, signer identity
//!
//! The envelope's `payload` field is the exact byte sequence the tag is
//! computed over. It is carried as opaque bytes end to end: the verifier
//! must check the tag against the bytes as received, never against a
//! re-serialization of the decoded response.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod errors;
mod frame;
mod header;
mod opcode;
pub mod payloads;

pub use errors::{ProtocolError, Result};
pub use frame::Frame;
pub use header::FrameHeader;
pub use opcode::Opcode;
pub use payloads::{
    ErrorPayload, Payload,
    catalog::{CatalogRequest, CatalogResponse, Price, Product},
    envelope::SignedEnvelope,
};

/// ALPN protocol identifier for QUIC transport negotiation.
pub const ALPN_PROTOCOL: &[u8] = b"countersign";
