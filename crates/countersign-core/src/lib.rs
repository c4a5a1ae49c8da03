//! Countersign responder and verifier logic.
//!
//! Glue between the wire format and the integrity codec:
//!
//! - [`Catalog`]: the product store behind the responder. Explicitly owned
//!   and injected, never a process-wide singleton, so responders are
//!   testable in isolation.
//! - [`keyfile`]: loads the pre-shared key from a file of raw key bytes.
//! - [`Responder`]: builds a catalog response, serializes it to canonical
//!   bytes, signs, and packages the envelope. All-or-nothing: a failure
//!   anywhere means no envelope, never an unsigned or partial one.
//! - [`Verifier`]: checks a received envelope against the shared key and
//!   releases the decoded response only on acceptance (fail-closed).
//!
//! Everything here is synchronous and free of I/O except [`keyfile::load`],
//! which runs once at startup.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod catalog;
mod error;
pub mod keyfile;
mod responder;
mod verifier;

pub use catalog::Catalog;
pub use error::{KeyFileError, ResponderError, VerifyError};
pub use responder::Responder;
pub use verifier::Verifier;
