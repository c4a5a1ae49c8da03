//! Countersign query client.
//!
//! Runs one request/verify cycle against a catalog server: connect, send
//! a catalog request, receive the signed envelope, verify the tag over
//! the received bytes, and release the response only on acceptance.
//!
//! Verification failure and transport failure are kept strictly apart: a
//! rejected signature means the bytes arrived but cannot be trusted,
//! while a transport error means no verdict was reached at all.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod transport;

use countersign_core::{Verifier, VerifyError};
use countersign_proto::{CatalogRequest, CatalogResponse, Payload};
use thiserror::Error;
pub use transport::{ClientConnection, TransportError, connect};

/// Errors from a query/verify cycle.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport-level failure; no verdict was reached.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The server or reply violated the protocol.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// The server reported a request-level failure.
    #[error("server error {code}: {message}")]
    Server {
        /// Error code from the server.
        code: u16,
        /// Server-provided message.
        message: String,
    },

    /// The envelope arrived intact but its signature did not verify.
    ///
    /// The expected "attack detected" outcome: the response bytes must
    /// not be trusted.
    #[error("signature invalid: response rejected")]
    Rejected,
}

/// A verified catalog response together with who claimed to sign it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedResponse {
    /// The decoded response, released only after acceptance.
    pub response: CatalogResponse,

    /// Signer identity from the envelope (informational only).
    pub signer_id: String,
}

/// Run one query/verify cycle against `server_addr`.
///
/// # Errors
///
/// - `Transport` for connection or stream failures
/// - `Protocol` for malformed or mismatched replies
/// - `Server` if the server answered with an error frame
/// - `Rejected` if the envelope's signature did not verify
pub async fn query_catalog(
    server_addr: &str,
    verifier: &Verifier,
) -> Result<VerifiedResponse, ClientError> {
    let connection = transport::connect(server_addr).await?;

    let request_id = {
        let mut buf = [0u8; 4];
        getrandom::fill(&mut buf)
            .map_err(|e| ClientError::Protocol(format!("randomness source failed: {e}")))?;
        u32::from_le_bytes(buf)
    };

    let frame = Payload::CatalogRequest(CatalogRequest {})
        .into_frame(request_id)
        .map_err(|e| ClientError::Protocol(e.to_string()))?;

    tracing::debug!("Sending request {}", request_id);
    let reply = connection.request(&frame).await?;
    connection.close();

    if reply.header.request_id() != request_id {
        return Err(ClientError::Protocol(format!(
            "request id mismatch: sent {}, got {}",
            request_id,
            reply.header.request_id()
        )));
    }

    let envelope = match Payload::from_frame(&reply)
        .map_err(|e| ClientError::Protocol(e.to_string()))?
    {
        Payload::CatalogResponse(envelope) => envelope,
        Payload::Error(error) => {
            return Err(ClientError::Server { code: error.code, message: error.message });
        },
        Payload::CatalogRequest(_) => {
            return Err(ClientError::Protocol("server echoed a request".to_string()));
        },
    };

    tracing::debug!(
        "Received envelope: {} payload bytes, tag {}, signer '{}'",
        envelope.payload.len(),
        hex::encode(&envelope.tag),
        envelope.signer_id
    );

    let signer_id = envelope.signer_id.clone();
    let response = verifier.verify(&envelope).map_err(|e| match e {
        VerifyError::SignatureInvalid => ClientError::Rejected,
        VerifyError::Decode(inner) => {
            ClientError::Protocol(format!("authentic payload failed to decode: {inner}"))
        },
    })?;

    Ok(VerifiedResponse { response, signer_id })
}
