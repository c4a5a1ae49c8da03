//! Countersign production server.
//!
//! Serves the product catalog over QUIC, attaching an integrity tag to
//! every response. The signing logic lives in [`countersign_core`]; this
//! crate is the I/O shell around it: Quinn for transport, Tokio for the
//! runtime, one task per connection and one per request stream.
//!
//! # Request flow
//!
//! A client opens a bidirectional stream and sends one request frame. The
//! server decodes it, asks the [`Responder`] for a signed envelope, and
//! writes the reply frame (with the client's request id echoed) on the
//! same stream. A request that cannot be answered gets an Error frame;
//! an unsigned or partially built response is never sent.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod error;
mod transport;

use std::sync::Arc;

use bytes::BytesMut;
use countersign_core::Responder;
use countersign_proto::{ErrorPayload, Frame, FrameHeader, Payload};
pub use error::ServerError;
pub use transport::{QuinnConnection, QuinnTransport};

/// Server configuration for the production runtime.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to (e.g., "0.0.0.0:4433").
    pub bind_address: String,

    /// Path to a TLS certificate (PEM format). Self-signed when absent.
    pub cert_path: Option<String>,

    /// Path to the TLS private key (PEM format).
    pub key_path: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { bind_address: "0.0.0.0:4433".to_string(), cert_path: None, key_path: None }
    }
}

/// Production Countersign server.
///
/// Wraps a [`Responder`] with Quinn QUIC transport. The responder is
/// immutable and shared across all connection tasks; no locking is
/// involved anywhere on the request path.
pub struct Server {
    /// Signs catalog responses.
    responder: Arc<Responder>,

    /// QUIC endpoint.
    transport: QuinnTransport,
}

impl Server {
    /// Create and bind a new server.
    pub fn bind(config: ServerConfig, responder: Responder) -> Result<Self, ServerError> {
        let transport =
            QuinnTransport::bind(&config.bind_address, config.cert_path, config.key_path)?;

        Ok(Self { responder: Arc::new(responder), transport })
    }

    /// Local address the server is bound to.
    pub fn local_addr(&self) -> Result<std::net::SocketAddr, ServerError> {
        self.transport.local_addr()
    }

    /// Run the server, accepting connections and answering queries.
    ///
    /// Runs until the endpoint is closed or an accept error occurs.
    pub async fn run(self) -> Result<(), ServerError> {
        tracing::info!("Server listening on {}", self.transport.local_addr()?);

        loop {
            match self.transport.accept().await {
                Ok(conn) => {
                    let responder = Arc::clone(&self.responder);

                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(conn, responder).await {
                            tracing::error!("Connection error: {}", e);
                        }
                    });
                },
                Err(e) => {
                    tracing::error!("Accept error: {}", e);
                },
            }
        }
    }
}

/// Handle a single QUIC connection.
///
/// Each bidirectional stream the client opens is one request/response
/// cycle, handled on its own task.
async fn handle_connection(
    conn: QuinnConnection,
    responder: Arc<Responder>,
) -> Result<(), ServerError> {
    let session_id = {
        let mut buf = [0u8; 8];
        getrandom::fill(&mut buf)
            .map_err(|e| ServerError::Internal(format!("randomness source failed: {e}")))?;
        u64::from_le_bytes(buf)
    };

    tracing::debug!("New connection {} from {}", session_id, conn.remote_addr());

    loop {
        match conn.accept_bi().await {
            Ok((send, recv)) => {
                let responder = Arc::clone(&responder);

                tokio::spawn(async move {
                    if let Err(e) = handle_stream(session_id, send, recv, responder).await {
                        tracing::debug!("Stream error on session {}: {}", session_id, e);
                    }
                });
            },
            Err(e) => {
                tracing::debug!("Connection {} closed: {}", session_id, e);
                break;
            },
        }
    }

    Ok(())
}

/// Handle one request/response stream.
async fn handle_stream(
    session_id: u64,
    mut send: quinn::SendStream,
    mut recv: quinn::RecvStream,
    responder: Arc<Responder>,
) -> Result<(), ServerError> {
    let frame = read_frame(&mut recv).await?;
    let request_id = frame.header.request_id();

    tracing::debug!(
        "Session {} request {}: opcode {:#06x}, {} payload bytes",
        session_id,
        request_id,
        frame.header.opcode(),
        frame.payload.len()
    );

    let reply = match Payload::from_frame(&frame) {
        Ok(Payload::CatalogRequest(request)) => match responder.respond(&request) {
            Ok(envelope) => {
                tracing::debug!(
                    "Session {} request {}: signed {} payload bytes, tag {}",
                    session_id,
                    request_id,
                    envelope.payload.len(),
                    hex::encode(&envelope.tag)
                );
                Payload::CatalogResponse(envelope)
            },
            Err(e) => {
                // Never deliver an unsigned response: a signing failure
                // becomes a protocol-level error for this request only.
                tracing::error!("Session {} request {}: signing failed: {}", session_id, request_id, e);
                Payload::Error(ErrorPayload {
                    code: ErrorPayload::CODE_SIGNING_FAILED,
                    message: "failed to sign response".to_string(),
                })
            },
        },
        Ok(other) => {
            tracing::warn!(
                "Session {} request {}: unexpected payload {:?}",
                session_id,
                request_id,
                other.opcode()
            );
            Payload::Error(ErrorPayload {
                code: ErrorPayload::CODE_BAD_REQUEST,
                message: "expected a catalog request".to_string(),
            })
        },
        Err(e) => {
            tracing::warn!("Session {} request {}: undecodable request: {}", session_id, request_id, e);
            Payload::Error(ErrorPayload {
                code: ErrorPayload::CODE_BAD_REQUEST,
                message: "undecodable request".to_string(),
            })
        },
    };

    let reply_frame =
        reply.into_frame(request_id).map_err(|e| ServerError::Protocol(e.to_string()))?;
    write_frame(&mut send, &reply_frame).await?;

    Ok(())
}

/// Read one frame from a stream: header first, then exactly the payload
/// bytes the header claims.
async fn read_frame(recv: &mut quinn::RecvStream) -> Result<Frame, ServerError> {
    let mut buf = BytesMut::with_capacity(4096);

    buf.resize(FrameHeader::SIZE, 0);
    recv.read_exact(&mut buf[..FrameHeader::SIZE])
        .await
        .map_err(|e| ServerError::Transport(format!("header read failed: {e}")))?;

    let payload_size = {
        let header = FrameHeader::from_bytes(&buf[..FrameHeader::SIZE])
            .map_err(|e| ServerError::Protocol(format!("invalid header: {e}")))?;
        header.payload_size() as usize
    };

    if payload_size > 0 {
        buf.resize(FrameHeader::SIZE + payload_size, 0);
        recv.read_exact(&mut buf[FrameHeader::SIZE..])
            .await
            .map_err(|e| ServerError::Transport(format!("payload read failed: {e}")))?;
    }

    Frame::decode(&buf).map_err(|e| ServerError::Protocol(format!("frame decode failed: {e}")))
}

/// Write a frame to a stream and finish the sending side.
async fn write_frame(send: &mut quinn::SendStream, frame: &Frame) -> Result<(), ServerError> {
    let mut buf = Vec::new();
    frame.encode(&mut buf).map_err(|e| ServerError::Protocol(e.to_string()))?;

    send.write_all(&buf)
        .await
        .map_err(|e| ServerError::Transport(format!("write failed: {e}")))?;

    send.finish().map_err(|e| ServerError::Transport(format!("finish failed: {e}")))?;

    Ok(())
}
