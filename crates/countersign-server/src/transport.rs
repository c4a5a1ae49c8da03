//! Quinn-based QUIC transport implementation.
//!
//! Production QUIC transport using the Quinn library: encrypted,
//! multiplexed streams over UDP with TLS 1.3. Supports both production
//! TLS certificates (via PEM files) and self-signed certificates for
//! development.
//!
//! # Security
//!
//! The transport enforces TLS 1.3 via `rustls` with ALPN set to
//! "countersign". Channel encryption is independent of the application's
//! integrity tag: TLS protects the bytes in flight, the tag proves the
//! catalog server (and not just the TLS endpoint) produced the response.
//! Self-signed certificates are only suitable for local development.

use std::{net::SocketAddr, sync::Arc};

use countersign_proto::ALPN_PROTOCOL;
use quinn::{Endpoint, RecvStream, SendStream, ServerConfig};

use crate::error::ServerError;

/// QUIC transport using Quinn.
///
/// Provides a QUIC endpoint that accepts incoming connections, configured
/// with TLS 1.3 and ALPN protocol "countersign".
pub struct QuinnTransport {
    /// Quinn endpoint.
    endpoint: Endpoint,
}

impl QuinnTransport {
    /// Create and bind a new QUIC transport.
    ///
    /// If `cert_path` and `key_path` are provided they are used for TLS;
    /// otherwise a self-signed certificate is generated for development.
    pub fn bind(
        address: &str,
        cert_path: Option<String>,
        key_path: Option<String>,
    ) -> Result<Self, ServerError> {
        let addr: SocketAddr = address
            .parse()
            .map_err(|e| ServerError::Config(format!("invalid bind address '{address}': {e}")))?;

        let server_config = match (cert_path, key_path) {
            (Some(cert), Some(key)) => load_tls_config(&cert, &key)?,
            _ => generate_self_signed_config()?,
        };

        let endpoint = Endpoint::server(server_config, addr)
            .map_err(|e| ServerError::Transport(format!("failed to create endpoint: {e}")))?;

        tracing::info!("QUIC transport bound to {}", addr);

        Ok(Self { endpoint })
    }

    /// Accept a new QUIC connection.
    ///
    /// Blocks until a connection is available.
    pub async fn accept(&self) -> Result<QuinnConnection, ServerError> {
        let incoming = self
            .endpoint
            .accept()
            .await
            .ok_or_else(|| ServerError::Transport("endpoint closed".to_string()))?;

        let conn = incoming
            .await
            .map_err(|e| ServerError::Transport(format!("connection failed: {e}")))?;

        Ok(QuinnConnection { connection: conn })
    }

    /// Local address the transport is bound to.
    pub fn local_addr(&self) -> Result<SocketAddr, ServerError> {
        self.endpoint
            .local_addr()
            .map_err(|e| ServerError::Transport(format!("failed to get local address: {e}")))
    }
}

/// A QUIC connection wrapper.
///
/// Clones are cheap and share the same underlying connection, so the
/// connection can be handed to multiple tasks for parallel stream
/// handling.
#[derive(Clone)]
pub struct QuinnConnection {
    connection: quinn::Connection,
}

impl QuinnConnection {
    /// Accept a bidirectional stream.
    pub async fn accept_bi(&self) -> Result<(SendStream, RecvStream), ServerError> {
        self.connection
            .accept_bi()
            .await
            .map_err(|e| ServerError::Transport(format!("accept_bi failed: {e}")))
    }

    /// Remote peer address.
    pub fn remote_addr(&self) -> SocketAddr {
        self.connection.remote_address()
    }

    /// Close the connection with an error code and reason.
    pub fn close(&self, error_code: quinn::VarInt, reason: &[u8]) {
        self.connection.close(error_code, reason);
    }
}

/// Load TLS configuration from certificate and key files.
fn load_tls_config(cert_path: &str, key_path: &str) -> Result<ServerConfig, ServerError> {
    use std::fs;

    let cert_pem = fs::read(cert_path)
        .map_err(|e| ServerError::Config(format!("failed to read cert '{cert_path}': {e}")))?;

    let key_pem = fs::read(key_path)
        .map_err(|e| ServerError::Config(format!("failed to read key '{key_path}': {e}")))?;

    let certs = rustls_pemfile::certs(&mut &cert_pem[..])
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| ServerError::Config(format!("failed to parse certificates: {e}")))?;

    let key = rustls_pemfile::private_key(&mut &key_pem[..])
        .map_err(|e| ServerError::Config(format!("failed to parse private key: {e}")))?
        .ok_or_else(|| ServerError::Config("no private key found".to_string()))?;

    let mut tls_config = rustls::ServerConfig::builder()
        .with_no_client_auth()
        .with_single_cert(certs, key)
        .map_err(|e| ServerError::Config(format!("invalid TLS config: {e}")))?;

    tls_config.alpn_protocols = vec![ALPN_PROTOCOL.to_vec()];

    let server_config = ServerConfig::with_crypto(Arc::new(
        quinn::crypto::rustls::QuicServerConfig::try_from(tls_config)
            .map_err(|e| ServerError::Config(format!("QUIC config error: {e}")))?,
    ));

    Ok(server_config)
}

/// Generate a self-signed certificate for development.
fn generate_self_signed_config() -> Result<ServerConfig, ServerError> {
    let cert = rcgen::generate_simple_self_signed(vec!["localhost".to_string()])
        .map_err(|e| ServerError::Config(format!("failed to generate self-signed cert: {e}")))?;

    let cert_der = cert.cert.der().clone();
    let key_der = cert.key_pair.serialize_der();

    let cert_chain = vec![cert_der];
    let key = rustls::pki_types::PrivatePkcs8KeyDer::from(key_der);

    let mut tls_config = rustls::ServerConfig::builder()
        .with_no_client_auth()
        .with_single_cert(cert_chain, key.into())
        .map_err(|e| ServerError::Config(format!("invalid TLS config: {e}")))?;

    tls_config.alpn_protocols = vec![ALPN_PROTOCOL.to_vec()];

    let server_config = ServerConfig::with_crypto(Arc::new(
        quinn::crypto::rustls::QuicServerConfig::try_from(tls_config)
            .map_err(|e| ServerError::Config(format!("QUIC config error: {e}")))?,
    ));

    tracing::warn!("Using self-signed certificate - not for production use!");

    Ok(server_config)
}
