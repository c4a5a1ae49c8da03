//! QUIC transport for the client.
//!
//! Thin layer that connects to a server and runs one frame
//! request/response exchange per bidirectional stream. Protocol and
//! verification logic stay in [`countersign_core`].

use std::{net::SocketAddr, sync::Arc, time::Duration};

use bytes::BytesMut;
use countersign_proto::{ALPN_PROTOCOL, Frame, FrameHeader};
use quinn::{ClientConfig, Endpoint};
use thiserror::Error;

/// Transport errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Connection failed.
    #[error("connection failed: {0}")]
    Connection(String),

    /// Stream error.
    #[error("stream error: {0}")]
    Stream(String),

    /// Protocol error.
    #[error("protocol error: {0}")]
    Protocol(String),
}

/// A connected client.
///
/// Each call to [`ClientConnection::request`] opens a fresh bidirectional
/// stream, sends one frame, and reads one reply frame.
pub struct ClientConnection {
    connection: quinn::Connection,
}

/// Connect to a Countersign server via QUIC.
pub async fn connect(server_addr: &str) -> Result<ClientConnection, TransportError> {
    let addr: SocketAddr = server_addr
        .parse()
        .map_err(|e| TransportError::Connection(format!("invalid address: {e}")))?;

    let local: SocketAddr = "0.0.0.0:0"
        .parse()
        .map_err(|e| TransportError::Connection(format!("invalid local bind address: {e}")))?;

    let client_config = development_client_config()?;
    let mut endpoint = Endpoint::client(local)
        .map_err(|e| TransportError::Connection(format!("endpoint creation failed: {e}")))?;
    endpoint.set_default_client_config(client_config);

    let connection = endpoint
        .connect(addr, "localhost")
        .map_err(|e| TransportError::Connection(format!("connect failed: {e}")))?
        .await
        .map_err(|e| TransportError::Connection(format!("connection failed: {e}")))?;

    tracing::debug!("Connected to {}", addr);

    Ok(ClientConnection { connection })
}

impl ClientConnection {
    /// Send one frame and wait for the reply frame.
    pub async fn request(&self, frame: &Frame) -> Result<Frame, TransportError> {
        let (mut send, mut recv) = self
            .connection
            .open_bi()
            .await
            .map_err(|e| TransportError::Stream(format!("open_bi failed: {e}")))?;

        let mut buf = Vec::new();
        frame
            .encode(&mut buf)
            .map_err(|e| TransportError::Protocol(format!("encode failed: {e}")))?;

        send.write_all(&buf)
            .await
            .map_err(|e| TransportError::Stream(format!("write failed: {e}")))?;
        send.finish().map_err(|e| TransportError::Stream(format!("finish failed: {e}")))?;

        read_frame(&mut recv).await
    }

    /// Close the connection.
    pub fn close(&self) {
        self.connection.close(0u32.into(), b"done");
    }
}

/// Read one frame: header first, then exactly the claimed payload bytes.
async fn read_frame(recv: &mut quinn::RecvStream) -> Result<Frame, TransportError> {
    let mut buf = BytesMut::with_capacity(4096);

    buf.resize(FrameHeader::SIZE, 0);
    recv.read_exact(&mut buf[..FrameHeader::SIZE])
        .await
        .map_err(|e| TransportError::Stream(format!("header read failed: {e}")))?;

    let payload_size = {
        let header = FrameHeader::from_bytes(&buf[..FrameHeader::SIZE])
            .map_err(|e| TransportError::Protocol(format!("invalid header: {e}")))?;
        header.payload_size() as usize
    };

    if payload_size > 0 {
        buf.resize(FrameHeader::SIZE + payload_size, 0);
        recv.read_exact(&mut buf[FrameHeader::SIZE..])
            .await
            .map_err(|e| TransportError::Stream(format!("payload read failed: {e}")))?;
    }

    Frame::decode(&buf).map_err(|e| TransportError::Protocol(format!("frame decode failed: {e}")))
}

/// Create a client config that accepts any server certificate.
///
/// Development only: the channel gives no server authentication, which is
/// exactly the setting the application-level integrity tag is for.
/// Production deployments should verify certificates properly.
fn development_client_config() -> Result<ClientConfig, TransportError> {
    let mut crypto = rustls::ClientConfig::builder()
        .dangerous()
        .with_custom_certificate_verifier(Arc::new(AcceptAnyCertVerifier))
        .with_no_client_auth();

    // Must match the server's ALPN protocol.
    crypto.alpn_protocols = vec![ALPN_PROTOCOL.to_vec()];

    let quic_crypto = quinn::crypto::rustls::QuicClientConfig::try_from(crypto)
        .map_err(|e| TransportError::Connection(format!("TLS config error: {e}")))?;
    let mut config = ClientConfig::new(Arc::new(quic_crypto));

    let mut transport = quinn::TransportConfig::default();
    let idle = Duration::from_secs(30)
        .try_into()
        .map_err(|e| TransportError::Connection(format!("idle timeout error: {e}")))?;
    transport.max_idle_timeout(Some(idle));
    config.transport_config(Arc::new(transport));

    Ok(config)
}

/// Certificate verifier that accepts any certificate (development only).
#[derive(Debug)]
struct AcceptAnyCertVerifier;

impl rustls::client::danger::ServerCertVerifier for AcceptAnyCertVerifier {
    fn verify_server_cert(
        &self,
        _end_entity: &rustls::pki_types::CertificateDer<'_>,
        _intermediates: &[rustls::pki_types::CertificateDer<'_>],
        _server_name: &rustls::pki_types::ServerName<'_>,
        _ocsp_response: &[u8],
        _now: rustls::pki_types::UnixTime,
    ) -> Result<rustls::client::danger::ServerCertVerified, rustls::Error> {
        Ok(rustls::client::danger::ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        _message: &[u8],
        _cert: &rustls::pki_types::CertificateDer<'_>,
        _dss: &rustls::DigitallySignedStruct,
    ) -> Result<rustls::client::danger::HandshakeSignatureValid, rustls::Error> {
        Ok(rustls::client::danger::HandshakeSignatureValid::assertion())
    }

    fn verify_tls13_signature(
        &self,
        _message: &[u8],
        _cert: &rustls::pki_types::CertificateDer<'_>,
        _dss: &rustls::DigitallySignedStruct,
    ) -> Result<rustls::client::danger::HandshakeSignatureValid, rustls::Error> {
        Ok(rustls::client::danger::HandshakeSignatureValid::assertion())
    }

    fn supported_verify_schemes(&self) -> Vec<rustls::SignatureScheme> {
        vec![
            rustls::SignatureScheme::RSA_PKCS1_SHA256,
            rustls::SignatureScheme::RSA_PKCS1_SHA384,
            rustls::SignatureScheme::RSA_PKCS1_SHA512,
            rustls::SignatureScheme::ECDSA_NISTP256_SHA256,
            rustls::SignatureScheme::ECDSA_NISTP384_SHA384,
            rustls::SignatureScheme::ECDSA_NISTP521_SHA512,
            rustls::SignatureScheme::RSA_PSS_SHA256,
            rustls::SignatureScheme::RSA_PSS_SHA384,
            rustls::SignatureScheme::RSA_PSS_SHA512,
            rustls::SignatureScheme::ED25519,
        ]
    }
}
