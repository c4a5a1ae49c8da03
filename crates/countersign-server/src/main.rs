//! Countersign server binary.
//!
//! # Usage
//!
//! ```bash
//! # Start with a self-signed certificate (development)
//! countersign-server --bind 0.0.0.0:4433 --secret-key secret.key
//!
//! # Start with a TLS certificate (production)
//! countersign-server --bind 0.0.0.0:4433 --secret-key secret.key \
//!     --cert cert.pem --key key.pem
//! ```

use clap::{Parser, ValueEnum};
use countersign_core::{Catalog, Responder, keyfile};
use countersign_crypto::TagScheme;
use countersign_server::{Server, ServerConfig};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Countersign catalog server
#[derive(Parser, Debug)]
#[command(name = "countersign-server")]
#[command(about = "Catalog server with integrity-tagged responses")]
#[command(version)]
struct Args {
    /// Address to bind to
    #[arg(short, long, default_value = "0.0.0.0:4433")]
    bind: String,

    /// Path to the pre-shared key file (raw key bytes)
    #[arg(short, long)]
    secret_key: String,

    /// Signer identity carried in every envelope
    #[arg(long, default_value = "S1")]
    signer_id: String,

    /// Tag construction scheme (must match the clients')
    #[arg(long, value_enum, default_value_t = SchemeArg::CipheredDigest)]
    scheme: SchemeArg,

    /// Path to TLS certificate (PEM format)
    #[arg(long)]
    cert: Option<String>,

    /// Path to TLS private key (PEM format)
    #[arg(long)]
    key: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

/// CLI spelling of the tag scheme.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum SchemeArg {
    /// AES-ECB over a SHA-256 digest (deployed wire format)
    CipheredDigest,
    /// HMAC-SHA256 (hardened, not wire compatible)
    KeyedHash,
}

impl From<SchemeArg> for TagScheme {
    fn from(arg: SchemeArg) -> Self {
        match arg {
            SchemeArg::CipheredDigest => Self::CipheredDigest,
            SchemeArg::KeyedHash => Self::KeyedHash,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry().with(fmt::layer()).with(filter).init();

    tracing::info!("Countersign server starting");
    tracing::info!("Binding to {}", args.bind);

    if args.cert.is_none() || args.key.is_none() {
        tracing::warn!("No TLS certificate provided - using self-signed certificate");
        tracing::warn!("This is NOT suitable for production use!");
    }

    // Key problems are startup-fatal: the server must never come up in a
    // state where it would answer queries unsigned.
    let key = keyfile::load(&args.secret_key)?;
    tracing::info!("Loaded {}-byte shared key from {}", key.len(), args.secret_key);

    let responder = Responder::new(Catalog::demo(), key, args.scheme.into(), args.signer_id);

    let config =
        ServerConfig { bind_address: args.bind, cert_path: args.cert, key_path: args.key };

    let server = Server::bind(config, responder)?;

    tracing::info!("Server listening on {}", server.local_addr()?);

    server.run().await?;

    Ok(())
}
