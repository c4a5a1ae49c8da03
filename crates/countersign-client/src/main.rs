//! Countersign client binary.
//!
//! Runs one request/verify cycle and reports the verdict.
//!
//! # Usage
//!
//! ```bash
//! countersign-client 127.0.0.1:4433 --secret-key secret.key
//! ```
//!
//! Exit codes: 0 on accept, 1 on a rejected signature, 2 on transport or
//! protocol errors.

#![allow(clippy::print_stdout, reason = "CLI verdict output")]

use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use countersign_client::{ClientError, query_catalog};
use countersign_core::{Verifier, keyfile};
use countersign_crypto::TagScheme;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Exit code for a rejected signature.
const EXIT_REJECTED: u8 = 1;

/// Exit code for transport and protocol failures.
const EXIT_TRANSPORT: u8 = 2;

/// Countersign query client
#[derive(Parser, Debug)]
#[command(name = "countersign-client")]
#[command(about = "Query a catalog server and verify the response signature")]
#[command(version)]
struct Args {
    /// Server address (host:port)
    target: String,

    /// Path to the pre-shared key file (raw key bytes)
    #[arg(short, long)]
    secret_key: String,

    /// Tag construction scheme (must match the server's)
    #[arg(long, value_enum, default_value_t = SchemeArg::CipheredDigest)]
    scheme: SchemeArg,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
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
async fn main() -> ExitCode {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry().with(fmt::layer()).with(filter).init();

    let key = match keyfile::load(&args.secret_key) {
        Ok(key) => key,
        Err(e) => {
            println!("ERROR: {e}");
            return ExitCode::from(EXIT_TRANSPORT);
        },
    };

    let verifier = Verifier::new(key, args.scheme.into());

    match query_catalog(&args.target, &verifier).await {
        Ok(verified) => {
            println!("Signature ACCEPTED (signer '{}')", verified.signer_id);
            println!(
                "Supplier {}: {} product(s)",
                verified.response.supplier_id,
                verified.response.products.len()
            );
            for product in &verified.response.products {
                println!(
                    "  {} - {} ({} in stock, {} {})",
                    product.identifier,
                    product.description,
                    product.quantity,
                    product.price.units,
                    product.price.currency
                );
            }
            ExitCode::SUCCESS
        },
        Err(ClientError::Rejected) => {
            println!("Signature REJECTED: response cannot be trusted");
            ExitCode::from(EXIT_REJECTED)
        },
        Err(e) => {
            println!("ERROR: {e}");
            ExitCode::from(EXIT_TRANSPORT)
        },
    }
}
