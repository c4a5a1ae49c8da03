//! Loopback integration tests: real server, real QUIC, one full
//! request/verify cycle per test.

use countersign_client::{ClientError, query_catalog};
use countersign_core::{Catalog, Responder, Verifier};
use countersign_crypto::{SharedKey, TagScheme};
use countersign_server::{Server, ServerConfig};

fn key(fill: u8) -> SharedKey {
    SharedKey::from_bytes(&[fill; 16]).unwrap()
}

/// Start a server on an ephemeral loopback port, returning its address.
fn spawn_server(scheme: TagScheme, key_fill: u8) -> String {
    let responder = Responder::new(Catalog::demo(), key(key_fill), scheme, "S1");
    let config = ServerConfig {
        bind_address: "127.0.0.1:0".to_string(),
        cert_path: None,
        key_path: None,
    };

    let server = Server::bind(config, responder).unwrap();
    let addr = server.local_addr().unwrap();

    tokio::spawn(server.run());

    addr.to_string()
}

#[tokio::test]
async fn loopback_query_accepts() {
    let addr = spawn_server(TagScheme::CipheredDigest, 0x11);
    let verifier = Verifier::new(key(0x11), TagScheme::CipheredDigest);

    let verified = query_catalog(&addr, &verifier).await.unwrap();

    assert_eq!(verified.signer_id, "S1");
    assert_eq!(verified.response.supplier_id, "S1");
    assert_eq!(verified.response.products.len(), 3);
}

#[tokio::test]
async fn wrong_client_key_rejects() {
    let addr = spawn_server(TagScheme::CipheredDigest, 0x11);
    let verifier = Verifier::new(key(0x22), TagScheme::CipheredDigest);

    let result = query_catalog(&addr, &verifier).await;

    assert!(matches!(result, Err(ClientError::Rejected)));
}

#[tokio::test]
async fn scheme_mismatch_rejects() {
    let addr = spawn_server(TagScheme::KeyedHash, 0x11);
    let verifier = Verifier::new(key(0x11), TagScheme::CipheredDigest);

    let result = query_catalog(&addr, &verifier).await;

    assert!(matches!(result, Err(ClientError::Rejected)));
}

#[tokio::test]
async fn matching_keyed_hash_scheme_accepts() {
    let addr = spawn_server(TagScheme::KeyedHash, 0x33);
    let verifier = Verifier::new(key(0x33), TagScheme::KeyedHash);

    assert!(query_catalog(&addr, &verifier).await.is_ok());
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    // Port 1 on loopback: nothing is listening.
    let verifier = Verifier::new(key(0x11), TagScheme::CipheredDigest);

    let result = query_catalog("127.0.0.1:1", &verifier).await;

    assert!(matches!(result, Err(ClientError::Transport(_))));
}

#[tokio::test]
async fn repeated_queries_return_identical_envelopes() {
    // The catalog does not change between queries and the tag scheme is
    // deterministic, so two cycles must verify to the same response.
    let addr = spawn_server(TagScheme::CipheredDigest, 0x44);
    let verifier = Verifier::new(key(0x44), TagScheme::CipheredDigest);

    let first = query_catalog(&addr, &verifier).await.unwrap();
    let second = query_catalog(&addr, &verifier).await.unwrap();

    assert_eq!(first, second);
}
