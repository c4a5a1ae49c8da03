//! Property-based tests for the integrity codec.
//!
//! These verify the codec's contract over arbitrary payloads and keys, not
//! just fixed examples: determinism, round-trip acceptance, tamper
//! sensitivity, wrong-key rejection, and cross-talk-free concurrent use.

use countersign_crypto::{IntegrityError, SharedKey, TagScheme};
use proptest::prelude::*;

/// Strategy for key material of every accepted length.
fn arbitrary_key() -> impl Strategy<Value = SharedKey> {
    prop_oneof![
        prop::collection::vec(any::<u8>(), 16),
        prop::collection::vec(any::<u8>(), 24),
        prop::collection::vec(any::<u8>(), 32),
    ]
    .prop_map(|bytes| SharedKey::from_bytes(&bytes).expect("generated length is valid"))
}

fn both_schemes() -> impl Strategy<Value = TagScheme> {
    prop_oneof![Just(TagScheme::CipheredDigest), Just(TagScheme::KeyedHash)]
}

proptest! {
    #[test]
    fn sign_verify_round_trip(
        scheme in both_schemes(),
        key in arbitrary_key(),
        payload in prop::collection::vec(any::<u8>(), 0..2048),
    ) {
        let tag = scheme.sign(&payload, &key).expect("sign should succeed");

        prop_assert_eq!(tag.len(), scheme.tag_size());
        prop_assert!(scheme.verify(&payload, &tag, &key).expect("verify should succeed"));
    }

    #[test]
    fn sign_is_deterministic(
        scheme in both_schemes(),
        key in arbitrary_key(),
        payload in prop::collection::vec(any::<u8>(), 0..1024),
    ) {
        let first = scheme.sign(&payload, &key).expect("sign should succeed");
        let second = scheme.sign(&payload, &key).expect("sign should succeed");

        prop_assert_eq!(first, second);
    }

    #[test]
    fn single_byte_mutation_rejects(
        scheme in both_schemes(),
        key in arbitrary_key(),
        payload in prop::collection::vec(any::<u8>(), 1..1024),
        index in any::<prop::sample::Index>(),
        flip in 1u8..,
    ) {
        let tag = scheme.sign(&payload, &key).expect("sign should succeed");

        let mut tampered = payload.clone();
        let at = index.index(tampered.len());
        tampered[at] ^= flip;

        prop_assert!(!scheme.verify(&tampered, &tag, &key).expect("verify should succeed"));
    }

    #[test]
    fn wrong_key_rejects(
        scheme in both_schemes(),
        key1 in arbitrary_key(),
        key2 in arbitrary_key(),
        payload in prop::collection::vec(any::<u8>(), 0..1024),
    ) {
        prop_assume!(key1 != key2);

        let tag = scheme.sign(&payload, &key1).expect("sign should succeed");

        // Under the wrong key the tag either fails structurally (padding)
        // or mismatches the digest. It must never accept.
        let accepted = matches!(scheme.verify(&payload, &tag, &key2), Ok(true));
        prop_assert!(!accepted);
    }

    #[test]
    fn arbitrary_tag_bytes_never_crash(
        scheme in both_schemes(),
        key in arbitrary_key(),
        payload in prop::collection::vec(any::<u8>(), 0..256),
        garbage in prop::collection::vec(any::<u8>(), 0..128),
    ) {
        // Any byte salad must resolve to a clean reject: Ok(false) or a
        // MalformedTag error, never a panic and never Ok(true).
        match scheme.verify(&payload, &garbage, &key) {
            Ok(accepted) => prop_assert!(!accepted),
            Err(IntegrityError::MalformedTag { .. }) => {},
            Err(other) => return Err(TestCaseError::fail(format!("unexpected error: {other}"))),
        }
    }
}

/// Concurrent verification on distinct triples matches serial execution.
#[test]
fn concurrent_verification_has_no_cross_talk() {
    const WORKERS: usize = 8;

    let triples: Vec<(SharedKey, Vec<u8>, Vec<u8>)> = (0..WORKERS)
        .map(|worker| {
            let key = SharedKey::from_bytes(&[worker as u8 + 1; 16]).expect("valid length");
            let payload = format!("worker {worker} payload").into_bytes();
            let tag = TagScheme::CipheredDigest.sign(&payload, &key).expect("sign should succeed");
            (key, payload, tag)
        })
        .collect();

    std::thread::scope(|scope| {
        let triples = &triples;
        let handles: Vec<_> = triples
            .iter()
            .enumerate()
            .map(|(worker, (key, payload, tag))| {
                scope.spawn(move || {
                    for _ in 0..100 {
                        // Own triple accepts.
                        assert!(
                            TagScheme::CipheredDigest
                                .verify(payload, tag, key)
                                .expect("verify should succeed"),
                            "worker {worker} own triple must accept"
                        );

                        // Neighbour's tag under our key rejects.
                        let neighbour = &triples[(worker + 1) % WORKERS].2;
                        let accepted = matches!(
                            TagScheme::CipheredDigest.verify(payload, neighbour, key),
                            Ok(true)
                        );
                        assert!(!accepted, "worker {worker} must reject neighbour tag");
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().expect("worker thread should not panic");
        }
    });
}
