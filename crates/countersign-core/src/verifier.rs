//! The verifier: accepts or rejects received envelopes.

use countersign_crypto::{SharedKey, TagScheme};
use countersign_proto::{CatalogResponse, SignedEnvelope};

use crate::error::VerifyError;

/// Checks received envelopes against the shared key.
///
/// Verification runs over `envelope.payload` exactly as received - the
/// bytes are never re-serialized, because a structurally equivalent but
/// byte-different re-encoding would falsely fail.
///
/// # Security
///
/// Fail-closed: the decoded response is released only when the codec
/// returns an explicit accept. A digest mismatch, malformed tag bytes,
/// and any codec error all collapse into
/// [`VerifyError::SignatureInvalid`] - deliberately indistinguishable,
/// since a malformed tag and a forged one mean the same thing to the
/// caller.
///
/// The envelope's `signer_id` is not consulted: this protocol has a
/// single shared key. Extending to multiple signers requires an explicit
/// identity-to-key lookup before verification.
#[derive(Debug)]
pub struct Verifier {
    /// Pre-shared key used to check tags.
    key: SharedKey,

    /// Tag construction scheme (must match the responder's).
    scheme: TagScheme,
}

impl Verifier {
    /// Create a verifier.
    pub fn new(key: SharedKey, scheme: TagScheme) -> Self {
        Self { key, scheme }
    }

    /// Verify an envelope and release the decoded response on acceptance.
    ///
    /// # Errors
    ///
    /// - `SignatureInvalid` if the tag does not verify, for any reason
    /// - `Decode` if the authenticated payload is not a valid response
    ///   encoding
    pub fn verify(&self, envelope: &SignedEnvelope) -> Result<CatalogResponse, VerifyError> {
        match self.scheme.verify(&envelope.payload, &envelope.tag, &self.key) {
            Ok(true) => {},
            Ok(false) | Err(_) => return Err(VerifyError::SignatureInvalid),
        }

        CatalogResponse::from_canonical_bytes(&envelope.payload).map_err(VerifyError::Decode)
    }
}

#[cfg(test)]
mod tests {
    use countersign_proto::CatalogRequest;

    use super::*;
    use crate::{Catalog, Responder};

    fn test_key() -> SharedKey {
        SharedKey::from_bytes(&hex::decode("000102030405060708090a0b0c0d0e0f").unwrap()).unwrap()
    }

    fn signed_envelope() -> SignedEnvelope {
        Responder::new(Catalog::demo(), test_key(), TagScheme::CipheredDigest, "S1")
            .respond(&CatalogRequest {})
            .unwrap()
    }

    #[test]
    fn intact_envelope_is_accepted() {
        let verifier = Verifier::new(test_key(), TagScheme::CipheredDigest);

        let response = verifier.verify(&signed_envelope()).unwrap();
        assert_eq!(response.supplier_id, "S1");
    }

    #[test]
    fn tampered_payload_is_rejected() {
        let verifier = Verifier::new(test_key(), TagScheme::CipheredDigest);

        let mut envelope = signed_envelope();
        // Flip one byte inside the supplier identifier.
        envelope.payload[14] ^= 0x01;

        let result = verifier.verify(&envelope);
        assert!(matches!(result, Err(VerifyError::SignatureInvalid)));
    }

    #[test]
    fn tampered_tag_is_rejected() {
        let verifier = Verifier::new(test_key(), TagScheme::CipheredDigest);

        let mut envelope = signed_envelope();
        envelope.tag[0] ^= 0xFF;

        assert!(matches!(verifier.verify(&envelope), Err(VerifyError::SignatureInvalid)));
    }

    #[test]
    fn truncated_tag_is_rejected_not_propagated() {
        let verifier = Verifier::new(test_key(), TagScheme::CipheredDigest);

        let mut envelope = signed_envelope();
        envelope.tag.truncate(13);

        // Malformed tag bytes surface as the same rejection as a forged
        // tag; the codec-level distinction stops here.
        assert!(matches!(verifier.verify(&envelope), Err(VerifyError::SignatureInvalid)));
    }

    #[test]
    fn wrong_key_is_rejected() {
        let other = SharedKey::from_bytes(&[0x42; 16]).unwrap();
        let verifier = Verifier::new(other, TagScheme::CipheredDigest);

        assert!(matches!(verifier.verify(&signed_envelope()), Err(VerifyError::SignatureInvalid)));
    }

    #[test]
    fn signer_id_does_not_affect_the_verdict() {
        let verifier = Verifier::new(test_key(), TagScheme::CipheredDigest);

        let mut envelope = signed_envelope();
        envelope.signer_id = "someone-else".to_string();

        // signer_id is informational; the tag still verifies.
        assert!(verifier.verify(&envelope).is_ok());
    }

    #[test]
    fn scheme_mismatch_is_rejected() {
        let verifier = Verifier::new(test_key(), TagScheme::KeyedHash);

        assert!(matches!(verifier.verify(&signed_envelope()), Err(VerifyError::SignatureInvalid)));
    }

    #[test]
    fn authentic_but_undecodable_payload_is_a_decode_error() {
        let key = test_key();
        let payload = vec![0xFF, 0x00, 0x13];
        let tag = TagScheme::CipheredDigest.sign(&payload, &key).unwrap();
        let envelope = SignedEnvelope { payload, tag, signer_id: "S1".to_string() };

        let verifier = Verifier::new(key, TagScheme::CipheredDigest);
        assert!(matches!(verifier.verify(&envelope), Err(VerifyError::Decode(_))));
    }
}
