//! The responder: builds and signs catalog responses.

use countersign_crypto::{SharedKey, TagScheme};
use countersign_proto::{CatalogRequest, CatalogResponse, SignedEnvelope};

use crate::{catalog::Catalog, error::ResponderError};

/// Produces signed envelopes for catalog queries.
///
/// Immutable after construction: the catalog, key, scheme, and signer
/// identity are all fixed, so a `Responder` can be shared across
/// concurrent request tasks behind an `Arc` with no locking.
#[derive(Debug)]
pub struct Responder {
    /// The catalog served to clients.
    catalog: Catalog,

    /// Pre-shared key used to sign responses.
    key: SharedKey,

    /// Tag construction scheme (must match the verifier's).
    scheme: TagScheme,

    /// Configured signer identity carried in every envelope.
    ///
    /// Informational only: not derived from the key and not covered by
    /// the tag.
    signer_id: String,
}

impl Responder {
    /// Create a responder.
    pub fn new(
        catalog: Catalog,
        key: SharedKey,
        scheme: TagScheme,
        signer_id: impl Into<String>,
    ) -> Self {
        Self { catalog, key, scheme, signer_id: signer_id.into() }
    }

    /// The catalog this responder serves.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Answer a catalog query with a signed envelope.
    ///
    /// Serializes the response to canonical bytes, signs those exact
    /// bytes, and packages the envelope. The request currently carries no
    /// parameters; it is accepted for wire-contract symmetry.
    ///
    /// # Errors
    ///
    /// - `Serialize` if the response cannot be encoded
    /// - `Sign` if the integrity codec rejects the key
    ///
    /// On any error no envelope is produced; callers map this to a
    /// protocol-level failure rather than delivering unsigned data.
    pub fn respond(&self, _request: &CatalogRequest) -> Result<SignedEnvelope, ResponderError> {
        let response = CatalogResponse {
            supplier_id: self.catalog.supplier_id().to_string(),
            products: self.catalog.products().to_vec(),
        };

        let payload = response.to_canonical_bytes()?;
        let tag = self.scheme.sign(&payload, &self.key)?;

        Ok(SignedEnvelope { payload, tag, signer_id: self.signer_id.clone() })
    }
}
