//! Catalog request and response shapes.
//!
//! The response's CBOR encoding is the byte sequence the integrity tag is
//! computed over, so its stability is a wire invariant: definite-length
//! maps, field names as keys, fields in declaration order. Reordering or
//! renaming a field here changes the canonical bytes and breaks
//! verification against existing signers.

use serde::{Deserialize, Serialize};

use crate::errors::{ProtocolError, Result};

/// Catalog query.
///
/// Carries no parameters today; kept as a struct rather than a unit so a
/// future filter field does not need a new opcode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogRequest {}

/// Price of a product: currency code plus whole units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// ISO 4217 currency code (e.g. "EUR").
    pub currency: String,

    /// Whole units of the currency.
    pub units: i64,
}

/// A single product in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Stable product identifier, unique within a supplier.
    pub identifier: String,

    /// Human-readable description.
    pub description: String,

    /// Units currently in stock.
    pub quantity: u32,

    /// Unit price.
    pub price: Price,
}

/// The logical catalog response, before signing.
///
/// Products appear in the supplier's listing order; repeated queries
/// against an unchanged catalog produce byte-identical canonical
/// encodings (and therefore identical tags).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogResponse {
    /// Identifier of the supplier that produced this response.
    pub supplier_id: String,

    /// Products on offer, in listing order.
    pub products: Vec<Product>,
}

impl CatalogResponse {
    /// Serialize to the canonical byte sequence the tag is computed over.
    ///
    /// # Errors
    ///
    /// - `Codec` if CBOR serialization fails
    pub fn to_canonical_bytes(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        ciborium::ser::into_writer(self, &mut bytes)
            .map_err(|e| ProtocolError::Codec { detail: e.to_string() })?;
        Ok(bytes)
    }

    /// Deserialize from canonical bytes.
    ///
    /// Only call this on bytes whose tag has already been verified; the
    /// decode itself provides no authenticity.
    ///
    /// # Errors
    ///
    /// - `Codec` if the bytes are not a valid response encoding
    pub fn from_canonical_bytes(bytes: &[u8]) -> Result<Self> {
        ciborium::de::from_reader(bytes)
            .map_err(|e| ProtocolError::Codec { detail: e.to_string() })
    }
}
