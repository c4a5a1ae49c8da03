//! CBOR-encoded protocol messages.
//!
//! Frame headers are raw binary; payloads use CBOR for type safety and
//! forward compatibility. Each payload variant maps to exactly one opcode,
//! and only the inner struct is serialized - the frame header's opcode
//! already identifies the payload type, so no variant tag travels on the
//! wire. This also means an attacker cannot send a mismatched
//! opcode/payload pair: the opcode alone decides how bytes are decoded.

pub mod catalog;
pub mod envelope;

use serde::{Deserialize, Serialize};

use crate::{
    Frame, FrameHeader, Opcode,
    errors::{ProtocolError, Result},
};

/// All possible frame payloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// Client asks for the catalog.
    CatalogRequest(catalog::CatalogRequest),

    /// Server answers with a signed envelope.
    CatalogResponse(envelope::SignedEnvelope),

    /// Server reports a request-level failure.
    Error(ErrorPayload),
}

/// Error payload for error frames.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPayload {
    /// Error code identifying the type of error.
    pub code: u16,

    /// Human-readable error message.
    pub message: String,
}

impl ErrorPayload {
    /// The request could not be decoded.
    pub const CODE_BAD_REQUEST: u16 = 1;

    /// The server failed to produce a signed response.
    pub const CODE_SIGNING_FAILED: u16 = 2;
}

impl Payload {
    /// Opcode corresponding to this payload variant.
    #[must_use]
    pub fn opcode(&self) -> Opcode {
        match self {
            Self::CatalogRequest(_) => Opcode::CatalogRequest,
            Self::CatalogResponse(_) => Opcode::CatalogResponse,
            Self::Error(_) => Opcode::Error,
        }
    }

    /// Encode the payload body as CBOR (no variant tag).
    ///
    /// # Errors
    ///
    /// - `Codec` if serialization fails
    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        let result = match self {
            Self::CatalogRequest(inner) => ciborium::ser::into_writer(inner, &mut bytes),
            Self::CatalogResponse(inner) => ciborium::ser::into_writer(inner, &mut bytes),
            Self::Error(inner) => ciborium::ser::into_writer(inner, &mut bytes),
        };
        result.map_err(|e| ProtocolError::Codec { detail: e.to_string() })?;
        Ok(bytes)
    }

    /// Decode a payload body, with the type selected by `opcode`.
    ///
    /// # Errors
    ///
    /// - `Codec` if the bytes do not decode as the opcode's payload type
    pub fn decode(opcode: Opcode, bytes: &[u8]) -> Result<Self> {
        match opcode {
            Opcode::CatalogRequest => Ok(Self::CatalogRequest(
                ciborium::de::from_reader(bytes)
                    .map_err(|e| ProtocolError::Codec { detail: e.to_string() })?,
            )),
            Opcode::CatalogResponse => Ok(Self::CatalogResponse(
                ciborium::de::from_reader(bytes)
                    .map_err(|e| ProtocolError::Codec { detail: e.to_string() })?,
            )),
            Opcode::Error => Ok(Self::Error(
                ciborium::de::from_reader(bytes)
                    .map_err(|e| ProtocolError::Codec { detail: e.to_string() })?,
            )),
        }
    }

    /// Package this payload into a frame carrying `request_id`.
    ///
    /// # Errors
    ///
    /// - `Codec` if serialization fails
    pub fn into_frame(self, request_id: u32) -> Result<Frame> {
        let body = self.encode()?;
        let mut header = FrameHeader::new(self.opcode());
        header.set_request_id(request_id);
        Ok(Frame::new(header, body))
    }

    /// Decode the typed payload from a frame.
    ///
    /// # Errors
    ///
    /// - `UnknownOpcode` if the header's opcode is unrecognized
    /// - `Codec` if the body does not decode as that opcode's type
    pub fn from_frame(frame: &Frame) -> Result<Self> {
        let opcode = frame
            .header
            .opcode_enum()
            .ok_or(ProtocolError::UnknownOpcode(frame.header.opcode()))?;
        Self::decode(opcode, &frame.payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_variant_maps_to_its_opcode() {
        let request = Payload::CatalogRequest(catalog::CatalogRequest {});
        let response = Payload::CatalogResponse(envelope::SignedEnvelope {
            payload: Vec::new(),
            tag: Vec::new(),
            signer_id: String::new(),
        });
        let error =
            Payload::Error(ErrorPayload { code: ErrorPayload::CODE_BAD_REQUEST, message: String::new() });

        assert_eq!(request.opcode(), Opcode::CatalogRequest);
        assert_eq!(response.opcode(), Opcode::CatalogResponse);
        assert_eq!(error.opcode(), Opcode::Error);
    }

    #[test]
    fn payload_round_trips_through_frame() {
        let envelope = envelope::SignedEnvelope {
            payload: vec![0xA0],
            tag: vec![0x11; 48],
            signer_id: "S1".to_string(),
        };
        let payload = Payload::CatalogResponse(envelope);

        let frame = payload.clone().into_frame(42).unwrap();
        assert_eq!(frame.header.request_id(), 42);

        let decoded = Payload::from_frame(&frame).unwrap();
        assert_eq!(decoded, payload);
    }

    #[test]
    fn decoding_with_wrong_opcode_fails() {
        let error_payload =
            Payload::Error(ErrorPayload { code: 9, message: "boom".to_string() });
        let body = error_payload.encode().unwrap();

        // An error body is not a valid envelope.
        let result = Payload::decode(Opcode::CatalogResponse, &body);
        assert!(matches!(result, Err(ProtocolError::Codec { .. })));
    }

    #[test]
    fn unknown_opcode_in_frame_is_rejected() {
        let mut bytes = FrameHeader::new(Opcode::Error).to_bytes();
        bytes[6..8].copy_from_slice(&0x7777u16.to_be_bytes());
        let header = *FrameHeader::from_bytes(&bytes).unwrap();

        let frame = Frame::new(header, Vec::new());
        assert!(matches!(
            Payload::from_frame(&frame),
            Err(ProtocolError::UnknownOpcode(0x7777))
        ));
    }
}
