//! Frame type combining header and payload.
//!
//! A `Frame` is the transport-layer packet: a 16-byte raw binary header
//! followed by a variable-length payload (already CBOR-encoded). This is a
//! pure data holder; for typed bodies see [`crate::Payload::into_frame`]
//! and [`crate::Payload::from_frame`].

use bytes::{BufMut, Bytes};

use crate::{
    FrameHeader,
    errors::{ProtocolError, Result},
};

/// Complete protocol frame (transport layer).
///
/// Layout on the wire:
/// `[FrameHeader: 16 bytes, raw binary] + [payload: variable bytes]`
///
/// # Invariants
///
/// - Size Consistency: `payload.len()` MUST match `header.payload_size()`.
///   Enforced by [`Frame::new`] and verified by [`Frame::decode`].
/// - Size Limit: `payload.len()` MUST NOT exceed
///   [`FrameHeader::MAX_PAYLOAD_SIZE`]. Violations are rejected during
///   encoding and decoding.
///
/// # Security
///
/// Provides structural validity only: valid header, size agreement between
/// header and body. It does NOT authenticate anything - the integrity tag
/// inside a catalog-response payload must be verified separately before
/// the response is trusted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Frame header (16 bytes).
    pub header: FrameHeader,

    /// Raw payload bytes (already CBOR-encoded).
    pub payload: Bytes,
}

impl Frame {
    /// Create a new frame with automatic `payload_size` calculation.
    ///
    /// The header's size field is set to the actual payload length, so a
    /// frame with mismatched header and body cannot be constructed. The
    /// 1 MiB bound is enforced later, at [`Frame::encode`].
    #[must_use]
    pub fn new(mut header: FrameHeader, payload: impl Into<Bytes>) -> Self {
        let payload = payload.into();

        // INVARIANT: Payload length always fits in u32. Bytes is bounded
        // by isize::MAX, and every payload this protocol produces is far
        // below the 1 MiB wire limit checked at encode time.
        #[allow(clippy::expect_used)]
        let payload_len =
            u32::try_from(payload.len()).expect("invariant: payload length fits in u32");

        header.payload_size = payload_len.to_be_bytes();

        debug_assert_eq!(header.payload_size(), payload_len);

        Self { header, payload }
    }

    /// Encode the frame into a buffer.
    ///
    /// Writes `[header (16 bytes)] + [payload (variable)]`.
    ///
    /// # Errors
    ///
    /// - `PayloadTooLarge` if the payload exceeds
    ///   [`FrameHeader::MAX_PAYLOAD_SIZE`]
    pub fn encode(&self, dst: &mut impl BufMut) -> Result<()> {
        debug_assert_eq!(self.payload.len(), self.header.payload_size() as usize);

        if self.payload.len() > FrameHeader::MAX_PAYLOAD_SIZE as usize {
            return Err(ProtocolError::PayloadTooLarge {
                size: self.payload.len(),
                max: FrameHeader::MAX_PAYLOAD_SIZE as usize,
            });
        }

        dst.put_slice(&self.header.to_bytes());
        dst.put_slice(&self.payload);

        Ok(())
    }

    /// Decode a frame from wire format.
    ///
    /// Returns a frame with raw payload bytes; it does NOT deserialize the
    /// body. Use [`crate::Payload::from_frame`] for the typed enum.
    ///
    /// # Errors
    ///
    /// - any `ProtocolError` from header parsing (magic, version, bounds)
    /// - `FrameTruncated` if fewer payload bytes follow than the header
    ///   claims
    ///
    /// # Security
    ///
    /// All validation happens before the payload is copied; exactly
    /// `payload_size` bytes are read and trailing data is ignored.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let header = FrameHeader::from_bytes(bytes)?;

        let payload_size = header.payload_size() as usize;
        let total_size = FrameHeader::SIZE + payload_size;

        if bytes.len() < total_size {
            return Err(ProtocolError::FrameTruncated {
                expected: payload_size,
                actual: bytes.len().saturating_sub(FrameHeader::SIZE),
            });
        }

        // INVARIANT: bytes.len() >= total_size was checked above, so the
        // range is in bounds.
        #[allow(clippy::expect_used)]
        let payload = Bytes::copy_from_slice(
            bytes.get(FrameHeader::SIZE..total_size).expect("invariant: bounds checked above"),
        );

        debug_assert_eq!(payload.len(), payload_size);

        Ok(Self { header: *header, payload })
    }
}
