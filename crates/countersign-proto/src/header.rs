//! Frame header implementation with zero-copy parsing.
//!
//! The `FrameHeader` is a fixed 16-byte structure serialized as raw binary
//! (big endian). The server can size-check and route a frame from the
//! header alone, before touching the payload.

use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::{
    Opcode,
    errors::{ProtocolError, Result},
};

/// Fixed 16-byte frame header (big-endian network byte order).
///
/// Fields are stored as raw byte arrays to avoid alignment issues; all
/// multi-byte integers are big endian.
///
/// # Security
///
/// The `#[repr(C, packed)]` layout with zerocopy traits ensures this
/// struct can be safely cast from untrusted network bytes - every 16-byte
/// pattern is a structurally valid header, so parsing cannot hit undefined
/// behavior. Semantic validation (magic, version, size bounds) happens in
/// [`FrameHeader::from_bytes`]. The header itself is NOT covered by the
/// integrity tag; only the envelope payload inside the frame body is
/// authenticated.
#[repr(C, packed)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromBytes, IntoBytes, KnownLayout, Immutable)]
pub struct FrameHeader {
    // Protocol identification (bytes 0-5)
    magic: [u8; 4],   // 0x43534752 ("CSGR" in ASCII)
    version: u8,      // 0x01
    flags: u8,        // reserved, must be zero

    // Dispatch and correlation (bytes 6-15)
    opcode: [u8; 2],                  // u16 operation code
    request_id: [u8; 4],              // u32 client nonce, echoed in replies
    pub(crate) payload_size: [u8; 4], // u32 payload length
}

impl FrameHeader {
    /// Size of the serialized header (16 bytes).
    pub const SIZE: usize = 16;

    /// Magic number: "CSGR" in ASCII.
    pub const MAGIC: u32 = 0x4353_4752;

    /// Current protocol version.
    pub const VERSION: u8 = 0x01;

    /// Maximum payload size (1 MiB).
    ///
    /// A full catalog response is a few kilobytes; the limit exists to
    /// bound allocation on malformed or hostile input.
    pub const MAX_PAYLOAD_SIZE: u32 = 1024 * 1024;

    /// Create a new header with the specified opcode.
    ///
    /// Request id and payload size start at zero; [`crate::Frame::new`]
    /// fills in the payload size.
    #[must_use]
    pub fn new(opcode: Opcode) -> Self {
        Self {
            magic: Self::MAGIC.to_be_bytes(),
            version: Self::VERSION,
            flags: 0,
            opcode: opcode.to_u16().to_be_bytes(),
            request_id: [0u8; 4],
            payload_size: [0u8; 4],
        }
    }

    /// Parse a header from network bytes (zero-copy).
    ///
    /// # Errors
    ///
    /// - `FrameTooShort` if the buffer holds fewer than 16 bytes
    /// - `InvalidMagic` if the magic number is wrong
    /// - `UnsupportedVersion` for any version other than the current one
    /// - `PayloadTooLarge` if the claimed payload size exceeds the limit
    ///
    /// # Security
    ///
    /// Validation is ordered cheapest-first (size, magic, version, payload
    /// bound) so garbage input fails before any allocation.
    pub fn from_bytes(bytes: &[u8]) -> Result<&Self> {
        let header = Self::ref_from_prefix(bytes)
            .map_err(|_| ProtocolError::FrameTooShort { expected: Self::SIZE, actual: bytes.len() })?
            .0;

        if u32::from_be_bytes(header.magic) != Self::MAGIC {
            return Err(ProtocolError::InvalidMagic);
        }

        if header.version != Self::VERSION {
            return Err(ProtocolError::UnsupportedVersion(header.version));
        }

        let payload_size = u32::from_be_bytes(header.payload_size);
        if payload_size > Self::MAX_PAYLOAD_SIZE {
            return Err(ProtocolError::PayloadTooLarge {
                size: payload_size as usize,
                max: Self::MAX_PAYLOAD_SIZE as usize,
            });
        }

        Ok(header)
    }

    /// Serialize the header to bytes.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let bytes = IntoBytes::as_bytes(self);
        let mut arr = [0u8; Self::SIZE];
        arr.copy_from_slice(bytes);
        arr
    }

    /// Protocol version byte (currently 0x01).
    #[must_use]
    pub fn version(&self) -> u8 {
        self.version
    }

    /// Operation code as raw u16.
    #[must_use]
    pub fn opcode(&self) -> u16 {
        u16::from_be_bytes(self.opcode)
    }

    /// Operation code as enum. `None` if unrecognized.
    #[must_use]
    pub fn opcode_enum(&self) -> Option<Opcode> {
        Opcode::from_u16(self.opcode())
    }

    /// Client-assigned nonce for request/response correlation.
    #[must_use]
    pub fn request_id(&self) -> u32 {
        u32::from_be_bytes(self.request_id)
    }

    /// Set the request-correlation id.
    pub fn set_request_id(&mut self, request_id: u32) {
        self.request_id = request_id.to_be_bytes();
    }

    /// Payload size in bytes (max 1 MiB).
    #[must_use]
    pub fn payload_size(&self) -> u32 {
        u32::from_be_bytes(self.payload_size)
    }
}
