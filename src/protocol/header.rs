//! MAVLink v1 frame header
//!
//! The header is 6 bytes and precedes the payload on the wire.

use super::{Error, HEADER_SIZE, Result};

/// MAVLink v1 frame header (6 bytes)
///
/// # Wire Format
///
/// ```text
/// +--------+--------+--------+--------+--------+--------+---------------+--------+
/// | marker | length |  seq   | sysid  | compid | msgid |  payload (N)  | crc LE |
/// +--------+--------+--------+--------+--------+--------+---------------+--------+
///     1        1        1        1        1        1          N            2
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHeader {
    marker: u8,
    payload_len: u8,
    sequence: u8,
    system_id: u8,
    component_id: u8,
    message_id: u8,
}

impl FrameHeader {
    /// Create a new frame header
    #[must_use]
    pub const fn new(
        marker: u8,
        payload_len: u8,
        sequence: u8,
        system_id: u8,
        component_id: u8,
        message_id: u8,
    ) -> Self {
        Self {
            marker,
            payload_len,
            sequence,
            system_id,
            component_id,
            message_id,
        }
    }

    /// Start-of-frame marker byte
    #[must_use]
    pub const fn marker(&self) -> u8 {
        self.marker
    }

    /// Declared payload length
    #[must_use]
    pub const fn payload_len(&self) -> usize {
        self.payload_len as usize
    }

    /// Sequence number (mod 256)
    #[must_use]
    pub const fn sequence(&self) -> u8 {
        self.sequence
    }

    /// Sender system id
    #[must_use]
    pub const fn system_id(&self) -> u8 {
        self.system_id
    }

    /// Sender component id
    #[must_use]
    pub const fn component_id(&self) -> u8 {
        self.component_id
    }

    /// Message id
    #[must_use]
    pub const fn message_id(&self) -> u8 {
        self.message_id
    }

    /// Total frame size implied by the length field
    #[must_use]
    pub const fn frame_len(&self) -> usize {
        super::MIN_FRAME_SIZE + self.payload_len as usize
    }

    /// Convert to bytes
    #[must_use]
    pub const fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        [
            self.marker,
            self.payload_len,
            self.sequence,
            self.system_id,
            self.component_id,
            self.message_id,
        ]
    }

    /// Parse from bytes
    ///
    /// Only the structure is checked here; marker and length validation
    /// belong to the codec, which knows the dialect.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let Some(&[marker, payload_len, sequence, system_id, component_id, message_id]) =
            bytes.first_chunk::<HEADER_SIZE>()
        else {
            return Err(Error::HeaderUnpack {
                needed: HEADER_SIZE,
                got: bytes.len(),
            });
        };

        Ok(Self {
            marker,
            payload_len,
            sequence,
            system_id,
            component_id,
            message_id,
        })
    }
}
