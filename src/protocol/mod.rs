//! MAVLink v1 protocol core
//!
//! This module provides the checksum, wire format, message schemas and the
//! frame codec. It never performs I/O.

mod codec;
mod crc;
pub mod dialect;
mod error;
mod header;
mod message;
mod registry;
mod schema;
mod types;

pub use codec::{Codec, SenderContext};
pub use crc::{CRC_INIT, Crc16, crc16};
pub use error::{Error, Result};
pub use header::FrameHeader;
pub use message::{DecodedMessage, Message};
pub use registry::Registry;
pub use schema::{Field, MessageSchema, MessageSchemaBuilder};
pub use types::{Endianness, FieldType, Value};

/// Default frame marker (start-of-frame byte) for MAVLink v1
pub const DEFAULT_MARKER: u8 = 0xFE;

/// Header size in bytes (marker, length, sequence, system, component, message id)
pub const HEADER_SIZE: usize = 6;

/// Checksum size in bytes
pub const CHECKSUM_SIZE: usize = 2;

/// Minimum frame size (header + checksum, empty payload)
pub const MIN_FRAME_SIZE: usize = HEADER_SIZE + CHECKSUM_SIZE;

/// Maximum payload size (the length field is a single byte)
pub const MAX_PAYLOAD_SIZE: usize = u8::MAX as usize;

/// Maximum frame size
pub const MAX_FRAME_SIZE: usize = MIN_FRAME_SIZE + MAX_PAYLOAD_SIZE;
