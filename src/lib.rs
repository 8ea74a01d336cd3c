//! mavwire - MAVLink v1 wire engine
//!
//! This library implements the runtime half of the MAVLink v1 protocol: the
//! CRC-16 checksum, frame packing and validation, width-sorted field layout,
//! and an incremental stream reassembler that survives corruption.
//!
//! # Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use mavwire::{Connection, ConnectionConfig, Value, dialect};
//!
//! let registry = Arc::new(dialect::minimal());
//! let mut gcs = Connection::new(Arc::clone(&registry), ConnectionConfig::new(255, 190));
//! let mut vehicle = Connection::new(registry, ConnectionConfig::new(1, 1));
//!
//! // Build and frame a message
//! let ping = gcs.registry().message(
//!     "PING",
//!     vec![Value::UInt64(42), Value::UInt32(0), Value::UInt8(1), Value::UInt8(1)],
//! )?;
//! let bytes = gcs.pack_and_send(&ping)?;
//!
//! // Feed the bytes to the other side, in chunks of any size
//! for received in vehicle.push(&bytes) {
//!     if let Some(decoded) = received.message() {
//!         assert_eq!(decoded.name(), "PING");
//!         assert_eq!(decoded.source_system(), 255);
//!     }
//! }
//! # Ok::<(), mavwire::Error>(())
//! ```
//!
//! # Features
//!
//! - **Schema-driven codec** - one engine for every message type
//! - **Self-synchronizing receive** - one-byte resync on a bad marker
//! - **Corruption is data** - undecodable input becomes [`BadData`], never a
//!   torn-down stream
//! - **Per-link state** - counters and framing settings live in each
//!   [`Connection`]

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod connection;
pub mod protocol;

pub use connection::{BadData, Connection, ConnectionConfig, ConnectionStats, Received};
pub use protocol::{
    Codec, DEFAULT_MARKER, DecodedMessage, Endianness, Error, Field, FieldType, FrameHeader,
    MAX_PAYLOAD_SIZE, Message, MessageSchema, Registry, Result, SenderContext, Value, crc16,
    dialect,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
