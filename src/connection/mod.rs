//! Engine-facing MAVLink connection
//!
//! A [`Connection`] owns the state of one logical link: the reassembly
//! buffer, the outgoing sequence counter, sender ids and traffic counters.
//! Bytes in and bytes out are the caller's business; the connection only
//! transforms bytes already in hand.

mod config;
mod received;
mod stats;
mod stream;

pub use config::ConnectionConfig;
pub use received::{BAD_DATA_NAME, BadData, Received};
pub use stats::ConnectionStats;
pub use stream::Connection;
