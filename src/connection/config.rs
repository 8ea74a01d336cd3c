//! Per-connection configuration

use crate::protocol::Endianness;

/// Connection configuration options.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConnectionConfig {
    /// System id written into outgoing frames.
    pub system_id: u8,
    /// Component id written into outgoing frames.
    pub component_id: u8,
    /// Frame marker override; `None` uses the registry's marker.
    pub marker: Option<u8>,
    /// Payload byte order override; `None` uses the registry's setting.
    pub endianness: Option<Endianness>,
    /// Fold each message's `crc_extra` into checksums.
    pub crc_extra: bool,
}

impl ConnectionConfig {
    /// Configuration with the given sender ids and dialect defaults.
    #[must_use]
    pub fn new(system_id: u8, component_id: u8) -> Self {
        Self {
            system_id,
            component_id,
            ..Self::default()
        }
    }
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            system_id: 0,
            component_id: 0,
            marker: None,
            endianness: None,
            crc_extra: true,
        }
    }
}
