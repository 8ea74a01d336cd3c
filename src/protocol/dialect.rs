//! Built-in minimal dialect
//!
//! A handful of MAVLink v1.0 `common` messages, enough for link
//! bring-up and tests. Larger dialects are loaded by the caller into their
//! own [`Registry`].

use super::{FieldType, MessageSchema, Registry, Result};

/// `HEARTBEAT`
pub const MSG_ID_HEARTBEAT: u8 = 0;
/// `SYS_STATUS`
pub const MSG_ID_SYS_STATUS: u8 = 1;
/// `SYSTEM_TIME`
pub const MSG_ID_SYSTEM_TIME: u8 = 2;
/// `PING`
pub const MSG_ID_PING: u8 = 4;
/// `PARAM_VALUE`
pub const MSG_ID_PARAM_VALUE: u8 = 22;
/// `ATTITUDE`
pub const MSG_ID_ATTITUDE: u8 = 30;
/// `STATUSTEXT`
pub const MSG_ID_STATUSTEXT: u8 = 253;

/// Schemas of the minimal dialect, in id order
pub fn schemas() -> Result<Vec<MessageSchema>> {
    use FieldType::{Char, Float, Int8, Int16, UInt8, UInt16, UInt32, UInt64};

    Ok(vec![
        MessageSchema::builder(MSG_ID_HEARTBEAT, "HEARTBEAT")
            .field("type", UInt8)
            .field("autopilot", UInt8)
            .field("base_mode", UInt8)
            .field("custom_mode", UInt32)
            .field("system_status", UInt8)
            .field("mavlink_version", UInt8)
            .crc_extra(50)
            .build()?,
        MessageSchema::builder(MSG_ID_SYS_STATUS, "SYS_STATUS")
            .field("onboard_control_sensors_present", UInt32)
            .field("onboard_control_sensors_enabled", UInt32)
            .field("onboard_control_sensors_health", UInt32)
            .field("load", UInt16)
            .field("voltage_battery", UInt16)
            .field("current_battery", Int16)
            .field("battery_remaining", Int8)
            .field("drop_rate_comm", UInt16)
            .field("errors_comm", UInt16)
            .field("errors_count1", UInt16)
            .field("errors_count2", UInt16)
            .field("errors_count3", UInt16)
            .field("errors_count4", UInt16)
            .crc_extra(124)
            .build()?,
        MessageSchema::builder(MSG_ID_SYSTEM_TIME, "SYSTEM_TIME")
            .field("time_unix_usec", UInt64)
            .field("time_boot_ms", UInt32)
            .crc_extra(137)
            .build()?,
        MessageSchema::builder(MSG_ID_PING, "PING")
            .field("time_usec", UInt64)
            .field("seq", UInt32)
            .field("target_system", UInt8)
            .field("target_component", UInt8)
            .crc_extra(237)
            .build()?,
        MessageSchema::builder(MSG_ID_PARAM_VALUE, "PARAM_VALUE")
            .array("param_id", Char, 16)
            .field("param_value", Float)
            .field("param_type", UInt8)
            .field("param_count", UInt16)
            .field("param_index", UInt16)
            .crc_extra(220)
            .build()?,
        MessageSchema::builder(MSG_ID_ATTITUDE, "ATTITUDE")
            .field("time_boot_ms", UInt32)
            .field("roll", Float)
            .field("pitch", Float)
            .field("yaw", Float)
            .field("rollspeed", Float)
            .field("pitchspeed", Float)
            .field("yawspeed", Float)
            .crc_extra(39)
            .build()?,
        MessageSchema::builder(MSG_ID_STATUSTEXT, "STATUSTEXT")
            .field("severity", UInt8)
            .array("text", Char, 50)
            .crc_extra(83)
            .build()?,
    ])
}

/// Registry holding the minimal dialect with default framing
#[must_use]
pub fn minimal() -> Registry {
    schemas()
        .and_then(Registry::from_schemas)
        .expect("built-in dialect is well-formed")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declared_crc_extra_matches_layout() {
        for schema in schemas().unwrap() {
            let computed = MessageSchema::compute_crc_extra(schema.name(), schema.wire_fields());
            assert_eq!(computed, schema.crc_extra(), "{}", schema.name());
        }
    }

    #[test]
    fn test_payload_widths() {
        let registry = minimal();
        let widths: Vec<(u8, usize)> = registry
            .iter()
            .map(|s| (s.id(), s.payload_len()))
            .collect();
        assert_eq!(
            widths,
            [
                (MSG_ID_HEARTBEAT, 9),
                (MSG_ID_SYS_STATUS, 31),
                (MSG_ID_SYSTEM_TIME, 12),
                (MSG_ID_PING, 14),
                (MSG_ID_PARAM_VALUE, 25),
                (MSG_ID_ATTITUDE, 28),
                (MSG_ID_STATUSTEXT, 51),
            ]
        );
    }
}
