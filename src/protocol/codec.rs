//! MAVLink frame codec (pack/decode)
//!
//! Packs typed messages into checksummed v1 frames and validates/decodes
//! complete frames back into typed messages.

use std::sync::Arc;

use bytes::{Buf, BufMut, Bytes};

use super::{
    CHECKSUM_SIZE, CRC_INIT, DecodedMessage, Endianness, Error, Field, FieldType, FrameHeader,
    HEADER_SIZE, MAX_PAYLOAD_SIZE, MIN_FRAME_SIZE, Message, MessageSchema, Registry, Result,
    Value, crc16,
};

/// Sender fields written into every packed header
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct SenderContext {
    /// Sequence number (mod 256)
    pub sequence: u8,
    /// Sender system id
    pub system_id: u8,
    /// Sender component id
    pub component_id: u8,
}

impl SenderContext {
    /// Create a sender context
    #[must_use]
    pub const fn new(sequence: u8, system_id: u8, component_id: u8) -> Self {
        Self {
            sequence,
            system_id,
            component_id,
        }
    }
}

/// Frame codec bound to a message registry
///
/// Marker, endianness and the `crc_extra` switch default to the registry's
/// dialect settings and can be overridden per codec.
#[derive(Debug, Clone)]
pub struct Codec {
    registry: Arc<Registry>,
    marker: u8,
    endianness: Endianness,
    crc_extra: bool,
}

impl Codec {
    /// Create a codec using the registry's framing defaults
    #[must_use]
    pub fn new(registry: Arc<Registry>) -> Self {
        Self {
            marker: registry.marker(),
            endianness: registry.endianness(),
            crc_extra: true,
            registry,
        }
    }

    /// Override the frame marker byte
    #[must_use]
    pub fn with_marker(mut self, marker: u8) -> Self {
        self.marker = marker;
        self
    }

    /// Override the payload byte order
    #[must_use]
    pub fn with_endianness(mut self, endianness: Endianness) -> Self {
        self.endianness = endianness;
        self
    }

    /// Enable or disable folding `crc_extra` into checksums
    #[must_use]
    pub fn with_crc_extra(mut self, enabled: bool) -> Self {
        self.crc_extra = enabled;
        self
    }

    /// Message registry
    #[must_use]
    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// Frame marker byte
    #[must_use]
    pub const fn marker(&self) -> u8 {
        self.marker
    }

    /// Payload byte order
    #[must_use]
    pub const fn endianness(&self) -> Endianness {
        self.endianness
    }

    /// Whether `crc_extra` is folded into checksums
    #[must_use]
    pub const fn crc_extra_enabled(&self) -> bool {
        self.crc_extra
    }

    /// Pack a message into a complete frame
    ///
    /// # Format
    ///
    /// ```text
    /// [HEADER (6 bytes)] [PAYLOAD (schema width)] [CRC (2 bytes, LE)]
    /// ```
    ///
    /// # Errors
    ///
    /// Fails when the message's schema is not the one registered with this
    /// codec for its id.
    pub fn pack(&self, message: &Message, ctx: SenderContext) -> Result<Vec<u8>> {
        let schema = self.schema_for(message)?;
        let payload_len = schema.payload_len();
        let length_byte = u8::try_from(payload_len).map_err(|_| Error::PayloadTooLarge {
            message: schema.name().to_owned(),
            size: payload_len,
            max: MAX_PAYLOAD_SIZE,
        })?;

        let header = FrameHeader::new(
            self.marker,
            length_byte,
            ctx.sequence,
            ctx.system_id,
            ctx.component_id,
            schema.id(),
        );

        let mut bytes = Vec::with_capacity(MIN_FRAME_SIZE + payload_len);
        bytes.put_slice(&header.to_bytes());

        for &declared in schema.wire_order() {
            self.put_field(
                &mut bytes,
                &schema.fields()[declared],
                &message.values()[declared],
            );
        }
        debug_assert_eq!(bytes.len(), HEADER_SIZE + payload_len);

        let checksum = self.checksum(&bytes[1..], schema.crc_extra());
        bytes.put_u16_le(checksum);

        Ok(bytes)
    }

    /// Decode one complete frame
    ///
    /// `frame` must hold exactly one frame (`8 + payload_len` bytes).
    ///
    /// # Errors
    ///
    /// Checks run in order and the first failure is returned:
    /// - header too short
    /// - marker byte mismatch
    /// - header length disagrees with the frame size
    /// - message id not registered
    /// - checksum trailer missing
    /// - checksum mismatch
    /// - payload width disagrees with the schema
    pub fn decode(&self, frame: Bytes) -> Result<DecodedMessage> {
        let header = FrameHeader::from_bytes(&frame)?;

        if header.marker() != self.marker {
            return Err(Error::BadPrefix {
                found: header.marker(),
            });
        }

        let actual = frame.len().saturating_sub(MIN_FRAME_SIZE);
        if header.payload_len() != actual {
            return Err(Error::LengthMismatch {
                declared: header.payload_len(),
                actual,
                message_id: header.message_id(),
            });
        }

        let schema = self
            .registry
            .get(header.message_id())
            .ok_or(Error::UnknownMessage {
                message_id: header.message_id(),
            })?;

        let Some((body, trailer)) = frame
            .split_last_chunk::<CHECKSUM_SIZE>()
            .filter(|_| frame.len() >= MIN_FRAME_SIZE)
        else {
            return Err(Error::ChecksumUnpack { got: frame.len() });
        };
        let received = u16::from_le_bytes(*trailer);

        let calculated = self.checksum(&body[1..], schema.crc_extra());
        if received != calculated {
            return Err(Error::ChecksumMismatch {
                message_id: header.message_id(),
                expected: calculated,
                found: received,
            });
        }

        let payload = &body[HEADER_SIZE..];
        if payload.len() != schema.payload_len() {
            return Err(Error::PayloadUnpack {
                message: schema.name().to_owned(),
                expected: schema.payload_len(),
                got: payload.len(),
            });
        }

        let mut cursor = payload;
        let wire: Vec<Value> = schema
            .wire_fields()
            .map(|field| self.get_field(&mut cursor, field))
            .collect();

        let declared = schema
            .order_map()
            .iter()
            .map(|&wire_pos| wire[wire_pos].clone())
            .collect();

        let message = Message::from_parts(Arc::clone(schema), declared);
        Ok(DecodedMessage::new(message, header, frame, received))
    }

    /// Checksum over header (without marker) and payload, then `crc_extra`
    fn checksum(&self, body: &[u8], crc_extra: u8) -> u16 {
        let crc = crc16(body, CRC_INIT);
        if self.crc_extra {
            crc16(&[crc_extra], crc)
        } else {
            crc
        }
    }

    fn schema_for(&self, message: &Message) -> Result<&Arc<MessageSchema>> {
        match self.registry.get(message.id()) {
            Some(schema)
                if Arc::ptr_eq(schema, message.schema()) || **schema == **message.schema() =>
            {
                Ok(schema)
            }
            _ => Err(Error::UnknownMessage {
                message_id: message.id(),
            }),
        }
    }

    fn put_field(&self, buf: &mut Vec<u8>, field: &Field, value: &Value) {
        match value {
            Value::Bytes(bytes) => {
                let len = field.element_count();
                let take = bytes.len().min(len);
                buf.put_slice(&bytes[..take]);
                buf.put_bytes(0, len - take);
            }
            Value::Array(items) => {
                for item in items {
                    self.put_scalar(buf, item);
                }
            }
            scalar => self.put_scalar(buf, scalar),
        }
    }

    fn put_scalar(&self, buf: &mut Vec<u8>, value: &Value) {
        let endianness = self.endianness;
        macro_rules! put {
            ($le:ident, $be:ident, $v:expr) => {
                match endianness {
                    Endianness::Little => buf.$le($v),
                    Endianness::Big => buf.$be($v),
                }
            };
        }

        match *value {
            Value::Char(v) | Value::UInt8(v) => buf.put_u8(v),
            Value::Int8(v) => buf.put_i8(v),
            Value::UInt16(v) => put!(put_u16_le, put_u16, v),
            Value::Int16(v) => put!(put_i16_le, put_i16, v),
            Value::UInt32(v) => put!(put_u32_le, put_u32, v),
            Value::Int32(v) => put!(put_i32_le, put_i32, v),
            Value::UInt64(v) => put!(put_u64_le, put_u64, v),
            Value::Int64(v) => put!(put_i64_le, put_i64, v),
            Value::Float(v) => put!(put_f32_le, put_f32, v),
            Value::Double(v) => put!(put_f64_le, put_f64, v),
            // Message construction rejects nested arrays.
            Value::Bytes(_) | Value::Array(_) => {}
        }
    }

    fn get_field(&self, cursor: &mut &[u8], field: &Field) -> Value {
        if !field.is_array() {
            return self.get_scalar(cursor, field.field_type);
        }

        let len = field.element_count();
        if field.field_type.is_byte_like() {
            let mut bytes = vec![0; len];
            cursor.copy_to_slice(&mut bytes);
            Value::Bytes(bytes)
        } else {
            Value::Array(
                (0..len)
                    .map(|_| self.get_scalar(cursor, field.field_type))
                    .collect(),
            )
        }
    }

    fn get_scalar(&self, cursor: &mut &[u8], field_type: FieldType) -> Value {
        let endianness = self.endianness;
        macro_rules! get {
            ($le:ident, $be:ident) => {
                match endianness {
                    Endianness::Little => cursor.$le(),
                    Endianness::Big => cursor.$be(),
                }
            };
        }

        match field_type {
            FieldType::Char => Value::Char(cursor.get_u8()),
            FieldType::UInt8 => Value::UInt8(cursor.get_u8()),
            FieldType::Int8 => Value::Int8(cursor.get_i8()),
            FieldType::UInt16 => Value::UInt16(get!(get_u16_le, get_u16)),
            FieldType::Int16 => Value::Int16(get!(get_i16_le, get_i16)),
            FieldType::UInt32 => Value::UInt32(get!(get_u32_le, get_u32)),
            FieldType::Int32 => Value::Int32(get!(get_i32_le, get_i32)),
            FieldType::UInt64 => Value::UInt64(get!(get_u64_le, get_u64)),
            FieldType::Int64 => Value::Int64(get!(get_i64_le, get_i64)),
            FieldType::Float => Value::Float(get!(get_f32_le, get_f32)),
            FieldType::Double => Value::Double(get!(get_f64_le, get_f64)),
        }
    }
}
