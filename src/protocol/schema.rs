//! Per-message-type schema: field layout, wire order and CRC seed

use std::collections::HashSet;

use super::{Crc16, Endianness, Error, FieldType, MAX_PAYLOAD_SIZE, Result, Value};

/// A declared message field
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Field {
    /// Field name
    pub name: String,
    /// Element type
    pub field_type: FieldType,
    /// Array length, 0 for scalars
    pub array_length: u8,
}

impl Field {
    /// Scalar field
    pub fn scalar(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            array_length: 0,
        }
    }

    /// Fixed-size array field
    pub fn array(name: impl Into<String>, field_type: FieldType, array_length: u8) -> Self {
        Self {
            name: name.into(),
            field_type,
            array_length,
        }
    }

    /// Whether the field is an array
    #[must_use]
    pub const fn is_array(&self) -> bool {
        self.array_length > 0
    }

    /// Number of elements on the wire
    #[must_use]
    pub fn element_count(&self) -> usize {
        usize::from(self.array_length.max(1))
    }

    /// Total width in bytes
    #[must_use]
    pub fn wire_size(&self) -> usize {
        self.field_type.size() * self.element_count()
    }

    /// Struct format token for this field (`B`, `4f`, `16s`, ...)
    #[must_use]
    pub fn format_token(&self) -> String {
        if !self.is_array() {
            return self.field_type.format_char().to_string();
        }
        let code = if self.field_type.is_byte_like() {
            's'
        } else {
            self.field_type.format_char()
        };
        format!("{}{code}", self.array_length)
    }

    /// Zero value of the right shape for this field
    #[must_use]
    pub fn default_value(&self) -> Value {
        if !self.is_array() {
            Value::zero(self.field_type)
        } else if self.field_type.is_byte_like() {
            Value::Bytes(vec![0; self.element_count()])
        } else {
            Value::Array(vec![Value::zero(self.field_type); self.element_count()])
        }
    }

    /// Whether `value` has the right shape for this field
    ///
    /// Byte strings of any length are accepted; they are padded or
    /// truncated to the declared length when packed.
    #[must_use]
    pub fn accepts(&self, value: &Value) -> bool {
        match value {
            Value::Bytes(_) => self.is_array() && self.field_type.is_byte_like(),
            Value::Array(items) => {
                self.is_array()
                    && !self.field_type.is_byte_like()
                    && items.len() == self.element_count()
                    && items
                        .iter()
                        .all(|item| item.scalar_type() == Some(self.field_type))
            }
            scalar => !self.is_array() && scalar.scalar_type() == Some(self.field_type),
        }
    }
}

/// Immutable metadata for one message type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageSchema {
    id: u8,
    name: String,
    fields: Vec<Field>,
    wire_order: Vec<usize>,
    order_map: Vec<usize>,
    crc_extra: u8,
    payload_len: usize,
}

impl MessageSchema {
    /// Start building a schema
    pub fn builder(id: u8, name: impl Into<String>) -> MessageSchemaBuilder {
        MessageSchemaBuilder {
            id,
            name: name.into(),
            fields: Vec::new(),
            crc_extra: None,
        }
    }

    /// Message id
    #[must_use]
    pub const fn id(&self) -> u8 {
        self.id
    }

    /// Message name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fields in declaration order
    #[must_use]
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Fields in wire order
    pub fn wire_fields(&self) -> impl ExactSizeIterator<Item = &Field> + '_ {
        self.wire_order.iter().map(|&i| &self.fields[i])
    }

    /// Declared index of each wire position
    #[must_use]
    pub fn wire_order(&self) -> &[usize] {
        &self.wire_order
    }

    /// Wire position of each declared field: `declared[i] = wire[order_map[i]]`
    #[must_use]
    pub fn order_map(&self) -> &[usize] {
        &self.order_map
    }

    /// CRC seed byte folded into every frame checksum
    #[must_use]
    pub const fn crc_extra(&self) -> u8 {
        self.crc_extra
    }

    /// Payload width in bytes
    #[must_use]
    pub const fn payload_len(&self) -> usize {
        self.payload_len
    }

    /// Declared index of a field by name
    #[must_use]
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    /// Packed-struct descriptor of the payload, e.g. `<IBBBBB`
    #[must_use]
    pub fn format_string(&self, endianness: Endianness) -> String {
        let mut out = String::with_capacity(1 + self.fields.len() * 2);
        out.push(endianness.format_char());
        for field in self.wire_fields() {
            out.push_str(&field.format_token());
        }
        out
    }

    /// Compute the `crc_extra` of a message layout
    ///
    /// Checksum over the message name and, for each field in wire order, its
    /// type name, field name and (for arrays) its length byte.
    #[must_use]
    pub fn compute_crc_extra<'a>(
        name: &str,
        wire_fields: impl IntoIterator<Item = &'a Field>,
    ) -> u8 {
        let mut crc = Crc16::new();
        crc.update(name.as_bytes());
        crc.update_byte(b' ');
        for field in wire_fields {
            crc.update(field.field_type.c_name().as_bytes());
            crc.update_byte(b' ');
            crc.update(field.name.as_bytes());
            crc.update_byte(b' ');
            if field.is_array() {
                crc.update_byte(field.array_length);
            }
        }
        crc.fold()
    }
}

/// Builder for [`MessageSchema`]
#[derive(Debug, Clone)]
pub struct MessageSchemaBuilder {
    id: u8,
    name: String,
    fields: Vec<Field>,
    crc_extra: Option<u8>,
}

impl MessageSchemaBuilder {
    /// Append a scalar field
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, field_type: FieldType) -> Self {
        self.fields.push(Field::scalar(name, field_type));
        self
    }

    /// Append a fixed-size array field
    #[must_use]
    pub fn array(mut self, name: impl Into<String>, field_type: FieldType, len: u8) -> Self {
        self.fields.push(Field::array(name, field_type, len));
        self
    }

    /// Append a prepared field
    #[must_use]
    pub fn with_field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    /// Set the CRC seed explicitly instead of computing it
    #[must_use]
    pub fn crc_extra(mut self, crc_extra: u8) -> Self {
        self.crc_extra = Some(crc_extra);
        self
    }

    /// Validate and freeze the schema
    pub fn build(self) -> Result<MessageSchema> {
        let mut seen = HashSet::with_capacity(self.fields.len());
        for field in &self.fields {
            if !seen.insert(field.name.as_str()) {
                return Err(Error::DuplicateFieldName {
                    message: self.name,
                    field: field.name.clone(),
                });
            }
        }

        let payload_len: usize = self.fields.iter().map(Field::wire_size).sum();
        if payload_len > MAX_PAYLOAD_SIZE {
            return Err(Error::PayloadTooLarge {
                message: self.name,
                size: payload_len,
                max: MAX_PAYLOAD_SIZE,
            });
        }

        // Stable sort keeps declaration order among equal widths.
        let mut wire_order: Vec<usize> = (0..self.fields.len()).collect();
        wire_order.sort_by_key(|&i| std::cmp::Reverse(self.fields[i].field_type.size()));

        let mut order_map = vec![0; self.fields.len()];
        for (wire_pos, &declared) in wire_order.iter().enumerate() {
            order_map[declared] = wire_pos;
        }

        let crc_extra = self.crc_extra.unwrap_or_else(|| {
            MessageSchema::compute_crc_extra(&self.name, wire_order.iter().map(|&i| &self.fields[i]))
        });

        Ok(MessageSchema {
            id: self.id,
            name: self.name,
            fields: self.fields,
            wire_order,
            order_map,
            crc_extra,
            payload_len,
        })
    }
}
