//! MAVLink message implementation

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;

use super::{CHECKSUM_SIZE, Error, FrameHeader, HEADER_SIZE, MessageSchema, Result, Value};

/// A typed message: field values in declaration order, tagged by their schema
#[derive(Debug, Clone)]
pub struct Message {
    schema: Arc<MessageSchema>,
    values: Vec<Value>,
}

impl Message {
    /// Create a message, checking each value against its declared field
    pub fn new(schema: Arc<MessageSchema>, values: Vec<Value>) -> Result<Self> {
        if values.len() != schema.fields().len() {
            return Err(Error::FieldCount {
                message: schema.name().to_owned(),
                expected: schema.fields().len(),
                got: values.len(),
            });
        }

        if let Some(field) = schema
            .fields()
            .iter()
            .zip(&values)
            .find_map(|(field, value)| (!field.accepts(value)).then_some(field))
        {
            return Err(Error::FieldMismatch {
                message: schema.name().to_owned(),
                field: field.name.clone(),
                expected: field.field_type,
            });
        }

        Ok(Self { schema, values })
    }

    /// Create a message with every field zeroed
    #[must_use]
    pub fn zeroed(schema: Arc<MessageSchema>) -> Self {
        let values = schema.fields().iter().map(|f| f.default_value()).collect();
        Self { schema, values }
    }

    /// Assemble from values already known to match the schema
    pub(crate) fn from_parts(schema: Arc<MessageSchema>, values: Vec<Value>) -> Self {
        Self { schema, values }
    }

    /// Message id
    #[must_use]
    pub fn id(&self) -> u8 {
        self.schema.id()
    }

    /// Message name
    #[must_use]
    pub fn name(&self) -> &str {
        self.schema.name()
    }

    /// Message schema
    #[must_use]
    pub fn schema(&self) -> &Arc<MessageSchema> {
        &self.schema
    }

    /// Field values in declaration order
    #[must_use]
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Field value by name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.schema.field_index(name).map(|i| &self.values[i])
    }

    /// Replace a field value by name
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        let value = value.into();
        let index = self
            .schema
            .field_index(name)
            .ok_or_else(|| Error::UnknownField {
                message: self.schema.name().to_owned(),
                field: name.to_owned(),
            })?;

        let field = &self.schema.fields()[index];
        if !field.accepts(&value) {
            return Err(Error::FieldMismatch {
                message: self.schema.name().to_owned(),
                field: field.name.clone(),
                expected: field.field_type,
            });
        }
        self.values[index] = value;
        Ok(())
    }

    /// Field names paired with their values, in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> + '_ {
        self.schema
            .fields()
            .iter()
            .map(|f| f.name.as_str())
            .zip(&self.values)
    }
}

impl PartialEq for Message {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id() && self.values == other.values
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {{", self.name())?;
        for (i, (name, value)) in self.iter().enumerate() {
            let sep = if i == 0 { " " } else { ", " };
            write!(f, "{sep}{name}: {value}")?;
        }
        f.write_str(" }")
    }
}

/// A message decoded from a frame, with its provenance
#[derive(Debug, Clone)]
pub struct DecodedMessage {
    message: Message,
    header: FrameHeader,
    frame: Bytes,
    checksum: u16,
}

impl DecodedMessage {
    pub(crate) fn new(
        message: Message,
        header: FrameHeader,
        frame: Bytes,
        checksum: u16,
    ) -> Self {
        Self {
            message,
            header,
            frame,
            checksum,
        }
    }

    /// Decoded message
    #[must_use]
    pub const fn message(&self) -> &Message {
        &self.message
    }

    /// Take the decoded message, dropping provenance
    #[must_use]
    pub fn into_message(self) -> Message {
        self.message
    }

    /// Frame header
    #[must_use]
    pub const fn header(&self) -> &FrameHeader {
        &self.header
    }

    /// Complete raw frame bytes
    #[must_use]
    pub const fn frame(&self) -> &Bytes {
        &self.frame
    }

    /// Raw payload bytes (a view into the frame)
    #[must_use]
    pub fn payload(&self) -> Bytes {
        self.frame
            .slice(HEADER_SIZE..self.frame.len() - CHECKSUM_SIZE)
    }

    /// Checksum carried by the frame
    #[must_use]
    pub const fn checksum(&self) -> u16 {
        self.checksum
    }

    /// Sender sequence number
    #[must_use]
    pub const fn sequence(&self) -> u8 {
        self.header.sequence()
    }

    /// Sender system id
    #[must_use]
    pub const fn source_system(&self) -> u8 {
        self.header.system_id()
    }

    /// Sender component id
    #[must_use]
    pub const fn source_component(&self) -> u8 {
        self.header.component_id()
    }
}

impl std::ops::Deref for DecodedMessage {
    type Target = Message;

    fn deref(&self) -> &Self::Target {
        &self.message
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::FieldType;

    fn schema() -> Arc<MessageSchema> {
        Arc::new(
            MessageSchema::builder(253, "STATUSTEXT")
                .field("severity", FieldType::UInt8)
                .array("text", FieldType::Char, 50)
                .build()
                .unwrap(),
        )
    }

    #[test]
    fn test_message_creation() {
        let msg = Message::new(schema(), vec![Value::UInt8(4), Value::from("armed")]).unwrap();

        assert_eq!(msg.id(), 253);
        assert_eq!(msg.name(), "STATUSTEXT");
        assert_eq!(msg.get("severity"), Some(&Value::UInt8(4)));
        assert_eq!(msg.get("text").and_then(Value::as_str), Some("armed"));
        assert_eq!(msg.get("missing"), None);
    }

    #[test]
    fn test_message_rejects_bad_values() {
        assert!(matches!(
            Message::new(schema(), vec![Value::UInt8(4)]),
            Err(Error::FieldCount {
                expected: 2,
                got: 1,
                ..
            })
        ));

        let err = Message::new(schema(), vec![Value::Int8(4), Value::from("x")]).unwrap_err();
        assert_eq!(
            err,
            Error::FieldMismatch {
                message: "STATUSTEXT".into(),
                field: "severity".into(),
                expected: FieldType::UInt8,
            }
        );
    }

    #[test]
    fn test_set_and_display() {
        let mut msg = Message::zeroed(schema());
        msg.set("severity", 2u8).unwrap();
        msg.set("text", "hello").unwrap();
        assert!(msg.set("severity", 2u16).is_err());
        assert!(matches!(
            msg.set("nope", 2u8),
            Err(Error::UnknownField { .. })
        ));

        assert_eq!(
            msg.to_string(),
            "STATUSTEXT { severity: 2, text: \"hello\" }"
        );
    }
}
