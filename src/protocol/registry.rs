//! Message registry: the immutable table of schemas for one dialect

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use super::{DEFAULT_MARKER, Endianness, Error, Message, MessageSchema, Result, Value};

/// Table of message schemas keyed by message id, plus dialect framing defaults.
///
/// Built once before any traffic and shared read-only (usually behind an
/// [`Arc`]) by every codec and connection of the dialect.
#[derive(Debug, Clone)]
pub struct Registry {
    marker: u8,
    endianness: Endianness,
    messages: BTreeMap<u8, Arc<MessageSchema>>,
    names: HashMap<String, u8>,
}

impl Registry {
    /// Empty registry with the MAVLink v1 marker and little-endian payloads
    #[must_use]
    pub fn new() -> Self {
        Self {
            marker: DEFAULT_MARKER,
            endianness: Endianness::Little,
            messages: BTreeMap::new(),
            names: HashMap::new(),
        }
    }

    /// Set the frame marker byte
    #[must_use]
    pub fn with_marker(mut self, marker: u8) -> Self {
        self.marker = marker;
        self
    }

    /// Set the payload byte order
    #[must_use]
    pub fn with_endianness(mut self, endianness: Endianness) -> Self {
        self.endianness = endianness;
        self
    }

    /// Add a schema; ids and names must be unique
    pub fn register(&mut self, schema: MessageSchema) -> Result<&mut Self> {
        if self.messages.contains_key(&schema.id()) {
            return Err(Error::DuplicateMessageId {
                message_id: schema.id(),
            });
        }
        if self.names.contains_key(schema.name()) {
            return Err(Error::DuplicateMessageName {
                name: schema.name().to_owned(),
            });
        }

        self.names.insert(schema.name().to_owned(), schema.id());
        self.messages.insert(schema.id(), Arc::new(schema));
        Ok(self)
    }

    /// Build a registry from a list of schemas
    pub fn from_schemas(schemas: impl IntoIterator<Item = MessageSchema>) -> Result<Self> {
        let mut registry = Self::new();
        for schema in schemas {
            registry.register(schema)?;
        }
        Ok(registry)
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

    /// Look up a schema by message id
    #[must_use]
    pub fn get(&self, id: u8) -> Option<&Arc<MessageSchema>> {
        self.messages.get(&id)
    }

    /// Look up a schema by message name
    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<&Arc<MessageSchema>> {
        self.names.get(name).and_then(|id| self.messages.get(id))
    }

    /// Whether a message id is registered
    #[must_use]
    pub fn contains(&self, id: u8) -> bool {
        self.messages.contains_key(&id)
    }

    /// Schemas in ascending id order
    pub fn iter(&self) -> impl Iterator<Item = &Arc<MessageSchema>> + '_ {
        self.messages.values()
    }

    /// Number of registered message types
    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether the registry is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Construct a message by name from values in declaration order
    pub fn message(&self, name: &str, values: Vec<Value>) -> Result<Message> {
        let schema = self.by_name(name).ok_or_else(|| Error::UnknownMessageName {
            name: name.to_owned(),
        })?;
        Message::new(Arc::clone(schema), values)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
