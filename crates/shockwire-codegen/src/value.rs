//! Decoded packet objects and their field values.

use std::fmt;

use indexmap::IndexMap;

/// One decoded (or to-be-encoded) field value.
///
/// `string` and `text` differ only on the wire; both carry a
/// [`FieldValue::Str`] in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// Value of an `int` field.
    Int(u32),
    /// Value of a `short` field.
    Short(u16),
    /// Value of a `bool` field.
    Bool(bool),
    /// Value of a `string` or `text` field.
    Str(String),
}

impl FieldValue {
    /// The numeric bits of this value, for combine folds.
    pub(crate) fn to_bits(&self) -> Option<u64> {
        match self {
            Self::Int(v) => Some(u64::from(*v)),
            Self::Short(v) => Some(u64::from(*v)),
            Self::Bool(v) => Some(u64::from(*v)),
            Self::Str(_) => None,
        }
    }

    /// A short kind label for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Int(_) => "int",
            Self::Short(_) => "short",
            Self::Bool(_) => "bool",
            Self::Str(_) => "str",
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Short(v) => write!(f, "{v}"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Str(v) => write!(f, "{v:?}"),
        }
    }
}

impl From<u32> for FieldValue {
    fn from(v: u32) -> Self {
        Self::Int(v)
    }
}

impl From<u16> for FieldValue {
    fn from(v: u16) -> Self {
        Self::Short(v)
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        Self::Str(v.to_owned())
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

/// A fully-owned in-memory packet object.
///
/// Decoders produce these; encoders consume them. Field order matches
/// wire order, which matters only for display and diffing; lookups are
/// by name.
#[derive(Debug, Clone, PartialEq)]
pub struct Packet {
    /// Numeric discriminator the packet decodes from / encodes under.
    pub id: u32,
    /// Dotted logical name from the schema.
    pub name: String,
    /// Bound fields in wire order.
    pub fields: IndexMap<String, FieldValue>,
}

impl Packet {
    /// An empty packet object for composing an outgoing message.
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            fields: IndexMap::new(),
        }
    }

    /// Builder-style field insertion.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Looks up a bound field.
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_preserves_insertion_order() {
        let packet = Packet::new(5, "Handshake.VersionCheck")
            .with("VersionId", 42u32)
            .with("ClientUrl", "http://example.invalid");
        let names: Vec<&str> = packet.fields.keys().map(String::as_str).collect();
        assert_eq!(names, ["VersionId", "ClientUrl"]);
        assert_eq!(packet.get("VersionId"), Some(&FieldValue::Int(42)));
    }

    #[test]
    fn test_to_bits_covers_numeric_kinds_only() {
        assert_eq!(FieldValue::Int(7).to_bits(), Some(7));
        assert_eq!(FieldValue::Short(7).to_bits(), Some(7));
        assert_eq!(FieldValue::Bool(true).to_bits(), Some(1));
        assert_eq!(FieldValue::from("x").to_bits(), None);
    }
}
