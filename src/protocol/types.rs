//! MAVLink primitive field types and values

use std::fmt;
use std::str::FromStr;

use super::Error;

/// Byte order used for multi-byte payload fields
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Endianness {
    /// Little-endian (MAVLink reference configuration)
    #[default]
    Little,
    /// Big-endian
    Big,
}

impl Endianness {
    /// Struct format prefix character.
    #[must_use]
    pub const fn format_char(self) -> char {
        match self {
            Self::Little => '<',
            Self::Big => '>',
        }
    }
}

/// MAVLink primitive field types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum FieldType {
    /// `char`
    Char = 0,
    /// `uint8_t`
    UInt8 = 1,
    /// `int8_t`
    Int8 = 2,
    /// `uint16_t`
    UInt16 = 3,
    /// `int16_t`
    Int16 = 4,
    /// `uint32_t`
    UInt32 = 5,
    /// `int32_t`
    Int32 = 6,
    /// `uint64_t`
    UInt64 = 7,
    /// `int64_t`
    Int64 = 8,
    /// `float`
    Float = 9,
    /// `double`
    Double = 10,
}

impl FieldType {
    /// Width of one element in bytes
    #[must_use]
    pub const fn size(self) -> usize {
        match self {
            Self::Char | Self::UInt8 | Self::Int8 => 1,
            Self::UInt16 | Self::Int16 => 2,
            Self::UInt32 | Self::Int32 | Self::Float => 4,
            Self::UInt64 | Self::Int64 | Self::Double => 8,
        }
    }

    /// C type name, as it appears in message definitions
    #[must_use]
    pub const fn c_name(self) -> &'static str {
        match self {
            Self::Char => "char",
            Self::UInt8 => "uint8_t",
            Self::Int8 => "int8_t",
            Self::UInt16 => "uint16_t",
            Self::Int16 => "int16_t",
            Self::UInt32 => "uint32_t",
            Self::Int32 => "int32_t",
            Self::UInt64 => "uint64_t",
            Self::Int64 => "int64_t",
            Self::Float => "float",
            Self::Double => "double",
        }
    }

    /// Struct format character
    #[must_use]
    pub const fn format_char(self) -> char {
        match self {
            Self::Char => 'c',
            Self::UInt8 => 'B',
            Self::Int8 => 'b',
            Self::UInt16 => 'H',
            Self::Int16 => 'h',
            Self::UInt32 => 'I',
            Self::Int32 => 'i',
            Self::UInt64 => 'Q',
            Self::Int64 => 'q',
            Self::Float => 'f',
            Self::Double => 'd',
        }
    }

    /// Whether arrays of this type travel as raw byte strings
    #[must_use]
    pub const fn is_byte_like(self) -> bool {
        matches!(self, Self::Char | Self::UInt8 | Self::Int8)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.c_name())
    }
}

impl FromStr for FieldType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "char" => Ok(Self::Char),
            "uint8_t" | "uint8_t_mavlink_version" => Ok(Self::UInt8),
            "int8_t" => Ok(Self::Int8),
            "uint16_t" => Ok(Self::UInt16),
            "int16_t" => Ok(Self::Int16),
            "uint32_t" => Ok(Self::UInt32),
            "int32_t" => Ok(Self::Int32),
            "uint64_t" => Ok(Self::UInt64),
            "int64_t" => Ok(Self::Int64),
            "float" => Ok(Self::Float),
            "double" => Ok(Self::Double),
            other => Err(Error::UnknownFieldType(other.to_owned())),
        }
    }
}

/// A single field value
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Value {
    /// `char`
    Char(u8),
    /// `uint8_t`
    UInt8(u8),
    /// `int8_t`
    Int8(i8),
    /// `uint16_t`
    UInt16(u16),
    /// `int16_t`
    Int16(i16),
    /// `uint32_t`
    UInt32(u32),
    /// `int32_t`
    Int32(i32),
    /// `uint64_t`
    UInt64(u64),
    /// `int64_t`
    Int64(i64),
    /// `float`
    Float(f32),
    /// `double`
    Double(f64),
    /// Fixed-size `char`, `int8_t` or `uint8_t` array, carried as raw bytes
    Bytes(Vec<u8>),
    /// Fixed-size array of a wider type
    Array(Vec<Value>),
}

impl Value {
    /// Zero value for a scalar of the given type
    #[must_use]
    pub const fn zero(field_type: FieldType) -> Self {
        match field_type {
            FieldType::Char => Self::Char(0),
            FieldType::UInt8 => Self::UInt8(0),
            FieldType::Int8 => Self::Int8(0),
            FieldType::UInt16 => Self::UInt16(0),
            FieldType::Int16 => Self::Int16(0),
            FieldType::UInt32 => Self::UInt32(0),
            FieldType::Int32 => Self::Int32(0),
            FieldType::UInt64 => Self::UInt64(0),
            FieldType::Int64 => Self::Int64(0),
            FieldType::Float => Self::Float(0.0),
            FieldType::Double => Self::Double(0.0),
        }
    }

    /// Scalar type of this value, `None` for arrays and byte strings
    #[must_use]
    pub const fn scalar_type(&self) -> Option<FieldType> {
        match self {
            Self::Char(_) => Some(FieldType::Char),
            Self::UInt8(_) => Some(FieldType::UInt8),
            Self::Int8(_) => Some(FieldType::Int8),
            Self::UInt16(_) => Some(FieldType::UInt16),
            Self::Int16(_) => Some(FieldType::Int16),
            Self::UInt32(_) => Some(FieldType::UInt32),
            Self::Int32(_) => Some(FieldType::Int32),
            Self::UInt64(_) => Some(FieldType::UInt64),
            Self::Int64(_) => Some(FieldType::Int64),
            Self::Float(_) => Some(FieldType::Float),
            Self::Double(_) => Some(FieldType::Double),
            Self::Bytes(_) | Self::Array(_) => None,
        }
    }

    /// Unsigned integer view of an integer scalar
    #[must_use]
    pub fn as_u64(&self) -> Option<u64> {
        match *self {
            Self::Char(v) | Self::UInt8(v) => Some(u64::from(v)),
            Self::UInt16(v) => Some(u64::from(v)),
            Self::UInt32(v) => Some(u64::from(v)),
            Self::UInt64(v) => Some(v),
            Self::Int8(v) => u64::try_from(v).ok(),
            Self::Int16(v) => u64::try_from(v).ok(),
            Self::Int32(v) => u64::try_from(v).ok(),
            Self::Int64(v) => u64::try_from(v).ok(),
            _ => None,
        }
    }

    /// Signed integer view of an integer scalar
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Self::Int8(v) => Some(i64::from(v)),
            Self::Int16(v) => Some(i64::from(v)),
            Self::Int32(v) => Some(i64::from(v)),
            Self::Int64(v) => Some(v),
            Self::UInt64(v) => i64::try_from(v).ok(),
            _ => self.as_u64().and_then(|v| i64::try_from(v).ok()),
        }
    }

    /// Floating point view of a numeric scalar
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Self::Float(v) => Some(f64::from(v)),
            Self::Double(v) => Some(v),
            Self::UInt64(v) => Some(v as f64),
            Self::Int64(v) => Some(v as f64),
            _ => self.as_i64().map(|v| v as f64),
        }
    }

    /// Text view of a byte string, up to the first NUL
    ///
    /// Returns `None` for non byte-string values or invalid UTF-8.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Bytes(bytes) => {
                let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
                std::str::from_utf8(&bytes[..end]).ok()
            }
            _ => None,
        }
    }

    /// Raw bytes of a byte string
    #[must_use]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(bytes) => Some(bytes),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Bytes(value.as_bytes().to_vec())
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Self::Bytes(value)
    }
}

macro_rules! impl_from_scalar {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Self::$variant(value)
                }
            }
        )*
    };
}

impl_from_scalar!(
    u8 => UInt8,
    i8 => Int8,
    u16 => UInt16,
    i16 => Int16,
    u32 => UInt32,
    i32 => Int32,
    u64 => UInt64,
    i64 => Int64,
    f32 => Float,
    f64 => Double,
);

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Char(v) => write!(f, "{:?}", char::from(*v)),
            Self::UInt8(v) => write!(f, "{v}"),
            Self::Int8(v) => write!(f, "{v}"),
            Self::UInt16(v) => write!(f, "{v}"),
            Self::Int16(v) => write!(f, "{v}"),
            Self::UInt32(v) => write!(f, "{v}"),
            Self::Int32(v) => write!(f, "{v}"),
            Self::UInt64(v) => write!(f, "{v}"),
            Self::Int64(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Double(v) => write!(f, "{v}"),
            Self::Bytes(bytes) => match self.as_str() {
                Some(text) => write!(f, "{text:?}"),
                None => write!(f, "{bytes:02x?}"),
            },
            Self::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
        }
    }
}
