//! BSON element model.
//!
//! Every element on the wire carries a one-byte type tag ([`BsonType`])
//! followed by its payload. [`BsonValue`] is the decoded form of one element.

use std::fmt;

use crate::error::BsonError;

/// BSON element type tag, as written in front of each element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BsonType {
    Double,
    String,
    EmbeddedDocument,
    Array,
    Binary,
    Undefined,
    ObjectId,
    Boolean,
    DateTime,
    Null,
    Regex,
    JavaScript,
    Symbol,
    Int32,
    Timestamp,
    Int64,
    Decimal128,
    MinKey,
    MaxKey,
}

impl BsonType {
    /// Wire tag byte for this element type.
    pub fn tag(self) -> u8 {
        match self {
            BsonType::Double => 0x01,
            BsonType::String => 0x02,
            BsonType::EmbeddedDocument => 0x03,
            BsonType::Array => 0x04,
            BsonType::Binary => 0x05,
            BsonType::Undefined => 0x06,
            BsonType::ObjectId => 0x07,
            BsonType::Boolean => 0x08,
            BsonType::DateTime => 0x09,
            BsonType::Null => 0x0a,
            BsonType::Regex => 0x0b,
            BsonType::JavaScript => 0x0d,
            BsonType::Symbol => 0x0e,
            BsonType::Int32 => 0x10,
            BsonType::Timestamp => 0x11,
            BsonType::Int64 => 0x12,
            BsonType::Decimal128 => 0x13,
            BsonType::MinKey => 0xff,
            BsonType::MaxKey => 0x7f,
        }
    }

    /// Maps a wire tag byte back to its element type.
    pub fn from_tag(tag: u8) -> Option<Self> {
        let typ = match tag {
            0x01 => BsonType::Double,
            0x02 => BsonType::String,
            0x03 => BsonType::EmbeddedDocument,
            0x04 => BsonType::Array,
            0x05 => BsonType::Binary,
            0x06 => BsonType::Undefined,
            0x07 => BsonType::ObjectId,
            0x08 => BsonType::Boolean,
            0x09 => BsonType::DateTime,
            0x0a => BsonType::Null,
            0x0b => BsonType::Regex,
            0x0d => BsonType::JavaScript,
            0x0e => BsonType::Symbol,
            0x10 => BsonType::Int32,
            0x11 => BsonType::Timestamp,
            0x12 => BsonType::Int64,
            0x13 => BsonType::Decimal128,
            0xff => BsonType::MinKey,
            0x7f => BsonType::MaxKey,
            _ => return None,
        };
        Some(typ)
    }
}

impl fmt::Display for BsonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BsonType::Double => "double",
            BsonType::String => "string",
            BsonType::EmbeddedDocument => "embedded document",
            BsonType::Array => "array",
            BsonType::Binary => "binary",
            BsonType::Undefined => "undefined",
            BsonType::ObjectId => "objectID",
            BsonType::Boolean => "boolean",
            BsonType::DateTime => "UTC datetime",
            BsonType::Null => "null",
            BsonType::Regex => "regex",
            BsonType::JavaScript => "javascript",
            BsonType::Symbol => "symbol",
            BsonType::Int32 => "32-bit integer",
            BsonType::Timestamp => "timestamp",
            BsonType::Int64 => "64-bit integer",
            BsonType::Decimal128 => "128-bit decimal",
            BsonType::MinKey => "min key",
            BsonType::MaxKey => "max key",
        };
        write!(f, "{name}")
    }
}

/// BSON ObjectId: 12 raw bytes.
///
/// Layout is a 4-byte big-endian creation time in seconds, 5 bytes of
/// per-process randomness and a 3-byte big-endian counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BsonObjectId {
    bytes: [u8; 12],
}

impl BsonObjectId {
    pub const LEN: usize = 12;

    pub fn from_bytes(bytes: [u8; 12]) -> Self {
        Self { bytes }
    }

    /// Assembles an id from its three components. Only the low 40 bits of
    /// `process` and the low 24 bits of `counter` are kept.
    pub fn from_parts(timestamp: u32, process: u64, counter: u32) -> Self {
        let mut bytes = [0u8; 12];
        bytes[0..4].copy_from_slice(&timestamp.to_be_bytes());
        bytes[4..9].copy_from_slice(&process.to_be_bytes()[3..8]);
        bytes[9..12].copy_from_slice(&counter.to_be_bytes()[1..4]);
        Self { bytes }
    }

    /// Parses a 24-character hexadecimal string (either case).
    pub fn from_hex(s: &str) -> Result<Self, BsonError> {
        let mut bytes = [0u8; 12];
        hex::decode_to_slice(s, &mut bytes).map_err(|_| BsonError::InvalidHex(s.to_owned()))?;
        Ok(Self { bytes })
    }

    /// Renders the id as 24 lowercase hexadecimal characters.
    pub fn to_hex(&self) -> String {
        hex::encode(self.bytes)
    }

    pub fn bytes(&self) -> [u8; 12] {
        self.bytes
    }

    /// Creation time in seconds since the Unix epoch.
    pub fn timestamp(&self) -> u32 {
        u32::from_be_bytes([self.bytes[0], self.bytes[1], self.bytes[2], self.bytes[3]])
    }

    pub fn counter(&self) -> u32 {
        u32::from_be_bytes([0, self.bytes[9], self.bytes[10], self.bytes[11]])
    }
}

impl fmt::Display for BsonObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// BSON Timestamp (MongoDB internal replication timestamp).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BsonTimestamp {
    pub increment: u32,
    pub timestamp: u32,
}

/// BSON Binary data (subtype + raw bytes).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BsonBinary {
    pub subtype: u8,
    pub data: Vec<u8>,
}

impl BsonBinary {
    /// Generic binary subtype.
    pub const GENERIC: u8 = 0x00;
    /// Deprecated binary subtype whose payload carries its own length prefix.
    pub const OLD: u8 = 0x02;

    pub fn generic(data: Vec<u8>) -> Self {
        Self {
            subtype: Self::GENERIC,
            data,
        }
    }
}

/// A BSON value that can appear as a document field value.
#[derive(Debug, Clone, PartialEq)]
pub enum BsonValue {
    /// BSON double (0x01)
    Float(f64),
    /// BSON UTF-8 string (0x02)
    Str(String),
    /// Embedded BSON document (0x03)
    Document(Vec<(String, BsonValue)>),
    /// BSON array (0x04)
    Array(Vec<BsonValue>),
    /// BSON binary data (0x05)
    Binary(BsonBinary),
    /// BSON undefined (deprecated) (0x06)
    Undefined,
    /// BSON ObjectId (0x07)
    ObjectId(BsonObjectId),
    /// BSON boolean (0x08)
    Boolean(bool),
    /// BSON UTC datetime (milliseconds since epoch) (0x09)
    DateTime(i64),
    /// BSON null (0x0a)
    Null,
    /// BSON regular expression: pattern, options (0x0b)
    Regex(String, String),
    /// BSON JavaScript code (0x0d)
    JavaScript(String),
    /// BSON Symbol (deprecated) (0x0e)
    Symbol(String),
    /// BSON int32 (0x10)
    Int32(i32),
    /// BSON Timestamp (0x11)
    Timestamp(BsonTimestamp),
    /// BSON int64 (0x12)
    Int64(i64),
    /// BSON Decimal128, raw little-endian bytes (0x13)
    Decimal128([u8; 16]),
    /// BSON MinKey (0xFF)
    MinKey,
    /// BSON MaxKey (0x7F)
    MaxKey,
}

impl BsonValue {
    /// The wire tag this value is written with.
    pub fn element_type(&self) -> BsonType {
        match self {
            BsonValue::Float(_) => BsonType::Double,
            BsonValue::Str(_) => BsonType::String,
            BsonValue::Document(_) => BsonType::EmbeddedDocument,
            BsonValue::Array(_) => BsonType::Array,
            BsonValue::Binary(_) => BsonType::Binary,
            BsonValue::Undefined => BsonType::Undefined,
            BsonValue::ObjectId(_) => BsonType::ObjectId,
            BsonValue::Boolean(_) => BsonType::Boolean,
            BsonValue::DateTime(_) => BsonType::DateTime,
            BsonValue::Null => BsonType::Null,
            BsonValue::Regex(..) => BsonType::Regex,
            BsonValue::JavaScript(_) => BsonType::JavaScript,
            BsonValue::Symbol(_) => BsonType::Symbol,
            BsonValue::Int32(_) => BsonType::Int32,
            BsonValue::Timestamp(_) => BsonType::Timestamp,
            BsonValue::Int64(_) => BsonType::Int64,
            BsonValue::Decimal128(_) => BsonType::Decimal128,
            BsonValue::MinKey => BsonType::MinKey,
            BsonValue::MaxKey => BsonType::MaxKey,
        }
    }
}
