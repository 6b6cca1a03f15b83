//! BSON wire error type.

use thiserror::Error;

use crate::values::BsonType;

/// Error type for BSON reading, writing and decoding.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BsonError {
    #[error("unexpected end of input")]
    UnexpectedEof,
    #[error("unsupported BSON element type: 0x{0:02x}")]
    UnsupportedType(u8),
    #[error("invalid UTF-8")]
    InvalidUtf8,
    #[error("invalid document length: {0}")]
    InvalidLength(i32),
    #[error("expected BSON {expected}, found {actual}")]
    UnexpectedType { expected: BsonType, actual: BsonType },
    #[error("field name {0:?} contains a null byte")]
    InvalidKey(String),
    #[error("no value written for field {0:?}")]
    MissingValue(String),
    #[error("invalid ObjectId hex string {0:?}")]
    InvalidHex(String),
}
