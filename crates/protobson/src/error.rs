//! Codec error type.

use protobson_wire::{BsonError, BsonType};
use thiserror::Error;

use crate::descriptor::TypeDescriptor;

/// Every failure is fatal to the encode/decode call that raised it.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CodecError {
    #[error("no codec registered for {0}")]
    UnregisteredType(TypeDescriptor),
    #[error("no encoder found for {inner} wrapped by {wrapper}")]
    NoEncoder {
        wrapper: TypeDescriptor,
        inner: TypeDescriptor,
    },
    #[error("expected BSON {expected}, found {actual}")]
    UnexpectedWireType { expected: BsonType, actual: BsonType },
    #[error("unexpected BSON type in list: {0}")]
    UnsupportedWireType(BsonType),
    #[error("unsupported binary subtype: 0x{0:02x}")]
    UnsupportedBinarySubtype(u8),
    #[error("invalid ObjectId hex string {0:?}")]
    InvalidHex(String),
    #[error("timestamp conversion failed: {0}")]
    TimeConversion(String),
    #[error("{value} does not fit in {target}")]
    Overflow {
        value: String,
        target: TypeDescriptor,
    },
    #[error("{codec} cannot handle {actual}")]
    TypeMismatch {
        codec: &'static str,
        actual: TypeDescriptor,
    },
    #[error("malformed BSON: {0}")]
    Wire(BsonError),
    #[error("JSON mapping failed: {0}")]
    Json(String),
}

impl From<BsonError> for CodecError {
    fn from(err: BsonError) -> Self {
        match err {
            BsonError::UnexpectedType { expected, actual } => {
                CodecError::UnexpectedWireType { expected, actual }
            }
            BsonError::InvalidHex(s) => CodecError::InvalidHex(s),
            other => CodecError::Wire(other),
        }
    }
}
