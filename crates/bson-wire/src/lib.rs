//! BSON (Binary JSON) wire layer.
//!
//! Provides the element model ([`BsonValue`], [`BsonType`]), a document
//! [`BsonEncoder`]/[`BsonDecoder`] pair, and the value-level reader/writer
//! primitives that codecs are written against.

pub mod decoder;
pub mod encoder;
pub mod error;
pub mod rw;
pub mod values;

pub use decoder::BsonDecoder;
pub use encoder::BsonEncoder;
pub use error::BsonError;
pub use rw::{ArrayReader, ArrayWriter, DocumentReader, DocumentWriter, ValueReader, ValueWriter};
pub use values::{BsonBinary, BsonObjectId, BsonTimestamp, BsonType, BsonValue};
