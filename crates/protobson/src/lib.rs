//! BSON codecs for the protobuf well-known types.
//!
//! [`register`] adds codecs for the scalar wrappers (`StringValue`,
//! `Int64Value`, ...), `Timestamp`, `ObjectId`, `NullValue`, `ListValue` and
//! every `Value` variant to a [`RegistryBuilder`]. The resulting
//! [`Registry`] marshals [`Record`]s to BSON documents and back:
//!
//! ```
//! use protobson::{register, Record, RegistryBuilder, Schema, StringValue, TypeDescriptor};
//!
//! let registry = register(RegistryBuilder::with_defaults()).build();
//! let record = Record::new().with("name", StringValue::new("helo"));
//! let bytes = registry.marshal(&record)?;
//!
//! let schema = Schema::new().field("name", TypeDescriptor::StringValue);
//! assert_eq!(registry.unmarshal(&bytes, &schema)?, record);
//! # Ok::<(), protobson::CodecError>(())
//! ```
//!
//! `Struct` has no codec. Encoding or decoding one, directly or as a list
//! element, fails with [`CodecError::UnregisteredType`].

pub mod codecs;
mod descriptor;
mod error;
mod field;
mod options;
mod record;
mod registry;
pub mod types;

use std::sync::Arc;

pub use descriptor::{TypeDescriptor, ValueKind};
pub use error::CodecError;
pub use field::{Field, FieldRef};
pub use options::EncodeOptions;
pub use record::{Record, Schema};
pub use registry::{Codec, DecodeContext, EncodeContext, Registry, RegistryBuilder};
pub use types::{
    BoolValue, BytesValue, DoubleValue, FloatValue, Int32Value, Int64Value, ListValue, NullValue,
    ObjectId, StringValue, Struct, Timestamp, UInt32Value, UInt64Value, Value,
};

use codecs::{
    ListValueCodec, NullValueCodec, ObjectIdCodec, TimestampCodec, ValueCodec, WrapperCodec,
};

/// Binds the well-known type codecs on top of `builder`.
///
/// Wrapper, `Timestamp` and `ObjectId` codecs delegate to whatever codecs
/// `builder` already holds for their inner scalars, so pass a builder from
/// [`RegistryBuilder::with_defaults`] unless those are supplied separately.
pub fn register(builder: RegistryBuilder) -> RegistryBuilder {
    let wrapper: Arc<dyn Codec> = Arc::new(WrapperCodec);
    let value: Arc<dyn Codec> = Arc::new(ValueCodec);
    let builder = TypeDescriptor::WRAPPERS
        .into_iter()
        .fold(builder, |b, ty| b.register(ty, wrapper.clone()));
    let builder = ValueKind::ALL
        .into_iter()
        .fold(builder, |b, kind| b.register(TypeDescriptor::Value(kind), value.clone()));
    builder
        .register(TypeDescriptor::Timestamp, Arc::new(TimestampCodec))
        .register(TypeDescriptor::ObjectId, Arc::new(ObjectIdCodec))
        .register(TypeDescriptor::ListValue, Arc::new(ListValueCodec))
        .register(TypeDescriptor::NullValue, Arc::new(NullValueCodec))
}
