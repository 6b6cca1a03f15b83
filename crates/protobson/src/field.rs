//! Dynamic carriers handed to and returned from codecs.
//!
//! Decoding produces an owned [`Field`]. Encoding borrows through a
//! [`FieldRef`], so a codec can hand a nested payload to another codec
//! without cloning the subtree.

use chrono::{DateTime, Utc};
use protobson_wire::BsonObjectId;

use crate::descriptor::TypeDescriptor;
use crate::types::{
    BoolValue, BytesValue, DoubleValue, FloatValue, Int32Value, Int64Value, ListValue, NullValue,
    ObjectId, StringValue, Struct, Timestamp, UInt32Value, UInt64Value, Value,
};

/// An owned value of any registered type.
#[derive(Debug, Clone, PartialEq)]
pub enum Field {
    Bool(bool),
    Bytes(Vec<u8>),
    Double(f64),
    Float(f32),
    Int32(i32),
    Int64(i64),
    String(String),
    UInt32(u32),
    UInt64(u64),
    DateTime(DateTime<Utc>),
    BsonObjectId(BsonObjectId),
    BoolValue(BoolValue),
    BytesValue(BytesValue),
    DoubleValue(DoubleValue),
    FloatValue(FloatValue),
    Int32Value(Int32Value),
    Int64Value(Int64Value),
    StringValue(StringValue),
    UInt32Value(UInt32Value),
    UInt64Value(UInt64Value),
    Timestamp(Timestamp),
    ObjectId(ObjectId),
    NullValue(NullValue),
    ListValue(ListValue),
    Struct(Struct),
    Value(Value),
}

/// A borrowed value of any registered type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldRef<'a> {
    Bool(bool),
    Bytes(&'a [u8]),
    Double(f64),
    Float(f32),
    Int32(i32),
    Int64(i64),
    String(&'a str),
    UInt32(u32),
    UInt64(u64),
    DateTime(DateTime<Utc>),
    BsonObjectId(BsonObjectId),
    BoolValue(&'a BoolValue),
    BytesValue(&'a BytesValue),
    DoubleValue(&'a DoubleValue),
    FloatValue(&'a FloatValue),
    Int32Value(&'a Int32Value),
    Int64Value(&'a Int64Value),
    StringValue(&'a StringValue),
    UInt32Value(&'a UInt32Value),
    UInt64Value(&'a UInt64Value),
    Timestamp(&'a Timestamp),
    ObjectId(&'a ObjectId),
    NullValue(NullValue),
    ListValue(&'a ListValue),
    Struct(&'a Struct),
    Value(&'a Value),
}

impl Field {
    pub fn descriptor(&self) -> TypeDescriptor {
        self.as_field_ref().descriptor()
    }

    pub fn as_field_ref(&self) -> FieldRef<'_> {
        match self {
            Field::Bool(v) => FieldRef::Bool(*v),
            Field::Bytes(v) => FieldRef::Bytes(v),
            Field::Double(v) => FieldRef::Double(*v),
            Field::Float(v) => FieldRef::Float(*v),
            Field::Int32(v) => FieldRef::Int32(*v),
            Field::Int64(v) => FieldRef::Int64(*v),
            Field::String(v) => FieldRef::String(v),
            Field::UInt32(v) => FieldRef::UInt32(*v),
            Field::UInt64(v) => FieldRef::UInt64(*v),
            Field::DateTime(v) => FieldRef::DateTime(*v),
            Field::BsonObjectId(v) => FieldRef::BsonObjectId(*v),
            Field::BoolValue(v) => FieldRef::BoolValue(v),
            Field::BytesValue(v) => FieldRef::BytesValue(v),
            Field::DoubleValue(v) => FieldRef::DoubleValue(v),
            Field::FloatValue(v) => FieldRef::FloatValue(v),
            Field::Int32Value(v) => FieldRef::Int32Value(v),
            Field::Int64Value(v) => FieldRef::Int64Value(v),
            Field::StringValue(v) => FieldRef::StringValue(v),
            Field::UInt32Value(v) => FieldRef::UInt32Value(v),
            Field::UInt64Value(v) => FieldRef::UInt64Value(v),
            Field::Timestamp(v) => FieldRef::Timestamp(v),
            Field::ObjectId(v) => FieldRef::ObjectId(v),
            Field::NullValue(v) => FieldRef::NullValue(*v),
            Field::ListValue(v) => FieldRef::ListValue(v),
            Field::Struct(v) => FieldRef::Struct(v),
            Field::Value(v) => FieldRef::Value(v),
        }
    }

    /// Re-wraps a decoded inner scalar into the wrapper type `wrapper`.
    pub(crate) fn wrap(wrapper: TypeDescriptor, inner: Field) -> Option<Field> {
        let field = match (wrapper, inner) {
            (TypeDescriptor::BoolValue, Field::Bool(v)) => Field::BoolValue(v.into()),
            (TypeDescriptor::BytesValue, Field::Bytes(v)) => Field::BytesValue(v.into()),
            (TypeDescriptor::DoubleValue, Field::Double(v)) => Field::DoubleValue(v.into()),
            (TypeDescriptor::FloatValue, Field::Float(v)) => Field::FloatValue(v.into()),
            (TypeDescriptor::Int32Value, Field::Int32(v)) => Field::Int32Value(v.into()),
            (TypeDescriptor::Int64Value, Field::Int64(v)) => Field::Int64Value(v.into()),
            (TypeDescriptor::StringValue, Field::String(v)) => Field::StringValue(v.into()),
            (TypeDescriptor::UInt32Value, Field::UInt32(v)) => Field::UInt32Value(v.into()),
            (TypeDescriptor::UInt64Value, Field::UInt64(v)) => Field::UInt64Value(v.into()),
            _ => return None,
        };
        Some(field)
    }
}

impl<'a> FieldRef<'a> {
    pub fn descriptor(&self) -> TypeDescriptor {
        match self {
            FieldRef::Bool(_) => TypeDescriptor::Bool,
            FieldRef::Bytes(_) => TypeDescriptor::Bytes,
            FieldRef::Double(_) => TypeDescriptor::Double,
            FieldRef::Float(_) => TypeDescriptor::Float,
            FieldRef::Int32(_) => TypeDescriptor::Int32,
            FieldRef::Int64(_) => TypeDescriptor::Int64,
            FieldRef::String(_) => TypeDescriptor::String,
            FieldRef::UInt32(_) => TypeDescriptor::UInt32,
            FieldRef::UInt64(_) => TypeDescriptor::UInt64,
            FieldRef::DateTime(_) => TypeDescriptor::DateTime,
            FieldRef::BsonObjectId(_) => TypeDescriptor::BsonObjectId,
            FieldRef::BoolValue(_) => TypeDescriptor::BoolValue,
            FieldRef::BytesValue(_) => TypeDescriptor::BytesValue,
            FieldRef::DoubleValue(_) => TypeDescriptor::DoubleValue,
            FieldRef::FloatValue(_) => TypeDescriptor::FloatValue,
            FieldRef::Int32Value(_) => TypeDescriptor::Int32Value,
            FieldRef::Int64Value(_) => TypeDescriptor::Int64Value,
            FieldRef::StringValue(_) => TypeDescriptor::StringValue,
            FieldRef::UInt32Value(_) => TypeDescriptor::UInt32Value,
            FieldRef::UInt64Value(_) => TypeDescriptor::UInt64Value,
            FieldRef::Timestamp(_) => TypeDescriptor::Timestamp,
            FieldRef::ObjectId(_) => TypeDescriptor::ObjectId,
            FieldRef::NullValue(_) => TypeDescriptor::NullValue,
            FieldRef::ListValue(_) => TypeDescriptor::ListValue,
            FieldRef::Struct(_) => TypeDescriptor::Struct,
            FieldRef::Value(v) => TypeDescriptor::Value(v.kind()),
        }
    }

    /// For a wrapper, borrows its single inner field.
    pub(crate) fn unwrap_wrapper(self) -> Option<FieldRef<'a>> {
        let inner = match self {
            FieldRef::BoolValue(w) => FieldRef::Bool(w.value),
            FieldRef::BytesValue(w) => FieldRef::Bytes(&w.value),
            FieldRef::DoubleValue(w) => FieldRef::Double(w.value),
            FieldRef::FloatValue(w) => FieldRef::Float(w.value),
            FieldRef::Int32Value(w) => FieldRef::Int32(w.value),
            FieldRef::Int64Value(w) => FieldRef::Int64(w.value),
            FieldRef::StringValue(w) => FieldRef::String(&w.value),
            FieldRef::UInt32Value(w) => FieldRef::UInt32(w.value),
            FieldRef::UInt64Value(w) => FieldRef::UInt64(w.value),
            _ => return None,
        };
        Some(inner)
    }
}

macro_rules! impl_from_for_field {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(
            impl From<$ty> for Field {
                fn from(v: $ty) -> Self {
                    Field::$variant(v)
                }
            }
        )*
    };
}

impl_from_for_field!(
    Bool(bool),
    Bytes(Vec<u8>),
    Double(f64),
    Float(f32),
    Int32(i32),
    Int64(i64),
    String(String),
    UInt32(u32),
    UInt64(u64),
    DateTime(DateTime<Utc>),
    BsonObjectId(BsonObjectId),
    BoolValue(BoolValue),
    BytesValue(BytesValue),
    DoubleValue(DoubleValue),
    FloatValue(FloatValue),
    Int32Value(Int32Value),
    Int64Value(Int64Value),
    StringValue(StringValue),
    UInt32Value(UInt32Value),
    UInt64Value(UInt64Value),
    Timestamp(Timestamp),
    ObjectId(ObjectId),
    NullValue(NullValue),
    ListValue(ListValue),
    Struct(Struct),
    Value(Value),
);
