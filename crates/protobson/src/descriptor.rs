//! Closed set of runtime type descriptors the registry is keyed by.

use std::fmt;

/// Identifies one in-memory shape a codec can be bound to.
///
/// The first block are the native scalars the host layer provides codecs
/// for. The rest are the well-known message types this crate adds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeDescriptor {
    Bool,
    Bytes,
    Double,
    Float,
    Int32,
    Int64,
    String,
    UInt32,
    UInt64,
    /// UTC point in time (`chrono::DateTime<Utc>`).
    DateTime,
    /// Raw 12-byte BSON ObjectId.
    BsonObjectId,

    BoolValue,
    BytesValue,
    DoubleValue,
    FloatValue,
    Int32Value,
    Int64Value,
    StringValue,
    UInt32Value,
    UInt64Value,
    Timestamp,
    ObjectId,
    NullValue,
    ListValue,
    Struct,
    /// One variant shape of the `Value` union.
    Value(ValueKind),
}

/// Variant tag of the `Value` union.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Null,
    Bool,
    Number,
    String,
    List,
    Struct,
}

impl ValueKind {
    pub const ALL: [ValueKind; 6] = [
        ValueKind::Null,
        ValueKind::Bool,
        ValueKind::Number,
        ValueKind::String,
        ValueKind::List,
        ValueKind::Struct,
    ];

    /// Static type of the payload carried by this variant.
    pub fn payload(self) -> TypeDescriptor {
        match self {
            ValueKind::Null => TypeDescriptor::NullValue,
            ValueKind::Bool => TypeDescriptor::Bool,
            ValueKind::Number => TypeDescriptor::Double,
            ValueKind::String => TypeDescriptor::String,
            ValueKind::List => TypeDescriptor::ListValue,
            ValueKind::Struct => TypeDescriptor::Struct,
        }
    }
}

impl TypeDescriptor {
    /// The nine single-field scalar wrappers.
    pub const WRAPPERS: [TypeDescriptor; 9] = [
        TypeDescriptor::BoolValue,
        TypeDescriptor::BytesValue,
        TypeDescriptor::DoubleValue,
        TypeDescriptor::FloatValue,
        TypeDescriptor::Int32Value,
        TypeDescriptor::Int64Value,
        TypeDescriptor::StringValue,
        TypeDescriptor::UInt32Value,
        TypeDescriptor::UInt64Value,
    ];

    /// For a wrapper type, the type of its single inner field.
    pub fn wrapped(self) -> Option<TypeDescriptor> {
        let inner = match self {
            TypeDescriptor::BoolValue => TypeDescriptor::Bool,
            TypeDescriptor::BytesValue => TypeDescriptor::Bytes,
            TypeDescriptor::DoubleValue => TypeDescriptor::Double,
            TypeDescriptor::FloatValue => TypeDescriptor::Float,
            TypeDescriptor::Int32Value => TypeDescriptor::Int32,
            TypeDescriptor::Int64Value => TypeDescriptor::Int64,
            TypeDescriptor::StringValue => TypeDescriptor::String,
            TypeDescriptor::UInt32Value => TypeDescriptor::UInt32,
            TypeDescriptor::UInt64Value => TypeDescriptor::UInt64,
            _ => return None,
        };
        Some(inner)
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Null => "null_value",
            ValueKind::Bool => "bool_value",
            ValueKind::Number => "number_value",
            ValueKind::String => "string_value",
            ValueKind::List => "list_value",
            ValueKind::Struct => "struct_value",
        };
        f.write_str(name)
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TypeDescriptor::Bool => "bool",
            TypeDescriptor::Bytes => "bytes",
            TypeDescriptor::Double => "double",
            TypeDescriptor::Float => "float",
            TypeDescriptor::Int32 => "int32",
            TypeDescriptor::Int64 => "int64",
            TypeDescriptor::String => "string",
            TypeDescriptor::UInt32 => "uint32",
            TypeDescriptor::UInt64 => "uint64",
            TypeDescriptor::DateTime => "datetime",
            TypeDescriptor::BsonObjectId => "bson.ObjectId",
            TypeDescriptor::BoolValue => "google.protobuf.BoolValue",
            TypeDescriptor::BytesValue => "google.protobuf.BytesValue",
            TypeDescriptor::DoubleValue => "google.protobuf.DoubleValue",
            TypeDescriptor::FloatValue => "google.protobuf.FloatValue",
            TypeDescriptor::Int32Value => "google.protobuf.Int32Value",
            TypeDescriptor::Int64Value => "google.protobuf.Int64Value",
            TypeDescriptor::StringValue => "google.protobuf.StringValue",
            TypeDescriptor::UInt32Value => "google.protobuf.UInt32Value",
            TypeDescriptor::UInt64Value => "google.protobuf.UInt64Value",
            TypeDescriptor::Timestamp => "google.protobuf.Timestamp",
            TypeDescriptor::ObjectId => "ObjectId",
            TypeDescriptor::NullValue => "google.protobuf.NullValue",
            TypeDescriptor::ListValue => "google.protobuf.ListValue",
            TypeDescriptor::Struct => "google.protobuf.Struct",
            TypeDescriptor::Value(kind) => return write!(f, "google.protobuf.Value.{kind}"),
        };
        f.write_str(name)
    }
}
