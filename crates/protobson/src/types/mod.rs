//! In-memory message types handled by the codecs.

mod json;
mod object_id;
mod timestamp;
mod value;
mod wrappers;

pub use object_id::ObjectId;
pub use timestamp::Timestamp;
pub use value::{ListValue, NullValue, Struct, Value};
pub use wrappers::{
    BoolValue, BytesValue, DoubleValue, FloatValue, Int32Value, Int64Value, StringValue,
    UInt32Value, UInt64Value,
};
