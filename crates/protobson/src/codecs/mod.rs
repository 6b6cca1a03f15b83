//! Codecs for native scalars and the well-known message types.

mod list;
pub(crate) mod native;
mod null;
mod object_id;
mod timestamp;
mod value;
mod wrapper;

pub use list::ListValueCodec;
pub use native::{
    BooleanCodec, ByteSliceCodec, DateTimeCodec, FloatCodec, IntCodec, ObjectIdPrimitiveCodec,
    StringCodec, UintCodec,
};
pub use null::NullValueCodec;
pub use object_id::ObjectIdCodec;
pub use timestamp::TimestampCodec;
pub use value::ValueCodec;
pub use wrapper::WrapperCodec;
