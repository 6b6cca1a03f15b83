use protobson_wire::{ValueReader, ValueWriter};

use crate::descriptor::TypeDescriptor;
use crate::error::CodecError;
use crate::field::{Field, FieldRef};
use crate::registry::{Codec, DecodeContext, EncodeContext};
use crate::types::Timestamp;

/// `Timestamp` as a BSON UTC datetime.
///
/// The datetime itself is written by the codec bound to
/// [`TypeDescriptor::DateTime`]. Sub-millisecond precision does not survive
/// the trip.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimestampCodec;

impl Codec for TimestampCodec {
    fn encode(
        &self,
        ctx: &EncodeContext<'_>,
        vw: ValueWriter<'_>,
        val: FieldRef<'_>,
    ) -> Result<(), CodecError> {
        let FieldRef::Timestamp(ts) = val else {
            return Err(CodecError::TypeMismatch {
                codec: "TimestampCodec",
                actual: val.descriptor(),
            });
        };
        let dt = ts.to_datetime()?;
        ctx.lookup_encoder(TypeDescriptor::DateTime)?
            .encode(ctx, vw, FieldRef::DateTime(dt))
    }

    fn decode(
        &self,
        ctx: &DecodeContext<'_>,
        vr: ValueReader<'_>,
        _ty: TypeDescriptor,
    ) -> Result<Field, CodecError> {
        match ctx.decode(vr, TypeDescriptor::DateTime)? {
            Field::DateTime(dt) => Ok(Field::Timestamp(Timestamp::from_datetime(dt)?)),
            other => Err(CodecError::TypeMismatch {
                codec: "TimestampCodec",
                actual: other.descriptor(),
            }),
        }
    }
}
