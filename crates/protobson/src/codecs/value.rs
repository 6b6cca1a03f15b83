use protobson_wire::{ValueReader, ValueWriter};

use crate::descriptor::TypeDescriptor;
use crate::error::CodecError;
use crate::field::{Field, FieldRef};
use crate::registry::{Codec, DecodeContext, EncodeContext};
use crate::types::Value;

/// Any `Value` variant, written as the bare payload of that variant.
///
/// Bound once per [`ValueKind`](crate::ValueKind). On decode the requested
/// descriptor names the variant to build.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValueCodec;

impl Codec for ValueCodec {
    fn encode(
        &self,
        ctx: &EncodeContext<'_>,
        vw: ValueWriter<'_>,
        val: FieldRef<'_>,
    ) -> Result<(), CodecError> {
        match val {
            FieldRef::Value(v) => ctx.encode(vw, v.payload()),
            other => Err(CodecError::TypeMismatch {
                codec: "ValueCodec",
                actual: other.descriptor(),
            }),
        }
    }

    fn decode(
        &self,
        ctx: &DecodeContext<'_>,
        vr: ValueReader<'_>,
        ty: TypeDescriptor,
    ) -> Result<Field, CodecError> {
        let TypeDescriptor::Value(kind) = ty else {
            return Err(CodecError::TypeMismatch {
                codec: "ValueCodec",
                actual: ty,
            });
        };
        let payload = ctx.decode(vr, kind.payload())?;
        Ok(Field::Value(Value::from_payload(kind, payload)?))
    }
}
