use protobson_wire::{ValueReader, ValueWriter};

use crate::descriptor::TypeDescriptor;
use crate::error::CodecError;
use crate::field::{Field, FieldRef};
use crate::registry::{Codec, DecodeContext, EncodeContext};
use crate::types::NullValue;

/// `NullValue` as BSON null.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullValueCodec;

impl Codec for NullValueCodec {
    fn encode(
        &self,
        _ctx: &EncodeContext<'_>,
        vw: ValueWriter<'_>,
        val: FieldRef<'_>,
    ) -> Result<(), CodecError> {
        match val {
            FieldRef::NullValue(_) => vw.write_null(),
            other => {
                return Err(CodecError::TypeMismatch {
                    codec: "NullValueCodec",
                    actual: other.descriptor(),
                })
            }
        }
        Ok(())
    }

    fn decode(
        &self,
        _ctx: &DecodeContext<'_>,
        vr: ValueReader<'_>,
        _ty: TypeDescriptor,
    ) -> Result<Field, CodecError> {
        vr.read_null()?;
        Ok(Field::NullValue(NullValue::NullValue))
    }
}
