use protobson_wire::{ValueReader, ValueWriter};

use crate::descriptor::TypeDescriptor;
use crate::error::CodecError;
use crate::field::{Field, FieldRef};
use crate::registry::{Codec, DecodeContext, EncodeContext};

/// Any of the nine scalar wrappers, written as its bare inner value.
///
/// The inner value goes through whichever codec the registry binds to the
/// inner scalar type, so options such as `min_size` apply unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct WrapperCodec;

impl Codec for WrapperCodec {
    fn encode(
        &self,
        ctx: &EncodeContext<'_>,
        vw: ValueWriter<'_>,
        val: FieldRef<'_>,
    ) -> Result<(), CodecError> {
        let wrapper = val.descriptor();
        let inner = val.unwrap_wrapper().ok_or(CodecError::TypeMismatch {
            codec: "WrapperCodec",
            actual: wrapper,
        })?;
        let codec = ctx
            .lookup_encoder(inner.descriptor())
            .map_err(|_| CodecError::NoEncoder {
                wrapper,
                inner: inner.descriptor(),
            })?;
        codec.encode(ctx, vw, inner)
    }

    fn decode(
        &self,
        ctx: &DecodeContext<'_>,
        vr: ValueReader<'_>,
        ty: TypeDescriptor,
    ) -> Result<Field, CodecError> {
        let inner_ty = ty.wrapped().ok_or(CodecError::TypeMismatch {
            codec: "WrapperCodec",
            actual: ty,
        })?;
        let inner = ctx.decode(vr, inner_ty)?;
        let actual = inner.descriptor();
        Field::wrap(ty, inner).ok_or(CodecError::TypeMismatch {
            codec: "WrapperCodec",
            actual,
        })
    }
}
