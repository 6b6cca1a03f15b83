//! `ListValue` as a BSON array.
//!
//! Encoding dispatches each element on its runtime variant. Decoding
//! dispatches on the BSON type of each element; only the six types that a
//! `Value` variant maps onto are accepted.

use protobson_wire::{BsonType, ValueReader, ValueWriter};

use crate::descriptor::{TypeDescriptor, ValueKind};
use crate::error::CodecError;
use crate::field::{Field, FieldRef};
use crate::registry::{Codec, DecodeContext, EncodeContext};
use crate::types::{ListValue, Value};

/// Value variant to decode for each BSON element type.
const DISPATCH: [(BsonType, ValueKind); 6] = [
    (BsonType::String, ValueKind::String),
    (BsonType::Boolean, ValueKind::Bool),
    (BsonType::Double, ValueKind::Number),
    (BsonType::Array, ValueKind::List),
    (BsonType::EmbeddedDocument, ValueKind::Struct),
    (BsonType::Null, ValueKind::Null),
];

fn kind_for(typ: BsonType) -> Option<ValueKind> {
    DISPATCH
        .iter()
        .find(|(wire, _)| *wire == typ)
        .map(|(_, kind)| *kind)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ListValueCodec;

impl Codec for ListValueCodec {
    fn encode(
        &self,
        ctx: &EncodeContext<'_>,
        vw: ValueWriter<'_>,
        val: FieldRef<'_>,
    ) -> Result<(), CodecError> {
        let FieldRef::ListValue(list) = val else {
            return Err(CodecError::TypeMismatch {
                codec: "ListValueCodec",
                actual: val.descriptor(),
            });
        };
        let mut aw = vw.write_array();
        for elem in &list.values {
            let ew = aw.write_element();
            match elem {
                Some(value) => ctx.encode(ew, FieldRef::Value(value))?,
                None => ew.write_null(),
            }
        }
        aw.write_array_end();
        Ok(())
    }

    fn decode(
        &self,
        ctx: &DecodeContext<'_>,
        vr: ValueReader<'_>,
        _ty: TypeDescriptor,
    ) -> Result<Field, CodecError> {
        let mut ar = vr.read_array()?;
        let mut values = Vec::with_capacity(ar.remaining());
        while let Some(er) = ar.read_value() {
            let typ = er.element_type();
            let kind = kind_for(typ).ok_or(CodecError::UnsupportedWireType(typ))?;
            tracing::trace!(%typ, %kind, "decoding list element");
            match ctx.decode(er, TypeDescriptor::Value(kind))? {
                Field::Value(value) => values.push(Some(value)),
                other => {
                    return Err(CodecError::TypeMismatch {
                        codec: "ListValueCodec",
                        actual: other.descriptor(),
                    })
                }
            }
        }
        Ok(Field::ListValue(ListValue { values }))
    }
}
