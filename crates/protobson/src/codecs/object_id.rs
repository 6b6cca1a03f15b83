use protobson_wire::{ValueReader, ValueWriter};

use crate::descriptor::TypeDescriptor;
use crate::error::CodecError;
use crate::field::{Field, FieldRef};
use crate::registry::{Codec, DecodeContext, EncodeContext};
use crate::types::ObjectId;

/// The hex-string `ObjectId` message as a native BSON ObjectId.
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjectIdCodec;

impl Codec for ObjectIdCodec {
    fn encode(
        &self,
        ctx: &EncodeContext<'_>,
        vw: ValueWriter<'_>,
        val: FieldRef<'_>,
    ) -> Result<(), CodecError> {
        let FieldRef::ObjectId(id) = val else {
            return Err(CodecError::TypeMismatch {
                codec: "ObjectIdCodec",
                actual: val.descriptor(),
            });
        };
        let raw = id.to_bson()?;
        ctx.lookup_encoder(TypeDescriptor::BsonObjectId)?
            .encode(ctx, vw, FieldRef::BsonObjectId(raw))
    }

    fn decode(
        &self,
        ctx: &DecodeContext<'_>,
        vr: ValueReader<'_>,
        _ty: TypeDescriptor,
    ) -> Result<Field, CodecError> {
        match ctx.decode(vr, TypeDescriptor::BsonObjectId)? {
            Field::BsonObjectId(raw) => Ok(Field::ObjectId(ObjectId::from_bson(raw))),
            other => Err(CodecError::TypeMismatch {
                codec: "ObjectIdCodec",
                actual: other.descriptor(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use protobson_wire::{BsonObjectId, BsonType, BsonValue};

    use super::*;
    use crate::codecs::testing::{decode, encode};
    use crate::registry::Registry;

    #[test]
    fn hex_string_to_native() {
        let registry = Registry::default_with_well_known();
        let id = ObjectId::new("5f1a2b3c4d5e6f7a8b9c0d1e");
        let wire = encode(&registry, FieldRef::ObjectId(&id)).unwrap();
        assert_eq!(
            wire,
            BsonValue::ObjectId(BsonObjectId::from_bytes([
                0x5f, 0x1a, 0x2b, 0x3c, 0x4d, 0x5e, 0x6f, 0x7a, 0x8b, 0x9c, 0x0d, 0x1e
            ]))
        );
        assert_eq!(
            decode(&registry, &wire, TypeDescriptor::ObjectId),
            Ok(Field::ObjectId(id))
        );
    }

    #[test]
    fn uppercase_hex_comes_back_lowercase() {
        let registry = Registry::default_with_well_known();
        let id = ObjectId::new("5F1A2B3C4D5E6F7A8B9C0D1E");
        let wire = encode(&registry, FieldRef::ObjectId(&id)).unwrap();
        assert_eq!(
            decode(&registry, &wire, TypeDescriptor::ObjectId),
            Ok(Field::ObjectId(ObjectId::new("5f1a2b3c4d5e6f7a8b9c0d1e")))
        );
    }

    #[test]
    fn invalid_hex() {
        let registry = Registry::default_with_well_known();
        for bad in ["", "xyz", "5f1a2b3c4d5e6f7a8b9c0d1", "5f1a2b3c4d5e6f7a8b9c0d1e00"] {
            let id = ObjectId::new(bad);
            assert!(matches!(
                encode(&registry, FieldRef::ObjectId(&id)),
                Err(CodecError::InvalidHex(_))
            ));
        }
    }

    #[test]
    fn rejects_string_on_wire() {
        let registry = Registry::default_with_well_known();
        let wire = BsonValue::Str("5f1a2b3c4d5e6f7a8b9c0d1e".into());
        assert_eq!(
            decode(&registry, &wire, TypeDescriptor::ObjectId),
            Err(CodecError::UnexpectedWireType {
                expected: BsonType::ObjectId,
                actual: BsonType::String,
            })
        );
    }
}
