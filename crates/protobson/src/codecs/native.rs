//! Default codecs for native scalar types.
//!
//! Integer decoders accept int32, int64 and integral doubles and narrow to
//! the requested width, failing on overflow. Unsigned integers are written as
//! int64 unless [`EncodeOptions::min_size`](crate::EncodeOptions) is set and
//! the value fits in an int32.

use std::sync::Arc;

use chrono::DateTime;
use protobson_wire::{BsonBinary, BsonError, BsonType, BsonValue, ValueReader, ValueWriter};

use crate::descriptor::TypeDescriptor;
use crate::error::CodecError;
use crate::field::{Field, FieldRef};
use crate::registry::{Codec, DecodeContext, EncodeContext, RegistryBuilder};

/// Binds every native scalar codec.
pub fn register_defaults(builder: RegistryBuilder) -> RegistryBuilder {
    let int: Arc<dyn Codec> = Arc::new(IntCodec);
    let uint: Arc<dyn Codec> = Arc::new(UintCodec);
    let float: Arc<dyn Codec> = Arc::new(FloatCodec);
    builder
        .register(TypeDescriptor::Bool, Arc::new(BooleanCodec))
        .register(TypeDescriptor::Bytes, Arc::new(ByteSliceCodec))
        .register(TypeDescriptor::Double, float.clone())
        .register(TypeDescriptor::Float, float)
        .register(TypeDescriptor::Int32, int.clone())
        .register(TypeDescriptor::Int64, int)
        .register(TypeDescriptor::UInt32, uint.clone())
        .register(TypeDescriptor::UInt64, uint)
        .register(TypeDescriptor::String, Arc::new(StringCodec))
        .register(TypeDescriptor::DateTime, Arc::new(DateTimeCodec))
        .register(TypeDescriptor::BsonObjectId, Arc::new(ObjectIdPrimitiveCodec))
}

fn mismatch(codec: &'static str, actual: TypeDescriptor) -> CodecError {
    CodecError::TypeMismatch { codec, actual }
}

/// Reads any BSON numeric type as an `i64`, rejecting fractional doubles.
fn read_integer(vr: &ValueReader<'_>, expected: BsonType) -> Result<i64, CodecError> {
    match vr.value() {
        BsonValue::Int32(i) => Ok(i64::from(*i)),
        BsonValue::Int64(i) => Ok(*i),
        BsonValue::Float(f) => {
            if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64 {
                Ok(*f as i64)
            } else {
                Err(CodecError::Overflow {
                    value: f.to_string(),
                    target: TypeDescriptor::Int64,
                })
            }
        }
        _ => Err(CodecError::UnexpectedWireType {
            expected,
            actual: vr.element_type(),
        }),
    }
}

fn narrow<T: TryFrom<i64>>(value: i64, target: TypeDescriptor) -> Result<T, CodecError> {
    T::try_from(value).map_err(|_| CodecError::Overflow {
        value: value.to_string(),
        target,
    })
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BooleanCodec;

impl Codec for BooleanCodec {
    fn encode(
        &self,
        _ctx: &EncodeContext<'_>,
        vw: ValueWriter<'_>,
        val: FieldRef<'_>,
    ) -> Result<(), CodecError> {
        match val {
            FieldRef::Bool(b) => vw.write_bool(b),
            other => return Err(mismatch("BooleanCodec", other.descriptor())),
        }
        Ok(())
    }

    fn decode(
        &self,
        _ctx: &DecodeContext<'_>,
        vr: ValueReader<'_>,
        ty: TypeDescriptor,
    ) -> Result<Field, CodecError> {
        match ty {
            TypeDescriptor::Bool => Ok(Field::Bool(vr.read_bool()?)),
            other => Err(mismatch("BooleanCodec", other)),
        }
    }
}

/// `bytes` as BSON binary with the generic subtype.
#[derive(Debug, Clone, Copy, Default)]
pub struct ByteSliceCodec;

impl Codec for ByteSliceCodec {
    fn encode(
        &self,
        _ctx: &EncodeContext<'_>,
        vw: ValueWriter<'_>,
        val: FieldRef<'_>,
    ) -> Result<(), CodecError> {
        match val {
            FieldRef::Bytes(data) => vw.write_binary(BsonBinary::GENERIC, data),
            other => return Err(mismatch("ByteSliceCodec", other.descriptor())),
        }
        Ok(())
    }

    fn decode(
        &self,
        _ctx: &DecodeContext<'_>,
        vr: ValueReader<'_>,
        ty: TypeDescriptor,
    ) -> Result<Field, CodecError> {
        if ty != TypeDescriptor::Bytes {
            return Err(mismatch("ByteSliceCodec", ty));
        }
        let bin = vr.read_binary()?;
        match bin.subtype {
            BsonBinary::GENERIC => Ok(Field::Bytes(bin.data.clone())),
            BsonBinary::OLD => Ok(Field::Bytes(strip_old_binary_length(&bin.data)?.to_vec())),
            subtype => Err(CodecError::UnsupportedBinarySubtype(subtype)),
        }
    }
}

/// The deprecated subtype 0x02 repeats the payload length as an int32 in
/// front of the payload.
fn strip_old_binary_length(data: &[u8]) -> Result<&[u8], CodecError> {
    let (prefix, payload) = data
        .split_first_chunk::<4>()
        .ok_or(CodecError::Wire(BsonError::UnexpectedEof))?;
    let declared = i32::from_le_bytes(*prefix);
    if usize::try_from(declared) != Ok(payload.len()) {
        return Err(CodecError::Wire(BsonError::InvalidLength(declared)));
    }
    Ok(payload)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FloatCodec;

impl Codec for FloatCodec {
    fn encode(
        &self,
        _ctx: &EncodeContext<'_>,
        vw: ValueWriter<'_>,
        val: FieldRef<'_>,
    ) -> Result<(), CodecError> {
        match val {
            FieldRef::Double(f) => vw.write_double(f),
            FieldRef::Float(f) => vw.write_double(f64::from(f)),
            other => return Err(mismatch("FloatCodec", other.descriptor())),
        }
        Ok(())
    }

    fn decode(
        &self,
        _ctx: &DecodeContext<'_>,
        vr: ValueReader<'_>,
        ty: TypeDescriptor,
    ) -> Result<Field, CodecError> {
        let f = match vr.value() {
            BsonValue::Float(f) => *f,
            BsonValue::Int32(i) => f64::from(*i),
            BsonValue::Int64(i) => *i as f64,
            _ => {
                return Err(CodecError::UnexpectedWireType {
                    expected: BsonType::Double,
                    actual: vr.element_type(),
                })
            }
        };
        match ty {
            TypeDescriptor::Double => Ok(Field::Double(f)),
            TypeDescriptor::Float => {
                let narrowed = f as f32;
                if f.is_nan() || f64::from(narrowed) == f {
                    Ok(Field::Float(narrowed))
                } else {
                    Err(CodecError::Overflow {
                        value: f.to_string(),
                        target: ty,
                    })
                }
            }
            other => Err(mismatch("FloatCodec", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct IntCodec;

impl Codec for IntCodec {
    fn encode(
        &self,
        _ctx: &EncodeContext<'_>,
        vw: ValueWriter<'_>,
        val: FieldRef<'_>,
    ) -> Result<(), CodecError> {
        match val {
            FieldRef::Int32(i) => vw.write_int32(i),
            FieldRef::Int64(i) => vw.write_int64(i),
            other => return Err(mismatch("IntCodec", other.descriptor())),
        }
        Ok(())
    }

    fn decode(
        &self,
        _ctx: &DecodeContext<'_>,
        vr: ValueReader<'_>,
        ty: TypeDescriptor,
    ) -> Result<Field, CodecError> {
        match ty {
            TypeDescriptor::Int32 => {
                let i = read_integer(&vr, BsonType::Int32)?;
                Ok(Field::Int32(narrow(i, ty)?))
            }
            TypeDescriptor::Int64 => Ok(Field::Int64(read_integer(&vr, BsonType::Int64)?)),
            other => Err(mismatch("IntCodec", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct UintCodec;

impl UintCodec {
    fn write(
        ctx: &EncodeContext<'_>,
        vw: ValueWriter<'_>,
        value: u64,
        source: TypeDescriptor,
    ) -> Result<(), CodecError> {
        if ctx.options().min_size {
            if let Ok(small) = i32::try_from(value) {
                vw.write_int32(small);
                return Ok(());
            }
        }
        let wide = i64::try_from(value).map_err(|_| CodecError::Overflow {
            value: value.to_string(),
            target: source,
        })?;
        vw.write_int64(wide);
        Ok(())
    }
}

impl Codec for UintCodec {
    fn encode(
        &self,
        ctx: &EncodeContext<'_>,
        vw: ValueWriter<'_>,
        val: FieldRef<'_>,
    ) -> Result<(), CodecError> {
        match val {
            FieldRef::UInt32(u) => Self::write(ctx, vw, u64::from(u), TypeDescriptor::UInt32),
            FieldRef::UInt64(u) => Self::write(ctx, vw, u, TypeDescriptor::UInt64),
            other => Err(mismatch("UintCodec", other.descriptor())),
        }
    }

    fn decode(
        &self,
        _ctx: &DecodeContext<'_>,
        vr: ValueReader<'_>,
        ty: TypeDescriptor,
    ) -> Result<Field, CodecError> {
        let i = read_integer(&vr, BsonType::Int64)?;
        match ty {
            TypeDescriptor::UInt32 => Ok(Field::UInt32(narrow(i, ty)?)),
            TypeDescriptor::UInt64 => Ok(Field::UInt64(narrow(i, ty)?)),
            other => Err(mismatch("UintCodec", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StringCodec;

impl Codec for StringCodec {
    fn encode(
        &self,
        _ctx: &EncodeContext<'_>,
        vw: ValueWriter<'_>,
        val: FieldRef<'_>,
    ) -> Result<(), CodecError> {
        match val {
            FieldRef::String(s) => vw.write_string(s),
            other => return Err(mismatch("StringCodec", other.descriptor())),
        }
        Ok(())
    }

    fn decode(
        &self,
        _ctx: &DecodeContext<'_>,
        vr: ValueReader<'_>,
        ty: TypeDescriptor,
    ) -> Result<Field, CodecError> {
        if ty != TypeDescriptor::String {
            return Err(mismatch("StringCodec", ty));
        }
        match vr.value() {
            BsonValue::Symbol(s) => Ok(Field::String(s.clone())),
            _ => Ok(Field::String(vr.read_string()?.to_owned())),
        }
    }
}

/// UTC datetime, stored as milliseconds since the epoch.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateTimeCodec;

impl Codec for DateTimeCodec {
    fn encode(
        &self,
        _ctx: &EncodeContext<'_>,
        vw: ValueWriter<'_>,
        val: FieldRef<'_>,
    ) -> Result<(), CodecError> {
        match val {
            FieldRef::DateTime(dt) => vw.write_datetime(dt.timestamp_millis()),
            other => return Err(mismatch("DateTimeCodec", other.descriptor())),
        }
        Ok(())
    }

    fn decode(
        &self,
        _ctx: &DecodeContext<'_>,
        vr: ValueReader<'_>,
        ty: TypeDescriptor,
    ) -> Result<Field, CodecError> {
        if ty != TypeDescriptor::DateTime {
            return Err(mismatch("DateTimeCodec", ty));
        }
        let millis = vr.read_datetime()?;
        DateTime::from_timestamp_millis(millis)
            .map(Field::DateTime)
            .ok_or_else(|| {
                CodecError::TimeConversion(format!("{millis}ms is outside the supported range"))
            })
    }
}

/// Raw 12-byte ObjectId.
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjectIdPrimitiveCodec;

impl Codec for ObjectIdPrimitiveCodec {
    fn encode(
        &self,
        _ctx: &EncodeContext<'_>,
        vw: ValueWriter<'_>,
        val: FieldRef<'_>,
    ) -> Result<(), CodecError> {
        match val {
            FieldRef::BsonObjectId(id) => vw.write_object_id(id),
            other => return Err(mismatch("ObjectIdPrimitiveCodec", other.descriptor())),
        }
        Ok(())
    }

    fn decode(
        &self,
        _ctx: &DecodeContext<'_>,
        vr: ValueReader<'_>,
        ty: TypeDescriptor,
    ) -> Result<Field, CodecError> {
        match ty {
            TypeDescriptor::BsonObjectId => Ok(Field::BsonObjectId(vr.read_object_id()?)),
            other => Err(mismatch("ObjectIdPrimitiveCodec", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::EncodeOptions;
    use crate::registry::Registry;

    fn encode_with(options: EncodeOptions, val: Field) -> Result<BsonValue, CodecError> {
        let registry = Registry::builder().build();
        let ctx = EncodeContext::new(&registry, options);
        let mut out = Vec::new();
        ctx.encode(ValueWriter::new(&mut out), val.as_field_ref())?;
        Ok(out.remove(0))
    }

    fn encode(val: Field) -> Result<BsonValue, CodecError> {
        encode_with(EncodeOptions::default(), val)
    }

    fn decode(wire: BsonValue, ty: TypeDescriptor) -> Result<Field, CodecError> {
        let registry = Registry::builder().build();
        DecodeContext::new(&registry).decode(ValueReader::new(&wire), ty)
    }

    #[test]
    fn unsigned_written_as_int64() {
        assert_eq!(encode(Field::UInt32(12345)), Ok(BsonValue::Int64(12345)));
        assert_eq!(
            encode_with(EncodeOptions::min_size(), Field::UInt32(12345)),
            Ok(BsonValue::Int32(12345))
        );
        assert_eq!(
            encode_with(EncodeOptions::min_size(), Field::UInt64(u64::from(u32::MAX))),
            Ok(BsonValue::Int64(i64::from(u32::MAX)))
        );
    }

    #[test]
    fn uint64_overflow() {
        assert_eq!(
            encode(Field::UInt64(u64::MAX)),
            Err(CodecError::Overflow {
                value: u64::MAX.to_string(),
                target: TypeDescriptor::UInt64,
            })
        );
        assert!(matches!(
            decode(BsonValue::Int64(-1), TypeDescriptor::UInt64),
            Err(CodecError::Overflow { .. })
        ));
    }

    #[test]
    fn integer_widening_and_narrowing() {
        assert_eq!(decode(BsonValue::Int32(7), TypeDescriptor::Int64), Ok(Field::Int64(7)));
        assert_eq!(decode(BsonValue::Int64(7), TypeDescriptor::Int32), Ok(Field::Int32(7)));
        assert_eq!(decode(BsonValue::Float(7.0), TypeDescriptor::Int32), Ok(Field::Int32(7)));
        assert!(matches!(
            decode(BsonValue::Float(7.5), TypeDescriptor::Int32),
            Err(CodecError::Overflow { .. })
        ));
        assert!(matches!(
            decode(BsonValue::Int64(i64::from(i32::MAX) + 1), TypeDescriptor::Int32),
            Err(CodecError::Overflow { .. })
        ));
        assert_eq!(
            decode(BsonValue::Str("7".into()), TypeDescriptor::Int32),
            Err(CodecError::UnexpectedWireType {
                expected: BsonType::Int32,
                actual: BsonType::String,
            })
        );
    }

    #[test]
    fn float32_goes_through_double() {
        let wire = encode(Field::Float(1.3)).unwrap();
        assert_eq!(wire, BsonValue::Float(f64::from(1.3f32)));
        assert_eq!(decode(wire, TypeDescriptor::Float), Ok(Field::Float(1.3)));
        assert!(matches!(
            decode(BsonValue::Float(1.3), TypeDescriptor::Float),
            Err(CodecError::Overflow { .. })
        ));
    }

    #[test]
    fn datetime_truncates_to_millis() {
        let dt = DateTime::from_timestamp(1_600_000_000, 123_456_789).unwrap();
        let wire = encode(Field::DateTime(dt)).unwrap();
        assert_eq!(wire, BsonValue::DateTime(1_600_000_000_123));
        let back = DateTime::from_timestamp(1_600_000_000, 123_000_000).unwrap();
        assert_eq!(decode(wire, TypeDescriptor::DateTime), Ok(Field::DateTime(back)));
    }

    #[test]
    fn binary_subtypes() {
        let wire = encode(Field::Bytes(vec![0; 5])).unwrap();
        assert_eq!(wire, BsonValue::Binary(BsonBinary::generic(vec![0; 5])));
        assert_eq!(
            decode(
                BsonValue::Binary(BsonBinary {
                    subtype: 0x04,
                    data: vec![1]
                }),
                TypeDescriptor::Bytes
            ),
            Err(CodecError::UnsupportedBinarySubtype(0x04))
        );
    }

    #[test]
    fn old_binary_drops_inner_length() {
        let old = |data: Vec<u8>| {
            BsonValue::Binary(BsonBinary {
                subtype: BsonBinary::OLD,
                data,
            })
        };
        assert_eq!(
            decode(old(vec![3, 0, 0, 0, 7, 8, 9]), TypeDescriptor::Bytes),
            Ok(Field::Bytes(vec![7, 8, 9]))
        );
        assert_eq!(
            decode(old(vec![5, 0, 0, 0, 7]), TypeDescriptor::Bytes),
            Err(CodecError::Wire(BsonError::InvalidLength(5)))
        );
        assert_eq!(
            decode(old(vec![1, 0]), TypeDescriptor::Bytes),
            Err(CodecError::Wire(BsonError::UnexpectedEof))
        );
    }

    #[test]
    fn codec_rejects_foreign_shape() {
        let registry = Registry::builder().build();
        let ctx = EncodeContext::new(&registry, EncodeOptions::default());
        let mut out = Vec::new();
        let err = BooleanCodec
            .encode(&ctx, ValueWriter::new(&mut out), FieldRef::Int32(1))
            .unwrap_err();
        assert_eq!(
            err,
            CodecError::TypeMismatch {
                codec: "BooleanCodec",
                actual: TypeDescriptor::Int32,
            }
        );
        assert!(out.is_empty());
    }
}
