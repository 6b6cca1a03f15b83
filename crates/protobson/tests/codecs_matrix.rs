use proptest::prelude::*;
use protobson::{
    register, BoolValue, BytesValue, CodecError, DoubleValue, EncodeOptions, Field, FloatValue,
    Int32Value, Int64Value, ListValue, NullValue, ObjectId, Record, Registry, RegistryBuilder,
    Schema, StringValue, Struct, Timestamp, TypeDescriptor, UInt32Value, UInt64Value, Value,
    ValueKind,
};
use protobson_wire::{BsonDecoder, BsonEncoder, BsonError, BsonObjectId, BsonType, BsonValue};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn registry() -> Registry {
    init_tracing();
    register(RegistryBuilder::with_defaults()).build()
}

fn decode_doc(bytes: &[u8]) -> Vec<(String, BsonValue)> {
    BsonDecoder::new().decode(bytes).unwrap()
}

fn fixture_list() -> ListValue {
    let nested: ListValue = [Value::from("b"), Value::Number(2.0)].into_iter().collect();
    [
        Value::from("a"),
        Value::Number(1.0),
        Value::Bool(false),
        Value::Null,
        Value::List(nested),
    ]
    .into_iter()
    .collect()
}

fn fixture_schema() -> Schema {
    Schema::new()
        .field("boolvalue", TypeDescriptor::BoolValue)
        .field("bytesvalue", TypeDescriptor::BytesValue)
        .field("doublevalue", TypeDescriptor::DoubleValue)
        .field("floatvalue", TypeDescriptor::FloatValue)
        .field("int32value", TypeDescriptor::Int32Value)
        .field("int64value", TypeDescriptor::Int64Value)
        .field("stringvalue", TypeDescriptor::StringValue)
        .field("uint32value", TypeDescriptor::UInt32Value)
        .field("uint64value", TypeDescriptor::UInt64Value)
        .field("timestamp", TypeDescriptor::Timestamp)
        .field("id", TypeDescriptor::ObjectId)
        .field("listvalue", TypeDescriptor::ListValue)
}

fn fixture_record() -> Record {
    Record::new()
        .with("boolvalue", BoolValue::new(true))
        .with("bytesvalue", BytesValue::new(vec![0u8; 5]))
        .with("doublevalue", DoubleValue::new(1.2))
        .with("floatvalue", FloatValue::new(1.3f32))
        .with("int32value", Int32Value::new(-12345))
        .with("int64value", Int64Value::new(-123456789i64))
        .with("stringvalue", StringValue::new("qwerty"))
        .with("uint32value", UInt32Value::new(12345u32))
        .with("uint64value", UInt64Value::new(123456789u64))
        .with("timestamp", Timestamp::now().truncate_to_millis())
        .with("id", ObjectId::generate())
        .with("listvalue", fixture_list())
}

#[test]
fn fixture_record_roundtrip() {
    let registry = registry();
    let record = fixture_record();
    let bytes = registry.marshal(&record).unwrap();
    let back = registry.unmarshal(&bytes, &fixture_schema()).unwrap();
    assert_eq!(back, record);
}

#[test]
fn fixture_record_wire_shape() {
    let registry = registry();
    let ts = Timestamp::new(1_600_000_000, 250_000_000);
    let id = ObjectId::new("5f1a2b3c4d5e6f7a8b9c0d1e");
    let record = Record::new()
        .with("uint32value", UInt32Value::new(12345u32))
        .with("timestamp", ts)
        .with("id", id.clone())
        .with("listvalue", fixture_list());
    let doc = decode_doc(&registry.marshal(&record).unwrap());
    assert_eq!(
        doc,
        vec![
            ("uint32value".to_owned(), BsonValue::Int64(12345)),
            ("timestamp".to_owned(), BsonValue::DateTime(1_600_000_000_250)),
            ("id".to_owned(), BsonValue::ObjectId(id.to_bson().unwrap())),
            (
                "listvalue".to_owned(),
                BsonValue::Array(vec![
                    BsonValue::Str("a".into()),
                    BsonValue::Float(1.0),
                    BsonValue::Boolean(false),
                    BsonValue::Null,
                    BsonValue::Array(vec![BsonValue::Str("b".into()), BsonValue::Float(2.0)]),
                ]),
            ),
        ]
    );
}

#[test]
fn min_size_option() {
    let registry = registry();
    let record = Record::new()
        .with("small", UInt32Value::new(7u32))
        .with("large", UInt64Value::new(u64::from(u32::MAX) + 1));
    let doc = decode_doc(&registry.marshal_with(&record, EncodeOptions::min_size()).unwrap());
    assert_eq!(doc[0].1, BsonValue::Int32(7));
    assert_eq!(doc[1].1, BsonValue::Int64(i64::from(u32::MAX) + 1));

    let schema = Schema::new()
        .field("small", TypeDescriptor::UInt32Value)
        .field("large", TypeDescriptor::UInt64Value);
    let bytes = registry.marshal_with(&record, EncodeOptions::min_size()).unwrap();
    assert_eq!(registry.unmarshal(&bytes, &schema).unwrap(), record);
}

#[test]
fn unregistered_type_produces_no_bytes() {
    let registry = Registry::builder().build();
    let record = Record::new().with("ts", Timestamp::new(0, 0));
    assert_eq!(
        registry.marshal(&record),
        Err(CodecError::UnregisteredType(TypeDescriptor::Timestamp))
    );
}

#[test]
fn struct_in_list_fails_both_ways() {
    let registry = registry();
    let mut s = Struct::new();
    s.insert("helo", "world");
    s.insert("gee", 3.0);
    let mut list = fixture_list();
    list.push(s);
    assert_eq!(
        registry.marshal(&Record::new().with("listvalue", list)),
        Err(CodecError::UnregisteredType(TypeDescriptor::Struct))
    );

    let bytes = BsonEncoder::new().encode(&[(
        "listvalue".to_owned(),
        BsonValue::Array(vec![BsonValue::Document(vec![(
            "helo".to_owned(),
            BsonValue::Str("world".into()),
        )])]),
    )]);
    let schema = Schema::new().field("listvalue", TypeDescriptor::ListValue);
    assert_eq!(
        registry.unmarshal(&bytes, &schema),
        Err(CodecError::UnregisteredType(TypeDescriptor::Struct))
    );
}

#[test]
fn unsupported_list_element_aborts_decode() {
    let registry = registry();
    let schema = Schema::new().field("listvalue", TypeDescriptor::ListValue);
    for (element, typ) in [
        (BsonValue::Int32(1), BsonType::Int32),
        (BsonValue::Int64(1), BsonType::Int64),
        (BsonValue::DateTime(0), BsonType::DateTime),
        (
            BsonValue::ObjectId(BsonObjectId::from_bytes([1; 12])),
            BsonType::ObjectId,
        ),
    ] {
        let bytes = BsonEncoder::new().encode(&[(
            "listvalue".to_owned(),
            BsonValue::Array(vec![BsonValue::Str("a".into()), element]),
        )]);
        assert_eq!(
            registry.unmarshal(&bytes, &schema),
            Err(CodecError::UnsupportedWireType(typ))
        );
    }
}

#[test]
fn absent_list_element_written_as_null() {
    let registry = registry();
    let mut list = ListValue::new();
    list.push("a");
    list.push_absent();
    let bytes = registry
        .marshal(&Record::new().with("listvalue", list))
        .unwrap();
    assert_eq!(
        decode_doc(&bytes)[0].1,
        BsonValue::Array(vec![BsonValue::Str("a".into()), BsonValue::Null])
    );

    let schema = Schema::new().field("listvalue", TypeDescriptor::ListValue);
    let back = registry.unmarshal(&bytes, &schema).unwrap();
    let Some(Field::ListValue(back)) = back.get("listvalue") else {
        panic!("listvalue missing");
    };
    assert_eq!(back.values, vec![Some(Value::from("a")), Some(Value::Null)]);
}

#[test]
fn wire_type_mismatch_on_field() {
    let registry = registry();
    let bytes = BsonEncoder::new().encode(&[("ts".to_owned(), BsonValue::Str("now".into()))]);
    let schema = Schema::new().field("ts", TypeDescriptor::Timestamp);
    assert_eq!(
        registry.unmarshal(&bytes, &schema),
        Err(CodecError::UnexpectedWireType {
            expected: BsonType::DateTime,
            actual: BsonType::String,
        })
    );
}

#[test]
fn null_value_field() {
    let registry = registry();
    let record = Record::new().with("n", NullValue::NullValue);
    let bytes = registry.marshal(&record).unwrap();
    assert_eq!(decode_doc(&bytes)[0].1, BsonValue::Null);
    let schema = Schema::new().field("n", TypeDescriptor::NullValue);
    assert_eq!(registry.unmarshal(&bytes, &schema).unwrap(), record);
}

#[test]
fn value_fields_roundtrip() {
    let registry = registry();
    let record = Record::new()
        .with("null", Value::Null)
        .with("bool", Value::Bool(true))
        .with("number", Value::Number(-2.5))
        .with("string", Value::from("x"))
        .with("list", Value::List(fixture_list()));
    let bytes = registry.marshal(&record).unwrap();
    assert_eq!(decode_doc(&bytes)[0].1, BsonValue::Null);

    let schema = Schema::new()
        .field("null", TypeDescriptor::Value(ValueKind::Null))
        .field("bool", TypeDescriptor::Value(ValueKind::Bool))
        .field("number", TypeDescriptor::Value(ValueKind::Number))
        .field("string", TypeDescriptor::Value(ValueKind::String))
        .field("list", TypeDescriptor::Value(ValueKind::List));
    let back = registry.unmarshal(&bytes, &schema).unwrap();
    assert_eq!(back, record);
    assert_eq!(back.get("null"), Some(&Field::Value(Value::Null)));
}

#[test]
fn nul_in_field_name_fails_marshal() {
    let registry = registry();
    let record = Record::new().with("a\0b", Int32Value::new(1));
    assert_eq!(
        registry.marshal(&record),
        Err(CodecError::Wire(BsonError::InvalidKey("a\0b".into())))
    );
}

#[test]
fn json_mapping_of_fixture_list() {
    let list = fixture_list();
    let json = list.to_json();
    assert_eq!(json, serde_json::json!(["a", 1.0, false, null, ["b", 2.0]]));
    assert_eq!(ListValue::from_json(json).unwrap(), list);
}

#[test]
fn timestamp_rfc3339() {
    let ts = Timestamp::new(1_600_000_000, 120_000_000);
    let text = ts.to_rfc3339().unwrap();
    assert_eq!(text, "2020-09-13T12:26:40.120Z");
    assert_eq!(Timestamp::parse_rfc3339(&text).unwrap(), ts);
}

fn roundtrip_field(registry: &Registry, field: Field) -> Field {
    let ty = field.descriptor();
    let bytes = registry.marshal(&Record::new().with("f", field)).unwrap();
    let back = registry
        .unmarshal(&bytes, &Schema::new().field("f", ty))
        .unwrap();
    back.get("f").cloned().unwrap()
}

fn wrapper_field() -> impl Strategy<Value = Field> {
    prop_oneof![
        any::<bool>().prop_map(|v| Field::from(BoolValue::new(v))),
        proptest::collection::vec(any::<u8>(), 0..32).prop_map(|v| Field::from(BytesValue::new(v))),
        any::<f64>()
            .prop_filter("NaN is not equal to itself", |v| !v.is_nan())
            .prop_map(|v| Field::from(DoubleValue::new(v))),
        any::<f32>()
            .prop_filter("NaN is not equal to itself", |v| !v.is_nan())
            .prop_map(|v| Field::from(FloatValue::new(v))),
        any::<i32>().prop_map(|v| Field::from(Int32Value::new(v))),
        any::<i64>().prop_map(|v| Field::from(Int64Value::new(v))),
        ".{0,24}".prop_map(|v| Field::from(StringValue::new(v))),
        any::<u32>().prop_map(|v| Field::from(UInt32Value::new(v))),
        (0..=i64::MAX as u64).prop_map(|v| Field::from(UInt64Value::new(v))),
    ]
}

proptest! {
    #[test]
    fn wrappers_roundtrip(field in wrapper_field()) {
        let registry = registry();
        prop_assert_eq!(roundtrip_field(&registry, field.clone()), field);
    }

    #[test]
    fn timestamp_keeps_millis(
        seconds in -62_135_596_800i64..253_402_300_800,
        nanos in 0i32..1_000_000_000,
    ) {
        let registry = registry();
        let ts = Timestamp::new(seconds, nanos);
        prop_assert_eq!(
            roundtrip_field(&registry, Field::from(ts)),
            Field::from(ts.truncate_to_millis())
        );
    }

    #[test]
    fn object_id_roundtrip(bytes in any::<[u8; 12]>()) {
        let registry = registry();
        let id = ObjectId::from_bson(BsonObjectId::from_bytes(bytes));
        prop_assert_eq!(roundtrip_field(&registry, Field::from(id.clone())), Field::from(id));
    }

    #[test]
    fn object_id_rejects_malformed_hex(value in "[0-9a-f]{0,23}|[0-9a-f]{25,30}|[g-z]{24}") {
        let registry = registry();
        let record = Record::new().with("id", ObjectId::new(value));
        prop_assert!(matches!(registry.marshal(&record), Err(CodecError::InvalidHex(_))));
    }
}
