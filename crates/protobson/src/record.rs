//! Top-level documents: a [`Record`] of named fields marshalled through a
//! [`Registry`], and the [`Schema`] that drives unmarshalling.

use protobson_wire::{BsonDecoder, BsonEncoder, BsonType, DocumentReader, DocumentWriter};

use crate::descriptor::{TypeDescriptor, ValueKind};
use crate::error::CodecError;
use crate::field::Field;
use crate::options::EncodeOptions;
use crate::registry::{DecodeContext, EncodeContext, Registry};

/// Names and types of the fields to read out of a document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    fields: Vec<(String, TypeDescriptor)>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, name: impl Into<String>, ty: TypeDescriptor) -> Self {
        self.fields.push((name.into(), ty));
        self
    }

    pub fn fields(&self) -> &[(String, TypeDescriptor)] {
        &self.fields
    }
}

/// An ordered set of named fields. A `None` value is an unset field and is
/// written as BSON null.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: Vec<(String, Option<Field>)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<Field>) -> Self {
        self.set(name, Some(value.into()));
        self
    }

    pub fn with_null(mut self, name: impl Into<String>) -> Self {
        self.set(name, None);
        self
    }

    /// Sets `name`, replacing an earlier value in place.
    pub fn set(&mut self, name: impl Into<String>, value: Option<Field>) {
        let name = name.into();
        match self.fields.iter_mut().find(|(k, _)| *k == name) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((name, value)),
        }
    }

    /// The value of `name`, if present and not null.
    pub fn get(&self, name: &str) -> Option<&Field> {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .and_then(|(_, v)| v.as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.iter().any(|(k, _)| k == name)
    }

    pub fn fields(&self) -> &[(String, Option<Field>)] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Types whose own codec reads BSON null, rather than null meaning unset.
fn null_is_a_value(ty: TypeDescriptor) -> bool {
    matches!(
        ty,
        TypeDescriptor::NullValue | TypeDescriptor::Value(ValueKind::Null)
    )
}

impl Registry {
    /// Encodes `record` as a BSON document with default options.
    pub fn marshal(&self, record: &Record) -> Result<Vec<u8>, CodecError> {
        self.marshal_with(record, EncodeOptions::default())
    }

    /// Encodes `record` as a BSON document. No bytes are produced unless
    /// every field encodes.
    pub fn marshal_with(
        &self,
        record: &Record,
        options: EncodeOptions,
    ) -> Result<Vec<u8>, CodecError> {
        let ctx = EncodeContext::new(self, options);
        let mut dw = DocumentWriter::new();
        for (name, value) in record.fields() {
            let vw = dw.write_field(name);
            match value {
                Some(field) => {
                    tracing::trace!(field = %name, ty = %field.descriptor(), "marshal field");
                    ctx.encode(vw, field.as_field_ref())?;
                }
                None => vw.write_null(),
            }
        }
        let doc = dw.finish()?;
        Ok(BsonEncoder::new().encode(&doc))
    }

    /// Decodes a BSON document into the fields named by `schema`.
    ///
    /// Schema fields missing from the document are left out of the result.
    /// A BSON null becomes an unset field, except for `NullValue` and
    /// `Value` null-variant fields, which decode through their codec.
    pub fn unmarshal(&self, bytes: &[u8], schema: &Schema) -> Result<Record, CodecError> {
        let doc = BsonDecoder::new().decode(bytes)?;
        let reader = DocumentReader::new(&doc);
        let ctx = DecodeContext::new(self);
        let mut record = Record::new();
        for (name, ty) in schema.fields() {
            let Some(vr) = reader.field(name) else {
                continue;
            };
            if vr.element_type() == BsonType::Null && !null_is_a_value(*ty) {
                record.set(name.as_str(), None);
                continue;
            }
            tracing::trace!(field = %name, %ty, "unmarshal field");
            let field = ctx.decode(vr, *ty)?;
            record.set(name.as_str(), Some(field));
        }
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Int32Value, NullValue, StringValue};

    #[test]
    fn set_replaces_in_place() {
        let mut record = Record::new().with("a", 1i32).with("b", 2i32);
        record.set("a", Some(Field::Int32(3)));
        assert_eq!(record.len(), 2);
        assert_eq!(record.fields()[0], ("a".to_owned(), Some(Field::Int32(3))));
        assert_eq!(record.get("b"), Some(&Field::Int32(2)));
    }

    #[test]
    fn null_fields() {
        let registry = Registry::default_with_well_known();
        let record = Record::new()
            .with_null("missing")
            .with("marker", NullValue::NullValue);
        let bytes = registry.marshal(&record).unwrap();
        let schema = Schema::new()
            .field("missing", TypeDescriptor::StringValue)
            .field("marker", TypeDescriptor::NullValue);
        let back = registry.unmarshal(&bytes, &schema).unwrap();
        assert_eq!(back, record);
        assert!(back.contains("missing"));
        assert_eq!(back.get("missing"), None);
    }

    #[test]
    fn schema_and_document_need_not_agree() {
        let registry = Registry::default_with_well_known();
        let bytes = registry
            .marshal(&Record::new().with("a", StringValue::new("x")).with("extra", 1i32))
            .unwrap();
        let schema = Schema::new()
            .field("a", TypeDescriptor::StringValue)
            .field("b", TypeDescriptor::Int32Value);
        let back = registry.unmarshal(&bytes, &schema).unwrap();
        assert_eq!(back, Record::new().with("a", StringValue::new("x")));
        assert!(!back.contains("b"));
        assert!(!back.contains("extra"));
    }

    #[test]
    fn failed_marshal_produces_nothing() {
        let registry = Registry::builder().build();
        let record = Record::new()
            .with("ok", 1i32)
            .with("wrapped", Int32Value::new(2));
        assert_eq!(
            registry.marshal(&record),
            Err(CodecError::UnregisteredType(TypeDescriptor::Int32Value))
        );
    }

    #[test]
    fn malformed_bytes() {
        let registry = Registry::default_with_well_known();
        assert!(matches!(
            registry.unmarshal(&[1, 2, 3], &Schema::new()),
            Err(CodecError::Wire(_))
        ));
    }
}
