//! Value-level reader and writer over the BSON element tree.
//!
//! Codecs never touch bytes directly. A [`ValueWriter`] accepts exactly one
//! value (every `write_*` consumes it) and appends it to its parent, which is
//! either an [`ArrayWriter`] or a [`DocumentWriter`]. A [`ValueReader`]
//! borrows one decoded element and hands out its payload only when the tag
//! matches the requested type.

use crate::error::BsonError;
use crate::values::{BsonBinary, BsonObjectId, BsonType, BsonValue};

/// Writes a single BSON value into its parent container.
#[derive(Debug)]
pub struct ValueWriter<'a> {
    sink: &'a mut Vec<BsonValue>,
}

impl<'a> ValueWriter<'a> {
    /// Creates a writer that appends to `sink`.
    pub fn new(sink: &'a mut Vec<BsonValue>) -> Self {
        Self { sink }
    }

    pub fn write_value(self, value: BsonValue) {
        self.sink.push(value);
    }

    pub fn write_null(self) {
        self.write_value(BsonValue::Null);
    }

    pub fn write_bool(self, b: bool) {
        self.write_value(BsonValue::Boolean(b));
    }

    pub fn write_double(self, f: f64) {
        self.write_value(BsonValue::Float(f));
    }

    pub fn write_string(self, s: &str) {
        self.write_value(BsonValue::Str(s.to_owned()));
    }

    pub fn write_binary(self, subtype: u8, data: &[u8]) {
        self.write_value(BsonValue::Binary(BsonBinary {
            subtype,
            data: data.to_vec(),
        }));
    }

    /// Writes a UTC datetime as milliseconds since the Unix epoch.
    pub fn write_datetime(self, millis: i64) {
        self.write_value(BsonValue::DateTime(millis));
    }

    pub fn write_object_id(self, id: BsonObjectId) {
        self.write_value(BsonValue::ObjectId(id));
    }

    pub fn write_int32(self, i: i32) {
        self.write_value(BsonValue::Int32(i));
    }

    pub fn write_int64(self, i: i64) {
        self.write_value(BsonValue::Int64(i));
    }

    /// Starts an array. Nothing reaches the parent until
    /// [`ArrayWriter::write_array_end`] is called.
    pub fn write_array(self) -> ArrayWriter<'a> {
        ArrayWriter {
            sink: self.sink,
            items: Vec::new(),
        }
    }
}

/// Collects array elements, then appends the finished array to its parent.
#[derive(Debug)]
pub struct ArrayWriter<'a> {
    sink: &'a mut Vec<BsonValue>,
    items: Vec<BsonValue>,
}

impl ArrayWriter<'_> {
    pub fn write_element(&mut self) -> ValueWriter<'_> {
        ValueWriter::new(&mut self.items)
    }

    pub fn write_array_end(self) {
        self.sink.push(BsonValue::Array(self.items));
    }
}

/// Collects the top-level fields of a document.
#[derive(Debug, Default)]
pub struct DocumentWriter {
    keys: Vec<String>,
    values: Vec<BsonValue>,
}

impl DocumentWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write_field(&mut self, key: &str) -> ValueWriter<'_> {
        self.keys.push(key.to_owned());
        ValueWriter::new(&mut self.values)
    }

    /// Returns the written fields in order. Fails if a field was opened but
    /// never given a value, or if a field name cannot be written as a
    /// C-string.
    pub fn finish(self) -> Result<Vec<(String, BsonValue)>, BsonError> {
        if let Some(key) = self.keys.iter().find(|k| k.contains('\0')) {
            return Err(BsonError::InvalidKey(key.clone()));
        }
        if self.keys.len() != self.values.len() {
            let missing = self.keys[self.values.len()..]
                .first()
                .cloned()
                .unwrap_or_default();
            return Err(BsonError::MissingValue(missing));
        }
        Ok(self.keys.into_iter().zip(self.values).collect())
    }
}

/// Reads a single decoded BSON value.
#[derive(Debug, Clone, Copy)]
pub struct ValueReader<'a> {
    value: &'a BsonValue,
}

impl<'a> ValueReader<'a> {
    pub fn new(value: &'a BsonValue) -> Self {
        Self { value }
    }

    /// The wire-reported type tag of the value.
    pub fn element_type(&self) -> BsonType {
        self.value.element_type()
    }

    pub fn value(&self) -> &'a BsonValue {
        self.value
    }

    fn mismatch(&self, expected: BsonType) -> BsonError {
        BsonError::UnexpectedType {
            expected,
            actual: self.element_type(),
        }
    }

    pub fn read_null(&self) -> Result<(), BsonError> {
        match self.value {
            BsonValue::Null => Ok(()),
            _ => Err(self.mismatch(BsonType::Null)),
        }
    }

    pub fn read_bool(&self) -> Result<bool, BsonError> {
        match self.value {
            BsonValue::Boolean(b) => Ok(*b),
            _ => Err(self.mismatch(BsonType::Boolean)),
        }
    }

    pub fn read_double(&self) -> Result<f64, BsonError> {
        match self.value {
            BsonValue::Float(f) => Ok(*f),
            _ => Err(self.mismatch(BsonType::Double)),
        }
    }

    pub fn read_string(&self) -> Result<&'a str, BsonError> {
        match self.value {
            BsonValue::Str(s) => Ok(s),
            _ => Err(self.mismatch(BsonType::String)),
        }
    }

    pub fn read_binary(&self) -> Result<&'a BsonBinary, BsonError> {
        match self.value {
            BsonValue::Binary(bin) => Ok(bin),
            _ => Err(self.mismatch(BsonType::Binary)),
        }
    }

    pub fn read_datetime(&self) -> Result<i64, BsonError> {
        match self.value {
            BsonValue::DateTime(ms) => Ok(*ms),
            _ => Err(self.mismatch(BsonType::DateTime)),
        }
    }

    pub fn read_object_id(&self) -> Result<BsonObjectId, BsonError> {
        match self.value {
            BsonValue::ObjectId(id) => Ok(*id),
            _ => Err(self.mismatch(BsonType::ObjectId)),
        }
    }

    pub fn read_int32(&self) -> Result<i32, BsonError> {
        match self.value {
            BsonValue::Int32(i) => Ok(*i),
            _ => Err(self.mismatch(BsonType::Int32)),
        }
    }

    pub fn read_int64(&self) -> Result<i64, BsonError> {
        match self.value {
            BsonValue::Int64(i) => Ok(*i),
            _ => Err(self.mismatch(BsonType::Int64)),
        }
    }

    pub fn read_array(&self) -> Result<ArrayReader<'a>, BsonError> {
        match self.value {
            BsonValue::Array(items) => Ok(ArrayReader {
                items: items.iter(),
            }),
            _ => Err(self.mismatch(BsonType::Array)),
        }
    }

    pub fn read_document(&self) -> Result<DocumentReader<'a>, BsonError> {
        match self.value {
            BsonValue::Document(fields) => Ok(DocumentReader::new(fields)),
            _ => Err(self.mismatch(BsonType::EmbeddedDocument)),
        }
    }
}

/// Yields the elements of a BSON array in index order.
#[derive(Debug, Clone)]
pub struct ArrayReader<'a> {
    items: std::slice::Iter<'a, BsonValue>,
}

impl<'a> ArrayReader<'a> {
    /// Returns the next element, or `None` at the end of the array.
    pub fn read_value(&mut self) -> Option<ValueReader<'a>> {
        self.items.next().map(ValueReader::new)
    }

    /// Number of elements not yet read.
    pub fn remaining(&self) -> usize {
        self.items.len()
    }
}

/// Field access over a decoded document.
#[derive(Debug, Clone, Copy)]
pub struct DocumentReader<'a> {
    fields: &'a [(String, BsonValue)],
}

impl<'a> DocumentReader<'a> {
    pub fn new(fields: &'a [(String, BsonValue)]) -> Self {
        Self { fields }
    }

    /// Looks up a field by name. With duplicate keys the first one wins.
    pub fn field(&self, key: &str) -> Option<ValueReader<'a>> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| ValueReader::new(v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
