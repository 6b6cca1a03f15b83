//! Dynamically typed values: `Value`, `ListValue`, `Struct`, `NullValue`.

use std::collections::BTreeMap;

use crate::descriptor::ValueKind;
use crate::error::CodecError;
use crate::field::{Field, FieldRef};

/// The single null marker of the `Value` union.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NullValue {
    #[default]
    NullValue,
}

/// A dynamically typed value. Exactly one variant is active.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    List(ListValue),
    Struct(Struct),
}

/// Ordered sequence of values. `None` marks an absent element, which is
/// written to the wire as null.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ListValue {
    pub values: Vec<Option<Value>>,
}

/// String-keyed map of values.
///
/// There is no codec for `Struct`: encoding or decoding one fails with
/// [`CodecError::UnregisteredType`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Struct {
    pub fields: BTreeMap<String, Option<Value>>,
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Bool,
            Value::Number(_) => ValueKind::Number,
            Value::String(_) => ValueKind::String,
            Value::List(_) => ValueKind::List,
            Value::Struct(_) => ValueKind::Struct,
        }
    }

    /// Borrows the payload of the active variant.
    pub fn payload(&self) -> FieldRef<'_> {
        match self {
            Value::Null => FieldRef::NullValue(NullValue::NullValue),
            Value::Bool(b) => FieldRef::Bool(*b),
            Value::Number(n) => FieldRef::Double(*n),
            Value::String(s) => FieldRef::String(s),
            Value::List(list) => FieldRef::ListValue(list),
            Value::Struct(s) => FieldRef::Struct(s),
        }
    }

    /// Rebuilds a value of variant `kind` from its decoded payload.
    pub fn from_payload(kind: ValueKind, payload: Field) -> Result<Self, CodecError> {
        let value = match (kind, payload) {
            (ValueKind::Null, Field::NullValue(_)) => Value::Null,
            (ValueKind::Bool, Field::Bool(b)) => Value::Bool(b),
            (ValueKind::Number, Field::Double(n)) => Value::Number(n),
            (ValueKind::String, Field::String(s)) => Value::String(s),
            (ValueKind::List, Field::ListValue(list)) => Value::List(list),
            (ValueKind::Struct, Field::Struct(s)) => Value::Struct(s),
            (_, other) => {
                return Err(CodecError::TypeMismatch {
                    codec: "Value",
                    actual: other.descriptor(),
                })
            }
        };
        Ok(value)
    }
}

impl From<NullValue> for Value {
    fn from(_: NullValue) -> Self {
        Value::Null
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<ListValue> for Value {
    fn from(list: ListValue) -> Self {
        Value::List(list)
    }
}

impl From<Struct> for Value {
    fn from(s: Struct) -> Self {
        Value::Struct(s)
    }
}

impl ListValue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, value: impl Into<Value>) {
        self.values.push(Some(value.into()));
    }

    /// Appends an absent element.
    pub fn push_absent(&mut self) {
        self.values.push(None);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Option<Value>> {
        self.values.iter()
    }
}

impl FromIterator<Value> for ListValue {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(Some).collect(),
        }
    }
}

impl Struct {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(key.into(), Some(value.into()));
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key).and_then(Option::as_ref)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
