//! Canonical JSON mapping for the dynamic value types.
//!
//! `Value` maps onto JSON one-to-one, except that non-finite numbers are
//! rendered as the strings `"NaN"`, `"Infinity"` and `"-Infinity"`, and an
//! absent list element or struct field is rendered as `null`.

use serde_json::{Map, Number};

use super::{ListValue, Struct, Value};
use crate::error::CodecError;

fn number_to_json(n: f64) -> serde_json::Value {
    match Number::from_f64(n) {
        Some(num) => serde_json::Value::Number(num),
        None if n.is_nan() => serde_json::Value::String("NaN".to_owned()),
        None if n > 0.0 => serde_json::Value::String("Infinity".to_owned()),
        None => serde_json::Value::String("-Infinity".to_owned()),
    }
}

fn optional_to_json(v: &Option<Value>) -> serde_json::Value {
    v.as_ref().map_or(serde_json::Value::Null, Value::to_json)
}

impl Value {
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Number(n) => number_to_json(*n),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::List(list) => list.to_json(),
            Value::Struct(s) => s.to_json(),
        }
    }

    pub fn from_json(json: serde_json::Value) -> Result<Self, CodecError> {
        let value = match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(
                n.as_f64()
                    .ok_or_else(|| CodecError::Json(format!("number {n} is not a double")))?,
            ),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => Value::List(ListValue::from_json_items(items)?),
            serde_json::Value::Object(map) => Value::Struct(Struct::from_json_map(map)?),
        };
        Ok(value)
    }
}

impl ListValue {
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Array(self.values.iter().map(optional_to_json).collect())
    }

    pub fn from_json(json: serde_json::Value) -> Result<Self, CodecError> {
        match json {
            serde_json::Value::Array(items) => Self::from_json_items(items),
            other => Err(CodecError::Json(format!("expected array, found {other}"))),
        }
    }

    fn from_json_items(items: Vec<serde_json::Value>) -> Result<Self, CodecError> {
        let values = items
            .into_iter()
            .map(|item| Value::from_json(item).map(Some))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { values })
    }
}

impl Struct {
    pub fn to_json(&self) -> serde_json::Value {
        let map: Map<String, serde_json::Value> = self
            .fields
            .iter()
            .map(|(k, v)| (k.clone(), optional_to_json(v)))
            .collect();
        serde_json::Value::Object(map)
    }

    pub fn from_json(json: serde_json::Value) -> Result<Self, CodecError> {
        match json {
            serde_json::Value::Object(map) => Self::from_json_map(map),
            other => Err(CodecError::Json(format!("expected object, found {other}"))),
        }
    }

    fn from_json_map(map: Map<String, serde_json::Value>) -> Result<Self, CodecError> {
        let mut out = Struct::new();
        for (k, v) in map {
            out.fields.insert(k, Some(Value::from_json(v)?));
        }
        Ok(out)
    }
}
