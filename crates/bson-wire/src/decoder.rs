//! BSON document decoder.
//!
//! BSON is a little-endian binary format.

use super::error::BsonError;
use super::values::{BsonBinary, BsonObjectId, BsonTimestamp, BsonType, BsonValue};

/// BSON document decoder.
#[derive(Debug, Default)]
pub struct BsonDecoder<'a> {
    data: &'a [u8],
    x: usize,
}

impl<'a> BsonDecoder<'a> {
    pub fn new() -> Self {
        Self { data: &[], x: 0 }
    }

    /// Decodes a BSON document from bytes, returning an error on malformed input.
    pub fn decode(&mut self, data: &'a [u8]) -> Result<Vec<(String, BsonValue)>, BsonError> {
        self.data = data;
        self.x = 0;
        self.read_document()
    }

    #[inline]
    fn take(&mut self, n: usize) -> Result<&'a [u8], BsonError> {
        let end = self.x.checked_add(n).ok_or(BsonError::UnexpectedEof)?;
        let data: &'a [u8] = self.data;
        let slice = data.get(self.x..end).ok_or(BsonError::UnexpectedEof)?;
        self.x = end;
        Ok(slice)
    }

    fn array<const N: usize>(&mut self) -> Result<[u8; N], BsonError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    fn u8(&mut self) -> Result<u8, BsonError> {
        Ok(self.take(1)?[0])
    }

    fn i32_le(&mut self) -> Result<i32, BsonError> {
        Ok(i32::from_le_bytes(self.array()?))
    }

    fn u32_le(&mut self) -> Result<u32, BsonError> {
        Ok(u32::from_le_bytes(self.array()?))
    }

    fn i64_le(&mut self) -> Result<i64, BsonError> {
        Ok(i64::from_le_bytes(self.array()?))
    }

    fn f64_le(&mut self) -> Result<f64, BsonError> {
        Ok(f64::from_le_bytes(self.array()?))
    }

    fn utf8(&mut self, n: usize) -> Result<String, BsonError> {
        let bytes = self.take(n)?;
        std::str::from_utf8(bytes)
            .map(str::to_owned)
            .map_err(|_| BsonError::InvalidUtf8)
    }

    fn read_document(&mut self) -> Result<Vec<(String, BsonValue)>, BsonError> {
        let start = self.x;
        let size = self.i32_le()?;
        if size < 5 {
            return Err(BsonError::InvalidLength(size));
        }
        let end = start + size as usize;
        if end > self.data.len() {
            return Err(BsonError::UnexpectedEof);
        }
        let mut fields: Vec<(String, BsonValue)> = Vec::new();
        // The final byte of every document is the 0x00 terminator.
        while self.x < end - 1 {
            let tag = self.u8()?;
            if tag == 0 {
                break;
            }
            let key = self.read_cstring()?;
            let value = self.read_element_value(tag)?;
            fields.push((key, value));
        }
        if self.x > end {
            return Err(BsonError::InvalidLength(size));
        }
        self.x = end;
        Ok(fields)
    }

    fn read_cstring(&mut self) -> Result<String, BsonError> {
        let rest = &self.data[self.x..];
        let len = rest
            .iter()
            .position(|&b| b == 0)
            .ok_or(BsonError::UnexpectedEof)?;
        let s = self.utf8(len)?;
        self.x += 1;
        Ok(s)
    }

    fn read_string(&mut self) -> Result<String, BsonError> {
        let length = self.i32_le()?;
        if length < 1 {
            return Err(BsonError::InvalidLength(length));
        }
        let s = self.utf8(length as usize - 1)?;
        match self.data.get(self.x) {
            Some(0) => {}
            Some(_) => return Err(BsonError::InvalidLength(length)),
            None => return Err(BsonError::UnexpectedEof),
        }
        self.x += 1;
        Ok(s)
    }

    fn read_element_value(&mut self, tag: u8) -> Result<BsonValue, BsonError> {
        let typ = BsonType::from_tag(tag).ok_or(BsonError::UnsupportedType(tag))?;
        let value = match typ {
            BsonType::Double => BsonValue::Float(self.f64_le()?),
            BsonType::String => BsonValue::Str(self.read_string()?),
            BsonType::EmbeddedDocument => BsonValue::Document(self.read_document()?),
            BsonType::Array => BsonValue::Array(self.read_array()?),
            BsonType::Binary => self.read_binary()?,
            BsonType::Undefined => BsonValue::Undefined,
            BsonType::ObjectId => BsonValue::ObjectId(BsonObjectId::from_bytes(self.array()?)),
            BsonType::Boolean => BsonValue::Boolean(self.u8()? == 1),
            BsonType::DateTime => BsonValue::DateTime(self.i64_le()?),
            BsonType::Null => BsonValue::Null,
            BsonType::Regex => {
                let pattern = self.read_cstring()?;
                let flags = self.read_cstring()?;
                BsonValue::Regex(pattern, flags)
            }
            BsonType::JavaScript => BsonValue::JavaScript(self.read_string()?),
            BsonType::Symbol => BsonValue::Symbol(self.read_string()?),
            BsonType::Int32 => BsonValue::Int32(self.i32_le()?),
            BsonType::Timestamp => BsonValue::Timestamp(BsonTimestamp {
                increment: self.u32_le()?,
                timestamp: self.u32_le()?,
            }),
            BsonType::Int64 => BsonValue::Int64(self.i64_le()?),
            BsonType::Decimal128 => BsonValue::Decimal128(self.array()?),
            BsonType::MinKey => BsonValue::MinKey,
            BsonType::MaxKey => BsonValue::MaxKey,
        };
        Ok(value)
    }

    fn read_array(&mut self) -> Result<Vec<BsonValue>, BsonError> {
        let fields = self.read_document()?;
        // Keys are written in order; sort anyway so a reordered producer still decodes.
        let mut indexed: Vec<(usize, BsonValue)> = fields
            .into_iter()
            .map(|(k, v)| (k.parse::<usize>().unwrap_or(usize::MAX), v))
            .collect();
        indexed.sort_by_key(|(i, _)| *i);
        Ok(indexed.into_iter().map(|(_, v)| v).collect())
    }

    fn read_binary(&mut self) -> Result<BsonValue, BsonError> {
        let length = self.i32_le()?;
        if length < 0 {
            return Err(BsonError::InvalidLength(length));
        }
        let subtype = self.u8()?;
        let data = self.take(length as usize)?.to_vec();
        Ok(BsonValue::Binary(BsonBinary { subtype, data }))
    }
}
