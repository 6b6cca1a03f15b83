//! Document identifier message, carried as a hex string.

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::OnceLock;

use chrono::Utc;
use protobson_wire::BsonObjectId;

use crate::error::CodecError;

/// A 12-byte BSON ObjectId exposed as its 24-character hex form.
///
/// The string is not checked on construction; an invalid value is reported
/// when it is encoded or converted with [`ObjectId::to_bson`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ObjectId {
    pub value: String,
}

fn process_unique() -> u64 {
    static PROCESS_UNIQUE: OnceLock<u64> = OnceLock::new();
    *PROCESS_UNIQUE.get_or_init(|| rand::random::<u64>() & 0xff_ffff_ffff)
}

fn next_counter() -> u32 {
    static COUNTER: OnceLock<AtomicU32> = OnceLock::new();
    COUNTER
        .get_or_init(|| AtomicU32::new(rand::random::<u32>()))
        .fetch_add(1, Ordering::Relaxed)
        & 0x00ff_ffff
}

impl ObjectId {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    /// Creates a fresh identifier from the current time, a per-process
    /// random value and an incrementing counter.
    pub fn generate() -> Self {
        let seconds = Utc::now().timestamp() as u32;
        Self::from_bson(BsonObjectId::from_parts(
            seconds,
            process_unique(),
            next_counter(),
        ))
    }

    pub fn from_bson(id: BsonObjectId) -> Self {
        Self { value: id.to_hex() }
    }

    /// Parses the hex string into the raw 12-byte identifier.
    pub fn to_bson(&self) -> Result<BsonObjectId, CodecError> {
        Ok(BsonObjectId::from_hex(&self.value)?)
    }

    pub fn is_valid(&self) -> bool {
        self.to_bson().is_ok()
    }
}

impl From<BsonObjectId> for ObjectId {
    fn from(id: BsonObjectId) -> Self {
        Self::from_bson(id)
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}
