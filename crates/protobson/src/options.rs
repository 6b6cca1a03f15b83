//! Encoding options.

/// Options controlling how native scalars are written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EncodeOptions {
    /// When `true`, unsigned integers that fit in an `int32` are written as
    /// BSON int32 instead of int64. Off by default.
    pub min_size: bool,
}

impl EncodeOptions {
    pub fn min_size() -> Self {
        Self { min_size: true }
    }
}
