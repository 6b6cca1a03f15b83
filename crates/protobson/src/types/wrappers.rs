//! Single-field scalar wrapper messages.
//!
//! A wrapper distinguishes "absent" from "present zero value": a field of type
//! `Option<Int32Value>` can be `None` or `Some(Int32Value { value: 0 })`.

macro_rules! wrapper {
    ($(#[$doc:meta])* $name:ident, $inner:ty) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Default)]
        pub struct $name {
            pub value: $inner,
        }

        impl $name {
            pub fn new(value: impl Into<$inner>) -> Self {
                Self { value: value.into() }
            }
        }

        impl From<$inner> for $name {
            fn from(value: $inner) -> Self {
                Self { value }
            }
        }
    };
}

wrapper!(
    /// Wrapper message for `bool`.
    BoolValue,
    bool
);
wrapper!(
    /// Wrapper message for `bytes`.
    BytesValue,
    Vec<u8>
);
wrapper!(
    /// Wrapper message for `double`.
    DoubleValue,
    f64
);
wrapper!(
    /// Wrapper message for `float`.
    FloatValue,
    f32
);
wrapper!(
    /// Wrapper message for `int32`.
    Int32Value,
    i32
);
wrapper!(
    /// Wrapper message for `int64`.
    Int64Value,
    i64
);
wrapper!(
    /// Wrapper message for `string`.
    StringValue,
    String
);
wrapper!(
    /// Wrapper message for `uint32`.
    UInt32Value,
    u32
);
wrapper!(
    /// Wrapper message for `uint64`.
    UInt64Value,
    u64
);
