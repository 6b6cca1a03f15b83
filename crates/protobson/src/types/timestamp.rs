//! Fixed-point point in time, independent of any calendar or time zone.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::error::CodecError;

/// Seconds of 0001-01-01T00:00:00Z.
const MIN_VALID_SECONDS: i64 = -62_135_596_800;
/// Seconds of 10000-01-01T00:00:00Z (exclusive upper bound).
const MAX_VALID_SECONDS: i64 = 253_402_300_800;

const NANOS_PER_SECOND: i32 = 1_000_000_000;
const NANOS_PER_MILLI: i32 = 1_000_000;

/// Seconds since the Unix epoch plus a non-negative sub-second remainder.
///
/// Valid timestamps have `0 <= nanos < 1_000_000_000` and fall within years
/// 1 through 9999 inclusive. BSON stores milliseconds, so a round trip
/// through the wire truncates `nanos` to a multiple of 1_000_000.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Timestamp {
    pub seconds: i64,
    pub nanos: i32,
}

impl Timestamp {
    pub fn new(seconds: i64, nanos: i32) -> Self {
        Self { seconds, nanos }
    }

    /// The current wall-clock time.
    pub fn now() -> Self {
        let now = Utc::now();
        Self {
            seconds: now.timestamp(),
            nanos: now.timestamp_subsec_nanos() as i32,
        }
    }

    pub fn validate(&self) -> Result<(), CodecError> {
        if self.seconds < MIN_VALID_SECONDS {
            return Err(CodecError::TimeConversion(format!(
                "timestamp {self:?} before 0001-01-01"
            )));
        }
        if self.seconds >= MAX_VALID_SECONDS {
            return Err(CodecError::TimeConversion(format!(
                "timestamp {self:?} after 10000-01-01"
            )));
        }
        if !(0..NANOS_PER_SECOND).contains(&self.nanos) {
            return Err(CodecError::TimeConversion(format!(
                "timestamp {self:?}: nanos not in range [0, 1e9)"
            )));
        }
        Ok(())
    }

    pub fn from_datetime(dt: DateTime<Utc>) -> Result<Self, CodecError> {
        let ts = Self {
            seconds: dt.timestamp(),
            nanos: dt.timestamp_subsec_nanos() as i32,
        };
        // A leap second shows up as nanos >= 1e9 and fails validation here.
        ts.validate()?;
        Ok(ts)
    }

    pub fn to_datetime(&self) -> Result<DateTime<Utc>, CodecError> {
        self.validate()?;
        DateTime::from_timestamp(self.seconds, self.nanos as u32).ok_or_else(|| {
            CodecError::TimeConversion(format!("timestamp {self:?} not representable"))
        })
    }

    /// Drops everything below millisecond precision.
    pub fn truncate_to_millis(&self) -> Self {
        Self {
            seconds: self.seconds,
            nanos: self.nanos - self.nanos % NANOS_PER_MILLI,
        }
    }

    /// RFC 3339 form with a `Z` suffix and 0, 3, 6 or 9 fractional digits.
    pub fn to_rfc3339(&self) -> Result<String, CodecError> {
        Ok(self
            .to_datetime()?
            .to_rfc3339_opts(SecondsFormat::AutoSi, true))
    }

    pub fn parse_rfc3339(s: &str) -> Result<Self, CodecError> {
        let dt = DateTime::parse_from_rfc3339(s)
            .map_err(|e| CodecError::TimeConversion(format!("{s:?}: {e}")))?;
        Self::from_datetime(dt.with_timezone(&Utc))
    }
}

impl TryFrom<DateTime<Utc>> for Timestamp {
    type Error = CodecError;

    fn try_from(dt: DateTime<Utc>) -> Result<Self, Self::Error> {
        Self::from_datetime(dt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds() {
        assert!(Timestamp::new(MIN_VALID_SECONDS, 0).validate().is_ok());
        assert!(Timestamp::new(MIN_VALID_SECONDS - 1, 0).validate().is_err());
        assert!(Timestamp::new(MAX_VALID_SECONDS - 1, 999_999_999).validate().is_ok());
        assert!(Timestamp::new(MAX_VALID_SECONDS, 0).validate().is_err());
        assert!(Timestamp::new(0, -1).validate().is_err());
        assert!(Timestamp::new(0, NANOS_PER_SECOND).validate().is_err());
    }

    #[test]
    fn datetime_conversion() {
        let ts = Timestamp::new(1_600_000_000, 123_456_789);
        let dt = ts.to_datetime().unwrap();
        assert_eq!(Timestamp::from_datetime(dt).unwrap(), ts);
    }

    #[test]
    fn truncation_keeps_whole_millis() {
        let ts = Timestamp::new(-10, 123_456_789);
        assert_eq!(ts.truncate_to_millis(), Timestamp::new(-10, 123_000_000));
    }

    #[test]
    fn rfc3339() {
        assert_eq!(
            Timestamp::new(0, 0).to_rfc3339().unwrap(),
            "1970-01-01T00:00:00Z"
        );
        assert_eq!(
            Timestamp::new(63_108_020, 21_000_000).to_rfc3339().unwrap(),
            "1972-01-01T10:00:20.021Z"
        );
        assert_eq!(
            Timestamp::parse_rfc3339("1972-01-01T10:00:20.021Z").unwrap(),
            Timestamp::new(63_108_020, 21_000_000)
        );
        assert_eq!(
            Timestamp::parse_rfc3339("1970-01-01T01:00:00+01:00").unwrap(),
            Timestamp::new(0, 0)
        );
        assert!(matches!(
            Timestamp::parse_rfc3339("yesterday"),
            Err(CodecError::TimeConversion(_))
        ));
    }
}
