//! Module containing functionality related to BSON datetimes.

use std::{
    fmt,
    time::{Duration, SystemTime, UNIX_EPOCH},
};

use thiserror::Error;
use time::{format_description::well_known::Rfc3339, OffsetDateTime};

/// Errors that can occur when formatting or parsing a [`DateTime`].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The millisecond value is outside the range `time` can represent as a
    /// calendar date.
    #[error("datetime out of range: {millis}ms since epoch")]
    OutOfRange { millis: i64 },

    /// The RFC 3339 string could not be parsed.
    #[error("invalid RFC 3339 datetime: {0}")]
    InvalidRfc3339String(String),
}

/// Struct representing a BSON datetime: a signed 64-bit count of milliseconds
/// since the Unix epoch, which is exactly the tag 0x09 wire payload. BSON
/// datetimes have millisecond precision.
#[derive(Eq, PartialEq, Ord, PartialOrd, Hash, Copy, Clone)]
pub struct DateTime(i64);

impl DateTime {
    /// The latest representable BSON datetime.
    pub const MAX: Self = Self::from_millis(i64::MAX);

    /// The earliest representable BSON datetime.
    pub const MIN: Self = Self::from_millis(i64::MIN);

    /// Makes a new [`DateTime`] from the number of non-leap milliseconds
    /// since January 1, 1970 0:00:00 UTC.
    pub const fn from_millis(date: i64) -> Self {
        DateTime(date)
    }

    /// Returns a [`DateTime`] which corresponds to the current date and time.
    pub fn now() -> DateTime {
        Self::from_system_time(SystemTime::now())
    }

    /// Convert the given [`std::time::SystemTime`] to a [`DateTime`],
    /// truncating sub-millisecond precision. Times outside the representable
    /// range saturate to [`DateTime::MAX`] / [`DateTime::MIN`].
    pub fn from_system_time(st: SystemTime) -> Self {
        match st.duration_since(UNIX_EPOCH) {
            Ok(d) if d.as_millis() <= i64::MAX as u128 => {
                Self::from_millis(d.as_millis() as i64)
            }
            Ok(_) => Self::MAX,
            // handle SystemTime from before the Unix epoch
            Err(e) => {
                let millis = e.duration().as_millis();
                if millis > i64::MAX as u128 {
                    Self::MIN
                } else {
                    Self::from_millis(-(millis as i64))
                }
            }
        }
    }

    /// Convert this [`DateTime`] to a [`std::time::SystemTime`].
    pub fn to_system_time(self) -> SystemTime {
        if self.0 >= 0 {
            UNIX_EPOCH + Duration::from_millis(self.0 as u64)
        } else {
            UNIX_EPOCH - Duration::from_millis(self.0.unsigned_abs())
        }
    }

    /// Returns the number of non-leap milliseconds since January 1, 1970
    /// 0:00:00 UTC that this [`DateTime`] represents.
    pub const fn timestamp_millis(self) -> i64 {
        self.0
    }

    /// Convert this [`DateTime`] to an RFC 3339 formatted string.
    pub fn try_to_rfc3339_string(self) -> Result<String, Error> {
        self.to_offset_date_time()?
            .format(&Rfc3339)
            .map_err(|_| Error::OutOfRange { millis: self.0 })
    }

    /// Convert the given RFC 3339 formatted string to a [`DateTime`],
    /// truncating it to millisecond precision.
    pub fn parse_rfc3339_str(s: impl AsRef<str>) -> Result<Self, Error> {
        let odt = OffsetDateTime::parse(s.as_ref(), &Rfc3339)
            .map_err(|e| Error::InvalidRfc3339String(e.to_string()))?;
        Ok(Self::from_millis(
            (odt.unix_timestamp_nanos() / 1_000_000) as i64,
        ))
    }

    fn to_offset_date_time(self) -> Result<OffsetDateTime, Error> {
        OffsetDateTime::from_unix_timestamp_nanos(self.0 as i128 * 1_000_000)
            .map_err(|_| Error::OutOfRange { millis: self.0 })
    }
}

impl fmt::Debug for DateTime {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut tup = f.debug_tuple("DateTime");
        match self.to_offset_date_time() {
            Ok(dt) => tup.field(&format_args!("{}", dt)),
            _ => tup.field(&self.0),
        };
        tup.finish()
    }
}

impl fmt::Display for DateTime {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.to_offset_date_time() {
            Ok(dt) => write!(f, "{}", dt),
            _ => write!(f, "DateTime({})", self.0),
        }
    }
}

impl From<SystemTime> for DateTime {
    fn from(st: SystemTime) -> Self {
        Self::from_system_time(st)
    }
}

impl From<DateTime> for SystemTime {
    fn from(dt: DateTime) -> Self {
        dt.to_system_time()
    }
}
