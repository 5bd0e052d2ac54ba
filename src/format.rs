//! Format patterns used to parse and print timestamps.

use std::borrow::Cow;
use std::fmt;

use chrono::format::{Parsed, StrftimeItems};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::TimeError;

/// Fill value for the missing trailing components of a partial date.
pub const DEFAULT_DATE: &str = "1970-01-01";

/// Fill value for the missing trailing components of a partial time.
pub const DEFAULT_TIME: &str = "00:00:00";

/// A pattern describing how a timestamp is parsed from and printed to a
/// string.
///
/// Patterns use the `strftime`-like syntax of [`chrono::format::strftime`].
/// A pattern without time fields parses to midnight, and a pattern without
/// date fields parses onto [`DEFAULT_DATE`]. A pattern with an incomplete
/// date or time, such as `%m-%d` or `%Y-%m-%d %H`, never parses.
///
/// [`chrono::format::strftime`]: https://docs.rs/chrono/latest/chrono/format/strftime/index.html
///
/// # Examples
///
/// ```
/// use utc_normalize::{Format, Timestamp};
///
/// let t = Timestamp::parse("15/03/2024 10h30", &Format::new("%d/%m/%Y %Hh%M")).unwrap();
/// assert_eq!(t.format(&Format::ISO_DATETIME), "2024-03-15 10:30:00");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "String", into = "String")
)]
pub struct Format {
    pattern: Cow<'static, str>,
}

impl Format {
    /// Calendar date, `YYYY-MM-DD`.
    pub const ISO_DATE: Self = Self::from_static("%Y-%m-%d");

    /// Time of day, `HH:mm:ss`.
    pub const ISO_TIME: Self = Self::from_static("%H:%M:%S");

    /// Date and time separated by a space, `YYYY-MM-DD HH:mm:ss`.
    ///
    /// This is the canonical representation of UTC timestamps.
    pub const ISO_DATETIME: Self = Self::from_static("%Y-%m-%d %H:%M:%S");

    /// Millisecond-precision UTC wire format, `YYYY-MM-DDTHH:mm:ss.SSSZ`, as
    /// produced by database client libraries and JavaScript date
    /// serializers.
    pub const WIRE_ISO8601: Self = Self::from_static("%Y-%m-%dT%H:%M:%S%.3fZ");

    /// Creates a format from a static pattern.
    pub const fn from_static(pattern: &'static str) -> Self {
        Self {
            pattern: Cow::Borrowed(pattern),
        }
    }

    /// Creates a format from an arbitrary pattern.
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: Cow::Owned(pattern.into()),
        }
    }

    /// Returns the pattern string.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Parses a string with this format.
    ///
    /// The date defaults to [`DEFAULT_DATE`] only if no date field was
    /// parsed, and the time to midnight only if no time field was parsed; a
    /// partially specified date or time is an error.
    pub(crate) fn parse(&self, input: &str) -> Result<NaiveDateTime, TimeError> {
        let mut parsed = Parsed::new();

        chrono::format::parse(&mut parsed, input, StrftimeItems::new(&self.pattern))
            .and_then(|()| {
                if parsed.timestamp.is_some() {
                    return parsed.to_naive_datetime_with_offset(0);
                }

                let date = if has_date_fields(&parsed) {
                    parsed.to_naive_date()?
                } else {
                    NaiveDate::default()
                };
                let time = if has_time_fields(&parsed) {
                    parsed.to_naive_time()?
                } else {
                    NaiveTime::MIN
                };

                Ok(date.and_time(time))
            })
            .map_err(|source| TimeError::InvalidTimestamp {
                input: input.to_owned(),
                format: self.pattern.to_string(),
                source,
            })
    }

    /// Prints a date-time with this format.
    pub(crate) fn format(&self, date_time: &NaiveDateTime) -> String {
        date_time.format(&self.pattern).to_string()
    }
}

fn has_date_fields(parsed: &Parsed) -> bool {
    [
        parsed.year,
        parsed.year_div_100,
        parsed.year_mod_100,
        parsed.isoyear,
        parsed.isoyear_div_100,
        parsed.isoyear_mod_100,
    ]
    .iter()
    .any(Option::is_some)
        || [
            parsed.month,
            parsed.week_from_sun,
            parsed.week_from_mon,
            parsed.isoweek,
            parsed.ordinal,
            parsed.day,
        ]
        .iter()
        .any(Option::is_some)
        || parsed.weekday.is_some()
}

fn has_time_fields(parsed: &Parsed) -> bool {
    [
        parsed.hour_div_12,
        parsed.hour_mod_12,
        parsed.minute,
        parsed.second,
        parsed.nanosecond,
    ]
    .iter()
    .any(Option::is_some)
}

impl Default for Format {
    fn default() -> Self {
        Self::ISO_DATETIME
    }
}

impl fmt::Display for Format {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.pattern.fmt(fmt)
    }
}

impl From<String> for Format {
    fn from(pattern: String) -> Self {
        Self::new(pattern)
    }
}

impl From<Format> for String {
    fn from(format: Format) -> Self {
        format.pattern.into_owned()
    }
}
