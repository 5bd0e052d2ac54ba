//! Fixed UTC offsets.

use core::fmt;
use core::str::FromStr;

use chrono::{FixedOffset, TimeDelta};

use crate::ParseOffsetError;

const MINUTES_PER_HOUR: i32 = 60;

/// A fixed distance from UTC, expressed as a signed number of minutes east
/// of Greenwich.
///
/// The textual form is `[±]HH:MM`, where the hour field may have 1 or 2
/// digits and the minute field exactly 2 digits. The leading sign applies to
/// the whole offset, so `-05:30` is 5 hours and 30 minutes west of UTC.
///
/// # Examples
///
/// ```
/// use utc_normalize::UtcOffset;
///
/// let offset: UtcOffset = "-05:30".parse().unwrap();
/// assert_eq!(offset.as_minutes(), -330);
/// assert_eq!(offset.to_string(), "-05:30");
///
/// assert_eq!("00:00".parse::<UtcOffset>(), Ok(UtcOffset::UTC));
/// ```
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "String")
)]
pub struct UtcOffset {
    minutes: i32,
}

impl UtcOffset {
    /// The null offset, `00:00`.
    pub const UTC: Self = Self { minutes: 0 };

    /// The largest accepted offset, `+23:59`.
    pub const MAX: Self = Self {
        minutes: 23 * MINUTES_PER_HOUR + 59,
    };

    /// The smallest accepted offset, `-23:59`.
    pub const MIN: Self = Self {
        minutes: -(23 * MINUTES_PER_HOUR + 59),
    };

    /// Creates an offset from its sign, hours and minutes.
    ///
    /// Returns an error if the hours are not between 0 and 23 or the minutes
    /// are not between 0 and 59.
    ///
    /// # Examples
    ///
    /// ```
    /// use utc_normalize::UtcOffset;
    ///
    /// let offset = UtcOffset::from_hm(true, 3, 30).unwrap();
    /// assert_eq!(offset.as_minutes(), -210);
    /// ```
    pub const fn from_hm(west: bool, hours: u8, minutes: u8) -> Result<Self, ParseOffsetError> {
        if hours > 23 {
            return Err(ParseOffsetError::InvalidHour(hours));
        }
        if minutes > 59 {
            return Err(ParseOffsetError::InvalidMinute(minutes));
        }

        let total = hours as i32 * MINUTES_PER_HOUR + minutes as i32;

        Ok(Self {
            minutes: if west { -total } else { total },
        })
    }

    /// Returns the signed number of minutes east of UTC.
    pub const fn as_minutes(&self) -> i32 {
        self.minutes
    }

    /// Returns the offset as a `chrono::TimeDelta`.
    pub fn to_time_delta(&self) -> TimeDelta {
        TimeDelta::minutes(self.minutes as i64)
    }

    /// Returns the equivalent `chrono::FixedOffset`.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::FixedOffset;
    /// use utc_normalize::UtcOffset;
    ///
    /// let offset: UtcOffset = "+05:30".parse().unwrap();
    /// assert_eq!(offset.to_fixed_offset(), FixedOffset::east_opt(19_800).unwrap());
    /// ```
    pub fn to_fixed_offset(&self) -> FixedOffset {
        match FixedOffset::east_opt(self.minutes * 60) {
            Some(offset) => offset,
            None => unreachable!("offsets are bounded by ±23:59"),
        }
    }
}

impl fmt::Display for UtcOffset {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.minutes < 0 { '-' } else { '+' };
        let abs = self.minutes.unsigned_abs();

        write!(fmt, "{}{:02}:{:02}", sign, abs / 60, abs % 60)
    }
}

impl FromStr for UtcOffset {
    type Err = ParseOffsetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_offset(s)
    }
}

impl TryFrom<String> for UtcOffset {
    type Error = ParseOffsetError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<UtcOffset> for String {
    fn from(offset: UtcOffset) -> Self {
        offset.to_string()
    }
}

/// Parses a `[±]H[H]:MM` offset.
fn parse_offset(stream: &str) -> Result<UtcOffset, ParseOffsetError> {
    // Expect a run of decimal digits whose width lies within the provided
    // bounds.
    fn pull_digits(
        token: &str,
        min_width: usize,
        max_width: usize,
    ) -> Result<u8, ParseOffsetError> {
        if token.is_empty() {
            return Err(ParseOffsetError::MissingField);
        }
        if token.len() < min_width || token.len() > max_width {
            return Err(ParseOffsetError::InvalidFieldWidth);
        }
        if !token.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ParseOffsetError::InvalidFieldValue);
        }

        token
            .parse()
            .map_err(|_| ParseOffsetError::InvalidFieldValue)
    }

    // Pull the leading sign, if any.
    let (stream, west) = match stream.chars().next() {
        Some('+') => (&stream[1..], false),
        Some('-') => (&stream[1..], true),
        _ => (stream, false),
    };

    let (hours, minutes) = stream
        .split_once(':')
        .ok_or(ParseOffsetError::MissingField)?;
    let hours = pull_digits(hours, 1, 2)?;
    let minutes = pull_digits(minutes, 2, 2)?;

    UtcOffset::from_hm(west, hours, minutes)
}
