//! Error types.

use std::error::Error;
use std::fmt;

/// The error type returned when shifting or stepping a
/// [`Timestamp`](crate::Timestamp) would move it outside the representable
/// range.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OutOfRangeError(pub(crate) ());

impl fmt::Display for OutOfRangeError {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        "timestamp out of representable range".fmt(fmt)
    }
}

impl Error for OutOfRangeError {}

/// The error type returned when a UTC offset string is not of the form
/// `[±]HH:MM`.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ParseOffsetError {
    /// The hour or the minute field is missing.
    MissingField,
    /// The hour field does not have 1 or 2 digits, or the minute field does
    /// not have exactly 2 digits.
    InvalidFieldWidth,
    /// A field is not a decimal number.
    InvalidFieldValue,
    /// The hour field value is not between 0 and 23.
    InvalidHour(u8),
    /// The minute field value is not between 0 and 59.
    InvalidMinute(u8),
}

impl fmt::Display for ParseOffsetError {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingField => "expected an offset of the form [+|-]HH:MM".fmt(fmt),
            Self::InvalidFieldWidth => "an offset field has an invalid width".fmt(fmt),
            Self::InvalidFieldValue => "one of the offset fields is not a number".fmt(fmt),
            Self::InvalidHour(hour) => write!(fmt, "offset hour '{}' is not valid", hour),
            Self::InvalidMinute(min) => write!(fmt, "offset minute '{}' is not valid", min),
        }
    }
}

impl Error for ParseOffsetError {}

/// The error type of all timestamp normalization operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimeError {
    /// No UTC offset was supplied by the caller.
    MissingOffset,
    /// Required arguments are absent; the names of the missing arguments are
    /// listed in declaration order.
    MissingArgument(Vec<String>),
    /// The UTC offset could not be parsed.
    InvalidOffsetFormat(ParseOffsetError),
    /// The completion unit is neither `DATE`, `TIME` nor `DATETIME`.
    UnrecognizedUnit(String),
    /// The step unit of a range is unknown.
    UnrecognizedStepUnit(String),
    /// The step amount of a range is zero or negative.
    NonTerminatingRange(i64),
    /// A timestamp does not match the format it was parsed with.
    InvalidTimestamp {
        /// The rejected input.
        input: String,
        /// The pattern used for parsing.
        format: String,
        /// The underlying parser error.
        source: chrono::ParseError,
    },
    /// The result is outside the representable range.
    OutOfRange(OutOfRangeError),
    /// An eagerly materialized range would exceed the configured length.
    RangeTooLarge(usize),
}

impl fmt::Display for TimeError {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingOffset => "no UTC offset was provided".fmt(fmt),
            Self::MissingArgument(names) => {
                write!(fmt, "missing required arguments: {}", names.join(", "))
            }
            Self::InvalidOffsetFormat(err) => write!(fmt, "invalid UTC offset: {}", err),
            Self::UnrecognizedUnit(unit) => write!(fmt, "unit '{}' is not recognized", unit),
            Self::UnrecognizedStepUnit(unit) => {
                write!(fmt, "step unit '{}' is not recognized", unit)
            }
            Self::NonTerminatingRange(amount) => {
                write!(fmt, "step amount '{}' must be strictly positive", amount)
            }
            Self::InvalidTimestamp { input, format, .. } => {
                write!(fmt, "'{}' does not match format '{}'", input, format)
            }
            Self::OutOfRange(err) => err.fmt(fmt),
            Self::RangeTooLarge(limit) => {
                write!(fmt, "range yields more than {} timestamps", limit)
            }
        }
    }
}

impl Error for TimeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidOffsetFormat(err) => Some(err),
            Self::InvalidTimestamp { source, .. } => Some(source),
            Self::OutOfRange(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ParseOffsetError> for TimeError {
    fn from(err: ParseOffsetError) -> Self {
        Self::InvalidOffsetFormat(err)
    }
}

impl From<OutOfRangeError> for TimeError {
    fn from(err: OutOfRangeError) -> Self {
        Self::OutOfRange(err)
    }
}
