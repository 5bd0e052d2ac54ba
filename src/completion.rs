//! Completion of partial dates and times.

use core::fmt;
use core::str::FromStr;

use crate::{TimeError, DEFAULT_DATE, DEFAULT_TIME};

/// The kind of value completed by [`complete`] and [`to_iso`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
pub enum Unit {
    /// A `YYYY-MM-DD` date, completed from [`DEFAULT_DATE`].
    Date,
    /// A `HH:mm:ss` time, completed from [`DEFAULT_TIME`].
    Time,
    /// A date and a time separated by a space.
    DateTime,
}

impl Unit {
    fn separator(&self) -> char {
        match self {
            Self::Date => '-',
            Self::Time => ':',
            Self::DateTime => ' ',
        }
    }
}

impl FromStr for Unit {
    type Err = TimeError;

    /// Parses `DATE`, `TIME` or `DATETIME`, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "DATE" => Ok(Self::Date),
            "TIME" => Ok(Self::Time),
            "DATETIME" => Ok(Self::DateTime),
            _ => Err(TimeError::UnrecognizedUnit(s.to_owned())),
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Date => "DATE".fmt(fmt),
            Self::Time => "TIME".fmt(fmt),
            Self::DateTime => "DATETIME".fmt(fmt),
        }
    }
}

/// The outcome of [`to_iso`]: the completed value, and a warning if the
/// input was passed through unchanged.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Completion {
    value: String,
    warning: Option<TimeError>,
}

impl Completion {
    /// Returns the completed value, or the untouched input if a warning was
    /// raised.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Returns the warning raised during completion, if any.
    pub fn warning(&self) -> Option<&TimeError> {
        self.warning.as_ref()
    }

    /// Consumes the completion, discarding any warning.
    pub fn into_value(self) -> String {
        self.value
    }

    /// Consumes the completion, promoting a warning to an error.
    pub fn into_result(self) -> Result<String, TimeError> {
        match self.warning {
            Some(err) => Err(err),
            None => Ok(self.value),
        }
    }
}

/// Pads the missing trailing components of a partial date or time.
///
/// The input is split on the separator of the unit; if it holds fewer
/// components than the default value, the missing trailing components are
/// taken from the default value. Inputs that are already complete are
/// returned unchanged. No range checking is performed on the components.
///
/// For [`Unit::DateTime`], the date and the time are split on the first
/// space and completed separately; a missing time becomes [`DEFAULT_TIME`].
///
/// # Examples
///
/// ```
/// use utc_normalize::{complete, Unit};
///
/// assert_eq!(complete("2024-03", Unit::Date), "2024-03-01");
/// assert_eq!(complete("10", Unit::Time), "10:00:00");
/// assert_eq!(complete("2024 10:30", Unit::DateTime), "2024-01-01 10:30:00");
/// ```
pub fn complete(partial: &str, unit: Unit) -> String {
    match unit {
        Unit::Date => pad(partial, DEFAULT_DATE, unit.separator()),
        Unit::Time => pad(partial, DEFAULT_TIME, unit.separator()),
        Unit::DateTime => {
            let (date, time) = partial
                .split_once(unit.separator())
                .unwrap_or((partial, ""));
            let time = if time.is_empty() {
                DEFAULT_TIME.to_owned()
            } else {
                complete(time, Unit::Time)
            };

            format!("{}{}{}", complete(date, Unit::Date), unit.separator(), time)
        }
    }
}

/// Pads a partial date or time, with the unit given by name.
///
/// The unit name is one of `DATE`, `TIME` or `DATETIME`, in any case. An
/// unknown unit is not fatal: the input is returned unchanged together with
/// a [`TimeError::UnrecognizedUnit`] warning, which is also logged.
///
/// # Examples
///
/// ```
/// use utc_normalize::to_iso;
///
/// assert_eq!(to_iso("2024-03", "date").value(), "2024-03-01");
///
/// let completion = to_iso("2024-03", "WEEK");
/// assert_eq!(completion.value(), "2024-03");
/// assert!(completion.warning().is_some());
/// ```
pub fn to_iso(partial: &str, unit: &str) -> Completion {
    match unit.parse::<Unit>() {
        Ok(unit) => Completion {
            value: complete(partial, unit),
            warning: None,
        },
        Err(err) => {
            tracing::warn!(unit, input = partial, "bad time format, returning input unchanged");

            Completion {
                value: partial.to_owned(),
                warning: Some(err),
            }
        }
    }
}

fn pad(partial: &str, default: &str, separator: char) -> String {
    let actual: Vec<&str> = partial.split(separator).collect();
    let base: Vec<&str> = default.split(separator).collect();

    let mut components = actual.clone();
    if actual.len() < base.len() {
        components.extend_from_slice(&base[actual.len()..]);
    }

    let separator = separator.to_string();
    components.join(separator.as_str())
}
