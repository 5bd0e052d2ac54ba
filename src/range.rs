//! Enumeration of evenly spaced timestamps.

use core::fmt;
use core::iter::FusedIterator;
use core::str::FromStr;

use chrono::{Months, TimeDelta};

use crate::{Format, OutOfRangeError, TimeError, Timestamp, DEFAULT_MAX_RANGE_LEN};

/// The unit of a range [`Step`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum StepUnit {
    /// Milliseconds.
    Milliseconds,
    /// Seconds.
    Seconds,
    /// Minutes.
    Minutes,
    /// Hours.
    Hours,
    /// Days of 24 hours.
    Days,
    /// Weeks of 7 days.
    Weeks,
    /// Calendar months; the day of month is clamped to the last day of
    /// shorter months.
    Months,
    /// Calendar years, i.e. 12 months.
    Years,
}

impl StepUnit {
    // Length of fixed-size units in milliseconds.
    const fn millis(&self) -> Option<i64> {
        match self {
            Self::Milliseconds => Some(1),
            Self::Seconds => Some(1_000),
            Self::Minutes => Some(60_000),
            Self::Hours => Some(3_600_000),
            Self::Days => Some(86_400_000),
            Self::Weeks => Some(604_800_000),
            Self::Months | Self::Years => None,
        }
    }
}

impl FromStr for StepUnit {
    type Err = TimeError;

    /// Parses a unit name such as `seconds`, `second` or `s`.
    ///
    /// Long names are case-insensitive. Among the short names, `m` stands for
    /// minutes and `M` for months.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ms" => return Ok(Self::Milliseconds),
            "s" => return Ok(Self::Seconds),
            "m" => return Ok(Self::Minutes),
            "h" => return Ok(Self::Hours),
            "d" => return Ok(Self::Days),
            "w" => return Ok(Self::Weeks),
            "M" => return Ok(Self::Months),
            "y" => return Ok(Self::Years),
            _ => {}
        }

        let name = s.to_ascii_lowercase();
        match name.strip_suffix('s').unwrap_or(name.as_str()) {
            "millisecond" => Ok(Self::Milliseconds),
            "second" => Ok(Self::Seconds),
            "minute" => Ok(Self::Minutes),
            "hour" => Ok(Self::Hours),
            "day" => Ok(Self::Days),
            "week" => Ok(Self::Weeks),
            "month" => Ok(Self::Months),
            "year" => Ok(Self::Years),
            _ => Err(TimeError::UnrecognizedStepUnit(s.to_owned())),
        }
    }
}

impl fmt::Display for StepUnit {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Milliseconds => "milliseconds".fmt(fmt),
            Self::Seconds => "seconds".fmt(fmt),
            Self::Minutes => "minutes".fmt(fmt),
            Self::Hours => "hours".fmt(fmt),
            Self::Days => "days".fmt(fmt),
            Self::Weeks => "weeks".fmt(fmt),
            Self::Months => "months".fmt(fmt),
            Self::Years => "years".fmt(fmt),
        }
    }
}

/// A strictly positive increment between consecutive timestamps of a
/// [`TimeRange`].
///
/// # Examples
///
/// ```
/// use utc_normalize::{Step, StepUnit, TimeError};
///
/// let step = Step::new(15, StepUnit::Minutes).unwrap();
/// assert_eq!(step.amount(), 15);
///
/// assert_eq!(
///     Step::new(0, StepUnit::Days),
///     Err(TimeError::NonTerminatingRange(0))
/// );
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Step {
    amount: u32,
    unit: StepUnit,
}

impl Step {
    /// Creates a step.
    ///
    /// Returns [`TimeError::NonTerminatingRange`] if the amount is zero or
    /// negative, and [`TimeError::OutOfRange`] if it does not fit in a `u32`.
    pub fn new(amount: i64, unit: StepUnit) -> Result<Self, TimeError> {
        if amount <= 0 {
            return Err(TimeError::NonTerminatingRange(amount));
        }
        let amount = u32::try_from(amount).map_err(|_| OutOfRangeError(()))?;

        Ok(Self { amount, unit })
    }

    /// Creates a step from a unit name, see [`StepUnit::from_str`].
    pub fn parse(amount: i64, unit: &str) -> Result<Self, TimeError> {
        Self::new(amount, unit.parse()?)
    }

    /// Returns the number of units per step.
    pub const fn amount(&self) -> u32 {
        self.amount
    }

    /// Returns the step unit.
    pub const fn unit(&self) -> StepUnit {
        self.unit
    }
}

impl fmt::Display for Step {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "{} {}", self.amount, self.unit)
    }
}

impl Timestamp {
    /// Advances a timestamp by `n` steps, checking for overflow.
    ///
    /// Returns `None` if overflow occurred.
    pub fn checked_add_steps(self, step: Step, n: u64) -> Option<Self> {
        match step.unit.millis() {
            Some(unit_millis) => {
                let millis = i64::from(step.amount)
                    .checked_mul(unit_millis)?
                    .checked_mul(i64::try_from(n).ok()?)?;

                self.checked_add(TimeDelta::try_milliseconds(millis)?)
            }
            None => {
                let months_per_unit = if step.unit == StepUnit::Years { 12 } else { 1 };
                let months = u32::try_from(n)
                    .ok()?
                    .checked_mul(step.amount)?
                    .checked_mul(months_per_unit)?;

                self.as_naive()
                    .checked_add_months(Months::new(months))
                    .map(Timestamp::from_naive)
            }
        }
    }
}

/// A finite sequence of evenly spaced timestamps between two inclusive
/// bounds.
///
/// The sequence is generated lazily: the `n`-th element is `start + n ×
/// step`, and enumeration stops at the first element past `end`. A range
/// whose `start` is in the future of its `end` is empty. Each call to
/// [`iter`](Self::iter) restarts the enumeration from `start`.
///
/// # Examples
///
/// ```
/// use utc_normalize::{Format, Step, StepUnit, TimeRange, Timestamp};
///
/// let start = Timestamp::parse("2024-01-31", &Format::ISO_DATE).unwrap();
/// let end = Timestamp::parse("2024-05-01", &Format::ISO_DATE).unwrap();
/// let range = TimeRange::new(start, end, Step::new(1, StepUnit::Months).unwrap());
///
/// let months: Vec<String> = range.iter().map(|t| t.format(&Format::ISO_DATE)).collect();
/// assert_eq!(months, ["2024-01-31", "2024-02-29", "2024-03-31", "2024-04-30"]);
///
/// // The range can be enumerated again.
/// assert_eq!(range.iter().count(), 4);
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TimeRange {
    start: Timestamp,
    end: Timestamp,
    step: Step,
}

impl TimeRange {
    /// Creates a range from its inclusive bounds and its step.
    pub fn new(start: Timestamp, end: Timestamp, step: Step) -> Self {
        tracing::trace!(%start, %end, %step, "new time range");

        Self { start, end, step }
    }

    /// Returns the first bound.
    pub const fn start(&self) -> Timestamp {
        self.start
    }

    /// Returns the last bound.
    pub const fn end(&self) -> Timestamp {
        self.end
    }

    /// Returns the step.
    pub const fn step(&self) -> Step {
        self.step
    }

    /// Returns an iterator over the timestamps of the range.
    pub fn iter(&self) -> TimeRangeIter {
        TimeRangeIter {
            range: *self,
            index: 0,
            done: false,
        }
    }

    /// Prints every timestamp of the range with the provided format.
    ///
    /// Returns [`TimeError::RangeTooLarge`] rather than allocating more than
    /// `max_len` strings.
    pub fn format_all(&self, format: &Format, max_len: usize) -> Result<Vec<String>, TimeError> {
        let mut times = Vec::new();
        for t in self.iter() {
            if times.len() == max_len {
                return Err(TimeError::RangeTooLarge(max_len));
            }
            times.push(t.format(format));
        }

        Ok(times)
    }
}

impl IntoIterator for &TimeRange {
    type Item = Timestamp;
    type IntoIter = TimeRangeIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the timestamps of a [`TimeRange`].
#[derive(Clone, Debug)]
pub struct TimeRangeIter {
    range: TimeRange,
    index: u64,
    done: bool,
}

impl Iterator for TimeRangeIter {
    type Item = Timestamp;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        match self
            .range
            .start
            .checked_add_steps(self.range.step, self.index)
        {
            Some(t) if t <= self.range.end => {
                self.index += 1;
                Some(t)
            }
            _ => {
                self.done = true;
                None
            }
        }
    }
}

impl FusedIterator for TimeRangeIter {}

/// Lists the timestamps between two inclusive bounds at a fixed step.
///
/// The bounds are parsed with `t_fmt` and the timestamps are printed with
/// `out_fmt`, or with `t_fmt` if `None`. The step unit is given by name (see
/// [`StepUnit::from_str`]).
///
/// The result is fully materialized and limited to
/// [`DEFAULT_MAX_RANGE_LEN`] elements; use [`TimeRange`] to enumerate larger
/// ranges lazily.
///
/// # Errors
///
/// Fails with [`TimeError::NonTerminatingRange`] if `step_amount` is zero or
/// negative, [`TimeError::UnrecognizedStepUnit`] if the unit is unknown,
/// [`TimeError::InvalidTimestamp`] if a bound does not match `t_fmt` and
/// [`TimeError::RangeTooLarge`] if the range is too long.
///
/// # Examples
///
/// ```
/// use utc_normalize::{times_between, Format};
///
/// let times = times_between(
///     "2024-01-01 00:00:00",
///     "2024-01-01 00:00:45",
///     15,
///     "seconds",
///     &Format::ISO_DATETIME,
///     Some(&Format::ISO_TIME),
/// )
/// .unwrap();
/// assert_eq!(times, ["00:00:00", "00:00:15", "00:00:30", "00:00:45"]);
/// ```
pub fn times_between(
    t1: &str,
    t2: &str,
    step_amount: i64,
    step_unit: &str,
    t_fmt: &Format,
    out_fmt: Option<&Format>,
) -> Result<Vec<String>, TimeError> {
    let step = Step::parse(step_amount, step_unit)?;
    let range = TimeRange::new(
        Timestamp::parse(t1, t_fmt)?,
        Timestamp::parse(t2, t_fmt)?,
        step,
    );

    range.format_all(out_fmt.unwrap_or(t_fmt), DEFAULT_MAX_RANGE_LEN)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: &Format = &Format::ISO_DATETIME;

    fn ts(s: &str) -> Timestamp {
        Timestamp::parse(s, DT).unwrap()
    }

    fn between(t1: &str, t2: &str, amount: i64, unit: &str) -> Result<Vec<String>, TimeError> {
        times_between(t1, t2, amount, unit, DT, None)
    }

    #[test]
    fn single_element_when_bounds_match() {
        let times = between("2024-01-01 00:00:00", "2024-01-01 00:00:00", 1, "days").unwrap();

        assert_eq!(times, ["2024-01-01 00:00:00"]);
    }

    #[test]
    fn daily_inclusive() {
        let times = between("2024-01-01 00:00:00", "2024-01-03 00:00:00", 1, "days").unwrap();

        assert_eq!(
            times,
            [
                "2024-01-01 00:00:00",
                "2024-01-02 00:00:00",
                "2024-01-03 00:00:00"
            ]
        );
    }

    #[test]
    fn end_not_on_step() {
        let times = between("2024-01-01 00:00:00", "2024-01-01 01:00:00", 25, "minutes").unwrap();

        assert_eq!(
            times,
            [
                "2024-01-01 00:00:00",
                "2024-01-01 00:25:00",
                "2024-01-01 00:50:00"
            ]
        );
    }

    #[test]
    fn reversed_bounds_are_empty() {
        let times = between("2024-01-03 00:00:00", "2024-01-01 00:00:00", 1, "days").unwrap();

        assert!(times.is_empty());
    }

    #[test]
    fn non_positive_step_rejected() {
        for amount in [0, -1, i64::MIN] {
            assert_eq!(
                between("2024-01-01 00:00:00", "2024-01-02 00:00:00", amount, "hours"),
                Err(TimeError::NonTerminatingRange(amount))
            );
        }
    }

    #[test]
    fn oversized_step_rejected() {
        assert_eq!(
            Step::new(i64::from(u32::MAX) + 1, StepUnit::Seconds),
            Err(TimeError::OutOfRange(OutOfRangeError(())))
        );
    }

    #[test]
    fn unknown_step_unit() {
        assert_eq!(
            between("2024-01-01 00:00:00", "2024-01-02 00:00:00", 1, "fortnights"),
            Err(TimeError::UnrecognizedStepUnit("fortnights".to_owned()))
        );
    }

    #[test]
    fn step_unit_names() {
        assert_eq!("days".parse::<StepUnit>(), Ok(StepUnit::Days));
        assert_eq!("Day".parse::<StepUnit>(), Ok(StepUnit::Days));
        assert_eq!("SECONDS".parse::<StepUnit>(), Ok(StepUnit::Seconds));
        assert_eq!("milliseconds".parse::<StepUnit>(), Ok(StepUnit::Milliseconds));
        assert_eq!("m".parse::<StepUnit>(), Ok(StepUnit::Minutes));
        assert_eq!("M".parse::<StepUnit>(), Ok(StepUnit::Months));
        assert_eq!("years".parse::<StepUnit>(), Ok(StepUnit::Years));
        assert!("".parse::<StepUnit>().is_err());
    }

    #[test]
    fn step_unit_single_plural_suffix() {
        assert_eq!(
            "dayss".parse::<StepUnit>(),
            Err(TimeError::UnrecognizedStepUnit("dayss".to_owned()))
        );
        assert!("secondsss".parse::<StepUnit>().is_err());
        assert_eq!("Hours".parse::<StepUnit>(), Ok(StepUnit::Hours));
    }

    #[test]
    fn range_too_large() {
        let range = TimeRange::new(
            ts("2024-01-01 00:00:00"),
            ts("2024-01-01 00:00:10"),
            Step::new(1, StepUnit::Seconds).unwrap(),
        );

        assert_eq!(range.format_all(DT, 11).map(|v| v.len()), Ok(11));
        assert_eq!(range.format_all(DT, 10), Err(TimeError::RangeTooLarge(10)));
    }

    #[test]
    fn eager_limit_applies() {
        let res = between("2024-01-01 00:00:00", "2024-12-31 00:00:00", 1, "s");

        assert_eq!(res, Err(TimeError::RangeTooLarge(DEFAULT_MAX_RANGE_LEN)));
    }

    #[test]
    fn lazy_range_is_restartable() {
        let range = TimeRange::new(
            ts("2024-01-01 00:00:00"),
            ts("2024-01-01 00:00:00") + TimeDelta::weeks(520),
            Step::new(1, StepUnit::Weeks).unwrap(),
        );

        let mut iter = range.iter();
        assert_eq!(iter.next(), Some(ts("2024-01-01 00:00:00")));
        assert_eq!(iter.next(), Some(ts("2024-01-08 00:00:00")));

        assert_eq!(range.iter().next(), Some(range.start()));
        assert_eq!((&range).into_iter().count(), 521);
        assert_eq!(range.iter().last(), Some(range.end()));
    }

    #[test]
    fn monthly_steps_do_not_drift() {
        let range = TimeRange::new(
            ts("2023-01-31 12:00:00"),
            ts("2023-06-30 12:00:00"),
            Step::new(2, StepUnit::Months).unwrap(),
        );
        let times: Vec<String> = range.iter().map(|t| t.to_string()).collect();

        assert_eq!(
            times,
            [
                "2023-01-31 12:00:00",
                "2023-03-31 12:00:00",
                "2023-05-31 12:00:00"
            ]
        );
    }

    #[test]
    fn yearly_steps() {
        let times = times_between("2020-02-29", "2024-03-01", 1, "years", &Format::ISO_DATE, None)
            .unwrap();

        assert_eq!(
            times,
            ["2020-02-29", "2021-02-28", "2022-02-28", "2023-02-28", "2024-02-29"]
        );
    }

    #[test]
    fn iteration_stops_at_overflow() {
        let end = Timestamp::from_naive(chrono::NaiveDateTime::MAX);
        let start = end - TimeDelta::days(2);
        let range = TimeRange::new(start, end, Step::new(1, StepUnit::Days).unwrap());
        let mut iter = range.iter();

        assert_eq!(iter.by_ref().count(), 3);
        assert_eq!(iter.next(), None);
    }
}
