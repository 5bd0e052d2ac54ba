//! Server-side timestamp normalization with fixed UTC offsets.
//!
//! # Overview
//!
//! Services that store every timestamp in UTC still receive local times from
//! their clients, usually together with the client's UTC offset. This crate
//! provides a small set of declarative, stateless operations to move such
//! timestamps into and out of a canonical UTC representation:
//!
//! - offset conversion with [`to_utc`] and its inverse [`reverse_utc`],
//! - completion of partial dates and times with [`to_iso`] and [`complete`],
//! - ingestion of the millisecond-precision wire format produced by database
//!   clients with [`from_canonical_wire`],
//! - chronological comparisons ([`is_same`], [`is_before`], [`is_after`],
//!   [`is_same_or_before`], [`is_same_or_after`]),
//! - enumeration of evenly spaced timestamps between two inclusive bounds
//!   with [`times_between`] or the lazy [`TimeRange`].
//!
//! All operations parse their inputs into a [`Timestamp`] using an explicit
//! [`Format`]; formats are never inferred. The [`Normalizer`] bundles the
//! formats, the default offset and the range size limit of an application
//! into a single immutable configuration, and the [`QueryNormalizer`]
//! applies it to request parameters.
//!
//!
//! # Design choices and limitations
//!
//! Only fixed numeric offsets such as `+05:30` are supported. There is no
//! timezone database, and conversions never depend on daylight saving
//! rules. The sign of an offset applies to both its hours and its minutes.
//!
//! Timestamps are civil date-times without any attached zone: whether a
//! [`Timestamp`] is local or UTC is a matter of convention for the caller.
//!
//!
//! # Features flags
//!
//! ### Serialization
//!
//! [`UtcOffset`], [`Format`], [`NormalizerConfig`] and related types can be
//! (de)serialized with `serde` by activating the `serde` feature.
//!
//!
//! # Examples
//!
//! ```
//! use utc_normalize::{reverse_utc, times_between, to_utc, Format};
//!
//! // A client 5h30 east of Greenwich.
//! let utc = to_utc("2024-03-15 10:30:00", "+05:30", &Format::ISO_DATETIME, None).unwrap();
//! assert_eq!(utc, "2024-03-15 05:00:00");
//!
//! // And back.
//! let local = reverse_utc(&utc, "+05:30", &Format::ISO_DATETIME, None).unwrap();
//! assert_eq!(local, "2024-03-15 10:30:00");
//!
//! // Every day of a 3-day period, bounds included.
//! let days = times_between(
//!     "2024-01-01 00:00:00",
//!     "2024-01-03 00:00:00",
//!     1,
//!     "days",
//!     &Format::ISO_DATETIME,
//!     Some(&Format::ISO_DATE),
//! )
//! .unwrap();
//! assert_eq!(days, ["2024-01-01", "2024-01-02", "2024-01-03"]);
//! ```
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

use core::fmt;
use core::ops::{Add, AddAssign, Sub, SubAssign};

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeDelta};

mod completion;
mod errors;
mod format;
mod normalize;
mod normalizer;
mod offset;
mod query;
mod range;

pub use completion::{complete, to_iso, Completion, Unit};
pub use errors::{OutOfRangeError, ParseOffsetError, TimeError};
pub use format::{Format, DEFAULT_DATE, DEFAULT_TIME};
pub use normalize::{
    compare, from_canonical_wire, is_after, is_before, is_same, is_same_or_after,
    is_same_or_before, reverse_utc, to_canonical_wire, to_utc,
};
pub use normalizer::{Normalizer, NormalizerConfig, DEFAULT_MAX_RANGE_LEN};
pub use offset::UtcOffset;
pub use query::{QueryNormalizer, UTC_OFFSET_HEADER};
pub use range::{times_between, Step, StepUnit, TimeRange, TimeRangeIter};

/// A civil date-time with nanosecond precision and no attached zone.
///
/// A timestamp is obtained by parsing a string with an explicit [`Format`],
/// and printed back with [`format`](Self::format). Whether it represents a
/// local or a UTC time is up to the caller: [`to_utc`](Self::to_utc) and
/// [`from_utc`](Self::from_utc) move it between the two conventions.
///
/// Timestamps are totally ordered in chronological order.
///
/// # Examples
///
/// ```
/// use utc_normalize::{Format, Timestamp, UtcOffset};
///
/// let local = Timestamp::parse("2024-03-15 01:00:00", &Format::ISO_DATETIME).unwrap();
/// let offset: UtcOffset = "+02:00".parse().unwrap();
///
/// let utc = local.to_utc(offset).unwrap();
/// assert_eq!(utc.format(&Format::ISO_DATETIME), "2024-03-14 23:00:00");
/// assert_eq!(utc.from_utc(offset), Ok(local));
/// ```
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Timestamp {
    date_time: NaiveDateTime,
}

impl Timestamp {
    /// Creates a timestamp from a `chrono::NaiveDateTime`.
    pub const fn from_naive(date_time: NaiveDateTime) -> Self {
        Self { date_time }
    }

    /// Parses a timestamp with the provided format.
    ///
    /// Formats without time fields yield midnight and formats without date
    /// fields yield a time on [`DEFAULT_DATE`].
    ///
    /// Returns [`TimeError::InvalidTimestamp`] if the input does not match the
    /// format.
    ///
    /// # Examples
    ///
    /// ```
    /// use utc_normalize::{Format, Timestamp};
    ///
    /// let t = Timestamp::parse("2024-03-15", &Format::ISO_DATE).unwrap();
    /// assert_eq!(t.to_string(), "2024-03-15 00:00:00");
    ///
    /// assert!(Timestamp::parse("2024-03-15", &Format::ISO_DATETIME).is_err());
    /// ```
    pub fn parse(input: &str, format: &Format) -> Result<Self, TimeError> {
        format.parse(input).map(Self::from_naive)
    }

    /// Prints the timestamp with the provided format.
    pub fn format(&self, format: &Format) -> String {
        format.format(&self.date_time)
    }

    /// Returns the underlying `chrono::NaiveDateTime`.
    pub const fn as_naive(&self) -> NaiveDateTime {
        self.date_time
    }

    /// Interprets this timestamp as a local time at the provided offset and
    /// returns the corresponding UTC timestamp.
    ///
    /// Returns an error if the result is outside the representable range.
    pub fn to_utc(self, offset: UtcOffset) -> Result<Self, OutOfRangeError> {
        self.checked_sub(offset.to_time_delta())
            .ok_or(OutOfRangeError(()))
    }

    /// Interprets this timestamp as a UTC time and returns the corresponding
    /// local time at the provided offset.
    ///
    /// This is the inverse of [`to_utc`](Self::to_utc).
    ///
    /// Returns an error if the result is outside the representable range.
    pub fn from_utc(self, offset: UtcOffset) -> Result<Self, OutOfRangeError> {
        self.checked_add(offset.to_time_delta())
            .ok_or(OutOfRangeError(()))
    }

    /// Returns a `chrono::DateTime` for this timestamp interpreted as a local
    /// time at the provided offset.
    ///
    /// Returns an error if the corresponding UTC time is outside the
    /// representable range.
    ///
    /// # Examples
    ///
    /// ```
    /// use utc_normalize::{Format, Timestamp};
    ///
    /// let t = Timestamp::parse("2024-03-15 10:30:00", &Format::ISO_DATETIME).unwrap();
    /// let date_time = t.to_chrono_date_time("-04:00".parse().unwrap()).unwrap();
    /// assert_eq!(date_time.to_rfc3339(), "2024-03-15T10:30:00-04:00");
    /// ```
    pub fn to_chrono_date_time(
        &self,
        offset: UtcOffset,
    ) -> Result<DateTime<FixedOffset>, OutOfRangeError> {
        self.date_time
            .and_local_timezone(offset.to_fixed_offset())
            .single()
            .ok_or(OutOfRangeError(()))
    }

    /// Adds a duration to a timestamp, checking for overflow.
    ///
    /// Returns `None` if overflow occurred.
    pub fn checked_add(self, rhs: TimeDelta) -> Option<Self> {
        self.date_time.checked_add_signed(rhs).map(Self::from_naive)
    }

    /// Subtracts a duration from a timestamp, checking for overflow.
    ///
    /// Returns `None` if overflow occurred.
    pub fn checked_sub(self, rhs: TimeDelta) -> Option<Self> {
        self.date_time.checked_sub_signed(rhs).map(Self::from_naive)
    }

    /// Computes the signed duration elapsed since an earlier timestamp.
    pub fn signed_duration_since(self, earlier: Self) -> TimeDelta {
        self.date_time.signed_duration_since(earlier.date_time)
    }
}

impl From<NaiveDateTime> for Timestamp {
    fn from(date_time: NaiveDateTime) -> Self {
        Self::from_naive(date_time)
    }
}

impl From<Timestamp> for NaiveDateTime {
    fn from(timestamp: Timestamp) -> Self {
        timestamp.date_time
    }
}

impl Add<TimeDelta> for Timestamp {
    type Output = Self;

    /// Adds a duration to a timestamp.
    ///
    /// # Panics
    ///
    /// This function panics if the resulting timestamp cannot be
    /// represented. See [`Timestamp::checked_add`] for a panic-free version.
    fn add(self, other: TimeDelta) -> Self {
        self.checked_add(other)
            .expect("overflow when adding duration to timestamp")
    }
}

impl Sub<TimeDelta> for Timestamp {
    type Output = Self;

    /// Subtracts a duration from a timestamp.
    ///
    /// # Panics
    ///
    /// This function panics if the resulting timestamp cannot be
    /// represented. See [`Timestamp::checked_sub`] for a panic-free version.
    fn sub(self, other: TimeDelta) -> Self {
        self.checked_sub(other)
            .expect("overflow when subtracting duration from timestamp")
    }
}

impl AddAssign<TimeDelta> for Timestamp {
    /// Increments the timestamp by a duration.
    ///
    /// # Panics
    ///
    /// This function panics if the resulting timestamp cannot be represented.
    fn add_assign(&mut self, other: TimeDelta) {
        *self = *self + other;
    }
}

impl SubAssign<TimeDelta> for Timestamp {
    /// Decrements the timestamp by a duration.
    ///
    /// # Panics
    ///
    /// This function panics if the resulting timestamp cannot be represented.
    fn sub_assign(&mut self, other: TimeDelta) {
        *self = *self - other;
    }
}

impl fmt::Display for Timestamp {
    /// Prints the timestamp with [`Format::ISO_DATETIME`].
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.format(&Format::ISO_DATETIME).fmt(fmt)
    }
}
