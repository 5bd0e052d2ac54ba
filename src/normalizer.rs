//! Application-wide normalization settings.

use core::cmp::Ordering;

use crate::{
    complete, Completion, Format, Step, TimeError, TimeRange, Timestamp, Unit, UtcOffset,
};

/// Default maximum length of an eagerly materialized range.
pub const DEFAULT_MAX_RANGE_LEN: usize = 100_000;

/// Immutable settings shared by all operations of a [`Normalizer`].
///
/// The configuration is built once, typically at application start-up, and
/// never modified afterwards; the `with_*` methods return modified copies.
/// With the `serde` feature, missing fields take their default value so a
/// configuration can be loaded from a partial document.
///
/// # Examples
///
/// ```
/// use utc_normalize::{Format, NormalizerConfig, UtcOffset};
///
/// let config = NormalizerConfig::default()
///     .with_input_format(Format::ISO_DATE)
///     .with_default_offset("+01:00".parse().unwrap());
///
/// assert_eq!(config.canonical_format(), &Format::ISO_DATETIME);
/// assert_eq!(config.default_offset().as_minutes(), 60);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct NormalizerConfig {
    input_format: Format,
    canonical_format: Format,
    default_offset: UtcOffset,
    max_range_len: usize,
}

impl NormalizerConfig {
    /// Format of the local timestamps received from callers.
    pub fn input_format(&self) -> &Format {
        &self.input_format
    }

    /// Format of the stored UTC timestamps.
    pub fn canonical_format(&self) -> &Format {
        &self.canonical_format
    }

    /// Offset assumed when the caller does not provide one.
    pub fn default_offset(&self) -> UtcOffset {
        self.default_offset
    }

    /// Maximum number of timestamps returned by
    /// [`Normalizer::times_between`].
    pub fn max_range_len(&self) -> usize {
        self.max_range_len
    }

    /// Returns a copy of the configuration with another input format.
    pub fn with_input_format(mut self, format: Format) -> Self {
        self.input_format = format;
        self
    }

    /// Returns a copy of the configuration with another canonical format.
    pub fn with_canonical_format(mut self, format: Format) -> Self {
        self.canonical_format = format;
        self
    }

    /// Returns a copy of the configuration with another default offset.
    pub fn with_default_offset(mut self, offset: UtcOffset) -> Self {
        self.default_offset = offset;
        self
    }

    /// Returns a copy of the configuration with another range length limit.
    pub fn with_max_range_len(mut self, max_range_len: usize) -> Self {
        self.max_range_len = max_range_len;
        self
    }
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            input_format: Format::ISO_DATETIME,
            canonical_format: Format::ISO_DATETIME,
            default_offset: UtcOffset::UTC,
            max_range_len: DEFAULT_MAX_RANGE_LEN,
        }
    }
}

/// Timestamp normalization bound to a [`NormalizerConfig`].
///
/// Local timestamps are read with the configured input format and UTC
/// timestamps with the canonical format. Offsets are given as optional
/// `[±]HH:MM` strings, falling back to the configured default offset.
///
/// # Examples
///
/// ```
/// use utc_normalize::{Format, Normalizer, NormalizerConfig};
///
/// let normalizer = Normalizer::new(
///     NormalizerConfig::default().with_default_offset("-08:00".parse().unwrap()),
/// );
///
/// assert_eq!(
///     normalizer.to_utc("2024-03-15 20:00:00", None).unwrap(),
///     "2024-03-16 04:00:00"
/// );
/// assert_eq!(
///     normalizer.to_utc("2024-03-15 20:00:00", Some("+01:00")).unwrap(),
///     "2024-03-15 19:00:00"
/// );
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Normalizer {
    config: NormalizerConfig,
}

impl Normalizer {
    /// Creates a normalizer with the provided settings.
    pub fn new(config: NormalizerConfig) -> Self {
        Self { config }
    }

    /// Returns the settings.
    pub fn config(&self) -> &NormalizerConfig {
        &self.config
    }

    /// Parses an optional offset, falling back to the default offset.
    pub fn offset(&self, offset: Option<&str>) -> Result<UtcOffset, TimeError> {
        match offset {
            Some(offset) => Ok(offset.parse()?),
            None => Ok(self.config.default_offset),
        }
    }

    /// Converts a local timestamp to a canonical UTC timestamp.
    pub fn to_utc(&self, t: &str, offset: Option<&str>) -> Result<String, TimeError> {
        let offset = self.offset(offset)?;
        let utc = Timestamp::parse(t, &self.config.input_format)?.to_utc(offset)?;

        tracing::debug!(input = t, %offset, output = %utc, "converted local time to UTC");

        Ok(utc.format(&self.config.canonical_format))
    }

    /// Converts a canonical UTC timestamp back to a local timestamp.
    pub fn reverse_utc(&self, t: &str, offset: Option<&str>) -> Result<String, TimeError> {
        let offset = self.offset(offset)?;
        let local = Timestamp::parse(t, &self.config.canonical_format)?.from_utc(offset)?;

        tracing::debug!(input = t, %offset, output = %local, "converted UTC to local time");

        Ok(local.format(&self.config.input_format))
    }

    /// Pads a partial date or time, see [`complete`].
    pub fn complete(&self, partial: &str, unit: Unit) -> String {
        complete(partial, unit)
    }

    /// Pads a partial date or time with the unit given by name, see
    /// [`to_iso`](crate::to_iso).
    pub fn to_iso(&self, partial: &str, unit: &str) -> Completion {
        crate::to_iso(partial, unit)
    }

    /// Reformats a wire timestamp into the canonical format.
    pub fn from_canonical_wire(&self, dt: &str) -> Result<String, TimeError> {
        crate::from_canonical_wire(dt, Some(&self.config.canonical_format))
    }

    /// Reformats a canonical timestamp into the wire format.
    pub fn to_canonical_wire(&self, t: &str) -> Result<String, TimeError> {
        crate::to_canonical_wire(t, &self.config.canonical_format)
    }

    /// Compares two canonical timestamps.
    pub fn compare(&self, t1: &str, t2: &str) -> Result<Ordering, TimeError> {
        crate::compare(t1, t2, &self.config.canonical_format)
    }

    /// Returns whether two canonical timestamps are the same point in time.
    pub fn is_same(&self, t1: &str, t2: &str) -> Result<bool, TimeError> {
        self.compare(t1, t2).map(Ordering::is_eq)
    }

    /// Returns whether `t1` is strictly in the past of `t2`.
    pub fn is_before(&self, t1: &str, t2: &str) -> Result<bool, TimeError> {
        self.compare(t1, t2).map(Ordering::is_lt)
    }

    /// Returns whether `t1` is strictly in the future of `t2`.
    pub fn is_after(&self, t1: &str, t2: &str) -> Result<bool, TimeError> {
        self.compare(t1, t2).map(Ordering::is_gt)
    }

    /// Returns whether `t1` is not in the future of `t2`.
    pub fn is_same_or_before(&self, t1: &str, t2: &str) -> Result<bool, TimeError> {
        self.compare(t1, t2).map(Ordering::is_le)
    }

    /// Returns whether `t1` is not in the past of `t2`.
    pub fn is_same_or_after(&self, t1: &str, t2: &str) -> Result<bool, TimeError> {
        self.compare(t1, t2).map(Ordering::is_ge)
    }

    /// Returns the lazy range between two canonical timestamps.
    pub fn range(
        &self,
        t1: &str,
        t2: &str,
        step_amount: i64,
        step_unit: &str,
    ) -> Result<TimeRange, TimeError> {
        let step = Step::parse(step_amount, step_unit)?;

        Ok(TimeRange::new(
            Timestamp::parse(t1, &self.config.canonical_format)?,
            Timestamp::parse(t2, &self.config.canonical_format)?,
            step,
        ))
    }

    /// Lists the canonical timestamps between two inclusive canonical bounds.
    ///
    /// Fails with [`TimeError::RangeTooLarge`] if the range holds more than
    /// the configured maximum number of timestamps.
    pub fn times_between(
        &self,
        t1: &str,
        t2: &str,
        step_amount: i64,
        step_unit: &str,
    ) -> Result<Vec<String>, TimeError> {
        self.range(t1, t2, step_amount, step_unit)?
            .format_all(&self.config.canonical_format, self.config.max_range_len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalizer() -> Normalizer {
        Normalizer::new(
            NormalizerConfig::default()
                .with_input_format(Format::new("%d/%m/%Y %H:%M"))
                .with_default_offset("+02:00".parse().unwrap())
                .with_max_range_len(5),
        )
    }

    #[test]
    fn default_config() {
        let config = NormalizerConfig::default();

        assert_eq!(config.input_format(), &Format::ISO_DATETIME);
        assert_eq!(config.canonical_format(), &Format::ISO_DATETIME);
        assert_eq!(config.default_offset(), UtcOffset::UTC);
        assert_eq!(config.max_range_len(), DEFAULT_MAX_RANGE_LEN);
    }

    #[test]
    fn to_utc_uses_default_offset() {
        let n = normalizer();

        assert_eq!(n.to_utc("15/03/2024 01:30", None).unwrap(), "2024-03-14 23:30:00");
        assert_eq!(
            n.to_utc("15/03/2024 01:30", Some("-01:00")).unwrap(),
            "2024-03-15 02:30:00"
        );
    }

    #[test]
    fn reverse_utc_round_trip() {
        let n = normalizer();
        let utc = n.to_utc("15/03/2024 01:30", Some("+05:45")).unwrap();

        assert_eq!(n.reverse_utc(&utc, Some("+05:45")).unwrap(), "15/03/2024 01:30");
    }

    #[test]
    fn invalid_offset() {
        assert!(matches!(
            normalizer().to_utc("15/03/2024 01:30", Some("2h")),
            Err(TimeError::InvalidOffsetFormat(_))
        ));
    }

    #[test]
    fn completion() {
        let n = normalizer();

        assert_eq!(n.complete("2024", Unit::Date), "2024-01-01");
        assert_eq!(n.to_iso("7", "time").value(), "7:00:00");
    }

    #[test]
    fn wire() {
        let n = normalizer();

        assert_eq!(
            n.from_canonical_wire("2024-03-15T10:30:00.000Z").unwrap(),
            "2024-03-15 10:30:00"
        );
        assert_eq!(
            n.to_canonical_wire("2024-03-15 10:30:00").unwrap(),
            "2024-03-15T10:30:00.000Z"
        );
    }

    #[test]
    fn comparisons() {
        let n = normalizer();
        let (t1, t2) = ("2024-03-15 10:30:00", "2024-03-15 11:30:00");

        assert!(n.is_before(t1, t2).unwrap());
        assert!(n.is_after(t2, t1).unwrap());
        assert!(n.is_same(t1, t1).unwrap());
        assert!(n.is_same_or_before(t1, t1).unwrap());
        assert!(n.is_same_or_after(t2, t1).unwrap());
        assert!(!n.is_same_or_after(t1, t2).unwrap());
    }

    #[test]
    fn range_limit() {
        let n = normalizer();

        assert_eq!(
            n.times_between("2024-03-15 00:00:00", "2024-03-15 04:00:00", 1, "hours")
                .unwrap()
                .len(),
            5
        );
        assert_eq!(
            n.times_between("2024-03-15 00:00:00", "2024-03-15 05:00:00", 1, "hours"),
            Err(TimeError::RangeTooLarge(5))
        );

        // The lazy range is not limited.
        let range = n
            .range("2024-03-15 00:00:00", "2024-03-15 05:00:00", 1, "hours")
            .unwrap();
        assert_eq!(range.iter().count(), 6);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn config_from_partial_json() {
        let config: NormalizerConfig =
            serde_json::from_str(r#"{ "default_offset": "-03:30", "max_range_len": 10 }"#)
                .unwrap();

        assert_eq!(config.default_offset().as_minutes(), -210);
        assert_eq!(config.max_range_len(), 10);
        assert_eq!(config.input_format(), &Format::ISO_DATETIME);
    }
}
