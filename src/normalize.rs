//! String-level conversions and comparisons.

use core::cmp::Ordering;

use crate::{Format, TimeError, Timestamp, UtcOffset};

/// Converts a local timestamp to UTC.
///
/// The timestamp is parsed with `fmt`, shifted by the opposite of the
/// `[±]HH:MM` offset and printed with `out_fmt`, or with the canonical
/// [`Format::ISO_DATETIME`] if `out_fmt` is `None`.
///
/// # Errors
///
/// Fails with [`TimeError::InvalidOffsetFormat`] if the offset is malformed,
/// [`TimeError::InvalidTimestamp`] if `t` does not match `fmt`, and
/// [`TimeError::OutOfRange`] if the shifted timestamp cannot be represented.
///
/// # Examples
///
/// ```
/// use utc_normalize::{to_utc, Format};
///
/// assert_eq!(
///     to_utc("2024-03-15 21:00:00", "-05:00", &Format::ISO_DATETIME, None).unwrap(),
///     "2024-03-16 02:00:00"
/// );
/// assert_eq!(
///     to_utc("2024-03-15", "+01:00", &Format::ISO_DATE, Some(&Format::WIRE_ISO8601)).unwrap(),
///     "2024-03-14T23:00:00.000Z"
/// );
/// ```
pub fn to_utc(
    t: &str,
    offset: &str,
    fmt: &Format,
    out_fmt: Option<&Format>,
) -> Result<String, TimeError> {
    let offset: UtcOffset = offset.parse()?;
    let utc = Timestamp::parse(t, fmt)?.to_utc(offset)?;

    tracing::debug!(input = t, %offset, output = %utc, "converted local time to UTC");

    Ok(utc.format(out_fmt.unwrap_or(&Format::ISO_DATETIME)))
}

/// Converts a UTC timestamp back to the local time at an offset.
///
/// This is the inverse of [`to_utc`]. The timestamp is parsed with `fmt`,
/// shifted by the `[±]HH:MM` offset and printed with `out_fmt`, or with
/// `fmt` if `out_fmt` is `None`.
///
/// # Errors
///
/// Same as [`to_utc`].
///
/// # Examples
///
/// ```
/// use utc_normalize::{reverse_utc, Format};
///
/// assert_eq!(
///     reverse_utc("2024-03-16 02:00:00", "-05:00", &Format::ISO_DATETIME, None).unwrap(),
///     "2024-03-15 21:00:00"
/// );
/// ```
pub fn reverse_utc(
    t: &str,
    offset: &str,
    fmt: &Format,
    out_fmt: Option<&Format>,
) -> Result<String, TimeError> {
    let offset: UtcOffset = offset.parse()?;
    let local = Timestamp::parse(t, fmt)?.from_utc(offset)?;

    tracing::debug!(input = t, %offset, output = %local, "converted UTC to local time");

    Ok(local.format(out_fmt.unwrap_or(fmt)))
}

/// Reformats a timestamp received in the [`Format::WIRE_ISO8601`] shape.
///
/// The output uses `out_fmt`, or [`Format::ISO_DATETIME`] if `None`. No
/// offset is applied: wire timestamps are already in UTC.
///
/// # Examples
///
/// ```
/// use utc_normalize::{from_canonical_wire, Format};
///
/// assert_eq!(
///     from_canonical_wire("2024-03-15T10:30:00.000Z", None).unwrap(),
///     "2024-03-15 10:30:00"
/// );
/// assert_eq!(
///     from_canonical_wire("2024-03-15T10:30:00.000Z", Some(&Format::ISO_DATE)).unwrap(),
///     "2024-03-15"
/// );
/// ```
pub fn from_canonical_wire(dt: &str, out_fmt: Option<&Format>) -> Result<String, TimeError> {
    let t = Timestamp::parse(dt, &Format::WIRE_ISO8601)?;

    Ok(t.format(out_fmt.unwrap_or(&Format::ISO_DATETIME)))
}

/// Reformats a UTC timestamp parsed with `fmt` into the
/// [`Format::WIRE_ISO8601`] shape.
///
/// # Examples
///
/// ```
/// use utc_normalize::{to_canonical_wire, Format};
///
/// assert_eq!(
///     to_canonical_wire("2024-03-15 10:30:00", &Format::ISO_DATETIME).unwrap(),
///     "2024-03-15T10:30:00.000Z"
/// );
/// ```
pub fn to_canonical_wire(t: &str, fmt: &Format) -> Result<String, TimeError> {
    Ok(Timestamp::parse(t, fmt)?.format(&Format::WIRE_ISO8601))
}

/// Compares two timestamps parsed with the same format.
///
/// # Examples
///
/// ```
/// use std::cmp::Ordering;
/// use utc_normalize::{compare, Format};
///
/// assert_eq!(
///     compare("2024-03-15", "2024-03-16", &Format::ISO_DATE).unwrap(),
///     Ordering::Less
/// );
/// ```
pub fn compare(t1: &str, t2: &str, fmt: &Format) -> Result<Ordering, TimeError> {
    let t1 = Timestamp::parse(t1, fmt)?;
    let t2 = Timestamp::parse(t2, fmt)?;

    Ok(t1.cmp(&t2))
}

/// Returns whether `t1` and `t2` are the same point in time.
pub fn is_same(t1: &str, t2: &str, fmt: &Format) -> Result<bool, TimeError> {
    compare(t1, t2, fmt).map(Ordering::is_eq)
}

/// Returns whether `t1` is strictly in the past of `t2`.
pub fn is_before(t1: &str, t2: &str, fmt: &Format) -> Result<bool, TimeError> {
    compare(t1, t2, fmt).map(Ordering::is_lt)
}

/// Returns whether `t1` is strictly in the future of `t2`.
pub fn is_after(t1: &str, t2: &str, fmt: &Format) -> Result<bool, TimeError> {
    compare(t1, t2, fmt).map(Ordering::is_gt)
}

/// Returns whether `t1` is the same as or in the past of `t2`.
pub fn is_same_or_before(t1: &str, t2: &str, fmt: &Format) -> Result<bool, TimeError> {
    compare(t1, t2, fmt).map(Ordering::is_le)
}

/// Returns whether `t1` is the same as or in the future of `t2`.
pub fn is_same_or_after(t1: &str, t2: &str, fmt: &Format) -> Result<bool, TimeError> {
    compare(t1, t2, fmt).map(Ordering::is_ge)
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::ParseOffsetError;

    const DT: &Format = &Format::ISO_DATETIME;

    #[test]
    fn to_utc_identity_at_zero_offset() {
        for t in ["1970-01-01 00:00:00", "2024-02-29 23:59:59", "1999-12-31 12:00:00"] {
            assert_eq!(to_utc(t, "00:00", DT, None).unwrap(), t);
        }
    }

    #[test]
    fn to_utc_canonical_output() {
        // The canonical format is used regardless of the input format.
        assert_eq!(
            to_utc("2024-03-15", "+02:00", &Format::ISO_DATE, None).unwrap(),
            "2024-03-14 22:00:00"
        );
    }

    #[test]
    fn to_utc_honors_out_fmt() {
        assert_eq!(
            to_utc("2024-03-15 10:30:00", "+02:00", DT, Some(&Format::ISO_TIME)).unwrap(),
            "08:30:00"
        );
    }

    #[test]
    fn reverse_utc_defaults_to_input_format() {
        assert_eq!(
            reverse_utc("2024-03-14", "+02:00", &Format::ISO_DATE, None).unwrap(),
            "2024-03-14"
        );
        assert_eq!(
            reverse_utc("2024-03-14 23:00:00", "+02:00", DT, Some(&Format::ISO_DATE)).unwrap(),
            "2024-03-15"
        );
    }

    #[test]
    fn round_trip() {
        let t = "2024-03-15 10:30:00";

        for offset in ["+00:00", "+05:30", "-05:30", "+14:00", "-11:45", "-00:30"] {
            let utc = to_utc(t, offset, DT, None).unwrap();

            assert_eq!(reverse_utc(&utc, offset, DT, None).unwrap(), t);
        }
    }

    #[test]
    fn invalid_offset() {
        assert_eq!(
            to_utc("2024-03-15 10:30:00", "five", DT, None),
            Err(TimeError::InvalidOffsetFormat(ParseOffsetError::MissingField))
        );
        assert_eq!(
            reverse_utc("2024-03-15 10:30:00", "05:3x", DT, None),
            Err(TimeError::InvalidOffsetFormat(
                ParseOffsetError::InvalidFieldValue
            ))
        );
    }

    #[test]
    fn invalid_timestamp() {
        assert!(matches!(
            to_utc("not a time", "+01:00", DT, None),
            Err(TimeError::InvalidTimestamp { .. })
        ));
    }

    #[test]
    fn wire_ingestion() {
        assert_eq!(
            from_canonical_wire("2024-03-15T10:30:00.000Z", None).unwrap(),
            "2024-03-15 10:30:00"
        );
        assert!(from_canonical_wire("2024-03-15 10:30:00", None).is_err());
        assert_eq!(
            to_canonical_wire("2024-03-15 10:30:00", DT).unwrap(),
            "2024-03-15T10:30:00.000Z"
        );
    }

    #[test]
    fn comparisons_are_exclusive() {
        let times = [
            "2024-03-15 10:30:00",
            "2024-03-15 10:30:01",
            "2023-12-31 23:59:59",
        ];

        for t1 in times {
            for t2 in times {
                let before = is_before(t1, t2, DT).unwrap();
                let same = is_same(t1, t2, DT).unwrap();
                let after = is_after(t1, t2, DT).unwrap();

                assert_eq!([before, same, after].iter().filter(|b| **b).count(), 1);
                assert_eq!(is_same_or_before(t1, t2, DT).unwrap(), before || same);
                assert_eq!(is_same_or_after(t1, t2, DT).unwrap(), after || same);
            }
        }
    }

    #[test]
    fn comparison_with_custom_format() {
        assert!(is_before("10:30:00", "11:00:00", &Format::ISO_TIME).unwrap());
        assert!(is_same("2024-03-15", "2024-03-15", &Format::ISO_DATE).unwrap());
    }

    #[test]
    fn comparison_rejects_mismatched_format() {
        assert!(is_same("2024-03-15", "2024-03-15 00:00:00", &Format::ISO_DATE).is_err());
    }
}
