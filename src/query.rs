//! Normalization of request query parameters.

use std::collections::BTreeMap;

use crate::{Normalizer, TimeError};

/// Name of the request header carrying the caller's UTC offset.
pub const UTC_OFFSET_HEADER: &str = "UTC-Offset";

/// Rewrites the timestamp parameters of incoming requests into canonical UTC
/// timestamps.
///
/// Each endpoint declares the query parameters it requires; these parameters
/// are expected to hold local timestamps and are converted in place with
/// [`Normalizer::to_utc`] using the offset sent in the
/// [`UTC_OFFSET_HEADER`] header. Endpoints without a declaration require
/// nothing and leave the query untouched.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeMap;
/// use utc_normalize::{Normalizer, QueryNormalizer, TimeError};
///
/// let queries = QueryNormalizer::new(Normalizer::default())
///     .with_endpoint("/whatTime", ["myTime"]);
///
/// let mut query = BTreeMap::from([("myTime".to_owned(), "2024-03-15 10:30:00".to_owned())]);
/// queries.normalize("/whatTime?myTime=x", Some("+05:30"), &mut query).unwrap();
/// assert_eq!(query["myTime"], "2024-03-15 05:00:00");
///
/// assert_eq!(
///     queries.normalize("/whatTime", None, &mut query),
///     Err(TimeError::MissingOffset)
/// );
/// ```
#[derive(Clone, Debug, Default)]
pub struct QueryNormalizer {
    normalizer: Normalizer,
    endpoints: BTreeMap<String, Vec<String>>,
}

impl QueryNormalizer {
    /// Creates a query normalizer without any endpoint declaration.
    pub fn new(normalizer: Normalizer) -> Self {
        Self {
            normalizer,
            endpoints: BTreeMap::new(),
        }
    }

    /// Declares the parameters required by an endpoint.
    pub fn with_endpoint<I, S>(mut self, endpoint: impl Into<String>, required: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.endpoints
            .insert(endpoint.into(), required.into_iter().map(Into::into).collect());
        self
    }

    /// Returns the parameters required by an endpoint.
    pub fn required_args(&self, endpoint: &str) -> &[String] {
        self.endpoints
            .get(path(endpoint))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Checks a request and rewrites its required parameters in UTC.
    ///
    /// The endpoint may include a query string, which is ignored. The query
    /// is only modified if every required parameter could be converted.
    ///
    /// # Errors
    ///
    /// Fails with [`TimeError::MissingOffset`] if the offset header is absent
    /// or empty, [`TimeError::MissingArgument`] if required parameters are
    /// absent, and with the errors of [`Normalizer::to_utc`] if a parameter
    /// cannot be converted.
    pub fn normalize(
        &self,
        endpoint: &str,
        offset_header: Option<&str>,
        query: &mut BTreeMap<String, String>,
    ) -> Result<(), TimeError> {
        let offset = match offset_header {
            Some(offset) if !offset.is_empty() => offset,
            _ => return Err(TimeError::MissingOffset),
        };

        let required = self.required_args(endpoint);
        let missing: Vec<String> = required
            .iter()
            .filter(|name| !query.contains_key(name.as_str()))
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Err(TimeError::MissingArgument(missing));
        }

        let converted = required
            .iter()
            .map(|name| {
                self.normalizer
                    .to_utc(&query[name], Some(offset))
                    .map(|utc| (name.clone(), utc))
            })
            .collect::<Result<Vec<_>, _>>()?;

        for (name, utc) in converted {
            tracing::debug!(endpoint, param = %name, value = %utc, "query parameter normalized");
            query.insert(name, utc);
        }

        Ok(())
    }
}

// Strips the query string from a request target.
fn path(endpoint: &str) -> &str {
    endpoint
        .split_once('?')
        .map_or(endpoint, |(path, _)| path)
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::{NormalizerConfig, ParseOffsetError};

    fn queries() -> QueryNormalizer {
        QueryNormalizer::new(Normalizer::default())
            .with_endpoint("/whatTime", ["myTime"])
            .with_endpoint("/between", ["from", "to"])
    }

    fn query(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn rewrites_in_place() {
        let mut q = query(&[("myTime", "2024-03-15 10:30:00"), ("other", "kept")]);

        queries()
            .normalize("/whatTime", Some("-02:00"), &mut q)
            .unwrap();

        assert_eq!(q["myTime"], "2024-03-15 12:30:00");
        assert_eq!(q["other"], "kept");
    }

    #[test]
    fn missing_offset() {
        let mut q = query(&[("myTime", "2024-03-15 10:30:00")]);

        assert_eq!(
            queries().normalize("/whatTime", None, &mut q),
            Err(TimeError::MissingOffset)
        );
        assert_eq!(
            queries().normalize("/whatTime", Some(""), &mut q),
            Err(TimeError::MissingOffset)
        );
    }

    #[test]
    fn missing_arguments_listed() {
        let mut q = query(&[("to", "2024-03-15 10:30:00")]);

        assert_eq!(
            queries().normalize("/between?to=x", Some("+01:00"), &mut q),
            Err(TimeError::MissingArgument(vec!["from".to_owned()]))
        );
    }

    #[test]
    fn unknown_endpoint_requires_nothing() {
        let mut q = query(&[("myTime", "2024-03-15 10:30:00")]);

        queries().normalize("/other", Some("+01:00"), &mut q).unwrap();

        assert_eq!(q["myTime"], "2024-03-15 10:30:00");
        assert!(queries().required_args("/other").is_empty());
    }

    #[test]
    fn failed_conversion_leaves_query_untouched() {
        let mut q = query(&[("from", "2024-03-15 10:30:00"), ("to", "garbage")]);
        let before = q.clone();

        assert!(matches!(
            queries().normalize("/between", Some("+01:00"), &mut q),
            Err(TimeError::InvalidTimestamp { .. })
        ));
        assert_eq!(q, before);
    }

    #[test]
    fn invalid_offset() {
        let mut q = query(&[("myTime", "2024-03-15 10:30:00")]);

        assert_eq!(
            queries().normalize("/whatTime", Some("+1:3"), &mut q),
            Err(TimeError::InvalidOffsetFormat(
                ParseOffsetError::InvalidFieldWidth
            ))
        );
    }

    #[test]
    fn uses_normalizer_formats() {
        let normalizer = Normalizer::new(
            NormalizerConfig::default().with_input_format(crate::Format::ISO_DATE),
        );
        let queries = QueryNormalizer::new(normalizer).with_endpoint("/day", ["day"]);
        let mut q = query(&[("day", "2024-03-15")]);

        queries.normalize("/day", Some("+01:00"), &mut q).unwrap();

        assert_eq!(q["day"], "2024-03-14 23:00:00");
    }
}
