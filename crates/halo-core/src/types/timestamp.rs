//! Server timestamp type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Format the service uses for `created` and `updated`, e.g. `Tue, 02 Apr 2013 10:29:33 GMT`.
const HTTP_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// A `created` / `updated` value.
///
/// The string is kept exactly as the service sent it so that copying an item
/// between resources preserves provenance byte for byte. Parsing into a
/// [`DateTime`] is available on demand.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(String);

impl Timestamp {
    /// Wrap a timestamp string as sent by the service.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Format a point in time the way the service writes dates.
    pub fn from_datetime(datetime: DateTime<Utc>) -> Self {
        Self(datetime.format(HTTP_DATE_FORMAT).to_string())
    }

    /// Returns the raw string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parse as an RFC 2822 / HTTP date, falling back to RFC 3339.
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc2822(&self.0)
            .or_else(|_| DateTime::parse_from_rfc3339(&self.0))
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Timestamp {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Timestamp {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(datetime: DateTime<Utc>) -> Self {
        Self::from_datetime(datetime)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn parses_http_date() {
        let ts = Timestamp::new("Tue, 02 Apr 2013 10:29:33 GMT");
        let expected = Utc.with_ymd_and_hms(2013, 4, 2, 10, 29, 33).unwrap();
        assert_eq!(ts.to_datetime(), Some(expected));
    }

    #[test]
    fn parses_rfc3339() {
        let ts = Timestamp::new("2013-04-02T10:29:33Z");
        assert!(ts.to_datetime().is_some());
    }

    #[test]
    fn formats_like_the_service() {
        let dt = Utc.with_ymd_and_hms(2013, 4, 2, 10, 29, 33).unwrap();
        assert_eq!(
            Timestamp::from_datetime(dt).as_str(),
            "Tue, 02 Apr 2013 10:29:33 GMT"
        );
    }

    #[test]
    fn garbage_does_not_parse() {
        assert_eq!(Timestamp::new("yesterday").to_datetime(), None);
    }
}
