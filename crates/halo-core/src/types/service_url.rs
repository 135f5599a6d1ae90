//! Service URL type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use url::Url;

use crate::error::{Error, InvalidInputError};

/// A validated service root URL.
///
/// The root is where the discovery document lives. Every href the service
/// hands out (child links, self links, next links) is resolved against it
/// with [`resolve`](ServiceUrl::resolve).
///
/// # Example
///
/// ```
/// use halo_core::ServiceUrl;
///
/// let service = ServiceUrl::new("http://localhost:5000/v1").unwrap();
/// assert_eq!(service.origin(), "http://localhost:5000");
/// assert_eq!(service.resolve("users/abc"), "http://localhost:5000/v1/users/abc");
/// assert_eq!(service.resolve("/v2/users"), "http://localhost:5000/v2/users");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ServiceUrl(Url);

impl ServiceUrl {
    /// Create a new service URL from a string, validating the format.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL does not parse, is not http(s) or has no host.
    pub fn new(s: impl AsRef<str>) -> Result<Self, Error> {
        let s = s.as_ref();
        let url = Url::parse(s).map_err(|e| InvalidInputError::ServiceUrl {
            value: s.to_string(),
            reason: e.to_string(),
        })?;

        Self::validate(&url, s)?;

        Ok(Self(url))
    }

    /// Returns the URL as a string.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns the inner URL.
    pub fn as_url(&self) -> &Url {
        &self.0
    }

    /// Returns the host string.
    pub fn host(&self) -> Option<&str> {
        self.0.host_str()
    }

    /// Returns the URL scheme ("http" or "https").
    pub fn scheme(&self) -> &str {
        self.0.scheme()
    }

    /// Scheme, host and port, without a trailing slash.
    pub fn origin(&self) -> String {
        self.0.origin().ascii_serialization()
    }

    /// Host and explicit port as they appear in the URL.
    pub fn authority(&self) -> String {
        match (self.0.host_str(), self.0.port()) {
            (Some(host), Some(port)) => format!("{host}:{port}"),
            (Some(host), None) => host.to_string(),
            _ => String::new(),
        }
    }

    /// The root URL without query, fragment or trailing slash.
    pub fn root(&self) -> String {
        let mut url = self.0.clone();
        url.set_query(None);
        url.set_fragment(None);
        url.as_str().trim_end_matches('/').to_string()
    }

    /// Turn an href from a service document into a fully-qualified URL.
    ///
    /// - absolute URLs are returned unchanged
    /// - `/path` is appended to the origin
    /// - `host[:port]/path` gets the service scheme
    /// - anything else is relative to the root
    ///
    /// A leading segment counts as `host[:port]` when it carries a numeric
    /// port, or when it names the service host on the service's effective port.
    pub fn resolve(&self, href: &str) -> String {
        let href = href.trim();

        if href.contains("://") {
            return href.to_string();
        }

        if href.starts_with('/') {
            return format!("{}{}", self.origin(), href);
        }

        if self.is_host_qualified(href) {
            return format!("{}://{}", self.scheme(), href);
        }

        format!("{}/{}", self.root(), href)
    }

    fn is_host_qualified(&self, href: &str) -> bool {
        let segment = href.split(['/', '?', '#']).next().unwrap_or_default();
        if segment.is_empty() {
            return false;
        }

        let Ok(url) = Url::parse(&format!("{}://{}", self.scheme(), segment)) else {
            return false;
        };
        let Some(host) = url.host_str() else {
            return false;
        };

        let explicit_port = segment
            .rsplit_once(':')
            .is_some_and(|(_, port)| !port.is_empty() && port.bytes().all(|b| b.is_ascii_digit()));

        explicit_port
            || (self.host() == Some(host)
                && url.port_or_known_default() == self.0.port_or_known_default())
    }

    fn validate(url: &Url, original: &str) -> Result<(), Error> {
        // Must be absolute
        if url.cannot_be_a_base() {
            return Err(InvalidInputError::ServiceUrl {
                value: original.to_string(),
                reason: "must be an absolute URL".to_string(),
            }
            .into());
        }

        let scheme = url.scheme();
        if scheme != "https" && scheme != "http" {
            return Err(InvalidInputError::ServiceUrl {
                value: original.to_string(),
                reason: format!("unsupported scheme '{scheme}'"),
            }
            .into());
        }

        if url.host_str().is_none() {
            return Err(InvalidInputError::ServiceUrl {
                value: original.to_string(),
                reason: "must have a host".to_string(),
            }
            .into());
        }

        Ok(())
    }
}

impl fmt::Display for ServiceUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ServiceUrl {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl Serialize for ServiceUrl {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.0.as_str())
    }
}

impl<'de> Deserialize<'de> for ServiceUrl {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        ServiceUrl::new(&s).map_err(serde::de::Error::custom)
    }
}

impl AsRef<str> for ServiceUrl {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}
