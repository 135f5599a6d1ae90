//! Transport configuration.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Request defaults applied by [`HttpTransport`](crate::HttpTransport) to every call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Allow intermediaries to answer from cache. When false every request
    /// carries `Cache-Control: no-cache`.
    pub cache: bool,

    /// Headers merged into every request (authentication tokens and the like).
    /// They win over per-request headers with the same name.
    pub headers: BTreeMap<String, String>,

    /// Whole-request timeout in milliseconds. Zero means no timeout.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,

    /// User agent; defaults to `halo/<version>`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

impl HttpConfig {
    /// Enable or disable caching.
    pub fn cache(mut self, cache: bool) -> Self {
        self.cache = cache;
        self
    }

    /// Add a header sent with every request.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Set the whole-request timeout. Sub-millisecond durations round up to
    /// one millisecond; a zero duration clears the timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = if timeout.is_zero() {
            None
        } else {
            Some(u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX).max(1))
        };
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub(crate) fn timeout_duration(&self) -> Option<Duration> {
        self.timeout_ms
            .filter(|&ms| ms > 0)
            .map(Duration::from_millis)
    }
}
