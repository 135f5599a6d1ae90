//! Blocking HTTP transport implementation.

use halo_core::error::InvalidInputError;
use halo_core::traits::Headers;
use halo_core::{Body, Error, Method, Request, RequestError, Result, Transport, TransportError};
use reqwest::blocking::Client;
use reqwest::header::{CACHE_CONTROL, HeaderMap, HeaderName, HeaderValue};
use tracing::{debug, instrument, trace};

use crate::config::HttpConfig;

/// A [`Transport`] backed by a blocking reqwest client.
///
/// Every request gets `Cache-Control: no-cache` unless caching is enabled,
/// then the per-request headers, then the configured global headers.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    config: HttpConfig,
}

impl HttpTransport {
    /// Create a transport with the default configuration.
    pub fn new() -> Result<Self> {
        Self::with_config(HttpConfig::default())
    }

    /// Create a transport with explicit request defaults.
    ///
    /// # Errors
    ///
    /// Fails if a configured header is not a valid HTTP header or the
    /// underlying client cannot be built.
    pub fn with_config(config: HttpConfig) -> Result<Self> {
        // Validate global headers up front rather than on the first request.
        header_map(&config.headers)?;

        let user_agent = config
            .user_agent
            .clone()
            .unwrap_or_else(|| concat!("halo/", env!("CARGO_PKG_VERSION")).to_string());

        let mut builder = Client::builder().user_agent(user_agent);
        if let Some(timeout) = config.timeout_duration() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(transport_error)?;

        Ok(Self { client, config })
    }

    /// Returns the configuration this transport was built with.
    pub fn config(&self) -> &HttpConfig {
        &self.config
    }

    /// Headers for one request, in precedence order.
    fn headers(&self, request_headers: &Headers) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        if !self.config.cache {
            headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
        }
        for (name, value) in header_map(request_headers.iter().map(|(k, v)| (k, v)))? {
            if let Some(name) = name {
                headers.insert(name, value);
            }
        }
        for (name, value) in header_map(&self.config.headers)? {
            if let Some(name) = name {
                headers.insert(name, value);
            }
        }
        Ok(headers)
    }
}

impl Transport for HttpTransport {
    #[instrument(skip(self, request), fields(method = %request.method, url = %request.url))]
    fn send(&self, request: Request) -> Result<Body> {
        let headers = self.headers(&request.headers)?;

        let mut builder = match request.method {
            Method::Get => self.client.get(&request.url),
            Method::Post => self.client.post(&request.url),
            Method::Patch => self.client.patch(&request.url),
            Method::Delete => self.client.delete(&request.url),
        }
        .headers(headers);

        if !request.params.is_empty() {
            builder = builder.query(&request.params);
        }
        if let Some(form) = &request.form {
            builder = builder.form(form);
        }

        debug!("Sending request");
        let response = builder.send().map_err(transport_error)?;

        let status = response.status();
        trace!(status = %status, "Response received");

        let text = response.text().map_err(transport_error)?;
        if status.is_success() {
            Ok(Body::from_text(text))
        } else {
            debug!(status = status.as_u16(), "Request failed");
            Err(RequestError::new(request.method, request.url, status.as_u16(), text).into())
        }
    }
}

fn header_map<'a, I>(headers: I) -> Result<HeaderMap>
where
    I: IntoIterator<Item = (&'a String, &'a String)>,
{
    let mut map = HeaderMap::new();
    for (name, value) in headers {
        let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| invalid_header(name, e))?;
        let header_value = HeaderValue::from_str(value).map_err(|e| invalid_header(name, e))?;
        map.insert(header_name, header_value);
    }
    Ok(map)
}

fn invalid_header(name: &str, err: impl std::fmt::Display) -> Error {
    InvalidInputError::Other {
        message: format!("invalid header '{name}': {err}"),
    }
    .into()
}

fn transport_error(err: reqwest::Error) -> Error {
    let message = err.to_string();
    let err = if err.is_timeout() {
        TransportError::Timeout { message }
    } else if err.is_connect() {
        TransportError::Connection { message }
    } else if err.is_decode() {
        TransportError::Decode { message }
    } else {
        TransportError::Http { message }
    };
    Error::Transport(err)
}
