//! Transport trait.
//!
//! A [`Transport`] performs one HTTP round-trip per call and blocks until the
//! service answers. Implementations must turn every non-2xx answer into
//! [`Error::Request`](crate::Error::Request) carrying the verb, URL, status
//! and raw body.

use std::fmt;

use serde_json::Value;

use crate::Result;

/// Ordered header list attached to a single request.
pub type Headers = Vec<(String, String)>;

/// Ordered query parameter list.
pub type Params = Vec<(String, String)>;

/// Ordered form fields sent as `application/x-www-form-urlencoded`.
pub type Form = Vec<(String, String)>;

/// HTTP verb of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Patch,
    Delete,
}

impl Method {
    /// Upper-case verb as it appears on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request described as plain data.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub method: Method,
    pub url: String,
    pub headers: Headers,
    pub params: Params,
    pub form: Option<Form>,
}

impl Request {
    /// Create a request with no headers, parameters or body.
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            params: Vec::new(),
            form: None,
        }
    }

    /// Value of the first header with this name (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Value of the first form field with this name.
    pub fn form_field(&self, name: &str) -> Option<&str> {
        self.form
            .as_ref()?
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// A decoded 2xx response body.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    /// The body parsed as JSON.
    Json(Value),
    /// The body was present but is not JSON.
    Text(String),
    /// The response carried no body.
    Empty,
}

impl Body {
    /// Decode raw response text: empty → `Empty`, valid JSON → `Json`, anything else → `Text`.
    pub fn from_text(text: String) -> Self {
        if text.trim().is_empty() {
            return Body::Empty;
        }
        match serde_json::from_str(&text) {
            Ok(value) => Body::Json(value),
            Err(_) => Body::Text(text),
        }
    }

    /// The JSON value, if the body was JSON.
    pub fn into_json(self) -> Option<Value> {
        match self {
            Body::Json(value) => Some(value),
            _ => None,
        }
    }

    /// Best-effort JSON view used for diagnostics.
    pub fn to_value(&self) -> Value {
        match self {
            Body::Json(value) => value.clone(),
            Body::Text(text) => Value::String(text.clone()),
            Body::Empty => Value::Null,
        }
    }
}

/// A blocking HTTP transport.
///
/// Only [`send`](Transport::send) is required; the verb helpers build a
/// [`Request`] and forward to it.
pub trait Transport: Send + Sync + fmt::Debug {
    /// Perform one request and return the decoded body of a 2xx answer.
    fn send(&self, request: Request) -> Result<Body>;

    /// GET `url` with optional extra headers and query parameters.
    fn get(&self, url: &str, headers: Headers, params: Params) -> Result<Body> {
        self.send(Request {
            headers,
            params,
            ..Request::new(Method::Get, url)
        })
    }

    /// POST a form body to `url`.
    fn post(&self, url: &str, form: Form, headers: Headers) -> Result<Body> {
        self.send(Request {
            headers,
            form: Some(form),
            ..Request::new(Method::Post, url)
        })
    }

    /// PATCH a form body to `url`.
    fn patch(&self, url: &str, form: Form, headers: Headers) -> Result<Body> {
        self.send(Request {
            headers,
            form: Some(form),
            ..Request::new(Method::Patch, url)
        })
    }

    /// DELETE `url`.
    fn delete(&self, url: &str, headers: Headers) -> Result<Body> {
        self.send(Request {
            headers,
            ..Request::new(Method::Delete, url)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn body_from_text() {
        assert_eq!(Body::from_text(String::new()), Body::Empty);
        assert_eq!(Body::from_text("  \n".to_string()), Body::Empty);
        assert_eq!(Body::from_text(r#"{"a":1}"#.to_string()), Body::Json(json!({"a": 1})));
        assert_eq!(
            Body::from_text("<html>".to_string()),
            Body::Text("<html>".to_string())
        );
    }

    #[test]
    fn header_lookup_ignores_case() {
        let mut request = Request::new(Method::Patch, "http://localhost/v1/users/1");
        request.headers.push(("If-Match".to_string(), "e1".to_string()));
        assert_eq!(request.header("if-match"), Some("e1"));
        assert_eq!(request.header("content-type"), None);
    }

    #[test]
    fn method_display() {
        assert_eq!(Method::Delete.to_string(), "DELETE");
        assert_eq!(Method::Patch.as_str(), "PATCH");
    }
}
