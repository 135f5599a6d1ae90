//! Error types for halo.
//!
//! This module provides a unified error type with explicit variants for
//! transport failures, rejected writes, unreadable documents and invalid
//! caller input.

use std::fmt;

use serde_json::Value;
use thiserror::Error;

use crate::traits::Method;

/// The unified error type for halo operations.
///
/// Every failure is surfaced to the immediate caller; nothing in the crate
/// retries.
#[derive(Debug, Error)]
pub enum Error {
    /// The service answered with a non-2xx status.
    #[error("{0}")]
    Request(#[from] RequestError),

    /// The request never produced an HTTP status (DNS, TLS, connection, timeout, decoding).
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// A create or update was not accepted by the service.
    ///
    /// `status` is set when the write request itself failed at the HTTP
    /// level (for example a stale etag); `response` holds the service's
    /// payload for diagnosis.
    #[error("content not writable: {}", describe_write_failure(.status, .response))]
    ContentNotWritable {
        status: Option<u16>,
        response: Value,
    },

    /// The root discovery document lacks the links structure.
    #[error("content not readable: {reason}")]
    ContentNotReadable { reason: String },

    /// The item is not in a state that allows the operation.
    #[error("illegal state: {reason}")]
    IllegalState { reason: String },

    /// A generic field that has never been set was read.
    #[error("attribute not found: {name}")]
    AttributeNotFound { name: String },

    /// The catalog has no resource with this name.
    #[error("unknown resource: {name}")]
    UnknownResource { name: String },

    /// A page of a collection could not be read.
    #[error("collection page at {url} not readable: {reason}")]
    NotReadable { url: String, reason: String },

    /// A collection traversal exceeded the configured page cap.
    #[error("pagination stopped at {url} after {pages} pages")]
    PaginationLimit { url: String, pages: usize },

    /// Input validation errors (URLs, field names, payloads).
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInputError),
}

impl Error {
    /// HTTP status of the failure, if the service produced one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Request(err) => Some(err.status),
            Error::ContentNotWritable { status, .. } => *status,
            _ => None,
        }
    }

    /// Check whether the service reported that the addressed document does not exist.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

fn describe_write_failure(status: &Option<u16>, response: &Value) -> String {
    match status {
        Some(status) => format!("HTTP {status}: {response}"),
        None => response.to_string(),
    }
}

/// A non-2xx answer from the service.
#[derive(Debug, Clone)]
pub struct RequestError {
    /// Verb of the failed request.
    pub method: Method,
    /// URL the request was sent to.
    pub url: String,
    /// HTTP status code.
    pub status: u16,
    /// Raw response body.
    pub body: String,
}

impl RequestError {
    /// Create a new request error.
    pub fn new(method: Method, url: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            status,
            body: body.into(),
        }
    }

    /// The response body as JSON, or as a JSON string when it does not parse.
    pub fn body_json(&self) -> Value {
        serde_json::from_str(&self.body).unwrap_or_else(|_| Value::String(self.body.clone()))
    }
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} failed with HTTP {}", self.method, self.url, self.status)?;
        if !self.body.is_empty() {
            write!(f, ": {}", self.body)?;
        }
        Ok(())
    }
}

impl std::error::Error for RequestError {}

/// Transport-level errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network connection failed.
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// Request timed out.
    #[error("request timed out: {message}")]
    Timeout { message: String },

    /// The response body could not be decoded.
    #[error("could not decode response: {message}")]
    Decode { message: String },

    /// Generic HTTP error.
    #[error("HTTP error: {message}")]
    Http { message: String },
}

/// Input validation errors.
#[derive(Debug, Error)]
pub enum InvalidInputError {
    /// Invalid service URL.
    #[error("invalid service URL '{value}': {reason}")]
    ServiceUrl { value: String, reason: String },

    /// The name belongs to item metadata and cannot hold a generic field.
    #[error("'{name}' is a reserved field name")]
    ReservedField { name: String },

    /// Fields could not be serialized into a write payload.
    #[error("could not encode payload: {reason}")]
    Payload { reason: String },

    /// Generic invalid input.
    #[error("invalid input: {message}")]
    Other { message: String },
}
