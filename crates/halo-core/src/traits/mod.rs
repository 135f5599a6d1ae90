//! Core traits for talking to a service.

mod transport;

pub use transport::{Body, Form, Headers, Method, Params, Request, Transport};
