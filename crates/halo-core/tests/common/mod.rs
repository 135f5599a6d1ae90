//! Scripted in-memory transport shared by the integration suites.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use halo_core::{Body, Request, RequestError, Resource, Result, ServiceUrl, Transport};
use serde_json::Value;

pub const SERVICE: &str = "http://localhost:5000/v1";

enum Reply {
    Body(Body),
    Status(u16, String),
}

/// Answers requests from a queue and records every request it sees.
#[derive(Default)]
pub struct ScriptedTransport {
    replies: Mutex<VecDeque<Reply>>,
    requests: Mutex<Vec<Request>>,
}

impl std::fmt::Debug for ScriptedTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptedTransport").finish_non_exhaustive()
    }
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Queue a 2xx JSON answer.
    pub fn reply(&self, body: Value) {
        self.reply_body(Body::Json(body));
    }

    /// Queue a 2xx answer with an arbitrary body.
    pub fn reply_body(&self, body: Body) {
        self.replies.lock().unwrap().push_back(Reply::Body(body));
    }

    /// Queue a non-2xx answer.
    pub fn fail(&self, status: u16, body: &str) {
        self.replies
            .lock()
            .unwrap()
            .push_back(Reply::Status(status, body.to_string()));
    }

    pub fn requests(&self) -> Vec<Request> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last_request(&self) -> Request {
        self.requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no request was sent")
    }
}

impl Transport for ScriptedTransport {
    fn send(&self, request: Request) -> Result<Body> {
        self.requests.lock().unwrap().push(request.clone());
        match self.replies.lock().unwrap().pop_front() {
            Some(Reply::Body(body)) => Ok(body),
            Some(Reply::Status(status, body)) => {
                Err(RequestError::new(request.method, request.url, status, body).into())
            }
            None => panic!("unexpected request: {} {}", request.method, request.url),
        }
    }
}

pub fn service() -> ServiceUrl {
    ServiceUrl::new(SERVICE).unwrap()
}

/// The `users` collection backed by `transport`.
pub fn users(transport: &Arc<ScriptedTransport>) -> Resource {
    let transport: Arc<dyn Transport> = transport.clone();
    Resource::new("users", format!("{SERVICE}/users"), service(), transport)
}

/// The JSON document sent in the `item` form field of a write request.
pub fn sent_payload(request: &Request) -> Value {
    let raw = request.form_field("item").expect("write request without item field");
    serde_json::from_str(raw).expect("item field is not JSON")
}

/// A write acknowledgement as the service sends it.
pub fn ack(id: &str, etag: &str, updated: &str) -> Value {
    serde_json::json!({
        "item": {
            "status": "OK",
            "_id": id,
            "etag": etag,
            "updated": updated,
            "_links": {"self": {"href": format!("users/{id}"), "title": "User"}}
        }
    })
}
