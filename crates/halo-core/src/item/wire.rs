//! Wire shapes of item documents and write acknowledgements.

use serde_json::{Map, Value};

use crate::error::{Error, InvalidInputError};
use crate::traits::{Body, Form};
use crate::types::{Etag, ItemId, Timestamp};

use super::fields::{CREATED_KEY, ETAG_KEY, ID_KEY, LINKS_KEY, UPDATED_KEY};

/// Form field that carries the JSON-encoded item on create and update.
pub(crate) const ITEM_FORM_FIELD: &str = "item";

/// Envelope key of a write acknowledgement.
const ENVELOPE_KEY: &str = "item";

/// Per-item status of an accepted write.
const STATUS_OK: &str = "OK";

/// Metadata found in a server field map.
#[derive(Debug, Default)]
pub(crate) struct Metadata {
    pub id: Option<ItemId>,
    pub etag: Option<Etag>,
    pub updated: Option<Timestamp>,
    pub created: Option<Timestamp>,
    pub self_href: Option<String>,
}

impl Metadata {
    pub fn from_map(map: &Map<String, Value>) -> Self {
        Self {
            id: scalar(map.get(ID_KEY)).map(ItemId::new),
            etag: scalar(map.get(ETAG_KEY)).map(Etag::new),
            updated: scalar(map.get(UPDATED_KEY)).map(Timestamp::new),
            created: scalar(map.get(CREATED_KEY)).map(Timestamp::new),
            self_href: link_href(map, "self"),
        }
    }
}

/// The metadata of an accepted create or update.
#[derive(Debug)]
pub(crate) struct WriteAck {
    pub id: ItemId,
    pub etag: Etag,
    pub self_href: String,
    pub updated: Option<Timestamp>,
    pub created: Option<Timestamp>,
}

impl WriteAck {
    /// Read the acknowledgement out of a write response.
    ///
    /// Anything other than `{"item": {"status": "OK", "_id", "etag", "_links": {"self": {"href"}}}}`
    /// is a rejected write.
    pub fn from_body(body: Body) -> Result<Self, Error> {
        let response = body.to_value();
        let rejected = || Error::ContentNotWritable {
            status: None,
            response: response.clone(),
        };

        let envelope = response
            .get(ENVELOPE_KEY)
            .and_then(Value::as_object)
            .ok_or_else(rejected)?;

        if envelope.get("status").and_then(Value::as_str) != Some(STATUS_OK) {
            return Err(rejected());
        }

        let meta = Metadata::from_map(envelope);
        match (meta.id, meta.etag, meta.self_href) {
            (Some(id), Some(etag), Some(self_href)) if !id.is_empty() => Ok(Self {
                id,
                etag,
                self_href,
                updated: meta.updated,
                created: meta.created,
            }),
            _ => Err(rejected()),
        }
    }
}

/// Encode a payload as the single-field form body the service expects.
pub(crate) fn encode_payload(payload: Map<String, Value>) -> Result<Form, Error> {
    let json = serde_json::to_string(&Value::Object(payload)).map_err(|e| {
        InvalidInputError::Payload {
            reason: e.to_string(),
        }
    })?;
    Ok(vec![(ITEM_FORM_FIELD.to_string(), json)])
}

/// `_links.<rel>.href` of a document.
pub(crate) fn link_href(map: &Map<String, Value>, rel: &str) -> Option<String> {
    map.get(LINKS_KEY)?
        .get(rel)?
        .get("href")?
        .as_str()
        .map(str::to_string)
}

/// Metadata values are opaque strings; numbers are accepted in their JSON spelling.
fn scalar(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}
