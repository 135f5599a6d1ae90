//! The item model and its persistence protocol.
//!
//! An [`Item`] is one remote document: reserved metadata (identifier, etag,
//! canonical URL, timestamps) held in typed slots, and everything else in
//! generic [`Fields`]. An item is either *new* (never saved) or *persisted*;
//! [`Item::save`] picks create or update from that state.

mod fields;
mod wire;

use std::fmt;

use serde_json::{Map, Value, json};
use tracing::{debug, instrument, trace, warn};

use crate::error::Error;
use crate::resource::Resource;
use crate::types::{Etag, ItemId, Timestamp};
use crate::Result;

pub use fields::{CREATED_KEY, ETAG_KEY, Fields, ID_KEY, LINKS_KEY, UPDATED_KEY, is_reserved};

pub(crate) use wire::link_href;
use wire::{Metadata, WriteAck, encode_payload};

/// Precondition header carrying the etag on update and delete.
const IF_MATCH: &str = "If-Match";

/// Which provenance values [`Item::copy`] carries over to the next save.
///
/// All three are kept by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CopyOptions {
    pub keep_id: bool,
    pub keep_updated: bool,
    pub keep_created: bool,
}

impl Default for CopyOptions {
    fn default() -> Self {
        Self {
            keep_id: true,
            keep_updated: true,
            keep_created: true,
        }
    }
}

impl CopyOptions {
    /// Keep nothing; the copy is saved as a brand-new document.
    pub fn none() -> Self {
        Self {
            keep_id: false,
            keep_updated: false,
            keep_created: false,
        }
    }

    pub fn keep_id(mut self, keep: bool) -> Self {
        self.keep_id = keep;
        self
    }

    pub fn keep_updated(mut self, keep: bool) -> Self {
        self.keep_updated = keep;
        self
    }

    pub fn keep_created(mut self, keep: bool) -> Self {
        self.keep_created = keep;
        self
    }
}

/// Values forced into the payload of the next save.
#[derive(Debug, Clone, Default)]
struct Staged {
    id: Option<ItemId>,
    updated: Option<Timestamp>,
    created: Option<Timestamp>,
}

/// One remote document.
///
/// # Example
///
/// ```no_run
/// # fn example(users: &halo_core::Resource) -> halo_core::Result<()> {
/// let mut user = users.new_item();
/// user.set("name", "foo")?;
/// user.set("email", "foo@example.com")?;
/// user.save()?;
///
/// assert!(user.is_persisted());
/// user.set("email", "bar@example.com")?;
/// user.save()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Item {
    resource: Resource,
    id: Option<ItemId>,
    etag: Option<Etag>,
    url: Option<String>,
    updated: Option<Timestamp>,
    created: Option<Timestamp>,
    fields: Fields,
    staged: Staged,
}

impl Item {
    /// A new, never-saved item bound to `resource`.
    pub fn new(resource: &Resource) -> Self {
        Self {
            resource: resource.clone(),
            id: None,
            etag: None,
            url: None,
            updated: None,
            created: None,
            fields: Fields::new(),
            staged: Staged::default(),
        }
    }

    /// Build an item from a document the service returned.
    ///
    /// Metadata keys fill the typed slots, everything else becomes a generic
    /// field. The canonical URL is the resolved `_links.self.href`, or absent
    /// when the document has no self link.
    pub fn from_server(resource: &Resource, map: Map<String, Value>) -> Self {
        let meta = Metadata::from_map(&map);
        let url = meta.self_href.map(|href| resource.service().resolve(&href));

        Self {
            id: meta.id,
            etag: meta.etag,
            url,
            updated: meta.updated,
            created: meta.created,
            fields: Fields::from_map(map),
            ..Self::new(resource)
        }
    }

    /// A new item for `resource` carrying all of `source`'s generic fields.
    ///
    /// The copy is never persisted, even when `source` is. `options` decides
    /// whether `source`'s identifier and timestamps are forced into the
    /// copy's first save, which migrates a document while preserving its
    /// provenance.
    pub fn copy(resource: &Resource, source: &Item, options: CopyOptions) -> Self {
        let staged = Staged {
            id: options.keep_id.then(|| source.id.clone()).flatten(),
            updated: options.keep_updated.then(|| source.updated.clone()).flatten(),
            created: options.keep_created.then(|| source.created.clone()).flatten(),
        };

        Self {
            fields: source.fields.clone(),
            staged,
            ..Self::new(resource)
        }
    }

    /// Read a generic field.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AttributeNotFound`] if the field was never set.
    pub fn get(&self, name: &str) -> Result<&Value> {
        self.fields.get(name).ok_or_else(|| Error::AttributeNotFound {
            name: name.to_string(),
        })
    }

    /// Set a generic field.
    ///
    /// # Errors
    ///
    /// Reserved names are rejected; metadata is only reachable through the
    /// typed accessors.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Result<()> {
        self.fields.insert(name, value)?;
        Ok(())
    }

    /// Check whether a generic field is set.
    pub fn has(&self, name: &str) -> bool {
        self.fields.contains(name)
    }

    /// Unset a generic field, returning its value.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.fields.remove(name)
    }

    /// The generic fields, metadata excluded.
    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    /// Apply `fields` onto the generic fields and stage timestamp overrides.
    ///
    /// Reserved keys in `fields` are skipped. No request is made; the staged
    /// values go out with the next [`save`](Item::save).
    pub fn update(
        &mut self,
        fields: Map<String, Value>,
        updated: Option<Timestamp>,
        created: Option<Timestamp>,
    ) {
        self.fields.merge(fields);
        if updated.is_some() {
            self.staged.updated = updated;
        }
        if created.is_some() {
            self.staged.created = created;
        }
    }

    /// Persist the item.
    ///
    /// A new item is created with a POST to its resource; a persisted item is
    /// updated with a PATCH to its canonical URL, guarded by `If-Match`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ContentNotWritable`] when the service does not accept
    /// the write: a missing or non-OK envelope, or a 409/412/422/428 response
    /// such as a stale etag. Any other HTTP failure is [`Error::Request`].
    /// The item keeps its previous state and staged values in either case.
    #[instrument(skip(self), fields(resource = %self.resource.name(), id = ?self.id))]
    pub fn save(&mut self) -> Result<()> {
        if self.id.is_none() {
            self.create()
        } else {
            self.replace()
        }
    }

    /// Delete the persisted document, guarded by `If-Match`.
    ///
    /// The in-memory item is left as it was; it must not be saved or deleted
    /// again afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IllegalState`] without touching the network if the
    /// item has no identifier, etag or canonical URL.
    #[instrument(skip(self), fields(resource = %self.resource.name(), id = ?self.id))]
    pub fn delete(&self) -> Result<()> {
        let (url, etag) = self.location("delete")?;
        debug!(%url, "Deleting item");

        self.resource
            .transport()
            .delete(url, vec![(IF_MATCH.to_string(), etag.to_string())])?;

        debug!("Item deleted");
        Ok(())
    }

    /// Server-assigned identifier, absent until the first successful create.
    pub fn id(&self) -> Option<&ItemId> {
        self.id.as_ref()
    }

    /// Current concurrency token.
    pub fn etag(&self) -> Option<&Etag> {
        self.etag.as_ref()
    }

    /// Fully-qualified canonical URL.
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn updated(&self) -> Option<&Timestamp> {
        self.updated.as_ref()
    }

    pub fn created(&self) -> Option<&Timestamp> {
        self.created.as_ref()
    }

    /// Name of the resource this item belongs to.
    pub fn resource_name(&self) -> &str {
        self.resource.name()
    }

    /// True until the first successful create.
    pub fn is_new(&self) -> bool {
        self.id.is_none()
    }

    /// True when identifier, etag and canonical URL are all known.
    pub fn is_persisted(&self) -> bool {
        self.id.is_some() && self.etag.is_some() && self.url.is_some()
    }

    /// The full document: generic fields plus the known metadata.
    pub fn to_document(&self) -> Value {
        let mut map = self.fields.as_map().clone();
        if let Some(id) = &self.id {
            map.insert(ID_KEY.to_string(), json!(id));
        }
        if let Some(etag) = &self.etag {
            map.insert(ETAG_KEY.to_string(), json!(etag));
        }
        if let Some(updated) = &self.updated {
            map.insert(UPDATED_KEY.to_string(), json!(updated));
        }
        if let Some(created) = &self.created {
            map.insert(CREATED_KEY.to_string(), json!(created));
        }
        if let Some(url) = &self.url {
            map.insert(LINKS_KEY.to_string(), json!({"self": {"href": url}}));
        }
        Value::Object(map)
    }

    fn create(&mut self) -> Result<()> {
        let mut payload = self.payload();
        if let Some(id) = &self.staged.id {
            payload.insert(ID_KEY.to_string(), json!(id));
        }

        let url = self.resource.url().to_string();
        debug!(%url, "Creating item");
        trace!(?payload, "create payload");

        let body = self
            .resource
            .transport()
            .post(&url, encode_payload(payload)?, Vec::new())
            .map_err(rejected_write)?;

        let ack = WriteAck::from_body(body).inspect_err(|e| warn!(error = %e, "Create rejected"))?;
        let created = self.staged.created.take().or(ack.created.clone());
        self.adopt(ack, created);

        debug!(id = ?self.id, "Item created");
        Ok(())
    }

    fn replace(&mut self) -> Result<()> {
        let (url, etag) = self.location("update")?;
        let (url, etag) = (url.to_string(), etag.to_string());
        let payload = self.payload();

        debug!(%url, "Updating item");
        trace!(?payload, "update payload");

        let body = self
            .resource
            .transport()
            .patch(&url, encode_payload(payload)?, vec![(IF_MATCH.to_string(), etag)])
            .map_err(rejected_write)?;

        let ack = WriteAck::from_body(body).inspect_err(|e| warn!(error = %e, "Update rejected"))?;
        // The service is not authoritative for `created` once the item exists.
        let created = self.staged.created.take().or_else(|| self.created.clone());
        self.adopt(ack, created);

        debug!(etag = ?self.etag, "Item updated");
        Ok(())
    }

    /// Generic fields plus staged timestamp overrides.
    fn payload(&self) -> Map<String, Value> {
        let mut payload = self.fields.as_map().clone();
        if let Some(updated) = &self.staged.updated {
            payload.insert(UPDATED_KEY.to_string(), json!(updated));
        }
        if let Some(created) = &self.staged.created {
            payload.insert(CREATED_KEY.to_string(), json!(created));
        }
        payload
    }

    fn adopt(&mut self, ack: WriteAck, created: Option<Timestamp>) {
        self.url = Some(self.resource.service().resolve(&ack.self_href));
        self.id = Some(ack.id);
        self.etag = Some(ack.etag);
        if ack.updated.is_some() {
            self.updated = ack.updated;
        }
        self.created = created;
        self.staged = Staged::default();
    }

    /// Canonical URL and etag of a persisted item.
    fn location(&self, operation: &str) -> Result<(&str, &Etag)> {
        let missing = |what: &str| Error::IllegalState {
            reason: format!("cannot {operation} an item without {what}"),
        };

        if self.id.as_ref().is_none_or(ItemId::is_empty) {
            return Err(missing("an identifier"));
        }
        let etag = self.etag.as_ref().ok_or_else(|| missing("an etag"))?;
        let url = self.url.as_deref().ok_or_else(|| missing("a canonical URL"))?;
        Ok((url, etag))
    }
}

/// Equal when both items have the same non-empty identifier.
///
/// An item without an identifier has no identity yet and is equal to
/// nothing, itself included, so `Eq` is not implemented.
impl PartialEq for Item {
    fn eq(&self, other: &Self) -> bool {
        match (&self.id, &other.id) {
            (Some(a), Some(b)) => !a.is_empty() && a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.id {
            Some(id) => write!(f, "{} {}", self.resource.name(), id),
            None => write!(f, "{} (new)", self.resource.name()),
        }
    }
}

/// Statuses with which a service refuses the content of a write: conflict,
/// failed or missing precondition, and validation failure.
const REFUSED_WRITE_STATUSES: [u16; 4] = [409, 412, 422, 428];

/// A write the service refused on content grounds is reported like a
/// refused envelope. Other request failures keep their verb and URL.
fn rejected_write(err: Error) -> Error {
    match err {
        Error::Request(err) if REFUSED_WRITE_STATUSES.contains(&err.status) => {
            warn!(status = err.status, url = %err.url, "Write refused by service");
            Error::ContentNotWritable {
                status: Some(err.status),
                response: err.body_json(),
            }
        }
        other => other,
    }
}
