//! Generic field storage.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{Error, InvalidInputError};

/// Identifier key.
pub const ID_KEY: &str = "_id";
/// Concurrency token key.
pub const ETAG_KEY: &str = "etag";
/// Hypermedia links key.
pub const LINKS_KEY: &str = "_links";
/// Last modification timestamp key.
pub const UPDATED_KEY: &str = "updated";
/// Creation timestamp key.
pub const CREATED_KEY: &str = "created";

const METADATA_KEYS: [&str; 5] = [ID_KEY, ETAG_KEY, LINKS_KEY, UPDATED_KEY, CREATED_KEY];

/// Marker that starts every service-internal key.
const RESERVED_PREFIX: char = '_';

/// Check whether `name` addresses item metadata rather than a generic field.
///
/// The metadata keys are reserved, as is every key starting with `_`.
pub fn is_reserved(name: &str) -> bool {
    name.starts_with(RESERVED_PREFIX) || METADATA_KEYS.contains(&name)
}

/// The generic fields of an item, metadata excluded.
///
/// Keys are never reserved names: [`insert`](Fields::insert) rejects them and
/// bulk merges skip them.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Fields(Map<String, Value>);

impl Fields {
    /// Create an empty field set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a field set from a map, dropping every reserved key.
    pub fn from_map(map: Map<String, Value>) -> Self {
        let mut fields = Self::new();
        fields.merge(map);
        fields
    }

    /// Get a field value.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Set a field value, returning the previous one.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidInputError::ReservedField`] for metadata names.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Result<Option<Value>, Error> {
        let name = name.into();
        if is_reserved(&name) {
            return Err(InvalidInputError::ReservedField { name }.into());
        }
        Ok(self.0.insert(name, value.into()))
    }

    /// Remove a field, returning its value.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.0.remove(name)
    }

    /// Check whether a field is set.
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over field names and values.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Iterate over field names.
    pub fn names(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    /// Returns the underlying map.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Consume and return the underlying map.
    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    /// Apply every non-reserved entry of `map`, overwriting existing values.
    pub(crate) fn merge(&mut self, map: Map<String, Value>) {
        for (name, value) in map {
            if !is_reserved(&name) {
                self.0.insert(name, value);
            }
        }
    }
}

impl From<Fields> for Value {
    fn from(fields: Fields) -> Self {
        Value::Object(fields.0)
    }
}

impl<'a> IntoIterator for &'a Fields {
    type Item = (&'a String, &'a Value);
    type IntoIter = serde_json::map::Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
