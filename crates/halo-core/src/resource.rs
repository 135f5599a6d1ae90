//! Named collection endpoints.

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, instrument, trace};

use crate::error::Error;
use crate::item::{Item, link_href};
use crate::traits::{Params, Transport};
use crate::types::ServiceUrl;
use crate::Result;

/// Page cap applied when no other limit is configured.
pub const DEFAULT_MAX_PAGES: usize = 10_000;

/// Key of the item list in a collection page.
const ITEMS_KEY: &str = "_items";

/// Limits for collection traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryOptions {
    /// Maximum number of pages one traversal may fetch; `None` is unbounded.
    pub max_pages: Option<usize>,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            max_pages: Some(DEFAULT_MAX_PAGES),
        }
    }
}

impl QueryOptions {
    /// Follow `next` links for as long as the service hands them out.
    pub fn unbounded() -> Self {
        Self { max_pages: None }
    }

    pub fn max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = Some(max_pages);
        self
    }
}

/// One named collection of a service.
///
/// Resources are cheap to clone and hold no items; every query goes to the
/// service.
#[derive(Debug, Clone)]
pub struct Resource {
    name: String,
    url: String,
    service: ServiceUrl,
    transport: Arc<dyn Transport>,
    options: QueryOptions,
}

impl Resource {
    /// Address a collection directly, without a discovery document.
    ///
    /// `url` is the collection endpoint; `service` is used to resolve the
    /// hrefs found in responses.
    pub fn new(
        name: impl Into<String>,
        url: impl Into<String>,
        service: ServiceUrl,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            service,
            transport,
            options: QueryOptions::default(),
        }
    }

    /// Replace the traversal limits.
    pub fn with_options(mut self, options: QueryOptions) -> Self {
        self.options = options;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The collection endpoint.
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn service(&self) -> &ServiceUrl {
        &self.service
    }

    pub fn options(&self) -> QueryOptions {
        self.options
    }

    pub(crate) fn transport(&self) -> &dyn Transport {
        self.transport.as_ref()
    }

    /// A new, never-saved item of this resource.
    pub fn new_item(&self) -> Item {
        Item::new(self)
    }

    /// Fetch one item by identifier from `<url>/<id>`.
    ///
    /// # Errors
    ///
    /// Transport failures propagate unchanged; a missing document is an
    /// [`Error::Request`] with status 404 (see [`Error::is_not_found`]).
    #[instrument(skip(self), fields(resource = %self.name))]
    pub fn get(&self, id: &str) -> Result<Item> {
        let url = format!("{}/{}", self.url.trim_end_matches('/'), id);
        debug!(%url, "Fetching item");

        let body = self.transport.get(&url, Vec::new(), Vec::new())?;
        let map = as_object(body.into_json()).ok_or_else(|| Error::NotReadable {
            url: url.clone(),
            reason: "item response is not a JSON object".to_string(),
        })?;

        Ok(Item::from_server(self, map))
    }

    /// Every item of the collection, following pagination.
    #[instrument(skip(self), fields(resource = %self.name))]
    pub fn all(&self) -> Result<Vec<Item>> {
        self.collect(Vec::new())
    }

    /// Every item matching a service-defined filter, e.g. `[("where", "name==\"foo\"")]`.
    ///
    /// The parameters go out with the first request only; `next` links are
    /// followed exactly as the service wrote them.
    #[instrument(skip(self, filter), fields(resource = %self.name))]
    pub fn find<I, K, V>(&self, filter: I) -> Result<Vec<Item>>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let params = filter
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self.collect(params)
    }

    /// Lazily walk the collection one page at a time.
    pub fn pages(&self, params: Params) -> Pages<'_> {
        Pages {
            resource: self,
            next: Some(self.url.clone()),
            params: Some(params),
            visited: HashSet::new(),
            fetched: 0,
        }
    }

    fn collect(&self, params: Params) -> Result<Vec<Item>> {
        let mut items = Vec::new();
        for page in self.pages(params) {
            items.extend(page?);
        }
        debug!(count = items.len(), "Collection read");
        Ok(items)
    }
}

/// Iterator over the pages of a collection.
///
/// Yields one `Vec<Item>` per page and stops after the first page without a
/// `next` link, or after the first error.
#[derive(Debug)]
pub struct Pages<'a> {
    resource: &'a Resource,
    next: Option<String>,
    params: Option<Params>,
    visited: HashSet<String>,
    fetched: usize,
}

impl Pages<'_> {
    /// Number of pages fetched so far.
    pub fn fetched(&self) -> usize {
        self.fetched
    }

    fn fetch(&mut self, url: String) -> Result<Vec<Item>> {
        if let Some(max) = self.resource.options.max_pages {
            if self.fetched >= max {
                return Err(Error::PaginationLimit {
                    url,
                    pages: self.fetched,
                });
            }
        }

        let params = self.params.take().unwrap_or_default();
        debug!(%url, page = self.fetched + 1, "Fetching page");
        trace!(?params, "page parameters");

        let body = self.resource.transport.get(&url, Vec::new(), params)?;
        self.visited.insert(url.clone());
        self.fetched += 1;

        let not_readable = |reason: &str| Error::NotReadable {
            url: url.clone(),
            reason: reason.to_string(),
        };

        let mut page =
            as_object(body.into_json()).ok_or_else(|| not_readable("page is not a JSON object"))?;

        let items = match page.remove(ITEMS_KEY) {
            None => Vec::new(),
            Some(Value::Array(entries)) => entries
                .into_iter()
                .map(|entry| {
                    as_object(Some(entry))
                        .map(|map| Item::from_server(self.resource, map))
                        .ok_or_else(|| not_readable("item is not a JSON object"))
                })
                .collect::<Result<Vec<_>>>()?,
            Some(_) => return Err(not_readable("_items is not a list")),
        };

        if let Some(href) = link_href(&page, "next") {
            let next = self.resource.service.resolve(&href);
            if self.visited.contains(&next) {
                return Err(Error::NotReadable {
                    url: next,
                    reason: "next link points to a page already read".to_string(),
                });
            }
            self.next = Some(next);
        }

        Ok(items)
    }
}

impl Iterator for Pages<'_> {
    type Item = Result<Vec<Item>>;

    fn next(&mut self) -> Option<Self::Item> {
        let url = self.next.take()?;
        Some(self.fetch(url))
    }
}

fn as_object(value: Option<Value>) -> Option<Map<String, Value>> {
    match value? {
        Value::Object(map) => Some(map),
        _ => None,
    }
}
