//! Service discovery.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, instrument};

use crate::error::Error;
use crate::item::LINKS_KEY;
use crate::resource::{QueryOptions, Resource};
use crate::traits::Transport;
use crate::types::ServiceUrl;
use crate::Result;

/// Relation listing the collections in the root document.
const CHILD_REL: &str = "child";

/// The resources published by one service.
///
/// Built once from the root document's `_links.child` list and never
/// refreshed.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use halo_core::{Catalog, Transport};
///
/// # fn example(transport: Arc<dyn Transport>) -> halo_core::Result<()> {
/// let catalog = Catalog::discover("http://localhost:5000/v1", transport)?;
/// let users = catalog.resource("users")?;
///
/// for user in users.find([("where", r#"name=="foo""#)])? {
///     println!("{user}");
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Catalog {
    url: ServiceUrl,
    resources: Vec<Resource>,
}

impl Catalog {
    /// Read the root document at `url` and build its resources with default query options.
    pub fn discover(url: impl AsRef<str>, transport: Arc<dyn Transport>) -> Result<Self> {
        Self::discover_with(url, transport, QueryOptions::default())
    }

    /// Read the root document at `url` and build its resources.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ContentNotReadable`] when the document has no
    /// `_links`, no `_links.child` list, or a child without `title`/`href`.
    /// No resource is created in that case.
    #[instrument(skip(url, transport), fields(url = %url.as_ref()))]
    pub fn discover_with(
        url: impl AsRef<str>,
        transport: Arc<dyn Transport>,
        options: QueryOptions,
    ) -> Result<Self> {
        let service = ServiceUrl::new(url)?;
        debug!("Reading discovery document");

        let root = transport
            .get(service.as_str(), Vec::new(), Vec::new())?
            .into_json()
            .ok_or_else(|| unreadable("root document is not JSON"))?;

        let links = root
            .get(LINKS_KEY)
            .ok_or_else(|| unreadable("_links unavailable"))?;
        let children = links
            .get(CHILD_REL)
            .ok_or_else(|| unreadable("child unavailable"))?
            .as_array()
            .ok_or_else(|| unreadable("child is not a list"))?;

        let mut resources: Vec<Resource> = Vec::with_capacity(children.len());
        for child in children {
            let title = child_str(child, "title")?;
            let href = child_str(child, "href")?;
            let resource = Resource::new(title, service.resolve(href), service.clone(), transport.clone())
                .with_options(options);

            // A repeated title replaces the earlier link.
            match resources.iter_mut().find(|r| r.name() == title) {
                Some(existing) => *existing = resource,
                None => resources.push(resource),
            }
        }

        info!(count = resources.len(), "Discovered resources");
        Ok(Self {
            url: service,
            resources,
        })
    }

    /// The service root URL.
    pub fn url(&self) -> &ServiceUrl {
        &self.url
    }

    /// Look up a resource by its exact name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownResource`] if the service did not publish it.
    pub fn resource(&self, name: &str) -> Result<&Resource> {
        self.get(name).ok_or_else(|| Error::UnknownResource {
            name: name.to_string(),
        })
    }

    /// Look up a resource by its exact name.
    pub fn get(&self, name: &str) -> Option<&Resource> {
        self.resources.iter().find(|r| r.name() == name)
    }

    /// Resource names in discovery order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.resources.iter().map(Resource::name)
    }

    /// Resources in discovery order.
    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

fn unreadable(reason: &str) -> Error {
    Error::ContentNotReadable {
        reason: reason.to_string(),
    }
}

fn child_str<'a>(child: &'a Value, key: &str) -> Result<&'a str> {
    child
        .get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| unreadable(&format!("child link without {key}")))
}
