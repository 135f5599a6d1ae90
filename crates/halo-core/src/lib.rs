//! halo-core - object mapper for hypermedia REST services.
//!
//! A [`Catalog`] reads a service's root document and exposes its
//! collections as [`Resource`]s. Resources fetch, query and create
//! [`Item`]s; items track their generic fields and reserved metadata and
//! persist themselves with optimistic concurrency (`If-Match` on the
//! entity tag).
//!
//! All network access goes through the blocking [`Transport`] trait.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use halo_core::{Catalog, Transport};
//!
//! # fn example(transport: Arc<dyn Transport>) -> halo_core::Result<()> {
//! let catalog = Catalog::discover("http://localhost:5000/v1", transport)?;
//! let users = catalog.resource("users")?;
//!
//! let mut user = users.new_item();
//! user.set("name", "foo")?;
//! user.save()?;
//!
//! let same = users.get(user.id().unwrap().as_str())?;
//! assert!(user == same);
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod error;
pub mod item;
pub mod resource;
pub mod traits;
pub mod types;

pub use catalog::Catalog;
pub use error::{Error, InvalidInputError, RequestError, TransportError};
pub use item::{CopyOptions, Fields, Item};
pub use resource::{Pages, QueryOptions, Resource};
pub use traits::{Body, Method, Request, Transport};
pub use types::{Etag, ItemId, ServiceUrl, Timestamp};

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
