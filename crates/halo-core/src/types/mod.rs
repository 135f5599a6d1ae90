//! Core value types.
//!
//! These types enforce their invariants at construction time so the item
//! model never handles an unvalidated URL or an untyped metadata string.

mod ids;
mod service_url;
mod timestamp;

pub use ids::{Etag, ItemId};
pub use service_url::ServiceUrl;
pub use timestamp::Timestamp;
