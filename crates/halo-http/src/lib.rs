//! halo-http - reqwest-backed transport for halo.
//!
//! [`HttpTransport`] implements [`halo_core::Transport`] on top of a blocking
//! reqwest client, configured once through [`HttpConfig`].
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use halo_core::Catalog;
//! use halo_http::{HttpConfig, HttpTransport};
//!
//! # fn example() -> Result<(), halo_core::Error> {
//! let config = HttpConfig::default().header("Authorization", "Basic dXNlcjpwYXNz");
//! let transport = Arc::new(HttpTransport::with_config(config)?);
//!
//! let catalog = Catalog::discover("http://localhost:5000/v1", transport)?;
//! for name in catalog.names() {
//!     println!("{name}");
//! }
//! # Ok(())
//! # }
//! ```

mod client;
mod config;

pub use client::HttpTransport;
pub use config::HttpConfig;
