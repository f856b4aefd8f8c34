//! Multilingual content backend for a travel publishing site.
//!
//! Pages, destinations and blog posts are stored once per entity with one
//! translation per locale. Public reads resolve each entity to a single
//! locale with a deterministic fallback chain, and the language switcher maps
//! a URL in one locale to the equivalent URL in another.
//!
//! - [`i18n`]: locale registry, translation fallback, validation, coverage
//! - [`content`]: entity model
//! - [`store`]: persistence seam with in-memory and PostgreSQL backends
//! - [`links`]: cross-locale link resolution
//! - [`presenter`]: JSON payloads served to the frontend
//! - [`import`]: bulk JSON import
//! - [`api`]: axum HTTP API

pub mod api;
pub mod config;
pub mod content;
pub mod error;
pub mod i18n;
pub mod import;
pub mod links;
pub mod presenter;
pub mod store;

pub use error::{CmsError, CmsResult};
