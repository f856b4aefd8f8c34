//! HTTP request handlers for API endpoints.

pub mod admin;
pub mod blog;
pub mod destinations;
pub mod health;
pub mod links;
pub mod pages;
pub mod site;

use serde::Deserialize;

/// `?locale=` on content endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct LocaleQuery {
    pub locale: Option<String>,
}
