//! HTTP API.
//!
//! - **Content**: pages, destinations, countries, cities and blog, resolved
//!   to the requested locale
//! - **Site chrome**: navigation, footer and homepage categories, exact locale only
//! - **Language switcher**: cross-locale link resolution
//! - **Admin**: dashboard, bulk import and deletion
//!
//! Public routes are nested under `/api/cms`, admin routes under `/api/admin`.

pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use error::ApiError;
pub use router::create_router;
pub use state::AppState;
