//! Narrowing a catalog down to the files a user asked for.
//!
//! Filters never change the catalog; they return borrowed chains in catalog
//! order. Previews are sanitized for terminal output.

pub mod apply;
pub mod preview;

pub use apply::CatalogFilter;
pub use preview::content_preview;
