//! Log scanning and version reconciliation
//!
//! The pipeline for one project runs in a single pass:
//!
//! 1. [`project_discovery`] finds the project's conversation logs
//! 2. [`crate::parsers::LogRecordReader`] decodes each log into records
//! 3. [`classifier::EventClassifier`] keeps whole-content writes and reads
//! 4. [`reconciler::VersionReconciler`] folds events into per-path version chains
//! 5. [`builder::CatalogBuilder`] assembles the catalog and its statistics
//!
//! Everything is rebuilt from the logs on every call; nothing is cached or
//! written to disk.

pub mod builder;
pub mod classifier;
pub mod project_discovery;
pub mod reconciler;

pub use builder::{CatalogBuilder, build_catalog, build_catalog_with_root};
pub use classifier::{EventClassifier, Rejection, normalize_path};
pub use project_discovery::{discover_projects, find_project};
pub use reconciler::VersionReconciler;
