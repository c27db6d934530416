//! Data models for recoverable files found in Claude Code conversation logs.
//!
//! - [`LogRecord`] - One typed record decoded from a conversation log line
//! - [`FileEvent`] - Complete content of a file at one point in time
//! - [`VersionChain`] - Every known version of one file, oldest first
//! - [`ProjectCatalog`] - All recoverable files of a project plus statistics
//! - [`ProjectInfo`] - Discovered project metadata and log file paths
//! - [`FileCategory`] - Extension-based file type used for statistics and filters

pub mod catalog;
pub mod category;
pub mod event;
pub mod project;
pub mod record;

pub use catalog::{CatalogStats, ProjectCatalog, VersionChain};
pub use category::FileCategory;
pub use event::{FileEvent, OperationKind};
pub use project::ProjectInfo;
pub use record::{LogRecord, RecordPayload};
