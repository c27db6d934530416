//! Claude File Recovery - Recover files written or read during Claude Code sessions
//!
//! Claude Code keeps per-project conversation logs under `~/.claude/projects/`.
//! Every whole-file write and every complete file read is recorded in those logs
//! together with the file's full content. This library turns those logs into a
//! catalog of recoverable files:
//!
//! - Discovering projects and their conversation logs
//! - Parsing logs line by line, skipping anything malformed
//! - Classifying tool calls into file events (writes and complete reads)
//! - Reconciling events into per-file version chains
//! - Filtering the catalog and writing chosen versions back to disk
//!
//! # Example
//!
//! ```no_run
//! use claude_file_recovery::{build_catalog, discover_projects};
//! use std::path::PathBuf;
//!
//! let claude_dir = PathBuf::from("/Users/alice/.claude");
//! for project in discover_projects(&claude_dir)? {
//!     let catalog = build_catalog(&project)?;
//!     println!("{}: {} recoverable files", project.name, catalog.len());
//! }
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod cli;
pub mod error;
pub mod filters;
pub mod models;
pub mod parsers;
pub mod recovery;
pub mod scanner;
pub mod utils;

// Re-export commonly used types
pub use error::CatalogError;
pub use filters::{CatalogFilter, content_preview};
pub use models::{FileCategory, FileEvent, ProjectCatalog, ProjectInfo, VersionChain};
pub use parsers::LogRecordReader;
pub use recovery::{FileRecovery, Layout, RecoveryResult, plan_recovery, target_path};
pub use scanner::{build_catalog, build_catalog_with_root, discover_projects, find_project};
pub use utils::paths::{decode_path, encode_path, format_path_with_tilde};
