//! Writing recovered file content back to disk.
//!
//! [`targets`] decides where each version lands and [`executor`] performs the
//! writes. This is the only part of the crate that writes files.

pub mod executor;
pub mod targets;

pub use executor::{FileRecovery, PlannedRecovery, RecoveryResult, backup_path, plan_recovery};
pub use targets::{Layout, target_path};
