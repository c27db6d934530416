//! JSONL parsers for Claude Code conversation logs
//!
//! # Error Handling Strategy
//!
//! Conversation logs are append-only and a crash mid-append can leave a torn
//! trailing line, so parsing is tolerant by construction:
//!
//! - **Individual line failures**: Lines that are not well-formed records are
//!   skipped and counted, never fatal. Details go to the `debug` log level.
//!
//! - **No failure thresholds**: A log full of garbage yields zero records rather
//!   than an error. Shape problems in the data never fail a scan.
//!
//! - **I/O failures**: Read errors from the underlying file are yielded to the
//!   caller, which reports them as environment failures.

pub mod deserializers;
pub mod records;

pub use records::LogRecordReader;
