//! # mindscape-core
//!
//! Domain models, error taxonomy, configuration, and trait interfaces for the
//! mindscape epistemic memory substrate. This crate performs no I/O: every
//! trait here is implemented by a leaf crate (`mindscape-storage`,
//! `mindscape-stratify`, `mindscape-gnosis`, `mindscape-atlas`) or by the
//! host application (`StorageDriver`, `AiProvider`, `AuditSink`).

pub mod config;
pub mod deadline;
pub mod errors;
pub mod keys;
pub mod models;
pub mod token;
pub mod traits;

pub use errors::{MindscapeError, MindscapeResult};
