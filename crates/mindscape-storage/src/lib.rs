//! # mindscape-storage
//!
//! The reference in-process `StorageDriver` implementation, its capability
//! emulation helpers, and the day-bucketed time index used for range
//! queries. Hosts backed by Redis, SQL, or a filesystem implement
//! `mindscape_core::traits::StorageDriver` directly; this crate exists so
//! tests and single-process deployments need no external dependency.

pub mod capability;
pub mod memory_driver;
pub mod time_index;

pub use memory_driver::MemoryStorageDriver;
pub use time_index::TimeIndex;
