//! # mindscape-atlas
//!
//! The adaptive layer: surprise scoring (C11), the ATLAS priority function
//! and diversity-aware reranker (C12), the hierarchical compressor (C13),
//! and the retention evaluator (C14), combined behind one `AdaptiveLayer`
//! implementation over any `StorageDriver` + `Summariser`.

pub mod adaptive_layer;
pub mod compression;
pub mod priority;
pub mod retention;
pub mod surprise;

pub use adaptive_layer::DriverAdaptiveLayer;
