//! # mindscape-stratify
//!
//! The narrative/temporal stratification subsystem: append-only storage
//! (C4), age-based layer classification and summarisation triggers (C5),
//! hierarchical summary building (C6), and the MDL target-ratio scorer (C3).

pub mod mdl;
pub mod narrative_store;
pub mod summariser;
pub mod temporal_stratifier;

pub use mdl::target_compression_ratio;
pub use narrative_store::DriverNarrativeStore;
pub use summariser::AiSummariser;
pub use temporal_stratifier::DriverTemporalStratifier;
