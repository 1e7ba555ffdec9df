//! # mindscape-gnosis
//!
//! The epistemic belief graph: the lifecycle state machine (C7), confidence
//! history (C8), contradiction index (C9), and the combined `EpistemicStore`
//! implementation (C10) tying them together behind one per-belief advisory
//! lock.

pub mod epistemic_store;
pub mod fsm;

pub use epistemic_store::DriverEpistemicStore;
pub use fsm::allowed_transition;
