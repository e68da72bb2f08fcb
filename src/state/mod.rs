//! State module for tracking crawl progress
//!
//! Each visit of a discovered URL runs its own small state machine; there is
//! no global crawl state besides the result store.
//!
//! # Components
//!
//! - `VisitState`: Tracks one visit from discovery to a terminal state

mod visit_state;

// Re-export main types
pub use visit_state::VisitState;
