//! Search-state machine (pure core).
//!
//! All state lives in `SearchEngine`; transitions are synchronous methods
//! and cursor arithmetic is pure functions testable in isolation.

pub mod engine;
pub mod navigation;
pub mod observer;
pub mod results;

// Re-export for convenience
pub use engine::{EnginePhase, MatchRecord, SearchEngine};
pub use navigation::{jump_index, next_index, prev_index};
pub use observer::preserved_cursor;
pub use results::{
    clamp_context_length, ContextSource, DEFAULT_CONTEXT_LENGTH, MAX_CONTEXT_LENGTH,
    MIN_CONTEXT_LENGTH,
};
