//! rulescan_core: Core utilities for the rulescan tokenizer.
//!
//! Provides source positions, char-offset ranges, and the hash-based
//! collections the match index is built from.

pub mod collections;
pub mod text;

// Re-export commonly used types
pub use collections::{FxHashSet, MultiMap};
pub use text::{text_pos, LinePos, TextPos, TextRange};
