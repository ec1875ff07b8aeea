//! Core types shared across the crate
//!
//! - `TextRange`: half-open byte offset range
//! - `StickyLinesError` and the crate `Result` alias

pub mod errors;
pub mod position;

// Re-export commonly used types
pub use errors::{Result, StickyLinesError};
pub use position::TextRange;
