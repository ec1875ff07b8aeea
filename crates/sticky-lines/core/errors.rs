//! Error types for the sticky-lines crate
//!
//! Provides the `StickyLinesError` enum shared by the registry, the markup
//! model and the document manager. Follows a few simple rules:
//! - Use thiserror for structured error handling (no anyhow)
//! - Carry the offending offsets/handles so callers can report them
//! - Missing per-range metadata is never an error (see zombie lines)

use crate::markup::RangeHandle;
use thiserror::Error;

/// Main error type for sticky-lines operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StickyLinesError {
    /// Range whose start is not strictly before its end
    #[error("Invalid range: start {start} must be less than end {end}")]
    InvalidRange { start: usize, end: usize },

    /// Offset past the end of the document
    #[error("Position out of bounds: {position} (document length: {length})")]
    PositionOutOfBounds { position: usize, length: usize },

    /// Offset that splits a UTF-8 encoded character
    #[error("Position {position} is not on a character boundary")]
    NotCharBoundary { position: usize },

    /// Sticky line that is not (or no longer) registered
    #[error("Sticky line not found: {handle}")]
    StickyLineNotFound { handle: RangeHandle },

    /// Manager refused to create another per-document registry
    #[error("Document limit exceeded: {current}/{limit} documents")]
    DocumentLimitExceeded { current: usize, limit: usize },
}

impl StickyLinesError {
    /// Create an invalid range error
    #[must_use]
    pub const fn invalid_range(start: usize, end: usize) -> Self {
        Self::InvalidRange { start, end }
    }

    /// Check if error is recoverable by fixing the call's input
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        match self {
            Self::InvalidRange { .. }
            | Self::PositionOutOfBounds { .. }
            | Self::NotCharBoundary { .. }
            | Self::StickyLineNotFound { .. } => true,
            Self::DocumentLimitExceeded { .. } => false,
        }
    }

    /// Check if this is a position-related error
    #[must_use]
    pub const fn is_position_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidRange { .. }
                | Self::PositionOutOfBounds { .. }
                | Self::NotCharBoundary { .. }
        )
    }
}

/// Result type alias for sticky-lines operations
pub type Result<T> = core::result::Result<T, StickyLinesError>;
