//! Offset range type shared by the registry and the markup model
//!
//! Offsets are byte offsets into the document text. A `TextRange` is
//! half-open: `start` is inclusive and `end` exclusive.

use crate::core::errors::{Result, StickyLinesError};
use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A half-open range `[start, end)` of byte offsets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TextRange {
    /// Start offset (inclusive)
    pub start: usize,
    /// End offset (exclusive)
    pub end: usize,
}

impl TextRange {
    /// Create a new range
    ///
    /// # Errors
    /// Returns `InvalidRange` if `start > end`
    pub const fn new(start: usize, end: usize) -> Result<Self> {
        if start > end {
            return Err(StickyLinesError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Check if range is empty (start == end)
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Get the length of the range in bytes
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Check if `other` lies entirely inside this range
    #[must_use]
    pub const fn covers(&self, other: &Self) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

impl fmt::Display for TextRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}
