//! The `StickyLine` value type
//!
//! A sticky line is a view of one anchored range: its offsets, the line the
//! range starts on (the line to pin) and the line it ends on (the end of the
//! scope the pinned line introduces).

use crate::core::TextRange;
use crate::markup::{AnchoredRange, RangeHandle, RangeStore};
use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Debug label given to placeholder lines synthesized for marked ranges that
/// have no registry metadata
pub const ZOMBIE_DEBUG_TEXT: &str = "StickyZombie";

/// A registered sticky line, as positioned when it was read
///
/// Equality and hashing only look at the text range, not the document or
/// handle. Ordering is ascending by start offset, and descending by end
/// offset for equal starts, so an enclosing scope sorts before the scopes
/// nested in it.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StickyLine {
    document_id: String,
    handle: RangeHandle,
    text_range: TextRange,
    primary_line: usize,
    scope_line: usize,
    debug_text: Option<String>,
}

impl StickyLine {
    pub(crate) fn from_anchored<S: RangeStore + ?Sized>(
        store: &S,
        anchored: &AnchoredRange,
        debug_text: Option<String>,
    ) -> Self {
        Self {
            document_id: store.document_id().to_owned(),
            handle: anchored.handle,
            text_range: anchored.range,
            primary_line: store.line_number_of(anchored.range.start),
            scope_line: store.line_number_of(anchored.range.end),
            debug_text,
        }
    }

    pub(crate) fn zombie<S: RangeStore + ?Sized>(store: &S, anchored: &AnchoredRange) -> Self {
        Self::from_anchored(store, anchored, Some(ZOMBIE_DEBUG_TEXT.to_owned()))
    }

    /// Identifier of the document the line was read from
    #[must_use]
    pub fn document_id(&self) -> &str {
        &self.document_id
    }

    /// Handle of the backing anchored range
    #[must_use]
    pub const fn handle(&self) -> RangeHandle {
        self.handle
    }

    /// Offsets `[start, end)` of the backing range
    #[must_use]
    pub const fn text_range(&self) -> TextRange {
        self.text_range
    }

    /// 0-based line containing the start offset
    #[must_use]
    pub const fn primary_line(&self) -> usize {
        self.primary_line
    }

    /// 0-based line containing the end offset
    #[must_use]
    pub const fn scope_line(&self) -> usize {
        self.scope_line
    }

    /// Offset to move the caret to when the line is clicked
    #[must_use]
    pub const fn navigate_offset(&self) -> usize {
        self.text_range.start
    }

    /// Diagnostic label given at registration
    #[must_use]
    pub fn debug_text(&self) -> Option<&str> {
        self.debug_text.as_deref()
    }
}

impl PartialEq for StickyLine {
    fn eq(&self, other: &Self) -> bool {
        self.text_range == other.text_range
    }
}

impl Eq for StickyLine {}

impl Hash for StickyLine {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.text_range.hash(state);
    }
}

impl Ord for StickyLine {
    fn cmp(&self, other: &Self) -> Ordering {
        self.text_range
            .start
            .cmp(&other.text_range.start)
            .then_with(|| other.text_range.end.cmp(&self.text_range.end))
    }
}

impl PartialOrd for StickyLine {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for StickyLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}({}, {})",
            self.debug_text.as_deref().unwrap_or_default(),
            self.primary_line,
            self.scope_line
        )
    }
}
