//! Rope-backed markup model
//!
//! Provides `MarkupModel`, a document text held in a `ropey::Rope` together
//! with the anchored ranges attached to it. Edits go through the model so
//! every range can be moved along with the text it covers.

use super::{AnchoredRange, MarkerKey, RangeHandle, RangeStore};
use crate::core::{Result, StickyLinesError, TextRange};
use core::cmp::Reverse;
use ropey::Rope;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::trace;

static NEXT_DOCUMENT_ID: AtomicU64 = AtomicU64::new(1);

/// Document text plus the anchored ranges over it
///
/// Range semantics on edits:
/// - text inserted at or before a range's start pushes the whole range right
/// - text inserted strictly inside a range grows it
/// - text inserted exactly at a range's end is not absorbed
/// - deleted offsets collapse onto the start of the deletion, and a
///   non-empty range wholly covered by a deletion is dropped
#[derive(Debug)]
pub struct MarkupModel {
    /// Document identifier used to key per-document state
    id: String,

    /// Document text
    text: Rope,

    /// Ranges sorted by start ascending, end descending, then handle
    ranges: Vec<AnchoredRange>,

    /// Next raw handle id, never reused
    next_handle: u64,
}

impl MarkupModel {
    /// Create an empty document
    #[must_use]
    pub fn new() -> Self {
        Self::from_text("")
    }

    /// Create a document holding `text` with a generated id
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        Self::with_id(Self::generate_id(), text)
    }

    /// Create a document with a specific id
    #[must_use]
    pub fn with_id(id: impl Into<String>, text: &str) -> Self {
        Self {
            id: id.into(),
            text: Rope::from_str(text),
            ranges: Vec::new(),
            next_handle: 0,
        }
    }

    /// Wrap the model for sharing between an editor and its registries
    #[must_use]
    pub fn into_shared(self) -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(self))
    }

    fn generate_id() -> String {
        let n = NEXT_DOCUMENT_ID.fetch_add(1, Ordering::Relaxed);
        format!("doc_{n}")
    }

    /// Document identifier
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Get text content as string
    #[must_use]
    pub fn text(&self) -> String {
        self.text.to_string()
    }

    /// Get total length in bytes
    #[must_use]
    pub fn len_bytes(&self) -> usize {
        self.text.len_bytes()
    }

    /// Check if document text is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.len_bytes() == 0
    }

    /// Number of live anchored ranges
    #[must_use]
    pub fn range_count(&self) -> usize {
        self.ranges.len()
    }

    /// Insert text at a byte offset, moving ranges after it
    ///
    /// # Errors
    /// Returns an error if `offset` is past the end or not on a character
    /// boundary.
    pub fn insert(&mut self, offset: usize, text: &str) -> Result<()> {
        let char_idx = self.char_index(offset)?;
        if text.is_empty() {
            return Ok(());
        }

        self.text.insert(char_idx, text);

        let len = text.len();
        for anchored in &mut self.ranges {
            let range = &mut anchored.range;
            if range.start >= offset {
                range.start += len;
            }
            if range.end > offset {
                range.end += len;
            }
            // an empty range at the insertion point travels with its start
            range.end = range.end.max(range.start);
        }
        self.sort_ranges();

        trace!(doc_id = %self.id, offset, len, "markup insert");
        Ok(())
    }

    /// Delete the text in `[start, end)`, collapsing ranges inside it
    ///
    /// # Errors
    /// Returns an error if the offsets do not describe a valid range of the
    /// document.
    pub fn delete(&mut self, start: usize, end: usize) -> Result<()> {
        let deleted = TextRange::new(start, end)?;
        let start_char = self.char_index(start)?;
        let end_char = self.char_index(end)?;
        if deleted.is_empty() {
            return Ok(());
        }

        self.text.remove(start_char..end_char);

        let before = self.ranges.len();
        self.ranges
            .retain(|anchored| anchored.range.is_empty() || !deleted.covers(&anchored.range));

        let shift = |offset: usize| {
            if offset <= deleted.start {
                offset
            } else if offset >= deleted.end {
                offset - deleted.len()
            } else {
                deleted.start
            }
        };
        for anchored in &mut self.ranges {
            anchored.range.start = shift(anchored.range.start);
            anchored.range.end = shift(anchored.range.end);
        }
        self.sort_ranges();

        trace!(
            doc_id = %self.id,
            start,
            end,
            dropped = before - self.ranges.len(),
            "markup delete"
        );
        Ok(())
    }

    /// Replace the text in `[start, end)` with `text`
    ///
    /// # Errors
    /// Returns an error if the offsets do not describe a valid range of the
    /// document.
    pub fn replace(&mut self, start: usize, end: usize, text: &str) -> Result<()> {
        self.delete(start, end)?;
        self.insert(start, text)
    }

    /// Convert a byte offset to a char index, validating it on the way
    fn char_index(&self, offset: usize) -> Result<usize> {
        let length = self.text.len_bytes();
        if offset > length {
            return Err(StickyLinesError::PositionOutOfBounds {
                position: offset,
                length,
            });
        }

        let char_idx = self.text.byte_to_char(offset);
        if self.text.char_to_byte(char_idx) != offset {
            return Err(StickyLinesError::NotCharBoundary { position: offset });
        }
        Ok(char_idx)
    }

    fn sort_ranges(&mut self) {
        self.ranges.sort_by_key(order_key);
    }
}

impl Default for MarkupModel {
    fn default() -> Self {
        Self::new()
    }
}

fn order_key(anchored: &AnchoredRange) -> (usize, Reverse<usize>, RangeHandle) {
    (
        anchored.range.start,
        Reverse(anchored.range.end),
        anchored.handle,
    )
}

impl RangeStore for MarkupModel {
    fn document_id(&self) -> &str {
        &self.id
    }

    fn document_length(&self) -> usize {
        self.text.len_bytes()
    }

    fn line_number_of(&self, offset: usize) -> usize {
        self.text.byte_to_line(offset.min(self.text.len_bytes()))
    }

    fn create_range(
        &mut self,
        marker: MarkerKey,
        start: usize,
        end: usize,
    ) -> Result<RangeHandle> {
        let range = TextRange::new(start, end)?;
        self.char_index(start)?;
        self.char_index(end)?;

        let handle = RangeHandle::new(self.next_handle);
        self.next_handle += 1;

        let anchored = AnchoredRange {
            handle,
            range,
            marker,
        };
        let key = order_key(&anchored);
        let index = self.ranges.partition_point(|other| order_key(other) < key);
        self.ranges.insert(index, anchored);

        Ok(handle)
    }

    fn delete_range(&mut self, handle: RangeHandle) -> bool {
        if let Some(index) = self.ranges.iter().position(|r| r.handle == handle) {
            self.ranges.remove(index);
            true
        } else {
            false
        }
    }

    fn range_of(&self, handle: RangeHandle) -> Option<AnchoredRange> {
        self.ranges.iter().find(|r| r.handle == handle).copied()
    }

    fn for_each_overlapping(
        &self,
        start: usize,
        end: usize,
        visit: &mut dyn FnMut(&AnchoredRange) -> bool,
    ) -> bool {
        let upper = self.ranges.partition_point(|r| r.range.start <= end);
        for anchored in &self.ranges[..upper] {
            if anchored.range.end >= start && !visit(anchored) {
                return false;
            }
        }
        true
    }
}
