//! Anchored range storage for documents
//!
//! The `RangeStore` trait is everything the sticky-lines registry needs from
//! the component that keeps ranges attached to text while it is edited.
//! `MarkupModel` is a rope-backed implementation of it.

pub mod model;

pub use model::MarkupModel;

use crate::core::{Result, TextRange};
use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Stable identifier of one anchored range inside a store
///
/// Handles are never reused by a store, so a handle whose range was deleted
/// stays dangling instead of silently pointing at a newer range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RangeHandle(u64);

impl RangeHandle {
    /// Create a handle from a raw id
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Raw id of this handle
    #[must_use]
    pub const fn id(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RangeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Marker attribute attached to a range when it is created
///
/// Lets several producers share one store and pick out their own ranges
/// during overlap queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MarkerKey(&'static str);

impl MarkerKey {
    /// Create a marker with the given name
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    /// Name of the marker
    #[must_use]
    pub const fn name(self) -> &'static str {
        self.0
    }
}

impl fmt::Display for MarkerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// One anchored range as currently positioned in its store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnchoredRange {
    /// Handle of the range
    pub handle: RangeHandle,
    /// Current offsets of the range
    pub range: TextRange,
    /// Marker the range was created with
    pub marker: MarkerKey,
}

/// Storage of anchored ranges over a single document
///
/// Implementations own the ranges, move them as the document is edited and
/// answer overlap queries. Callers only ever hold `RangeHandle`s.
pub trait RangeStore {
    /// Identifier of the document the ranges belong to
    fn document_id(&self) -> &str;

    /// Length of the document in bytes
    fn document_length(&self) -> usize;

    /// 0-based line containing `offset`
    ///
    /// Offsets past the end resolve to the last line.
    fn line_number_of(&self, offset: usize) -> usize;

    /// Create an anchored range over `[start, end)`
    ///
    /// # Errors
    /// Returns an error if the offsets do not describe a valid range of the
    /// current document.
    fn create_range(&mut self, marker: MarkerKey, start: usize, end: usize)
        -> Result<RangeHandle>;

    /// Delete a range, returning whether it existed
    fn delete_range(&mut self, handle: RangeHandle) -> bool;

    /// Current position of a range, `None` once it is gone
    fn range_of(&self, handle: RangeHandle) -> Option<AnchoredRange>;

    /// Visit every range overlapping `[start, end)` in ascending start order
    ///
    /// Ranges that only touch the query at an endpoint are visited too, so a
    /// query over `[0, limit)` reports ranges starting at `limit`. Ranges
    /// with equal starts are visited outermost first. The walk stops
    /// as soon as `visit` returns `false`; the return value is `false`
    /// exactly when that happened.
    fn for_each_overlapping(
        &self,
        start: usize,
        end: usize,
        visit: &mut dyn FnMut(&AnchoredRange) -> bool,
    ) -> bool;
}
