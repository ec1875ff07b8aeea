//! Per-document sticky lines registry
//!
//! `StickyLinesModel` mediates every creation, removal and query of sticky
//! lines against a document's `RangeStore`. The store owns the ranges and
//! keeps them anchored through edits; the registry owns the side table that
//! records which producer registered each range.

use super::line::StickyLine;
use crate::core::{Result, StickyLinesError};
use crate::events::{ListenerList, ListenerStats, SharedListener};
use crate::markup::{MarkerKey, MarkupModel, RangeHandle, RangeStore};
use crate::utils::hashers::{create_hash_map, FastHashMap};
use core::fmt;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{debug, trace, warn};

/// Marker attached to every range created by a sticky-lines registry
pub const STICKY_LINE_MARKER: MarkerKey = MarkerKey::new("STICKY_LINE_MARKER");

/// What the registry knows about one of its ranges
#[derive(Debug, Clone, PartialEq, Eq)]
struct LineMetadata {
    /// Producer that registered the line
    source: String,
    /// Diagnostic label given at registration
    debug_text: Option<String>,
}

/// Registry of the sticky lines of one document
///
/// Obtained through `StickyLinesManager::get_or_create`, which keeps at most
/// one registry per document. All calls are expected on one thread; the type
/// is `!Send`.
pub struct StickyLinesModel<S: RangeStore = MarkupModel> {
    /// Anchored ranges of the document, shared with whoever edits it
    store: Rc<RefCell<S>>,

    /// Side table from range handle to registration metadata
    lines: FastHashMap<RangeHandle, LineMetadata>,

    /// Listeners told about changes on `notify_listeners`
    listeners: ListenerList,

    /// Set by the first `is_first_update` call
    first_update_consumed: bool,
}

impl<S: RangeStore> fmt::Debug for StickyLinesModel<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StickyLinesModel")
            .field(
                "document_id",
                &self.store.try_borrow().map(|store| store.document_id().to_owned()).ok(),
            )
            .field("lines", &self.lines.len())
            .field("listeners", &self.listeners)
            .field("first_update_consumed", &self.first_update_consumed)
            .finish_non_exhaustive()
    }
}

impl<S: RangeStore> StickyLinesModel<S> {
    pub(crate) fn new(store: Rc<RefCell<S>>) -> Self {
        Self {
            store,
            lines: create_hash_map(),
            listeners: ListenerList::new(),
            first_update_consumed: false,
        }
    }

    /// Identifier of the document this registry belongs to
    #[must_use]
    pub fn document_id(&self) -> String {
        self.store.borrow().document_id().to_owned()
    }

    /// The range store the registry works against
    #[must_use]
    pub fn store(&self) -> &Rc<RefCell<S>> {
        &self.store
    }

    /// Returns `true` on the first call for this registry, `false` after
    ///
    /// Lets a producer tell the initial population of a document apart from
    /// incremental updates.
    pub fn is_first_update(&mut self) -> bool {
        let first = !self.first_update_consumed;
        self.first_update_consumed = true;
        first
    }

    /// Register a sticky line over `[start, end)` on behalf of `source`
    ///
    /// Identical ranges are never merged, whether they come from the same
    /// source or from different ones.
    ///
    /// # Errors
    /// Returns `InvalidRange` if `start >= end`, and whatever error the range
    /// store reports for offsets it cannot anchor.
    pub fn add_sticky_line(
        &mut self,
        source: &str,
        start: usize,
        end: usize,
        debug_text: Option<&str>,
    ) -> Result<StickyLine> {
        if start >= end {
            return Err(StickyLinesError::invalid_range(start, end));
        }

        let mut store = self.store.borrow_mut();
        let handle = store.create_range(STICKY_LINE_MARKER, start, end)?;
        let anchored = store
            .range_of(handle)
            .ok_or(StickyLinesError::StickyLineNotFound { handle })?;

        let debug_text = debug_text.map(str::to_owned);
        let line = StickyLine::from_anchored(&*store, &anchored, debug_text.clone());
        self.lines.insert(
            handle,
            LineMetadata {
                source: source.to_owned(),
                debug_text,
            },
        );

        debug!(source, start, end, %handle, "sticky line added");
        Ok(line)
    }

    /// Remove a sticky line and release its anchored range
    ///
    /// # Errors
    /// Returns `StickyLineNotFound` if the line was already removed or does
    /// not belong to this registry's document.
    pub fn remove_sticky_line(&mut self, line: &StickyLine) -> Result<()> {
        let handle = line.handle();
        let mut store = self.store.borrow_mut();
        if line.document_id() != store.document_id() {
            return Err(StickyLinesError::StickyLineNotFound { handle });
        }

        let metadata = self.lines.remove(&handle);
        let is_sticky = store
            .range_of(handle)
            .is_some_and(|anchored| anchored.marker == STICKY_LINE_MARKER);
        let deleted = is_sticky && store.delete_range(handle);

        if !deleted && metadata.is_none() {
            return Err(StickyLinesError::StickyLineNotFound { handle });
        }

        debug!(
            source = metadata.as_ref().map(|m| m.source.as_str()),
            %handle,
            "sticky line removed"
        );
        Ok(())
    }

    /// Visit sticky lines overlapping `[0, limit)`
    ///
    /// Only lines registered by `source` are visited, or every line when
    /// `source` is `None`. Lines come in ascending start order, outer scopes
    /// first. The walk stops when `visit` returns `false`, in which case this
    /// returns `false` too.
    ///
    /// Matching lines are collected before the first visit, so `visit` may
    /// borrow the store mutably, e.g. to edit the document. A marked range
    /// the registry has no metadata for is reported as a placeholder labelled
    /// `StickyZombie`, for `None` only.
    pub fn process_sticky_lines<F>(&self, source: Option<&str>, limit: usize, visit: F) -> bool
    where
        F: FnMut(&StickyLine) -> bool,
    {
        let matched = self.collect_lines(source, limit);
        trace!(source, limit, matched = matched.len(), "processing sticky lines");

        matched.iter().all(visit)
    }

    /// Visit the lines of `source` over the whole document
    pub fn process_sticky_lines_for<F>(&self, source: Option<&str>, visit: F) -> bool
    where
        F: FnMut(&StickyLine) -> bool,
    {
        let limit = self.store.borrow().document_length();
        self.process_sticky_lines(source, limit, visit)
    }

    /// Visit the lines of every source overlapping `[0, limit)`
    pub fn process_all_sticky_lines<F>(&self, limit: usize, visit: F) -> bool
    where
        F: FnMut(&StickyLine) -> bool,
    {
        self.process_sticky_lines(None, limit, visit)
    }

    /// All lines of `source` (or every source) over the whole document
    #[must_use]
    pub fn sticky_lines(&self, source: Option<&str>) -> Vec<StickyLine> {
        let limit = self.store.borrow().document_length();
        self.collect_lines(source, limit)
    }

    fn collect_lines(&self, source: Option<&str>, limit: usize) -> Vec<StickyLine> {
        let store = self.store.borrow();
        let mut matched = Vec::new();

        store.for_each_overlapping(0, limit, &mut |anchored| {
            if anchored.marker != STICKY_LINE_MARKER {
                return true;
            }
            match (self.lines.get(&anchored.handle), source) {
                (Some(metadata), Some(wanted)) if wanted != metadata.source => {}
                (Some(metadata), _) => matched.push(StickyLine::from_anchored(
                    &*store,
                    anchored,
                    metadata.debug_text.clone(),
                )),
                (None, None) => {
                    warn!(handle = %anchored.handle, range = %anchored.range, "sticky range without metadata");
                    matched.push(StickyLine::zombie(&*store, anchored));
                }
                (None, Some(_)) => {}
            }
            true
        });

        // stores promise this order already; the sort keeps it for any store
        matched.sort();
        matched
    }

    /// Source a line was registered by, `None` for unknown or zombie lines
    #[must_use]
    pub fn source_of(&self, line: &StickyLine) -> Option<&str> {
        if !self.owns(line) {
            return None;
        }
        self.lines
            .get(&line.handle())
            .map(|metadata| metadata.source.as_str())
    }

    /// Re-read a line from its anchored range
    ///
    /// Returns `None` once the range is gone, e.g. removed or dropped by the
    /// store after its text was deleted, and for lines of other documents.
    #[must_use]
    pub fn resolve(&self, line: &StickyLine) -> Option<StickyLine> {
        let store = self.store.borrow();
        if line.document_id() != store.document_id() {
            return None;
        }
        store
            .range_of(line.handle())
            .filter(|anchored| anchored.marker == STICKY_LINE_MARKER)
            .map(|anchored| {
                StickyLine::from_anchored(&*store, &anchored, line.debug_text().map(str::to_owned))
            })
    }

    fn owns(&self, line: &StickyLine) -> bool {
        self.store.borrow().document_id() == line.document_id()
    }

    /// Remove every line registered by `source`, returning how many went
    ///
    /// Metadata of ranges the store dropped on its own is pruned on the way,
    /// so a producer replacing its pass keeps the side table bounded.
    pub fn remove_sticky_lines_from(&mut self, source: &str) -> usize {
        self.prune_stale();

        let handles: Vec<RangeHandle> = self
            .lines
            .iter()
            .filter(|(_, metadata)| metadata.source == source)
            .map(|(handle, _)| *handle)
            .collect();

        let mut store = self.store.borrow_mut();
        for handle in &handles {
            self.lines.remove(handle);
            store.delete_range(*handle);
        }

        debug!(source, removed = handles.len(), "sticky lines removed for source");
        handles.len()
    }

    /// Release the ranges of every registered line and forget them
    ///
    /// Called when the document's registry is closed, so a registry created
    /// later for the same store does not see the old ranges as zombies.
    /// Returns the number of ranges released.
    pub(crate) fn release_all(&mut self) -> usize {
        let Ok(mut store) = self.store.try_borrow_mut() else {
            warn!(lines = self.lines.len(), "store busy, sticky line ranges not released");
            return 0;
        };

        let released = self
            .lines
            .drain()
            .filter(|(handle, _)| store.delete_range(*handle))
            .count();

        debug!(doc_id = %store.document_id(), released, "sticky line ranges released");
        released
    }

    /// Number of registered lines whose ranges are still alive
    #[must_use]
    pub fn len(&self) -> usize {
        let store = self.store.borrow();
        self.lines
            .keys()
            .filter(|handle| store.range_of(**handle).is_some())
            .count()
    }

    /// Check if no registered line is alive
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Forget metadata of ranges the store dropped on its own
    ///
    /// Returns the number of entries removed.
    pub fn prune_stale(&mut self) -> usize {
        let store = self.store.borrow();
        let before = self.lines.len();
        self.lines
            .retain(|handle, _| store.range_of(*handle).is_some());
        let pruned = before - self.lines.len();

        if pruned > 0 {
            trace!(pruned, "stale sticky line metadata pruned");
        }
        pruned
    }

    /// Register a listener; adding it twice makes it fire twice
    pub fn add_listener(&mut self, listener: SharedListener) {
        self.listeners.add(listener);
    }

    /// Unregister the first registration of `listener`
    pub fn remove_listener(&mut self, listener: &SharedListener) -> bool {
        self.listeners.remove(listener)
    }

    /// Number of listener registrations
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Tell every listener the registry changed
    ///
    /// Callers invoke this once after a batch of additions/removals.
    pub fn notify_listeners(&self) {
        self.listeners.notify();
    }

    /// Listener notification statistics
    #[must_use]
    pub fn listener_stats(&self) -> ListenerStats {
        self.listeners.stats()
    }
}
