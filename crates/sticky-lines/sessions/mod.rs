//! Per-document registry management
//!
//! Provides `StickyLinesManager`, the owner of every open document's
//! sticky-lines registry. Registries are created lazily on first access and
//! dropped explicitly when their document closes.

use crate::core::{Result, StickyLinesError};
use crate::markup::{MarkupModel, RangeStore};
use crate::sticky::{SharedStickyLinesModel, StickyLinesModel};
use crate::utils::hashers::{create_hash_map, FastHashMap};
use core::fmt;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{debug, warn};

/// Configuration for registry management
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagerConfig {
    /// Maximum number of documents with a live registry
    pub max_documents: usize,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self { max_documents: 256 }
    }
}

/// Owner of the sticky-lines registries of open documents
///
/// Holds at most one registry per document id. Whatever component tracks
/// document lifetimes calls `close_document` when a document goes away.
pub struct StickyLinesManager<S: RangeStore = MarkupModel> {
    /// Configuration for this manager
    config: ManagerConfig,

    /// Registries keyed by document id
    models: FastHashMap<String, SharedStickyLinesModel<S>>,
}

impl<S: RangeStore> fmt::Debug for StickyLinesManager<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StickyLinesManager")
            .field("config", &self.config)
            .field("documents", &self.document_ids())
            .finish()
    }
}

impl<S: RangeStore> Default for StickyLinesManager<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: RangeStore> StickyLinesManager<S> {
    /// Create a manager with default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(ManagerConfig::default())
    }

    /// Create a manager with custom configuration
    #[must_use]
    pub fn with_config(config: ManagerConfig) -> Self {
        Self {
            config,
            models: create_hash_map(),
        }
    }

    /// Get the configuration
    #[must_use]
    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    /// Registry of the document behind `store`, created on first access
    ///
    /// Documents are identified by `RangeStore::document_id`; a later call
    /// with another store reporting the same id gets the cached registry.
    ///
    /// # Errors
    /// Returns `DocumentLimitExceeded` if a new registry is needed while
    /// `max_documents` registries are already alive.
    pub fn get_or_create(&mut self, store: &Rc<RefCell<S>>) -> Result<SharedStickyLinesModel<S>> {
        let document_id = store.borrow().document_id().to_owned();

        if let Some(model) = self.models.get(&document_id) {
            if model
                .try_borrow()
                .is_ok_and(|model| !Rc::ptr_eq(model.store(), store))
            {
                warn!(doc_id = %document_id, "registry requested through a different store");
            }
            return Ok(Rc::clone(model));
        }

        if self.models.len() >= self.config.max_documents {
            return Err(StickyLinesError::DocumentLimitExceeded {
                current: self.models.len(),
                limit: self.config.max_documents,
            });
        }

        let model = Rc::new(RefCell::new(StickyLinesModel::new(Rc::clone(store))));
        self.models.insert(document_id.clone(), Rc::clone(&model));

        debug!(doc_id = %document_id, documents = self.models.len(), "sticky lines registry created");
        Ok(model)
    }

    /// Registry of a document if one was created
    #[must_use]
    pub fn get(&self, document_id: &str) -> Option<SharedStickyLinesModel<S>> {
        self.models.get(document_id).cloned()
    }

    /// Drop the registry of a closed document
    ///
    /// The ranges of its lines are released from the store, so a registry
    /// created later for the same store starts empty. Returns whether the
    /// document had a registry. Callers still holding the registry keep it
    /// alive, but it is no longer handed out.
    pub fn close_document(&mut self, document_id: &str) -> bool {
        let Some(model) = self.models.remove(document_id) else {
            return false;
        };

        let released = match model.try_borrow_mut() {
            Ok(mut model) => model.release_all(),
            Err(_) => {
                warn!(doc_id = %document_id, "registry busy, sticky line ranges not released");
                0
            }
        };

        debug!(doc_id = %document_id, released, "sticky lines registry closed");
        true
    }

    /// Number of documents with a registry
    #[must_use]
    pub fn len(&self) -> usize {
        self.models.len()
    }

    /// Check if no document has a registry
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Ids of documents with a registry, sorted
    #[must_use]
    pub fn document_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.models.keys().cloned().collect();
        ids.sort();
        ids
    }
}
