//! Sticky lines and their per-document registry
//!
//! - `StickyLine`: value view of one registered range
//! - `StickyLinesModel`: registry mediating all access to a document's lines

pub mod line;
pub mod model;

pub use line::{StickyLine, ZOMBIE_DEBUG_TEXT};
pub use model::{StickyLinesModel, STICKY_LINE_MARKER};

use crate::markup::MarkupModel;
use std::cell::RefCell;
use std::rc::Rc;

/// Registry handle shared by every component working on the same document
pub type SharedStickyLinesModel<S = MarkupModel> = Rc<RefCell<StickyLinesModel<S>>>;
