//! Per-document registry of sticky lines
//!
//! `sticky-lines` keeps track of the ranges an editor pins to the top of the
//! viewport while scrolling: each sticky line covers a text range whose first
//! line (for example a function signature) stays visible until the line
//! holding the end of the range scrolls away.
//!
//! # Features
//!
//! - **Anchored ranges**: lines live on a `RangeStore` that moves them as the
//!   document is edited; `MarkupModel` is a rope-backed store
//! - **Independent producers**: every line is tagged with the source that
//!   registered it, so producers query and replace only their own lines
//! - **Ordered overlap queries**: lines are visited by ascending start with
//!   enclosing scopes before nested ones, with early exit
//! - **Change notification**: listeners are told about a batch of changes
//!   when the producer asks for it
//! - **Explicit ownership**: `StickyLinesManager` holds one registry per open
//!   document and forgets it when the document closes
//!
//! # Example
//!
//! ```
//! use sticky_lines::{MarkupModel, StickyLinesManager};
//!
//! let document = MarkupModel::from_text(
//!     "impl Foo {\n    fn bar() {\n        baz();\n    }\n}\n",
//! )
//! .into_shared();
//!
//! let mut manager = StickyLinesManager::new();
//! let registry = manager.get_or_create(&document)?;
//!
//! {
//!     let mut registry = registry.borrow_mut();
//!     registry.add_sticky_line("rust", 0, 47, Some("impl Foo"))?;
//!     registry.add_sticky_line("rust", 15, 45, Some("fn bar"))?;
//!     registry.notify_listeners();
//! }
//!
//! // Edits move the lines along with their text
//! document.borrow_mut().insert(0, "// header\n")?;
//!
//! let lines = registry.borrow().sticky_lines(Some("rust"));
//! assert_eq!(lines[0].to_string(), "impl Foo(1, 5)");
//! assert_eq!(lines[1].to_string(), "fn bar(2, 4)");
//! # Ok::<(), sticky_lines::StickyLinesError>(())
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(unsafe_code)]

pub mod core;
pub mod events;
pub mod markup;
pub mod sessions;
pub mod sticky;
pub mod utils;

// Public API exports
pub use crate::core::{Result, StickyLinesError, TextRange};
pub use events::{ListenerList, ListenerStats, SharedListener, StickyLinesListener};
pub use markup::{AnchoredRange, MarkerKey, MarkupModel, RangeHandle, RangeStore};
pub use sessions::{ManagerConfig, StickyLinesManager};
pub use sticky::{
    SharedStickyLinesModel, StickyLine, StickyLinesModel, STICKY_LINE_MARKER, ZOMBIE_DEBUG_TEXT,
};
