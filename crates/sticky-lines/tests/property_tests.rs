//! Property-based tests for sticky-lines
//!
//! Uses proptest to check registry ordering, filtering and anchoring
//! across arbitrary documents, registrations and edits.

use proptest::prelude::*;
use std::rc::Rc;
use sticky_lines::{MarkupModel, SharedStickyLinesModel, StickyLine, StickyLinesManager, StickyLinesModel};

/// Generate document text of plain ASCII lines
fn arb_document() -> impl Strategy<Value = String> {
    prop::collection::vec("[a-z {}();]{0,30}", 1..20).prop_map(|lines| lines.join("\n"))
}

/// Generate raw registrations: source index and two offset seeds
fn arb_registrations() -> impl Strategy<Value = Vec<(usize, usize, usize)>> {
    prop::collection::vec((0..3usize, any::<usize>(), any::<usize>()), 0..30)
}

const SOURCES: [&str; 3] = ["syntax", "lsp", "folding"];

/// Register every seed that maps to a non-empty range
fn register(
    registry: &mut StickyLinesModel,
    length: usize,
    seeds: &[(usize, usize, usize)],
) -> sticky_lines::Result<Vec<StickyLine>> {
    let mut added = Vec::new();
    if length == 0 {
        return Ok(added);
    }
    for &(source, a, b) in seeds {
        let (start, end) = (a % (length + 1), b % (length + 1));
        let (start, end) = (start.min(end), start.max(end));
        if start < end {
            added.push(registry.add_sticky_line(SOURCES[source], start, end, None)?);
        }
    }
    Ok(added)
}

fn open(text: &str) -> SharedStickyLinesModel {
    let document = MarkupModel::from_text(text).into_shared();
    let mut manager = StickyLinesManager::new();
    match manager.get_or_create(&document) {
        Ok(registry) => registry,
        Err(err) => panic!("registry creation failed: {err}"),
    }
}

proptest! {
    /// Every registered line is reported once, outer scopes first
    #[test]
    fn test_query_is_ordered_and_complete(
        text in arb_document(),
        seeds in arb_registrations(),
    ) {
        let registry = open(&text);
        let added = register(&mut registry.borrow_mut(), text.len(), &seeds)?;

        let lines = registry.borrow().sticky_lines(None);
        prop_assert_eq!(lines.len(), added.len());
        for pair in lines.windows(2) {
            let (a, b) = (pair[0].text_range(), pair[1].text_range());
            prop_assert!(a.start < b.start || (a.start == b.start && a.end >= b.end));
        }
    }

    /// Per-source queries partition the unfiltered query
    #[test]
    fn test_sources_partition_lines(
        text in arb_document(),
        seeds in arb_registrations(),
    ) {
        let registry = open(&text);
        register(&mut registry.borrow_mut(), text.len(), &seeds)?;

        let registry = registry.borrow();
        let total: usize = SOURCES
            .iter()
            .map(|source| registry.sticky_lines(Some(*source)).len())
            .sum();
        prop_assert_eq!(total, registry.sticky_lines(None).len());

        for source in SOURCES {
            for line in registry.sticky_lines(Some(source)) {
                prop_assert_eq!(registry.source_of(&line), Some(source));
            }
        }
    }

    /// Only lines starting at or before the limit are visited
    #[test]
    fn test_limit_bounds_visited_lines(
        text in arb_document(),
        seeds in arb_registrations(),
        limit_seed in any::<usize>(),
    ) {
        let registry = open(&text);
        register(&mut registry.borrow_mut(), text.len(), &seeds)?;
        let limit = limit_seed % (text.len() + 1);

        let mut starts = Vec::new();
        registry.borrow().process_all_sticky_lines(limit, |line| {
            starts.push(line.text_range().start);
            true
        });
        prop_assert!(starts.iter().all(|start| *start <= limit));

        let expected = registry
            .borrow()
            .sticky_lines(None)
            .iter()
            .filter(|line| line.text_range().start <= limit)
            .count();
        prop_assert_eq!(starts.len(), expected);
    }

    /// Inserted text never breaks anchoring or line derivation
    #[test]
    fn test_lines_stay_anchored_through_inserts(
        text in arb_document(),
        seeds in arb_registrations(),
        inserts in prop::collection::vec((any::<usize>(), "[a-z\n]{1,10}"), 1..10),
    ) {
        let registry = open(&text);
        let added = register(&mut registry.borrow_mut(), text.len(), &seeds)?;
        let document = Rc::clone(registry.borrow().store());

        for (offset_seed, insert) in &inserts {
            let length = document.borrow().len_bytes();
            document.borrow_mut().insert(offset_seed % (length + 1), insert)?;
        }

        let registry = registry.borrow();
        let length = document.borrow().len_bytes();
        prop_assert_eq!(registry.len(), added.len());
        for line in registry.sticky_lines(None) {
            let range = line.text_range();
            prop_assert!(range.start < range.end);
            prop_assert!(range.end <= length);
            prop_assert!(line.primary_line() <= line.scope_line());
        }
    }

    /// Removing lines leaves exactly the others
    #[test]
    fn test_remove_leaves_the_rest(
        text in arb_document(),
        seeds in arb_registrations(),
        keep in prop::collection::vec(any::<bool>(), 30),
    ) {
        let registry = open(&text);
        let added = register(&mut registry.borrow_mut(), text.len(), &seeds)?;

        let mut kept = 0;
        for (line, keep) in added.iter().zip(&keep) {
            if *keep {
                kept += 1;
            } else {
                registry.borrow_mut().remove_sticky_line(line)?;
            }
        }

        prop_assert_eq!(registry.borrow().sticky_lines(None).len(), kept);
        prop_assert_eq!(registry.borrow().len(), kept);
    }
}
