//! Sticky lines following document edits
//!
//! Lines are anchored in the markup model, so inserts, deletes and replaces
//! made through the document move them without any registry call.

use pretty_assertions::assert_eq;
use sticky_lines::*;

const SOURCE: &str = "\
fn first() {
    one();
}

fn second() {
    two();
}
";

fn setup() -> (
    std::rc::Rc<std::cell::RefCell<MarkupModel>>,
    SharedStickyLinesModel,
    StickyLine,
    StickyLine,
) {
    let document = MarkupModel::with_id("edits.rs", SOURCE).into_shared();
    let mut manager = StickyLinesManager::new();
    let registry = manager.get_or_create(&document).unwrap();

    let first_end = SOURCE.find("}\n\n").unwrap();
    let second_start = SOURCE.find("fn second").unwrap();
    let second_end = SOURCE.len() - 1;

    let (first, second) = {
        let mut registry = registry.borrow_mut();
        (
            registry
                .add_sticky_line("rust", 0, first_end, Some("first"))
                .unwrap(),
            registry
                .add_sticky_line("rust", second_start, second_end, Some("second"))
                .unwrap(),
        )
    };
    (document, registry, first, second)
}

fn rendered(registry: &SharedStickyLinesModel) -> Vec<String> {
    registry
        .borrow()
        .sticky_lines(Some("rust"))
        .iter()
        .map(ToString::to_string)
        .collect()
}

#[test]
fn initial_lines() {
    let (_document, registry, first, second) = setup();
    assert_eq!(rendered(&registry), vec!["first(0, 2)", "second(4, 6)"]);
    assert_eq!(first.navigate_offset(), 0);
    assert_eq!(second.navigate_offset(), SOURCE.find("fn second").unwrap());
}

#[test]
fn insert_above_shifts_every_line() {
    let (document, registry, first, _second) = setup();
    document.borrow_mut().insert(0, "use std::fmt;\n\n").unwrap();

    assert_eq!(rendered(&registry), vec!["first(2, 4)", "second(6, 8)"]);

    // the snapshot keeps its old position, resolving reads the new one
    assert_eq!(first.text_range().start, 0);
    let resolved = registry.borrow().resolve(&first).unwrap();
    assert_eq!(resolved.text_range().start, 15);
    assert_eq!(resolved, registry.borrow().sticky_lines(None)[0]);
}

#[test]
fn insert_inside_grows_the_scope() {
    let (document, registry, _first, second) = setup();
    let body = SOURCE.find("two();").unwrap();
    document.borrow_mut().insert(body, "zero();\n    ").unwrap();

    assert_eq!(rendered(&registry), vec!["first(0, 2)", "second(4, 7)"]);
    let resolved = registry.borrow().resolve(&second).unwrap();
    assert_eq!(resolved.primary_line(), 4);
    assert_eq!(resolved.scope_line(), 7);
}

#[test]
fn deleting_a_whole_scope_drops_its_line() {
    let (document, registry, first, second) = setup();
    let second_start = SOURCE.find("fn second").unwrap();
    document.borrow_mut().delete(0, second_start).unwrap();

    assert!(registry.borrow().resolve(&first).is_none());
    assert_eq!(rendered(&registry), vec!["second(0, 2)"]);
    assert_eq!(registry.borrow().len(), 1);
    assert_eq!(registry.borrow_mut().prune_stale(), 1);

    // the metadata is gone, and so is the range
    assert!(matches!(
        registry.borrow_mut().remove_sticky_line(&first),
        Err(StickyLinesError::StickyLineNotFound { .. })
    ));
    registry.borrow_mut().remove_sticky_line(&second).unwrap();
    assert!(registry.borrow().is_empty());
}

#[test]
fn replace_keeps_the_enclosing_scope() {
    let (document, registry, first, _second) = setup();
    let call = SOURCE.find("one").unwrap();
    document
        .borrow_mut()
        .replace(call, call + 3, "something_longer")
        .unwrap();

    let resolved = registry.borrow().resolve(&first).unwrap();
    assert_eq!(resolved.text_range().start, 0);
    assert_eq!(
        resolved.text_range().end,
        SOURCE.find("}\n\n").unwrap() + "something_longer".len() - 3
    );
    assert_eq!(resolved.debug_text(), Some("first"));
}

#[test]
fn visitor_may_edit_the_document() {
    let (document, registry, _first, _second) = setup();

    let mut seen = Vec::new();
    let completed = registry.borrow().process_sticky_lines_for(None, |line| {
        seen.push(line.primary_line());
        document.borrow_mut().insert(0, "\n").is_ok()
    });

    assert!(completed);
    // the walk reports positions from before the edits
    assert_eq!(seen, vec![0, 4]);
    assert_eq!(rendered(&registry), vec!["first(2, 4)", "second(6, 8)"]);
}

#[test]
fn out_of_bounds_and_split_characters_are_rejected() {
    let document = MarkupModel::from_text("fn é() {}").into_shared();
    let mut manager = StickyLinesManager::new();
    let registry = manager.get_or_create(&document).unwrap();

    let mut registry = registry.borrow_mut();
    assert_eq!(
        registry.add_sticky_line("rust", 0, 99, None),
        Err(StickyLinesError::PositionOutOfBounds {
            position: 99,
            length: 10
        })
    );
    assert_eq!(
        registry.add_sticky_line("rust", 0, 4, None),
        Err(StickyLinesError::NotCharBoundary { position: 4 })
    );
    assert!(registry.add_sticky_line("rust", 0, 5, None).is_ok());
}
