use super::*;
use crate::collation::RootCollator;
use crate::text::UnicodeNormalizer;

#[test]
fn get_loads_elements_lazily_and_repeats_them() {
    let collator = RootCollator::new();
    let source = ProcessedElements::new(&collator, "abc");
    let mut ceb = CeBuffer::new(source, 8);

    let b = ceb.get(1);
    assert_eq!((b.low, b.high), (1, 2));
    assert_eq!(ceb.limit_index(), 2);
    assert_eq!(ceb.get(1), b);
    assert_eq!(ceb.get(0).low, 0);
}

#[test]
fn terminator_repeats_past_text_end() {
    let collator = RootCollator::new();
    let source = ProcessedElements::new(&collator, "a");
    let mut ceb = CeBuffer::new(source, 8);
    assert!(!ceb.get(0).is_terminator());
    assert!(ceb.get(1).is_terminator());
    assert!(ceb.get(5).is_terminator());
    assert_eq!((ceb.get(3).low, ceb.get(3).high), (1, 1));
}

#[test]
fn get_previous_walks_backward() {
    let collator = RootCollator::new();
    let source = ProcessedElements::new_at(&collator, "abc", 3);
    let mut ceb = CeBuffer::new(source, 8);
    assert_eq!(ceb.get_previous(0).low, 2);
    assert_eq!(ceb.get_previous(2).low, 0);
    let end = ceb.get_previous(3);
    assert!(end.is_terminator());
    assert_eq!((end.low, end.high), (0, 0));
}

#[test]
fn window_evicts_oldest_entries() {
    let collator = RootCollator::new();
    let source = ProcessedElements::new(&collator, "abcdefgh");
    let mut ceb = CeBuffer::new(source, 3);
    assert_eq!(ceb.get(5).low, 5);
    assert_eq!(ceb.first_index(), 3);
    assert_eq!(ceb.get(3).low, 3);
}

#[test]
#[should_panic(expected = "already evicted")]
fn reading_evicted_entry_panics() {
    let collator = RootCollator::new();
    let source = ProcessedElements::new(&collator, "abcdefgh");
    let mut ceb = CeBuffer::new(source, 2);
    ceb.get(4);
    ceb.get(0);
}

#[test]
fn storage_is_cleared_on_reuse() {
    let collator = RootCollator::new();
    let mut ceb = CeBuffer::new(ProcessedElements::new(&collator, "xyz"), 4);
    ceb.get(2);
    let storage = ceb.into_storage();
    assert_eq!(storage.len(), 3);

    let mut ceb = CeBuffer::with_storage(ProcessedElements::new(&collator, "q"), 4, storage);
    assert_eq!(ceb.limit_index(), 0);
    assert_eq!(ceb.get(0).high, 1);
}

#[test]
fn capacity_grows_only_for_wildcard_comparison() {
    let collator = RootCollator::new();
    let pattern = PatternModel::build("ab", &collator, &UnicodeNormalizer);
    assert_eq!(
        capacity_for(&pattern, ElementComparison::Standard),
        2 + CEBUFFER_EXTRA
    );
    assert_eq!(
        capacity_for(&pattern, ElementComparison::AnyBaseWeightIsWildcard),
        2 + CEBUFFER_EXTRA + 6
    );

    let jamo = PatternModel::build("\u{1100}", &collator, &UnicodeNormalizer);
    assert_eq!(
        capacity_for(&jamo, ElementComparison::PatternBaseWeightIsWildcard),
        jamo.pce_len() + CEBUFFER_EXTRA + 8
    );
}

#[test]
fn pinned_window_grows_instead_of_evicting() {
    let collator = RootCollator::new();
    let source = ProcessedElements::new(&collator, "abcdefgh");
    let mut ceb = CeBuffer::new(source, 3);
    ceb.pin(1);
    assert_eq!(ceb.get(6).low, 6);
    assert_eq!(ceb.first_index(), 1);
    assert_eq!(ceb.get(1).low, 1);

    ceb.pin(5);
    ceb.get(7);
    assert_eq!(ceb.first_index(), 2);
    assert_eq!(ceb.get(5).low, 5);
}
