use super::*;

fn weights(collator: &RootCollator, text: &str) -> Vec<CollationElement> {
    collator.elements(text).map(|el| el.ce).collect()
}

#[test]
fn case_differs_only_at_tertiary() {
    let collator = RootCollator::new();
    let lower = weights(&collator, "a");
    let upper = weights(&collator, "A");
    assert_eq!(lower.len(), 1);
    assert_eq!(lower[0].primary(), upper[0].primary());
    assert_eq!(lower[0].secondary(), upper[0].secondary());
    assert_ne!(lower[0].tertiary(), upper[0].tertiary());
}

#[test]
fn precomposed_letter_expands_to_base_and_accent() {
    let collator = RootCollator::new();
    let precomposed = weights(&collator, "\u{00E1}");
    let decomposed = weights(&collator, "a\u{0301}");
    assert_eq!(precomposed, decomposed);
    assert_eq!(precomposed.len(), 2);
    assert_eq!(precomposed[1].primary(), 0);
    assert_eq!(precomposed[1].secondary(), 0x11);
}

#[test]
fn expansion_tail_spans_are_empty() {
    let collator = RootCollator::new();
    let spans: Vec<(usize, usize)> = collator
        .elements("x\u{00E1}")
        .map(|el| (el.low, el.high))
        .collect();
    assert_eq!(spans, vec![(0, 1), (1, 3), (3, 3)]);
}

#[test]
fn digits_sort_before_letters_and_after_punctuation() {
    let collator = RootCollator::new();
    let comma = weights(&collator, ",")[0];
    let seven = weights(&collator, "7")[0];
    let z = weights(&collator, "z")[0];
    assert!(comma < seven);
    assert!(seven < z);
    assert!(comma.raw() < VARIABLE_TOP);
    assert!(seven.raw() >= VARIABLE_TOP);
}

#[test]
fn high_code_points_get_implicit_pair() {
    let collator = RootCollator::new();
    let ces = weights(&collator, "\u{1F600}");
    assert_eq!(ces.len(), 2);
    assert_eq!(ces[0].primary(), 0xF000 + 0x1F);
    assert!(ces[1].is_continuation());
    assert_eq!(ces[1].primary(), 0x600 + 1);
    assert_eq!(collator.max_expansion(ces[1]), 2);
}

#[test]
fn format_controls_are_ignorable() {
    let collator = RootCollator::new();
    assert_eq!(weights(&collator, "\u{200B}"), vec![CollationElement::IGNORABLE]);
    assert_eq!(weights(&collator, "\u{00AD}"), vec![CollationElement::IGNORABLE]);
    assert_ne!(weights(&collator, "\t"), vec![CollationElement::IGNORABLE]);
}

#[test]
fn combining_marks_are_unsafe() {
    let collator = RootCollator::new();
    assert!(collator.is_unsafe('\u{0301}'));
    assert!(collator.is_unsafe('\u{0325}'));
    assert!(!collator.is_unsafe('a'));
    assert!(!collator.is_unsafe('\u{00E1}'));
}

#[test]
fn contraction_uses_longest_match() {
    let tailoring = Tailoring::new().contraction("ch").contraction("chx");
    let collator = RootCollator::new().with_tailoring(tailoring);

    let ch = weights(&collator, "ch");
    let chx = weights(&collator, "chx");
    assert_eq!(ch.len(), 1);
    assert_eq!(chx.len(), 1);
    assert_ne!(ch, chx);
    assert!((0x1100..=0x1FFF).contains(&ch[0].primary()));

    let spans: Vec<(usize, usize)> = collator.elements("chy").map(|el| (el.low, el.high)).collect();
    assert_eq!(spans, vec![(0, 2), (2, 3)]);
    assert!(collator.is_unsafe('h'));
    assert!(!collator.is_unsafe('c'));
}

#[test]
fn contraction_cut_by_text_end_falls_back_to_root() {
    let collator = RootCollator::new().with_tailoring(Tailoring::new().contraction("ch"));
    let ces = weights(&collator, "c");
    assert_eq!(ces, weights(&RootCollator::new(), "c"));
}

#[test]
fn expansion_uses_root_weights_of_replacement() {
    let collator = RootCollator::new().with_tailoring(Tailoring::new().expansion('\u{00E6}', "ae"));
    let ae = weights(&collator, "\u{00E6}");
    assert_eq!(ae, weights(&RootCollator::new(), "ae"));
    assert_eq!(collator.max_expansion(ae[1]), 2);
}
