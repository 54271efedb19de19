use super::*;
use crate::collation::root::RootCollator;
use crate::collation::Tailoring;

fn spans(ceis: &[Cei]) -> Vec<(usize, usize)> {
    ceis.iter().map(|c| (c.low, c.high)).collect()
}

fn backward_all<C: Collator>(collator: &C, text: &str) -> Vec<Cei> {
    let mut iter = ProcessedElements::new_at(collator, text, text.len());
    let mut out = Vec::new();
    loop {
        let cei = iter.previous_processed();
        if cei.is_terminator() {
            assert_eq!((cei.low, cei.high), (0, 0));
            break;
        }
        out.push(cei);
    }
    out.reverse();
    out
}

#[test]
fn forward_terminator_sits_at_text_end() {
    let collator = RootCollator::new();
    let mut iter = ProcessedElements::new(&collator, "ab");
    assert_eq!(iter.next_processed().low, 0);
    assert_eq!(iter.next_processed().low, 1);
    let end = iter.next_processed();
    assert!(end.is_terminator());
    assert_eq!((end.low, end.high), (2, 2));
}

#[test]
fn ignorables_are_skipped() {
    let collator = RootCollator::new();
    let ceis = processed_elements(&collator, "a\u{200B}b");
    assert_eq!(spans(&ceis), vec![(0, 1), (4, 5)]);
}

#[test]
fn backward_matches_forward() {
    let collator = RootCollator::new();
    for text in ["abc", "\u{00E1}\u{0325}x", "a\u{0325}\u{0300}", "\u{1F600}z", "A, b"] {
        assert_eq!(backward_all(&collator, text), processed_elements(&collator, text), "{text:?}");
    }
}

#[test]
fn backward_matches_forward_with_contractions() {
    let collator = RootCollator::new().with_tailoring(Tailoring::new().contraction("ch"));
    let text = "achch\u{0301}c";
    assert_eq!(backward_all(&collator, text), processed_elements(&collator, text));
}

#[test]
fn primary_strength_zeroes_lower_levels() {
    let collator = RootCollator::new().with_strength(Strength::Primary);
    let ceis = processed_elements(&collator, "\u{00C1}");
    assert_eq!(ceis.len(), 1);
    assert_eq!(ceis[0].pce, ProcessedElement::from_levels(0x2061, 0, 0, 0));
    assert_eq!((ceis[0].low, ceis[0].high), (0, 2));
}

#[test]
fn shifted_variable_moves_primary_to_quaternary() {
    let collator = RootCollator::new()
        .with_strength(Strength::Quaternary)
        .with_alternate_shifted(true);
    let ceis = processed_elements(&collator, "a-b");
    assert_eq!(ceis.len(), 3);
    let dash = ceis[1].pce;
    assert_eq!(dash.primary_weight(), 0);
    assert_eq!(dash.quaternary_weight(), 0x0100 + '-' as u16);
    assert_eq!(ceis[0].pce.quaternary_weight(), 0xFFFF);
}

#[test]
fn shifted_variable_is_ignored_below_quaternary() {
    let collator = RootCollator::new().with_alternate_shifted(true);
    let ceis = processed_elements(&collator, "a-\u{0301}b");
    // 跟在 shifted 元素后的重音一并忽略
    assert_eq!(spans(&ceis), vec![(0, 1), (4, 5)]);
}

#[test]
fn set_offset_restarts_iteration() {
    let collator = RootCollator::new();
    let mut iter = ProcessedElements::new(&collator, "abc");
    iter.next_processed();
    iter.set_offset(2);
    assert_eq!(iter.next_processed().low, 2);
    iter.set_offset(2);
    assert_eq!(iter.previous_processed().low, 1);
    assert_eq!(iter.offset(), 1);
}
