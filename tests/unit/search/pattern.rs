use super::*;
use crate::collation::root::VARIABLE_TOP;
use crate::collation::RootCollator;
use crate::text::UnicodeNormalizer;

fn model(text: &str, collator: &RootCollator) -> PatternModel {
    PatternModel::build(text, collator, &UnicodeNormalizer)
}

#[test]
fn shift_tables_follow_distance_to_pattern_end() {
    let collator = RootCollator::new();
    let pattern = model("abcd", &collator);
    assert_eq!(pattern.ce_len(), 4);
    assert_eq!(pattern.default_shift_size(), 4);

    let ces = pattern.ces();
    assert_eq!(pattern.shift(ces[0]), 3);
    assert_eq!(pattern.shift(ces[1]), 2);
    assert_eq!(pattern.shift(ces[2]), 1);
    assert_eq!(pattern.shift(ces[3]), 1);

    assert_eq!(pattern.back_shift(ces[3]), 3);
    assert_eq!(pattern.back_shift(ces[2]), 2);
    assert_eq!(pattern.back_shift(ces[1]), 1);
    assert_eq!(pattern.back_shift(ces[0]), 1);

    assert_eq!(pattern.shift_table().len(), SHIFT_TABLE_SIZE);
    assert_eq!(pattern.shift_table()[hash(CollationElement::IGNORABLE)], 1);
    let unrelated = CollationElement::new(0x3000, 5, 5);
    assert_eq!(pattern.shift(unrelated), 4);
    assert_eq!(pattern.back_shift(unrelated), 4);
}

#[test]
fn expansion_surplus_shrinks_default_shift() {
    let collator = RootCollator::new();
    let pattern = model("\u{00E1}", &collator);
    assert_eq!(pattern.ce_len(), 2);
    assert_eq!(pattern.expansion_surplus(), 2);
    assert_eq!(pattern.default_shift_size(), 1);
}

#[test]
fn accent_flags_come_from_fcd() {
    let collator = RootCollator::new();
    let leading = model("\u{0301}x", &collator);
    assert!(leading.has_prefix_accents());
    assert!(!leading.has_suffix_accents());

    let trailing = model("x\u{00E1}", &collator);
    assert!(!trailing.has_prefix_accents());
    assert!(trailing.has_suffix_accents());

    let primary = RootCollator::new().with_strength(Strength::Primary);
    let flat = model("\u{0301}x\u{00E1}", &primary);
    assert!(!flat.has_prefix_accents());
    assert!(!flat.has_suffix_accents());
}

#[test]
fn canonical_pces_use_nfd_order() {
    let collator = RootCollator::new();
    let pattern = model("a\u{0301}\u{0325}", &collator);
    let nfd = model("a\u{0325}\u{0301}", &collator);
    assert_ne!(pattern.pces(), nfd.pces());
    assert_eq!(pattern.canonical_pces(), nfd.pces());
    assert_eq!(nfd.canonical_pces(), nfd.pces());
}

#[test]
fn ignorable_pattern_is_empty() {
    let collator = RootCollator::new();
    let pattern = model("\u{0001}", &collator);
    assert!(pattern.is_empty());
    assert_eq!(pattern.pce_len(), 0);
    assert!(pattern.shift_table().is_empty());
    assert_eq!(pattern.default_shift_size(), 0);
}

#[test]
fn shifted_punctuation_drops_out_below_quaternary() {
    let collator = RootCollator::new().with_alternate_shifted(true);
    let pattern = model("a,b", &collator);
    assert_eq!(pattern.ce_len(), 2);
    assert_eq!(pattern.pce_len(), 2);

    let quaternary = RootCollator::new()
        .with_alternate_shifted(true)
        .with_strength(Strength::Quaternary);
    let pattern = model("a,b", &quaternary);
    assert_eq!(pattern.ce_len(), 3);
    assert_eq!(pattern.ces()[1].secondary(), 0);
    assert_eq!(pattern.pces()[1].primary_weight(), 0);
    assert_ne!(pattern.pces()[1].quaternary_weight(), 0);
}

#[test]
fn filter_ce_masks_by_strength() {
    let ce = CollationElement::new(0x2061, 0x11, 0x85);
    let secondary = filter_ce(ce, Strength::Secondary, false, VARIABLE_TOP);
    assert_eq!(secondary.tertiary(), 0);
    assert_eq!(secondary.secondary(), 0x11);

    let variable = CollationElement::new(0x012C, 5, 5);
    assert!(filter_ce(variable, Strength::Tertiary, true, VARIABLE_TOP).is_ignorable());
    assert_eq!(
        filter_ce(variable, Strength::Quaternary, true, VARIABLE_TOP),
        CollationElement::new(0x012C, 0, 0)
    );
    assert_eq!(
        filter_ce(CollationElement::IGNORABLE, Strength::Quaternary, false, VARIABLE_TOP).raw(),
        0xFFFF
    );
}

#[test]
fn rebuilding_is_idempotent() {
    let collator = RootCollator::new();
    let first = model("Stra\u{00DF}e", &collator);
    let second = model("Stra\u{00DF}e", &collator);
    assert_eq!(first, second);
}
