use super::*;

#[test]
fn collation_element_packs_levels() {
    let ce = CollationElement::new(0x2061, 0x05, 0x85);
    assert_eq!(ce.raw(), 0x2061_0585);
    assert_eq!(ce.primary(), 0x2061);
    assert_eq!(ce.secondary(), 0x05);
    assert_eq!(ce.tertiary(), 0x85);
    assert!(!ce.is_continuation());
}

#[test]
fn continuation_marker_lives_in_tertiary_byte() {
    let ce = CollationElement::continuation(0x0042, 0x05, 0x05);
    assert_eq!(ce.tertiary(), 0xC5);
    assert!(ce.is_continuation());
    assert!(!CollationElement::NULLORDER.is_continuation());
}

#[test]
fn masked_drops_levels_above_strength() {
    let ce = CollationElement::new(0x2061, 0x11, 0x85);
    assert_eq!(ce.masked(Strength::Primary.mask()), CollationElement::new(0x2061, 0, 0));
    assert_eq!(ce.masked(Strength::Secondary.mask()), CollationElement::new(0x2061, 0x11, 0));
    assert_eq!(ce.masked(Strength::Identical.mask()), ce);
}

#[test]
fn processed_element_packs_four_levels() {
    let pce = ProcessedElement::from_levels(0x2061, 0x05, 0x85, 0xFFFF);
    assert_eq!(pce.raw(), 0x2061_0005_0085_FFFF);
    assert_eq!(pce.primary_weight(), 0x2061);
    assert_eq!(pce.secondary_weight(), 0x05);
    assert_eq!(pce.tertiary_weight(), 0x85);
    assert_eq!(pce.quaternary_weight(), 0xFFFF);
    assert!(!pce.is_ignorable());
    assert!(ProcessedElement::PROCESSED_NULLORDER.is_null());
}

#[test]
fn strength_from_name_accepts_names_and_levels() {
    assert_eq!(Strength::from_name("primary"), Some(Strength::Primary));
    assert_eq!(Strength::from_name(" Secondary "), Some(Strength::Secondary));
    assert_eq!(Strength::from_name("3"), Some(Strength::Tertiary));
    assert_eq!(Strength::from_name("identical"), Some(Strength::Identical));
    assert_eq!(Strength::from_name("loud"), None);
    assert_eq!(Strength::default(), Strength::Tertiary);
}

#[test]
fn strength_serializes_lowercase() {
    let json = serde_json::to_string(&Strength::Quaternary).unwrap();
    assert_eq!(json, "\"quaternary\"");
    let back: Strength = serde_json::from_str("\"primary\"").unwrap();
    assert_eq!(back, Strength::Primary);
}

#[test]
fn terminator_is_not_an_expansion_tail() {
    let end = Cei::terminator(7);
    assert!(end.is_terminator());
    assert!(!end.is_expansion_tail());
    assert_eq!((end.low, end.high), (7, 7));

    let tail = Cei {
        pce: ProcessedElement::from_levels(0, 0x11, 0x05, 0),
        low: 3,
        high: 3,
    };
    assert!(tail.is_expansion_tail());
}
