use super::*;

#[test]
fn fcd_of_precomposed_letter_has_accent_trail() {
    let n = UnicodeNormalizer;
    assert_eq!(n.fcd('\u{00E1}'), Fcd { lead: 0, trail: 230 });
    assert_eq!(n.fcd('a'), Fcd::default());
    assert!(n.fcd('a').is_base());
}

#[test]
fn fcd_of_combining_mark_uses_its_class() {
    let n = UnicodeNormalizer;
    assert_eq!(n.fcd('\u{0325}'), Fcd { lead: 220, trail: 220 });
    // U+0344 分解为 U+0308 U+0301
    assert_eq!(n.fcd('\u{0344}'), Fcd { lead: 230, trail: 230 });
}

#[test]
fn nfd_reorders_marks_by_class() {
    let n = UnicodeNormalizer;
    assert_eq!(n.decompose_nfd("\u{00E1}\u{0325}"), "a\u{0325}\u{0301}");
    assert!(n.is_nfd("a\u{0325}\u{0301}"));
    assert!(!n.is_nfd("\u{00E1}"));
}

#[test]
fn append_nfd_keeps_existing_content() {
    let n = UnicodeNormalizer;
    let mut out = String::from("x");
    n.append_nfd("\u{00E9}", &mut out);
    assert_eq!(out, "xe\u{0301}");
    assert_eq!(n.combining_class('\u{0301}'), 230);
    assert_eq!(n.combining_class('e'), 0);
}
