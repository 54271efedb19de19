use super::*;

#[test]
fn grapheme_breaks_keep_marks_with_base() {
    let text = "a\u{0325}\u{0300}b";
    let g = GraphemeBreaks;
    assert!(g.is_boundary(text, 0));
    assert!(!g.is_boundary(text, 1));
    assert!(!g.is_boundary(text, 3));
    assert!(g.is_boundary(text, 5));
    assert!(g.is_boundary(text, 6));
    assert_eq!(g.following(text, 0), 5);
    assert_eq!(g.following(text, 5), 6);
    assert_eq!(g.following(text, 6), 6);
    assert_eq!(g.preceding(text, 6), 5);
    assert_eq!(g.preceding(text, 5), 0);
    assert_eq!(g.preceding(text, 0), 0);
}

#[test]
fn grapheme_breaks_inside_char_are_not_boundaries() {
    let g = GraphemeBreaks;
    assert!(!g.is_boundary("\u{00E9}x", 1));
    assert!(!g.is_boundary("ab", 3));
}

#[test]
fn character_breaks_follow_chars() {
    let text = "a\u{0325}b";
    let c = CharacterBreaks;
    assert!(c.is_boundary(text, 1));
    assert!(!c.is_boundary(text, 2));
    assert_eq!(c.following(text, 1), 3);
    assert_eq!(c.preceding(text, 3), 1);
    assert_eq!(c.following(text, 4), 4);
    assert_eq!(c.preceding(text, 0), 0);
}

#[test]
fn word_breaks_split_on_spaces_and_punctuation() {
    let text = "foo bar,baz";
    let w = WordBreaks;
    assert!(w.is_boundary(text, 3));
    assert!(w.is_boundary(text, 4));
    assert!(!w.is_boundary(text, 5));
    assert!(w.is_boundary(text, 7));
    assert_eq!(w.following(text, 0), 3);
    assert_eq!(w.following(text, 4), 7);
    assert_eq!(w.preceding(text, 6), 4);
    assert_eq!(w.preceding(text, 4), 3);
}

#[test]
fn word_breaks_cross_lines() {
    let text = "ab\r\ncd";
    let w = WordBreaks;
    assert!(w.is_boundary(text, 2));
    assert!(!w.is_boundary(text, 3));
    assert!(w.is_boundary(text, 4));
    assert_eq!(w.following(text, 2), 4);
    assert_eq!(w.preceding(text, 4), 2);
    assert_eq!(w.preceding(text, 2), 0);
}

#[test]
fn break_kind_parses_and_builds_services() {
    assert_eq!(BreakKind::from_name("Word"), Some(BreakKind::Word));
    assert_eq!(BreakKind::from_name("char"), Some(BreakKind::Character));
    assert_eq!(BreakKind::from_name("line"), None);
    assert_eq!(BreakKind::default(), BreakKind::Grapheme);
    assert!(!BreakKind::Grapheme.service().is_boundary("a\u{0301}", 1));
    assert!(BreakKind::Character.service().is_boundary("a\u{0301}", 1));
}
