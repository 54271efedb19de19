use super::*;
use crate::search::MatchResult;
use tempfile::tempdir;

#[test]
fn missing_fields_take_defaults() {
    let settings = SearchSettings::from_json(r#"{ "strength": "primary", "canonical": true }"#).unwrap();
    assert_eq!(settings.strength, Strength::Primary);
    assert!(settings.canonical);
    assert!(!settings.overlapping);
    assert_eq!(settings.breaks, BreakKind::Grapheme);
    assert!(settings.contractions.is_empty());
}

#[test]
fn default_settings_serialize_without_empty_maps() {
    let json = SearchSettings::default().to_json().unwrap();
    assert!(json.contains("\"strength\": \"tertiary\""));
    assert!(json.contains("\"breaks\": \"grapheme\""));
    assert!(!json.contains("contractions"));
    assert_eq!(SearchSettings::from_json(&json).unwrap(), SearchSettings::default());
}

#[test]
fn malformed_json_is_a_parse_error() {
    let err = SearchSettings::from_json("{ strength: 1").unwrap_err();
    assert!(matches!(err, SettingsError::Parse(_)));
    let err = SearchSettings::from_json(r#"{ "breaks": "sentence" }"#).unwrap_err();
    assert!(matches!(err, SettingsError::Parse(_)));
}

#[test]
fn expansion_keys_must_be_single_characters() {
    let settings = SearchSettings::from_json(r#"{ "expansions": { "ae": "x" } }"#).unwrap();
    let err = settings.build_collator().unwrap_err();
    assert!(matches!(err, SettingsError::Invalid(_)));
    assert!(err.to_string().contains("single character"));

    let settings = SearchSettings::from_json(r#"{ "contractions": { "c": "" } }"#).unwrap();
    assert!(matches!(settings.tailoring(), Err(SettingsError::Invalid(_))));
}

#[test]
fn contraction_keeps_sequence_together() {
    let settings = SearchSettings::from_json(r#"{ "contractions": { "ch": "" } }"#).unwrap();
    let collator = settings.build_collator().unwrap();

    let mut search = StringSearch::new("c", "achb", collator.clone()).unwrap();
    assert_eq!(search.first(), MatchResult::NoMatch);

    let mut search = StringSearch::new("ch", "achb", collator).unwrap();
    assert_eq!(search.first(), MatchResult::Found { index: 1, length: 2 });
}

#[test]
fn expansion_sorts_like_its_text() {
    let settings = SearchSettings::from_json(r#"{ "expansions": { "æ": "ae" } }"#).unwrap();
    let collator = settings.build_collator().unwrap();
    let mut search = StringSearch::new("ae", "x\u{00E6}", collator).unwrap();
    assert_eq!(search.first(), MatchResult::Found { index: 1, length: 2 });
}

#[test]
fn apply_sets_session_modes() {
    let settings = SearchSettings {
        canonical: true,
        overlapping: true,
        breaks: BreakKind::Character,
        ..SearchSettings::default()
    };
    let mut search = StringSearch::new("\u{0300}", "a\u{0325}\u{0300}", RootCollator::new()).unwrap();
    settings.apply(&mut search);
    assert!(search.is_canonical());
    assert!(search.is_overlapping());
    assert_eq!(search.first(), MatchResult::Found { index: 3, length: 2 });
}

#[test]
fn load_missing_file_yields_defaults() {
    let dir = tempdir().unwrap();
    let settings = load(&dir.path().join("nope.json")).unwrap();
    assert_eq!(settings, SearchSettings::default());
}

#[test]
fn ensure_settings_file_writes_defaults_once() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join(SETTINGS_FILE);
    ensure_settings_file_at(&path).unwrap();
    assert_eq!(load(&path).unwrap(), SearchSettings::default());

    std::fs::write(&path, r#"{ "overlapping": true }"#).unwrap();
    ensure_settings_file_at(&path).unwrap();
    assert!(load(&path).unwrap().overlapping);
}
