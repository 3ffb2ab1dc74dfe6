use gridpad_config::EditorConfig;

#[test]
fn test_load_creates_default_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gridpad.json");
    assert!(!path.exists());

    let config = EditorConfig::load_or_create(&path);
    assert!(path.exists());
    assert_eq!(config, EditorConfig::default());

    // File should contain valid JSON
    let contents = std::fs::read_to_string(&path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert!(parsed.is_object());
    assert_eq!(parsed["columns"], 80);
}

#[test]
fn test_load_existing_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gridpad.json");
    let json = r#"{
        "columns": 100,
        "rows": 30,
        "word_wrap": true,
        "caret_enabled": false,
        "max_document_bytes": 65536
    }"#;
    std::fs::write(&path, json).unwrap();

    let config = EditorConfig::load_or_create(&path);
    assert_eq!(config.columns, 100);
    assert_eq!(config.rows, 30);
    assert!(config.word_wrap);
    assert!(!config.caret_enabled);
    assert_eq!(config.document_limit(), Some(65536));
}

#[test]
fn test_broken_json_returns_defaults_and_keeps_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gridpad.json");
    let broken = "{ this is not valid json }}}";
    std::fs::write(&path, broken).unwrap();

    let config = EditorConfig::load_or_create(&path);
    assert_eq!(config, EditorConfig::default());
    assert_eq!(std::fs::read_to_string(&path).unwrap(), broken);
}

#[test]
fn test_partial_config_fills_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gridpad.json");
    std::fs::write(&path, r#"{"rows": 12}"#).unwrap();

    let config = EditorConfig::load_or_create(&path);
    assert_eq!(config.rows, 12);
    assert_eq!(config.columns, 80);
    assert!(config.caret_enabled);
}

#[test]
fn test_loaded_values_are_sanitized() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gridpad.json");
    std::fs::write(&path, r#"{"columns": 0, "rows": 3, "page_overlap": 10}"#).unwrap();

    let config = EditorConfig::load_or_create(&path);
    assert_eq!(config.columns, 1);
    assert_eq!(config.page_overlap, 2);
}

#[test]
fn test_save_then_load_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gridpad.json");
    let config = EditorConfig {
        columns: 132,
        word_wrap: true,
        glyph_width: 10,
        ..EditorConfig::default()
    };
    config.save(&path).unwrap();

    let loaded = EditorConfig::load_or_create(&path);
    assert_eq!(loaded, config);
}

#[test]
fn test_save_to_missing_directory_fails_with_context() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("gridpad.json");
    let err = EditorConfig::default().save(&path).unwrap_err();
    assert!(format!("{err:#}").contains("writing"));
}
