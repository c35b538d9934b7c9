use super::*;

#[test]
fn builtin_has_default_and_dark() {
    let set = ThemeSet::builtin();
    let names: Vec<&str> = set.names().collect();
    assert_eq!(names, vec!["dark", "default"]);
    assert_eq!(set.get("default").palette.colors().len(), DEFAULT_PALETTE.len());
    assert_eq!(set.get("dark").background.as_str(), "#100c2a");
}

#[test]
fn lookup_is_case_insensitive_and_falls_back() {
    let set = ThemeSet::builtin();
    assert_eq!(set.get("DARK").name, "dark");
    assert!(set.find("nope").is_none());
    assert_eq!(set.get("nope").name, DEFAULT_THEME);
}

#[test]
fn empty_palette_is_rejected() {
    let err = Palette::new(Vec::new()).unwrap_err();
    assert!(matches!(err, PlotshotError::InvalidInput(_)));
}

#[test]
fn theme_file_adds_and_overrides() {
    let json = r##"{
        "ocean": { "color": ["#003366", "#336699"], "backgroundColor": "#f0f8ff" },
        "default": { "color": ["#111111"] }
    }"##;
    let set = ThemeSet::from_json_str(json).unwrap();

    let ocean = set.get("ocean");
    assert_eq!(ocean.palette.colors().len(), 2);
    assert_eq!(ocean.background.as_str(), "#f0f8ff");
    // Unset chrome colors come from the default theme.
    assert_eq!(ocean.grid_line.as_str(), "#e0e6f1");

    let default = set.get("missing");
    assert_eq!(default.palette.colors()[0].as_str(), "#111111");
    assert_eq!(set.get("dark").name, "dark");
}

#[test]
fn theme_file_with_bad_color_is_rejected() {
    let json = r##"{ "broken": { "color": ["#12345z"] } }"##;
    let err = ThemeSet::from_json_str(json).unwrap_err();
    assert!(err.to_string().contains("broken"));

    let err = ThemeSet::from_json_str(r##"{ "empty": { "color": [] } }"##).unwrap_err();
    assert!(matches!(err, PlotshotError::InvalidInput(_)));

    let err = ThemeSet::from_json_str("not json").unwrap_err();
    assert!(matches!(err, PlotshotError::Serde(_)));
}

#[test]
fn load_or_default_degrades_to_builtin() {
    let set = ThemeSet::load_or_default(Path::new("target/does/not/exist/themes.json"));
    assert_eq!(set.names().count(), 2);
}

#[test]
fn load_reads_file() {
    let dir = std::path::PathBuf::from("target").join("theme_load");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("themes.json");
    std::fs::write(&path, r##"{ "mono": { "color": ["#000000"] } }"##).unwrap();

    let set = ThemeSet::load(&path).unwrap();
    assert_eq!(set.get("mono").palette.colors()[0].as_str(), "#000000");
}
