// tests/rules_config.rs
use serial_test::serial;
use std::{env, fs};

use signal_radar::classify::rules::ENV_RULES_PATH;
use signal_radar::classify::{assign_category, detect_region};
use signal_radar::{Category, Rulebook};

const CUSTOM: &str = r#"
default_category = "industry"
fallback_region = "National"

[[domain]]
id = "robots"
pattern = '(?i)\brobots?\b'

[[categories]]
id = "grants"
category = "funding"
pattern = '(?i)\bgrant\b'
"#;

#[serial]
#[test]
fn env_path_overrides_builtin_rules() {
    let dir = tempfile::tempdir().unwrap();
    let p = dir.path().join("rules.toml");
    fs::write(&p, CUSTOM).unwrap();

    env::set_var(ENV_RULES_PATH, p.display().to_string());
    let book = Rulebook::load_default().unwrap();
    env::remove_var(ENV_RULES_PATH);

    assert_eq!(assign_category(&book, "Robot lab wins grant", ""), Category::Funding);
    assert_eq!(assign_category(&book, "Robot lab opens", ""), Category::Industry);
    assert_eq!(detect_region(&book, "Robot lab opens in Paris", ""), "National");
}

#[serial]
#[test]
fn missing_rules_file_is_an_error() {
    env::set_var(ENV_RULES_PATH, "/nonexistent/rules.toml");
    let res = Rulebook::load_default();
    env::remove_var(ENV_RULES_PATH);
    let err = format!("{:#}", res.unwrap_err());
    assert!(err.contains("/nonexistent/rules.toml"));
}

#[serial]
#[test]
fn without_env_the_builtin_book_is_used() {
    env::remove_var(ENV_RULES_PATH);
    let book = Rulebook::load_default().unwrap();
    assert_eq!(book.default_category, Category::News);
    assert_eq!(assign_category(&book, "AI meetup recap", ""), Category::News);
}
