// tests/config_test.rs
use release_actions::config::{load_config, Config, CONFIG_FILE_NAME};
use std::io::Write;
use std::path::Path;
use tempfile::{NamedTempFile, TempDir};

#[test]
fn test_load_default_config() {
    let config = Config::default();
    assert_eq!(config.breaking_changes.marker, "Upgrade from v");
    assert_eq!(config.breaking_changes.docs_dir, "docs/breaking-changes");
    assert_eq!(config.breaking_changes.template, None);
    assert_eq!(config.github.api_url, "https://api.github.com");
}

#[test]
fn test_load_from_file() {
    let mut temp_file = NamedTempFile::new().unwrap();
    let toml_content = r#"
[breaking_changes]
marker = "Migrating from v"
docs_dir = "documentation/upgrades"
template = "templates/upgrade.md"

[github]
api_url = "https://github.example.com/api/v3"
"#;
    temp_file.write_all(toml_content.as_bytes()).unwrap();
    temp_file.flush().unwrap();

    let workspace = TempDir::new().unwrap();
    let config = load_config(Some(temp_file.path()), workspace.path()).unwrap();
    assert_eq!(config.breaking_changes.marker, "Migrating from v");
    assert_eq!(config.breaking_changes.docs_dir, "documentation/upgrades");
    assert_eq!(
        config.breaking_changes.template_path(Path::new("/action")),
        Path::new("/action/../templates/upgrade.md")
    );
    assert_eq!(config.github.api_url, "https://github.example.com/api/v3");
}

#[test]
fn test_workspace_config_is_discovered() {
    let workspace = TempDir::new().unwrap();
    let github_dir = workspace.path().join(".github");
    std::fs::create_dir_all(&github_dir).unwrap();
    std::fs::write(
        github_dir.join(CONFIG_FILE_NAME),
        "[breaking_changes]\ndocs_dir = \"upgrade-notes\"\n",
    )
    .unwrap();

    let config = load_config(None, workspace.path()).unwrap();
    assert_eq!(config.breaking_changes.docs_dir, "upgrade-notes");
    assert_eq!(config.breaking_changes.marker, "Upgrade from v");
}

#[test]
fn test_missing_explicit_file_is_error() {
    let workspace = TempDir::new().unwrap();
    let result = load_config(Some(&workspace.path().join("absent.toml")), workspace.path());
    assert!(result.is_err());
    assert!(result
        .unwrap_err()
        .to_string()
        .starts_with("Configuration error"));
}

#[test]
fn test_malformed_file_is_error() {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(b"[breaking_changes\nmarker = ").unwrap();
    temp_file.flush().unwrap();

    let workspace = TempDir::new().unwrap();
    assert!(load_config(Some(temp_file.path()), workspace.path()).is_err());
}
