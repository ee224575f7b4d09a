use ktspec_core::config::{
    DEFAULT_COVERAGE_TASK, DEFAULT_GRADLE_COMMAND, DEFAULT_LOG_FILTER, DEFAULT_MAX_FILE_SIZE,
    DEFAULT_TICK_RATE_MS, PROJECT_CONFIG_FILE,
};
use ktspec_core::{Config, ConfigError, SpecDiscovery};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_default_config() {
    let config = Config::default();
    assert_eq!(config.discovery.max_file_size, DEFAULT_MAX_FILE_SIZE);
    assert_eq!(config.run.gradle_command, DEFAULT_GRADLE_COMMAND);
    assert_eq!(config.run.coverage_task, DEFAULT_COVERAGE_TASK);
    assert_eq!(config.explorer.tick_rate_ms, DEFAULT_TICK_RATE_MS);
    assert_eq!(config.logging.filter, DEFAULT_LOG_FILTER);
    assert!(config.logging.file.is_none());
}

#[test]
fn test_config_to_toml() {
    let toml_str = Config::default_config_string();
    assert!(toml_str.contains("[discovery]"));
    assert!(toml_str.contains("[explorer]"));
    assert!(toml_str.contains("[run]"));
    assert!(toml_str.contains("[logging]"));
}

#[test]
fn test_config_from_toml() {
    let toml_str = r#"
[discovery]
max_file_size = 2048
disabled_styles = ["String Spec"]

[run]
gradle_command = "gradle"

[explorer]
expand_all = false
"#;
    let config: Config = toml::from_str(toml_str).unwrap();
    assert_eq!(config.discovery.max_file_size, 2048);
    assert_eq!(config.discovery.disabled_styles, vec!["String Spec"]);
    assert_eq!(config.run.gradle_command, "gradle");
    assert_eq!(config.run.test_task, "test");
    assert!(!config.explorer.expand_all);
    assert_eq!(config.discovery.extensions, vec!["kt", "kts"]);
}

#[test]
fn test_load_from_project_file() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join(PROJECT_CONFIG_FILE),
        "[run]\ntest_task = \"jvmTest\"\n",
    )
    .unwrap();

    let config = Config::load_from(dir.path()).unwrap();
    assert_eq!(config.run.test_task, "jvmTest");
}

#[test]
fn test_invalid_config_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(PROJECT_CONFIG_FILE);

    fs::write(&path, "[explorer]\ntick_rate_ms = 0\n").unwrap();
    assert!(matches!(Config::from_file(&path), Err(ConfigError::Invalid(_))));

    fs::write(&path, "[discovery\n").unwrap();
    assert!(matches!(Config::from_file(&path), Err(ConfigError::ParseError(_))));
}

#[test]
fn test_disabled_styles_reach_discovery() {
    let config: Config = toml::from_str("[discovery]\ndisabled_styles = [\"funspec\"]\n").unwrap();
    let discovery = SpecDiscovery::from_config(&config.discovery);
    assert!(discovery.registry().style_by_name("Fun Spec").is_none());
    assert!(discovery.registry().style_by_name("Feature Spec").is_some());
}
