use scribe_engine::config::loader::LOCAL_CONFIG;
use scribe_engine::config::{
    CollisionPolicy, ConfigError, ConfigLoader, ScribeConfig, TypeTargetPolicy,
};
use std::path::PathBuf;

#[test]
fn test_defaults() {
    let config = ScribeConfig::default();
    assert_eq!(config.paths.log_file, PathBuf::from("appium.log"));
    assert_eq!(config.paths.registry_file, PathBuf::from("locators.json"));
    assert_eq!(config.paths.steps_file, PathBuf::from("steps.txt"));
    assert_eq!(config.reader.poll_interval_ms, 100);
    assert_eq!(
        config.correlation.type_target_policy,
        TypeTargetPolicy::OneShot
    );
    assert_eq!(config.correlation.collision_policy, CollisionPolicy::Suffix);
    assert!(config.oracle.enabled);
    assert_eq!(config.oracle.model, "gemini-2.5-flash");
    assert_eq!(config.oracle.api_key_env, "GEMINI_API_KEY");
}

#[test]
fn test_empty_document_is_default() {
    let config = ConfigLoader::parse("  \n").unwrap();
    assert_eq!(config.reader.poll_interval_ms, 100);
}

#[test]
fn test_partial_document_keeps_other_defaults() {
    let yaml = r#"
paths:
  log_file: /var/log/appium/server.log
correlation:
  type_target_policy: sticky
  collision_policy: overwrite
oracle:
  enabled: false
"#;
    let config = ConfigLoader::parse(yaml).unwrap();
    assert_eq!(
        config.paths.log_file,
        PathBuf::from("/var/log/appium/server.log")
    );
    assert_eq!(config.paths.steps_file, PathBuf::from("steps.txt"));
    assert_eq!(config.correlation.type_target_policy, TypeTargetPolicy::Sticky);
    assert_eq!(
        config.correlation.collision_policy,
        CollisionPolicy::Overwrite
    );
    assert!(!config.oracle.enabled);
    assert_eq!(config.oracle.timeout_ms, 10000);
}

#[test]
fn test_invalid_policy_is_a_parse_error() {
    let err = ConfigLoader::parse("correlation:\n  type_target_policy: sometimes\n").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[tokio::test]
async fn test_load_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scribe.yaml");
    std::fs::write(&path, "reader:\n  poll_interval_ms: 250\n").unwrap();

    let config = ConfigLoader::load_from(&path).await.unwrap();
    assert_eq!(config.reader.poll_interval_ms, 250);

    let missing_path = dir.path().join("nope.yaml");
    let missing = ConfigLoader::load_from(&missing_path).await;
    assert!(matches!(missing, Err(ConfigError::Io { ref path, .. }) if *path == missing_path));
}

#[tokio::test]
async fn test_explicit_path_wins_and_must_exist() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("custom.yaml");
    std::fs::write(&path, "correlation:\n  type_target_policy: sticky\n").unwrap();

    let config = ConfigLoader::load(Some(&path)).await.unwrap();
    assert_eq!(config.correlation.type_target_policy, TypeTargetPolicy::Sticky);

    let err = ConfigLoader::load(Some(&dir.path().join("absent.yaml")))
        .await
        .unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
}

#[test]
fn test_search_paths_start_with_local_file() {
    let paths = ConfigLoader::search_paths();
    assert!(paths[0].ends_with(LOCAL_CONFIG));
    if let Some(last) = paths.get(1) {
        assert!(last.ends_with(".scribe/config.yaml"));
    }
}

#[test]
fn test_zero_poll_interval_is_rejected() {
    let err = ConfigLoader::parse("reader:\n  poll_interval_ms: 0\n").unwrap_err();
    assert!(matches!(
        err,
        ConfigError::Invalid {
            field: "reader.poll_interval_ms",
            ..
        }
    ));
}

#[test]
fn test_zero_timeout_only_matters_when_oracle_enabled() {
    let err = ConfigLoader::parse("oracle:\n  timeout_ms: 0\n").unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { field: "oracle.timeout_ms", .. }));

    let config = ConfigLoader::parse("oracle:\n  enabled: false\n  timeout_ms: 0\n").unwrap();
    assert!(!config.oracle.enabled);
}
