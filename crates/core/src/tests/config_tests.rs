use super::*;

#[test]
fn empty_config_uses_defaults() {
    let config = MigrationConfig::from_toml_str("").expect("empty config");
    assert_eq!(config, MigrationConfig::default());
    assert!(config.compress);
    assert_eq!(config.limits.max_payload_bytes, 67_108_864);
    assert_eq!(config.limits.max_container_depth, 32);
}

#[test]
fn full_config_parses_every_field() {
    let config = MigrationConfig::from_toml_str(
        r#"
mapping_file = "/srv/maps/mappings.json"
compress = false
candidate_policy = "target_scope_first"

[limits]
max_payload_bytes = 1024
"#,
    )
    .expect("full config");
    assert_eq!(
        config.mapping_file.as_deref(),
        Some(Path::new("/srv/maps/mappings.json"))
    );
    assert!(!config.compress);
    assert_eq!(config.candidate_policy, CandidatePolicy::TargetScopeFirst);
    assert_eq!(config.limits.max_payload_bytes, 1024);
    assert_eq!(config.limits.max_container_depth, 32);
}

#[test]
fn unknown_policy_is_a_parse_error() {
    let err = MigrationConfig::from_toml_str(r#"candidate_policy = "random""#)
        .expect_err("unknown policy");
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn load_resolves_relative_mapping_path() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("mcm.toml");
    std::fs::write(&path, "mapping_file = \"mappings.json\"\n").expect("write config");

    let config = MigrationConfig::load(&path).expect("load");
    assert_eq!(config.mapping_file, Some(dir.path().join("mappings.json")));

    let err = MigrationConfig::load(&dir.path().join("missing.toml")).expect_err("missing");
    assert!(matches!(err, ConfigError::Io(_)));
}
