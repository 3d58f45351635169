use super::*;

#[test]
fn default_config_has_thirty_second_timeout() {
    let config = AppConfig::default();
    assert_eq!(config.api.request_timeout_secs, 30);
    assert_eq!(config.api.request_timeout(), std::time::Duration::from_secs(30));
}

#[test]
fn default_config_has_authenticator_locations() {
    let config = AppConfig::default();
    assert_eq!(config.authenticator.binary, "ncp-iam-authenticator");
    assert_eq!(
        config.authenticator.search_paths,
        vec!["/usr/local/bin/ncp-iam-authenticator", "/opt/homebrew/bin/ncp-iam-authenticator"]
    );
}

#[test]
fn embedded_defaults_match_rust_defaults() {
    let config: AppConfig = toml::from_str(DEFAULT_CONFIG).unwrap();
    assert_eq!(config.api.request_timeout_secs, ApiConfig::default().request_timeout_secs);
    assert_eq!(config.authenticator.search_paths, AuthenticatorConfig::default().search_paths);
}

#[test]
fn kebab_case_aliases_are_accepted() {
    let raw = r#"
[api]
request-timeout-secs = 5

[authenticator]
search-paths = ["/opt/ncp/bin/ncp-iam-authenticator"]
"#;
    let config: AppConfig = toml::from_str(raw).unwrap();
    assert_eq!(config.api.request_timeout_secs, 5);
    assert_eq!(config.authenticator.search_paths, vec!["/opt/ncp/bin/ncp-iam-authenticator"]);
}

#[test]
fn partial_toml_only_api_merges_with_defaults() {
    let mut base = AppConfig::default();
    let user: AppConfig = toml::from_str("[api]\nrequest_timeout_secs = 10\n").unwrap();
    base.merge(user);

    assert_eq!(base.api.request_timeout_secs, 10);
    assert_eq!(base.authenticator.binary, "ncp-iam-authenticator");
    assert_eq!(base.authenticator.search_paths.len(), 2);
}

#[test]
fn empty_search_paths_keep_builtin_locations() {
    let mut base = AppConfig::default();
    let user: AppConfig = toml::from_str("[authenticator]\nbinary = \"ncp-auth\"\nsearch_paths = []\n").unwrap();
    base.merge(user);

    assert_eq!(base.authenticator.binary, "ncp-auth");
    assert_eq!(base.authenticator.search_paths.len(), 2);
}

#[test]
fn load_from_reads_user_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[api]\nrequest_timeout_secs = 3\n").unwrap();

    let config = AppConfig::load_from(&path).unwrap();
    assert_eq!(config.api.request_timeout_secs, 3);
}

#[test]
fn load_from_rejects_invalid_toml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[api\nrequest_timeout_secs = ").unwrap();

    assert!(AppConfig::load_from(&path).is_err());
}

#[test]
fn default_path_ends_with_tool_dir() {
    let path = AppConfig::default_path();
    assert!(path.ends_with("nks-ctx/config.toml"));
}

#[cfg(target_os = "linux")]
#[test]
fn load_reads_file_at_default_path() {
    let dir = tempfile::tempdir().unwrap();
    std::env::set_var("XDG_CONFIG_HOME", dir.path());
    let path = AppConfig::default_path();
    assert!(path.starts_with(dir.path()));

    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, "[api]\nrequest_timeout_secs = 7\n").unwrap();
    assert_eq!(AppConfig::load().api.request_timeout_secs, 7);

    std::fs::write(&path, "[api\n").unwrap();
    assert_eq!(AppConfig::load().api.request_timeout_secs, AppConfig::default().api.request_timeout_secs);
    std::env::remove_var("XDG_CONFIG_HOME");
}
