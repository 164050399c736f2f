use std::{env, fs};

use blogpilot_client::config::loader::load_config;

#[test]
fn config_parsing_and_env_overrides_and_validation() {
    let dir = tempfile::tempdir().expect("tmp dir");
    let path = dir.path().join("blogpilot.toml");

    let toml_content = r#"
[api]
base_url = "https://api.blogpilot.example.com"
login_route = "/login"

[http]
timeout_ms = 5000
retry_limit = 3
retry_status_codes = [429, 503]

[cache]
default_stale_ms = 1000

[logging]
level = "debug"
"#;
    fs::write(&path, toml_content).expect("write toml");

    // 1) Valid config parses
    let cfg = load_config(path.to_str()).expect("should parse config");
    assert_eq!(cfg.api.base_url, "https://api.blogpilot.example.com");
    assert_eq!(cfg.api.login_route, "/login");
    assert_eq!(cfg.http.timeout_ms, 5000);
    assert_eq!(cfg.http.retry_limit, 3);
    assert_eq!(cfg.http.retry_status_codes, vec![429, 503]);
    assert_eq!(cfg.http.retry_min_delay_ms, 300);
    assert_eq!(cfg.cache.default_stale_ms, 1000);
    assert_eq!(cfg.logging.level, "debug");

    // 2) Env override should win over file
    unsafe {
        env::set_var("BLOGPILOT__HTTP__TIMEOUT_MS", "9000");
    }
    let cfg_env = load_config(path.to_str()).expect("should parse config with env overrides");
    assert_eq!(cfg_env.http.timeout_ms, 9000);
    unsafe {
        env::remove_var("BLOGPILOT__HTTP__TIMEOUT_MS");
    }

    // 3) Invalid retry list is rejected
    let bad = r#"
[http]
retry_status_codes = [401, 503]
"#;
    fs::write(&path, bad).expect("write bad toml");
    let err = load_config(path.to_str()).unwrap_err();
    assert!(err.contains("401"), "unexpected error: {err}");

    // 4) Zero timeout is rejected
    let bad = r#"
[http]
timeout_ms = 0
"#;
    fs::write(&path, bad).expect("write bad toml");
    assert!(load_config(path.to_str()).is_err());
}

#[test]
fn missing_file_uses_defaults() {
    let dir = tempfile::tempdir().expect("tmp dir");
    let path = dir.path().join("absent.toml");
    let cfg = load_config(path.to_str()).expect("defaults are valid");
    assert_eq!(cfg.api.base_url, "http://localhost:8080");
    assert_eq!(cfg.http.retry_status_codes, vec![408, 413, 429, 500, 502, 503, 504]);
    assert_eq!(cfg.logging.level, "warn");
}
