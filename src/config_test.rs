use super::*;

/// # Safety
/// Tests must run with `--test-threads=1` to avoid env races.
unsafe fn clear_seatrack_env() {
    unsafe {
        std::env::remove_var(BASE_URL_ENV);
        std::env::remove_var(TIMEOUT_ENV);
        std::env::remove_var(STATE_DIR_ENV);
    }
}

#[test]
fn resolve_applies_defaults() {
    let cfg = ClientConfig::resolve(None, None, Some(PathBuf::from("/tmp/seatrack-state"))).unwrap();
    assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
    assert_eq!(cfg.timeout_secs, DEFAULT_REQUEST_TIMEOUT_SECS);
    assert_eq!(cfg.timeout_secs, 10);
    assert_eq!(cfg.state_dir, PathBuf::from("/tmp/seatrack-state"));
}

#[test]
fn resolve_trims_trailing_slash_and_whitespace() {
    let cfg = ClientConfig::resolve(Some(" https://ocean.example.test/ "), Some(3), Some(PathBuf::from("/s")))
        .unwrap();
    assert_eq!(cfg.base_url, "https://ocean.example.test");
    assert_eq!(cfg.timeout_secs, 3);
}

#[test]
fn resolve_blank_base_url_falls_back_to_default() {
    let cfg = ClientConfig::resolve(Some("   "), None, Some(PathBuf::from("/s"))).unwrap();
    assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
}

#[test]
fn resolve_zero_timeout_uses_default() {
    let cfg = ClientConfig::resolve(None, Some(0), Some(PathBuf::from("/s"))).unwrap();
    assert_eq!(cfg.timeout_secs, DEFAULT_REQUEST_TIMEOUT_SECS);
}

// Env-mutating cases share one test so they never race each other.
#[test]
fn from_env_with_layers_flags_over_env_over_defaults() {
    unsafe {
        clear_seatrack_env();
        std::env::set_var(BASE_URL_ENV, "http://backend.test:8080/");
        std::env::set_var(TIMEOUT_ENV, "42");
        std::env::set_var(STATE_DIR_ENV, "/var/lib/seatrack-test");
    }

    let cfg = ClientConfig::from_env_with(None, None, None).unwrap();
    assert_eq!(cfg.base_url, "http://backend.test:8080");
    assert_eq!(cfg.timeout_secs, 42);
    assert_eq!(cfg.state_dir, PathBuf::from("/var/lib/seatrack-test"));

    let cfg = ClientConfig::from_env_with(Some("http://flag.test"), Some(7), Some(PathBuf::from("/flag"))).unwrap();
    assert_eq!(cfg.base_url, "http://flag.test");
    assert_eq!(cfg.timeout_secs, 7);
    assert_eq!(cfg.state_dir, PathBuf::from("/flag"));

    unsafe { std::env::set_var(TIMEOUT_ENV, "0") };
    let cfg = ClientConfig::from_env_with(None, None, None).unwrap();
    assert_eq!(cfg.timeout_secs, DEFAULT_REQUEST_TIMEOUT_SECS);

    unsafe { std::env::set_var(TIMEOUT_ENV, "soon") };
    let cfg = ClientConfig::from_env_with(None, None, None).unwrap();
    assert_eq!(cfg.timeout_secs, DEFAULT_REQUEST_TIMEOUT_SECS);

    unsafe { clear_seatrack_env() };
}

#[test]
fn env_parse_u64_invalid_is_none() {
    let key = "__TEST_SEATRACK_TIMEOUT_BAD_4411__";
    unsafe { std::env::set_var(key, "soon") };
    assert_eq!(env_parse_u64(key), None);
    unsafe { std::env::remove_var(key) };
}

#[test]
fn env_parse_u64_unset_is_none() {
    assert_eq!(env_parse_u64("__TEST_SEATRACK_SURELY_UNSET_93__"), None);
}

#[test]
fn env_parse_u64_trims_whitespace() {
    let key = "__TEST_SEATRACK_TIMEOUT_WS_5120__";
    unsafe { std::env::set_var(key, " 15 ") };
    assert_eq!(env_parse_u64(key), Some(15));
    unsafe { std::env::remove_var(key) };
}
