//! Client configuration parsed from environment variables.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::path::PathBuf;

use crate::net::api::DEFAULT_REQUEST_TIMEOUT_SECS;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";
/// Directory name created under the platform data dir.
pub const STATE_DIR_NAME: &str = "seatrack";

pub const BASE_URL_ENV: &str = "SEATRACK_BASE_URL";
pub const TIMEOUT_ENV: &str = "SEATRACK_TIMEOUT_SECS";
pub const STATE_DIR_ENV: &str = "SEATRACK_STATE_DIR";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Neither `SEATRACK_STATE_DIR` nor a platform data dir is available.
    #[error("no state directory: set {STATE_DIR_ENV}")]
    NoStateDir,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Backend origin without the `/api` prefix, no trailing `/`.
    pub base_url: String,
    pub timeout_secs: u64,
    /// Where the persisted user lives on native builds.
    pub state_dir: PathBuf,
}

impl ClientConfig {
    /// Build typed client config from explicit overrides, falling back to
    /// environment variables and then to defaults for anything not supplied.
    ///
    /// Optional:
    /// - `SEATRACK_BASE_URL`: default `http://127.0.0.1:5000`
    /// - `SEATRACK_TIMEOUT_SECS`: default 10; unparsable or `0` means default
    /// - `SEATRACK_STATE_DIR`: default `<data dir>/seatrack`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NoStateDir`] when no state directory can be found.
    pub fn from_env_with(
        base_url: Option<&str>,
        timeout_secs: Option<u64>,
        state_dir: Option<PathBuf>,
    ) -> Result<Self, ConfigError> {
        let env_base_url = std::env::var(BASE_URL_ENV).ok();
        let base_url = base_url.or(env_base_url.as_deref());
        let timeout_secs = timeout_secs.or_else(|| env_parse_u64(TIMEOUT_ENV));
        let state_dir = state_dir.or_else(|| std::env::var_os(STATE_DIR_ENV).map(PathBuf::from));
        Self::resolve(base_url, timeout_secs, state_dir)
    }

    /// Apply defaults to whatever was supplied.
    ///
    /// A zero timeout would fail every request, so it is treated as unset.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NoStateDir`] when `state_dir` is `None` and the
    /// platform has no data dir.
    pub fn resolve(
        base_url: Option<&str>,
        timeout_secs: Option<u64>,
        state_dir: Option<PathBuf>,
    ) -> Result<Self, ConfigError> {
        let base_url = normalize_base_url(base_url.unwrap_or(DEFAULT_BASE_URL));
        let timeout_secs = timeout_secs.filter(|&secs| secs > 0).unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);
        let state_dir = match state_dir {
            Some(dir) => dir,
            None => default_state_dir().ok_or(ConfigError::NoStateDir)?,
        };
        Ok(Self { base_url, timeout_secs, state_dir })
    }
}

fn normalize_base_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return DEFAULT_BASE_URL.to_owned();
    }
    trimmed.trim_end_matches('/').to_owned()
}

fn default_state_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join(STATE_DIR_NAME))
}

fn env_parse_u64(key: &str) -> Option<u64> {
    std::env::var(key).ok().and_then(|v| v.trim().parse::<u64>().ok())
}
