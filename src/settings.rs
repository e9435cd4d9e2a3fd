// src/settings.rs
//! Environment knobs: every input/output path has an `ENV_*` override and
//! a repo-relative default. `.env` is honored by the binaries.

use std::path::PathBuf;

pub const ENV_DATA_FILE: &str = "DATA_FILE";
pub const ENV_STATUS_FILE: &str = "STATUS_FILE";
pub const ENV_FEEDS_PATH: &str = "FEEDS_PATH";
pub const ENV_AIRPORTS_PATH: &str = "AIRPORTS_PATH";
pub const ENV_WATCH_TERMS_PATH: &str = "WATCH_TERMS_PATH";

pub const DEFAULT_DATA_FILE: &str = "data.json";
pub const DEFAULT_STATUS_FILE: &str = "status.json";
pub const DEFAULT_FEEDS_PATH: &str = "config/feeds.toml";
pub const DEFAULT_AIRPORTS_PATH: &str = "config/airports.json";
pub const DEFAULT_WATCH_TERMS_PATH: &str = "config/watch_terms.toml";

#[derive(Debug, Clone)]
pub struct Settings {
    pub data_file: PathBuf,
    pub status_file: PathBuf,
    pub feeds_path: PathBuf,
    pub airports_path: PathBuf,
    pub watch_terms_path: PathBuf,
}

fn env_path(key: &str, default: &str) -> PathBuf {
    std::env::var(key)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(default))
}

impl Settings {
    pub fn from_env() -> Self {
        Self {
            data_file: env_path(ENV_DATA_FILE, DEFAULT_DATA_FILE),
            status_file: env_path(ENV_STATUS_FILE, DEFAULT_STATUS_FILE),
            feeds_path: env_path(ENV_FEEDS_PATH, DEFAULT_FEEDS_PATH),
            airports_path: env_path(ENV_AIRPORTS_PATH, DEFAULT_AIRPORTS_PATH),
            watch_terms_path: env_path(ENV_WATCH_TERMS_PATH, DEFAULT_WATCH_TERMS_PATH),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[serial_test::serial]
    #[test]
    fn env_overrides_defaults() {
        std::env::remove_var(ENV_DATA_FILE);
        assert_eq!(Settings::from_env().data_file, PathBuf::from(DEFAULT_DATA_FILE));

        std::env::set_var(ENV_DATA_FILE, "/tmp/out.json");
        assert_eq!(Settings::from_env().data_file, PathBuf::from("/tmp/out.json"));
        std::env::remove_var(ENV_DATA_FILE);
    }
}
