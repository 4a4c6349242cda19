use std::fs;
use std::path::PathBuf;

use serde::Deserialize;

use crate::domain::table::SearchMode;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/apis/v1/";
pub const DEFAULT_PAGE_SIZE: u64 = 20;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// API base, e.g. "https://crm.example.com/apis/v1/"
    pub base_url: String,

    /// Rows requested per page
    pub page_size: u64,

    /// Whether search narrows the loaded page locally or is sent to the
    /// server as a query parameter
    pub search_mode: SearchMode,

    /// Session database override; defaults under the platform data dir
    pub session_db: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            search_mode: SearchMode::default(),
            session_db: None,
        }
    }
}

pub fn load() -> Config {
    let Some(path) = config_path() else {
        return Config::default();
    };
    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(_) => return Config::default(),
    };
    toml::from_str::<Config>(&content).unwrap_or_default()
}

pub fn config_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os("STEWARD_CONFIG").map(PathBuf::from) {
        return Some(path);
    }
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from) {
        return Some(xdg.join("steward").join("config.toml"));
    }
    if let Some(home) = std::env::var_os("HOME").map(PathBuf::from) {
        return Some(home.join(".config").join("steward").join("config.toml"));
    }

    directories::ProjectDirs::from("io", "steward", "steward")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

pub fn data_dir() -> Option<PathBuf> {
    if let Some(xdg) = std::env::var_os("XDG_DATA_HOME").map(PathBuf::from) {
        return Some(xdg.join("steward"));
    }
    if let Some(home) = std::env::var_os("HOME").map(PathBuf::from) {
        return Some(home.join(".local").join("share").join("steward"));
    }
    directories::ProjectDirs::from("io", "steward", "steward")
        .map(|dirs| dirs.data_dir().to_path_buf())
}

pub fn session_db_path(config: &Config) -> Option<PathBuf> {
    if let Some(path) = config.session_db.as_deref() {
        return Some(PathBuf::from(path));
    }
    data_dir().map(|dir| dir.join("session.sqlite3"))
}
