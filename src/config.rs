use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::PathBuf;

use crate::error::ConfigError;
use crate::validation::validate_server_url;

// Default configuration
pub const DEFAULT_SERVER: &str = "http://localhost:8000";
const KEYRING_SERVICE: &str = "raven-desk";

/// Connection settings handed to the backend.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerSettings {
    pub server_url: String,
    /// Realtime endpoint; defaults to the server URL.
    pub socket_url: Option<String>,
    /// Socket.IO namespace; defaults to the server host name.
    pub site_name: Option<String>,
    pub api_key: String,
    pub api_secret: Option<String>,
}

impl ServerSettings {
    /// `Authorization` header value for token auth, when credentials are complete.
    pub fn auth_header(&self) -> Option<String> {
        match self.api_secret.as_deref() {
            Some(secret) if !self.api_key.is_empty() && !secret.is_empty() => {
                Some(format!("token {}:{}", self.api_key, secret))
            }
            _ => None,
        }
    }

    /// Namespace the realtime socket joins.
    pub fn namespace(&self) -> Option<String> {
        if let Some(site) = self.site_name.as_deref().filter(|s| !s.is_empty()) {
            return Some(site.to_string());
        }
        url::Url::parse(&self.server_url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_string))
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Settings {
    pub server_url: String,
    #[serde(default)]
    pub socket_url: Option<String>,
    #[serde(default)]
    pub site_name: Option<String>,
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub theme: String,
    /// Path of the last opened view, restored on start.
    #[serde(default)]
    pub last_route: String,
    /// Extra character rule for channel names (regex). Unset by default.
    #[serde(default)]
    pub channel_name_pattern: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER.to_string(),
            socket_url: None,
            site_name: None,
            api_key: String::new(),
            theme: "dark".to_string(),
            last_route: String::new(),
            channel_name_pattern: None,
        }
    }
}

impl Settings {
    /// Apply `RAVEN_SERVER_URL` / `RAVEN_API_KEY` from the environment.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("RAVEN_SERVER_URL") {
            if !url.is_empty() {
                self.server_url = url;
            }
        }
        if let Ok(key) = std::env::var("RAVEN_API_KEY") {
            if !key.is_empty() {
                self.api_key = key;
            }
        }
    }

    /// Build backend settings. The secret comes from `RAVEN_API_SECRET` or the keyring.
    pub fn server_settings(&self) -> Result<ServerSettings, ConfigError> {
        let url = validate_server_url(&self.server_url)?;
        let api_secret = match std::env::var("RAVEN_API_SECRET") {
            Ok(secret) if !secret.is_empty() => Some(secret),
            _ => load_api_secret(&self.api_key),
        };
        Ok(ServerSettings {
            server_url: url.as_str().trim_end_matches('/').to_string(),
            socket_url: self.socket_url.clone().filter(|s| !s.is_empty()),
            site_name: self.site_name.clone().filter(|s| !s.is_empty()),
            api_key: self.api_key.clone(),
            api_secret,
        })
    }
}

pub fn settings_path() -> Result<PathBuf, ConfigError> {
    let proj = ProjectDirs::from("com", "raven", "raven-desk").ok_or(ConfigError::NoConfigDir)?;
    let dir = proj.config_dir();
    fs::create_dir_all(dir)?;
    Ok(dir.join("settings.json"))
}

/// Load persisted settings; missing or unreadable files fall back to defaults.
pub fn load_settings() -> Settings {
    let loaded = settings_path().and_then(|path| {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str::<Settings>(&content)?)
    });
    match loaded {
        Ok(settings) => settings,
        Err(e) => {
            tracing::debug!(error = %e, "Using default settings");
            Settings::default()
        }
    }
}

pub fn save_settings(settings: &Settings) -> Result<(), ConfigError> {
    let path = settings_path()?;
    let data = serde_json::to_string_pretty(settings)?;
    let mut file = fs::File::create(path)?;
    file.write_all(data.as_bytes())?;
    Ok(())
}

/// Read the API secret stored for `api_key`.
pub fn load_api_secret(api_key: &str) -> Option<String> {
    if api_key.is_empty() {
        return None;
    }
    let entry = keyring::Entry::new(KEYRING_SERVICE, api_key).ok()?;
    entry.get_password().ok()
}

/// Store the API secret for `api_key` in the OS keyring.
pub fn store_api_secret(api_key: &str, secret: &str) -> Result<(), ConfigError> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, api_key)?;
    entry.set_password(secret)?;
    Ok(())
}
