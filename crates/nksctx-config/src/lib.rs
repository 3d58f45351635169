pub mod credentials;
pub mod general;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub use credentials::{Credentials, CredentialsError, DEFAULT_API_URL, DEFAULT_PROFILE};
pub use general::{ApiConfig, AuthenticatorConfig};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub authenticator: AuthenticatorConfig,
}

pub const DEFAULT_CONFIG: &str = include_str!("defaults.toml");

impl Default for AppConfig {
    fn default() -> Self {
        toml::from_str(DEFAULT_CONFIG).expect("embedded defaults must parse")
    }
}

impl AppConfig {
    /// Defaults merged with the user file. A broken user file is reported and ignored.
    pub fn load() -> Self {
        let path = Self::default_path();
        if !path.exists() {
            return Self::default();
        }

        Self::load_from(&path).unwrap_or_else(|e| {
            eprintln!("Warning: ignoring config at {}: {e:#}", path.display());
            Self::default()
        })
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let mut config = Self::default();
        let contents = std::fs::read_to_string(path)?;
        let user: AppConfig = toml::from_str(&contents)?;
        config.merge(user);
        Ok(config)
    }

    pub fn default_path() -> PathBuf {
        dirs::config_dir().unwrap_or_else(|| PathBuf::from(".")).join("nks-ctx").join("config.toml")
    }

    fn merge(&mut self, user: AppConfig) {
        self.api = user.api;

        // An empty search list in the user file keeps the built-in locations.
        self.authenticator.binary = user.authenticator.binary;
        if !user.authenticator.search_paths.is_empty() {
            self.authenticator.search_paths = user.authenticator.search_paths;
        }
    }
}

#[cfg(test)]
mod tests;
