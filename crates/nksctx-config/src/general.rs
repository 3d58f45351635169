use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiConfig {
    #[serde(alias = "request-timeout-secs")]
    pub request_timeout_secs: u64,
}

impl ApiConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self { request_timeout_secs: 30 }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthenticatorConfig {
    pub binary: String,
    #[serde(alias = "search-paths")]
    pub search_paths: Vec<String>,
}

impl Default for AuthenticatorConfig {
    fn default() -> Self {
        Self {
            binary: "ncp-iam-authenticator".into(),
            search_paths: vec![
                "/usr/local/bin/ncp-iam-authenticator".into(),
                "/opt/homebrew/bin/ncp-iam-authenticator".into(),
            ],
        }
    }
}
