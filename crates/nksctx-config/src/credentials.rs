//! NCP API credentials.
//!
//! Environment variables win when both keys are set; otherwise a profile section of the
//! INI-style `~/.ncloud/configure` file is used.

use std::collections::HashMap;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

pub const DEFAULT_API_URL: &str = "https://ncloud.apigw.ntruss.com";
pub const DEFAULT_PROFILE: &str = "DEFAULT";

const ENV_ACCESS_KEY: &str = "NCLOUD_ACCESS_KEY";
const ENV_SECRET_KEY: &str = "NCLOUD_SECRET_KEY";
const ENV_API_GW: &str = "NCLOUD_API_GW";
const ENV_REGION: &str = "NCLOUD_REGION";

const KEY_ACCESS_KEY: &str = "ncloud_access_key_id";
const KEY_SECRET_KEY: &str = "ncloud_secret_access_key";
const KEY_API_URL: &str = "ncloud_api_url";
const KEY_REGION: &str = "ncloud_region";

#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub access_key: String,
    pub secret_key: String,
    pub api_url: String,
    pub region: Option<String>,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .field("api_url", &self.api_url)
            .field("region", &self.region)
            .finish()
    }
}

#[derive(Debug)]
pub enum CredentialsError {
    FileUnreadable { path: PathBuf, source: io::Error },
    ProfileNotFound { profile: String, path: PathBuf },
    Incomplete { profile: String },
}

impl CredentialsError {
    fn reason(&self) -> String {
        match self {
            Self::FileUnreadable { path, source } => format!("could not read {}: {source}", path.display()),
            Self::ProfileNotFound { profile, path } => format!("profile '{profile}' not found in {}", path.display()),
            Self::Incomplete { profile } => format!("incomplete credentials in profile '{profile}'"),
        }
    }
}

impl fmt::Display for CredentialsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "NCP credentials not found ({}).\n\n\
             Set environment variables:\n  \
             export {ENV_ACCESS_KEY}=\"your-access-key\"\n  \
             export {ENV_SECRET_KEY}=\"your-secret-key\"\n  \
             export {ENV_API_GW}=\"{DEFAULT_API_URL}\"  # optional\n\n\
             Or configure ~/.ncloud/configure with a profile.",
            self.reason()
        )
    }
}

impl std::error::Error for CredentialsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::FileUnreadable { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl Credentials {
    /// Resolve credentials from the process environment or `~/.ncloud/configure`.
    pub fn load(profile: Option<&str>) -> Result<Self, CredentialsError> {
        Self::resolve(|key| std::env::var(key).ok(), &configure_path(), profile)
    }

    pub fn resolve<F>(env: F, file: &Path, profile: Option<&str>) -> Result<Self, CredentialsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| env(key).filter(|v| !v.is_empty());

        if let (Some(access_key), Some(secret_key)) = (lookup(ENV_ACCESS_KEY), lookup(ENV_SECRET_KEY)) {
            tracing::debug!("using NCP credentials from environment");
            return Ok(Self {
                access_key,
                secret_key,
                api_url: lookup(ENV_API_GW).unwrap_or_else(|| DEFAULT_API_URL.into()),
                region: lookup(ENV_REGION),
            });
        }

        Self::from_file(file, profile)
    }

    pub fn from_file(path: &Path, profile: Option<&str>) -> Result<Self, CredentialsError> {
        let profile = profile.filter(|p| !p.is_empty()).unwrap_or(DEFAULT_PROFILE);
        let contents = std::fs::read_to_string(path)
            .map_err(|source| CredentialsError::FileUnreadable { path: path.to_path_buf(), source })?;

        let mut sections = parse_ini(&contents);
        let Some(mut section) = sections.remove(profile) else {
            return Err(CredentialsError::ProfileNotFound { profile: profile.into(), path: path.to_path_buf() });
        };
        let mut take = |key: &str| section.remove(key).filter(|v| !v.is_empty());

        let (Some(access_key), Some(secret_key)) = (take(KEY_ACCESS_KEY), take(KEY_SECRET_KEY)) else {
            return Err(CredentialsError::Incomplete { profile: profile.into() });
        };

        tracing::debug!(profile, path = %path.display(), "using NCP credentials from profile");
        Ok(Self {
            access_key,
            secret_key,
            api_url: take(KEY_API_URL).unwrap_or_else(|| DEFAULT_API_URL.into()),
            region: take(KEY_REGION),
        })
    }
}

pub fn configure_path() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")).join(".ncloud").join("configure")
}

/// Split an INI document into `section -> key -> value`. Keys before any header land in
/// `DEFAULT`; later duplicates overwrite earlier ones.
fn parse_ini(contents: &str) -> HashMap<String, HashMap<String, String>> {
    let mut sections: HashMap<String, HashMap<String, String>> = HashMap::new();
    let mut current = DEFAULT_PROFILE.to_string();
    sections.entry(current.clone()).or_default();

    for line in contents.lines().map(str::trim) {
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }

        if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            current = name.trim().to_string();
            sections.entry(current.clone()).or_default();
            continue;
        }

        if let Some((key, value)) = line.split_once('=') {
            let key = key.trim();
            if key.is_empty() {
                continue;
            }
            sections.entry(current.clone()).or_default().insert(key.to_string(), value.trim().to_string());
        }
    }

    sections
}
