use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::warn;

use crate::error::ConfigError;

/// Default location certbot setups keep the PowerDNS credentials in.
pub const DEFAULT_CREDENTIALS_PATH: &str = "/etc/letsencrypt/certbot-powerdns.json";

#[derive(Clone)]
pub struct Credentials {
    pub api_url: String, // server root, e.g. "http://127.0.0.1:8081"
    pub api_key: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
struct CredentialsFile {
    api_url: Option<String>,
    api_key: Option<String>,
}

impl Credentials {
    pub fn new(api_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            api_key: api_key.into(),
        }
    }

    /// Explicit values override the file; with both given the file is not read.
    pub fn load(
        path: &Path,
        api_url: Option<String>,
        api_key: Option<String>,
    ) -> Result<Self, ConfigError> {
        if let (Some(api_url), Some(api_key)) = (&api_url, &api_key) {
            return Ok(Self::new(api_url.clone(), api_key.clone()));
        }

        let mut credentials = Self::from_file(path)?;
        if let Some(url) = api_url {
            credentials.api_url = url;
        }
        if let Some(key) = api_key {
            credentials.api_key = key;
        }
        Ok(credentials)
    }

    /// Loads `{"api-url": ..., "api-key": ...}` from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        warn_if_accessible_by_others(path);

        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw).map_err(|err| match err {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })
    }

    fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let file: CredentialsFile =
            serde_json::from_str(raw).map_err(|source| ConfigError::Parse {
                path: PathBuf::new(),
                source,
            })?;

        let api_url = non_empty(file.api_url).ok_or(ConfigError::MissingField("api-url"))?;
        let api_key = non_empty(file.api_key).ok_or(ConfigError::MissingField("api-key"))?;
        Ok(Self { api_url, api_key })
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_url", &self.api_url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Any group or other permission bit set.
#[cfg(any(unix, test))]
fn accessible_by_others(mode: u32) -> bool {
    mode & 0o077 != 0
}

#[cfg(unix)]
fn warn_if_accessible_by_others(path: &Path) {
    use std::os::unix::fs::PermissionsExt;

    if let Ok(meta) = std::fs::metadata(path) {
        let mode = meta.permissions().mode();
        if accessible_by_others(mode) {
            warn!(
                path = %path.display(),
                mode = %format!("{:o}", mode & 0o777),
                "unsafe permissions on credentials file"
            );
        }
    }
}

#[cfg(not(unix))]
fn warn_if_accessible_by_others(_path: &Path) {}
