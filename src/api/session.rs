//! Authenticated session state loaded from disk

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::{ApiError, ApiResult};

/// Session identifiers and cookies required by the drive service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub dsid: String,
    pub drivews_url: String,
    #[serde(default)]
    pub cookies: BTreeMap<String, String>,
}

impl Session {
    pub fn load(path: &Path) -> ApiResult<Self> {
        if !path.exists() {
            return Err(ApiError::Session(format!(
                "session file not found: {}",
                path.display()
            )));
        }

        let content = fs::read_to_string(path)?;
        let session: Session = serde_json::from_str(&content)
            .map_err(|e| ApiError::Session(format!("invalid session file {}: {}", path.display(), e)))?;

        debug!("loaded session from {}: {} cookies", path.display(), session.cookies.len());

        Ok(session)
    }

    pub fn save(&self, path: &Path) -> ApiResult<()> {
        let content = serde_json::to_string_pretty(self)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(path, content)?;

        Ok(())
    }

    /// Value of the `Cookie` request header
    pub fn cookie_header(&self) -> String {
        self.cookies
            .iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// Apply one `Set-Cookie` header; an empty value drops the cookie
    pub fn apply_set_cookie(&mut self, header: &str) {
        let pair = header.split(';').next().unwrap_or_default().trim();

        let Some((name, value)) = pair.split_once('=') else {
            return;
        };

        let name = name.trim();
        if name.is_empty() {
            return;
        }

        let value = value.trim().trim_matches('"');
        if value.is_empty() {
            self.cookies.remove(name);
        } else {
            self.cookies.insert(name.to_string(), value.to_string());
        }
    }
}

/// Default location of the session file
pub fn default_session_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("~/.config"))
        .join("idrive")
        .join("session.json")
}
