//! Persisted user settings.
//!
//! # Responsibility
//! - Load and save the JSON settings file.
//! - Resolve blank values to defaults for every consumer.
//!
//! # Invariants
//! - Missing file or missing keys mean defaults; they are never errors.
//! - API keys never appear in `Debug` output or logs.

use crate::model::time::DEFAULT_STAMP_FORMAT;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub const DEFAULT_NOTIFICATION_FOLDER: &str = "Archives/Notifications";
pub const DEFAULT_ANALYSIS_FOLDER: &str = "Topics";
pub const DEFAULT_PROVIDER: &str = "openai";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

pub const PROVIDER_OPENAI: &str = "openai";
pub const PROVIDER_CLAUDE: &str = "claude";
pub const PROVIDER_GROQ: &str = "groq";

/// Settings file failure.
#[derive(Debug)]
pub enum ConfigError {
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    Serialize(serde_json::Error),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read { path, source } => {
                write!(f, "cannot read settings {}: {source}", path.display())
            }
            Self::Parse { path, source } => {
                write!(f, "invalid settings {}: {source}", path.display())
            }
            Self::Write { path, source } => {
                write!(f, "cannot write settings {}: {source}", path.display())
            }
            Self::Serialize(err) => write!(f, "cannot serialize settings: {err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Read { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
            Self::Write { source, .. } => Some(source),
            Self::Serialize(err) => Some(err),
        }
    }
}

/// User settings as stored on disk (camelCase JSON).
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    /// Base folder of captured documents and notifications.
    pub notification_folder: String,
    /// Folder that receives promoted topics.
    pub analysis_folder: String,
    /// Selected text-generation provider id.
    pub provider: String,
    pub model: String,
    pub openai_api_key: String,
    pub claude_api_key: String,
    pub groq_api_key: String,
    /// `YYYYMMDD_HHmmss`-style pattern, `ISO` or `Unix`.
    pub timestamp_format: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            notification_folder: DEFAULT_NOTIFICATION_FOLDER.to_string(),
            analysis_folder: DEFAULT_ANALYSIS_FOLDER.to_string(),
            provider: DEFAULT_PROVIDER.to_string(),
            model: DEFAULT_MODEL.to_string(),
            openai_api_key: String::new(),
            claude_api_key: String::new(),
            groq_api_key: String::new(),
            timestamp_format: DEFAULT_STAMP_FORMAT.to_string(),
        }
    }
}

impl Debug for Settings {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("notification_folder", &self.notification_folder)
            .field("analysis_folder", &self.analysis_folder)
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("openai_api_key", &redact(&self.openai_api_key))
            .field("claude_api_key", &redact(&self.claude_api_key))
            .field("groq_api_key", &redact(&self.groq_api_key))
            .field("timestamp_format", &self.timestamp_format)
            .finish()
    }
}

impl Settings {
    /// Reads settings from `path`. A missing file yields defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    "event=settings_load module=config status=ok path={} source=defaults",
                    path.display()
                );
                return Ok(Self::default());
            }
            Err(source) => {
                warn!(
                    "event=settings_load module=config status=error path={} error={}",
                    path.display(),
                    source
                );
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let settings = serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        info!(
            "event=settings_load module=config status=ok path={} source=file",
            path.display()
        );
        Ok(settings)
    }

    /// Writes settings to `path` as pretty JSON, creating parent folders.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let write_error = |source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(write_error)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        fs::write(path, json).map_err(write_error)?;
        info!(
            "event=settings_save module=config status=ok path={}",
            path.display()
        );
        Ok(())
    }

    /// Folder holding captured documents.
    pub fn base_folder(&self) -> &str {
        non_blank(&self.notification_folder, DEFAULT_NOTIFICATION_FOLDER)
    }

    /// Folder holding topic documents.
    pub fn topic_folder(&self) -> &str {
        non_blank(&self.analysis_folder, DEFAULT_ANALYSIS_FOLDER)
    }

    pub fn provider_id(&self) -> &str {
        non_blank(&self.provider, DEFAULT_PROVIDER)
    }

    pub fn model_name(&self) -> &str {
        non_blank(&self.model, DEFAULT_MODEL)
    }

    pub fn stamp_format(&self) -> &str {
        non_blank(&self.timestamp_format, DEFAULT_STAMP_FORMAT)
    }

    /// Non-blank credential configured for `provider`.
    pub fn api_key_for(&self, provider: &str) -> Option<&str> {
        let key = match provider {
            PROVIDER_OPENAI => &self.openai_api_key,
            PROVIDER_CLAUDE => &self.claude_api_key,
            PROVIDER_GROQ => &self.groq_api_key,
            _ => return None,
        };
        let key = key.trim();
        (!key.is_empty()).then_some(key)
    }
}

fn non_blank<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    let trimmed = value.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        fallback
    } else {
        trimmed
    }
}

fn redact(value: &str) -> &'static str {
    if value.trim().is_empty() {
        "<unset>"
    } else {
        "<redacted>"
    }
}
