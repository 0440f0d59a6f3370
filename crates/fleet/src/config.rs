//! Run configuration: target repository, per-operation timeout and the bot
//! template.
//!
//! Parsed from TOML and validated once; a run never starts with an invalid
//! configuration.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::{BotConfigTemplate, RepositoryId};

/// Timeout applied to every bounded wait when the configuration omits one.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// Errors raised while loading a [`SyncConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unable to read configuration file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration is not valid TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration value for '{field}': {reason}")]
    Invalid { field: &'static str, reason: String },
}

#[derive(Debug, Deserialize)]
struct RawSyncConfig {
    repository: String,
    #[serde(default = "default_timeout_secs")]
    timeout_secs: u64,
    template: BotConfigTemplate,
}

/// Validated configuration for a reconciliation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    pub repository: RepositoryId,
    pub timeout_secs: u64,
    pub template: BotConfigTemplate,
}

impl SyncConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let raw: RawSyncConfig = toml::from_str(source)?;
        Self::validate(raw)
    }

    /// Reads `path` and delegates to [`SyncConfig::from_toml_str`].
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Per-operation bound for every collaborator call.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    fn validate(raw: RawSyncConfig) -> Result<Self, ConfigError> {
        let repository = parse_repository(&raw.repository)?;

        if raw.timeout_secs == 0 {
            return Err(invalid("timeout_secs", "must be greater than zero"));
        }

        let template = &raw.template;
        for (field, value) in [
            ("template.project_or_workspace", &template.project_or_workspace),
            ("template.scheme_name", &template.scheme_name),
            ("template.public_key", &template.public_key),
            ("template.private_key", &template.private_key),
        ] {
            if value.trim().is_empty() {
                return Err(invalid(field, "must not be empty"));
            }
        }

        Ok(Self {
            repository,
            timeout_secs: raw.timeout_secs,
            template: raw.template,
        })
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

fn parse_repository(value: &str) -> Result<RepositoryId, ConfigError> {
    let well_formed = matches!(
        value.split_once('/'),
        Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/')
    );
    if !well_formed {
        return Err(invalid(
            "repository",
            format!("expected 'owner/repo', got '{value}'"),
        ));
    }
    RepositoryId::new(value).ok_or_else(|| invalid("repository", "must not be empty"))
}
