//! Shared value types for the bot fleet domain.
//!
//! Unlike the newtype identifiers in [`crate::identifiers`], these types carry
//! several fields and participate in reconciliation decisions. All of them are
//! snapshots: they are fetched at the start of a run and never updated in
//! place.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{BotKey, BranchName, CommitSha, IntegrationNumber, PullRequestNumber, RepositoryId};

// ---------------------------------------------------------------------------
// Pull requests
// ---------------------------------------------------------------------------

/// An open pull request as reported by the repository client.
///
/// SHA, branch and title may be missing while GitHub is still computing them
/// (for example right after a force push). Such PRs are not ready and take no
/// part in reconciliation; see [`PullRequest::ready`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequest {
    pub number: PullRequestNumber,
    pub sha: Option<CommitSha>,
    pub branch: Option<BranchName>,
    pub title: Option<String>,
}

impl PullRequest {
    /// Returns the reconcilable view of this PR, or `None` if any of SHA,
    /// branch or title is missing (or the title normalises to nothing).
    pub fn ready(&self) -> Option<ReadyPullRequest> {
        let title = self.title.as_deref()?;
        Some(ReadyPullRequest {
            number: self.number,
            sha: self.sha.clone()?,
            branch: self.branch.clone()?,
            title: title.to_string(),
            bot_key: BotKey::from_title(title)?,
        })
    }
}

/// A pull request with every field reconciliation needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadyPullRequest {
    pub number: PullRequestNumber,
    pub sha: CommitSha,
    pub branch: BranchName,
    pub title: String,
    /// Name the matching bot carries.
    pub bot_key: BotKey,
}

// ---------------------------------------------------------------------------
// Integrations
// ---------------------------------------------------------------------------

/// One execution (build, test, analyze, archive) performed by a bot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Integration {
    pub number: IntegrationNumber,
    /// Textual phase reported by the CI backend (e.g. `"building"`, `"completed"`).
    pub current_step: String,
    /// Raw result text; mapped by [`crate::status::map_result`].
    pub result: String,
    /// Human-readable summary posted as a PR comment when the status changes.
    pub summary: String,
}

// ---------------------------------------------------------------------------
// Commit status
// ---------------------------------------------------------------------------

/// Commit status mirrored onto a pull request's head SHA.
///
/// [`CommitStatus::NoStatus`] is the sentinel for "nothing posted yet" and is
/// never written to the repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommitStatus {
    NoStatus,
    Pending,
    Success,
    Failure,
    Error,
}

impl CommitStatus {
    /// Wire spelling of the status (`"pending"`, `"success"`, ...).
    pub fn as_str(self) -> &'static str {
        match self {
            CommitStatus::NoStatus => "no_status",
            CommitStatus::Pending => "pending",
            CommitStatus::Success => "success",
            CommitStatus::Failure => "failure",
            CommitStatus::Error => "error",
        }
    }
}

impl std::fmt::Display for CommitStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Bot configuration
// ---------------------------------------------------------------------------

fn default_true() -> bool {
    true
}

/// Fields shared by every bot the fleet creates.
///
/// Loaded from configuration (see [`crate::config::SyncConfig`]) and used as the
/// prototype for [`BotConfiguration`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotConfigTemplate {
    /// Xcode project or workspace path, relative to the repository root.
    pub project_or_workspace: String,
    pub scheme_name: String,
    /// Public half of the SSH key pair the bot uses to clone.
    pub public_key: String,
    pub private_key: String,
    /// Target devices for test actions.
    #[serde(default)]
    pub device_ids: Vec<String>,
    #[serde(default = "default_true")]
    pub performs_test_action: bool,
    #[serde(default)]
    pub performs_analyze_action: bool,
    #[serde(default)]
    pub performs_archive_action: bool,
}

impl BotConfigTemplate {
    /// Overlays the per-PR fields on the shared template.
    pub fn materialize(&self, pr: &ReadyPullRequest, repository: &RepositoryId) -> BotConfiguration {
        BotConfiguration {
            name: pr.bot_key.clone(),
            branch: pr.branch.clone(),
            git_url: repository.git_ssh_url(),
            project_or_workspace: self.project_or_workspace.clone(),
            scheme_name: self.scheme_name.clone(),
            public_key: self.public_key.clone(),
            private_key: self.private_key.clone(),
            device_ids: self.device_ids.clone(),
            performs_test_action: self.performs_test_action,
            performs_analyze_action: self.performs_analyze_action,
            performs_archive_action: self.performs_archive_action,
        }
    }
}

/// Complete configuration for one new bot, handed to
/// [`crate::ports::BotServer::create_bot`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotConfiguration {
    pub name: BotKey,
    pub branch: BranchName,
    pub git_url: String,
    pub project_or_workspace: String,
    pub scheme_name: String,
    pub public_key: String,
    pub private_key: String,
    pub device_ids: Vec<String>,
    pub performs_test_action: bool,
    pub performs_analyze_action: bool,
    pub performs_archive_action: bool,
}

// ---------------------------------------------------------------------------
// Time
// ---------------------------------------------------------------------------

/// A UTC wall-clock timestamp.
///
/// Wraps [`chrono::DateTime<Utc>`] so callers never depend on `chrono` types
/// directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Returns the current UTC time as a [`Timestamp`].
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Returns the underlying [`DateTime<Utc>`].
    pub fn as_datetime(self) -> DateTime<Utc> {
        self.0
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}
