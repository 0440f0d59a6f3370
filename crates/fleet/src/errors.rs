//! Error types for the reconciliation domain.
//!
//! [`BackendError`] is what a collaborator reports when it explicitly fails.
//! [`SyncError`] covers every condition that ends a run: timeouts, backend
//! failures and duplicate names. The orchestrator wraps the first one it meets
//! in a [`PhaseFailure`] so callers learn where the run stopped and why.
//!
//! Malformed pull requests are not errors; they are filtered out by
//! [`crate::PullRequest::ready`].

use std::time::Duration;

use thiserror::Error;

use crate::{BotKey, PullRequestNumber};

// ---------------------------------------------------------------------------
// Collaborator failures
// ---------------------------------------------------------------------------

/// An explicit failure reported by the repository client or the bot server.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct BackendError {
    message: String,
}

impl BackendError {
    /// Creates a backend error with a human-readable message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Returns the message supplied by the collaborator.
    pub fn message(&self) -> &str {
        &self.message
    }
}

// ---------------------------------------------------------------------------
// Operation labels
// ---------------------------------------------------------------------------

/// What was being attempted, and against which named entity.
///
/// Rendered as e.g. `delete bot 'Fix X'` inside error messages and log events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    action: &'static str,
    target: String,
}

impl Operation {
    pub fn new(action: &'static str, target: impl std::fmt::Display) -> Self {
        Self {
            action,
            target: target.to_string(),
        }
    }

    /// The verb phrase, e.g. `"delete bot"`.
    pub fn action(&self) -> &'static str {
        self.action
    }

    /// The named entity, e.g. the bot name or commit SHA.
    pub fn target(&self) -> &str {
        &self.target
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} '{}'", self.action, self.target)
    }
}

// ---------------------------------------------------------------------------
// Run-ending errors
// ---------------------------------------------------------------------------

/// A condition that aborts the current reconciliation run.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The bounded wait elapsed before the collaborator answered.
    ///
    /// The underlying call was dropped; whatever it does upstream afterwards
    /// is not suppressed.
    #[error("Timeout waiting to {operation} after {after:?}")]
    Timeout {
        /// What was being waited on.
        operation: Operation,
        /// The timeout that elapsed.
        after: Duration,
    },

    /// The collaborator answered with an explicit failure.
    #[error("Unable to {operation}: {source}")]
    Backend {
        /// What was attempted.
        operation: Operation,
        /// The collaborator's own failure report.
        #[source]
        source: BackendError,
    },

    /// Two bots on the server carry the same name, so the PR they would match
    /// is ambiguous.
    #[error("Duplicate bot name '{name}' on the bot server")]
    DuplicateBotName {
        /// The name shared by more than one bot.
        name: String,
    },

    /// Two open pull requests normalise to the same bot key.
    #[error("Pull requests #{first} and #{second} share bot key '{key}'")]
    DuplicateBotKey {
        /// The normalised title both pull requests produce.
        key: BotKey,
        /// The pull request listed first in the fetch.
        first: PullRequestNumber,
        /// The later pull request that collides with `first`.
        second: PullRequestNumber,
    },
}

impl SyncError {
    /// Returns the operation this error is tagged with, if any.
    pub fn operation(&self) -> Option<&Operation> {
        match self {
            SyncError::Timeout { operation, .. } | SyncError::Backend { operation, .. } => {
                Some(operation)
            }
            SyncError::DuplicateBotName { .. } | SyncError::DuplicateBotKey { .. } => None,
        }
    }

    /// Returns `true` if the error is a bounded-wait timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, SyncError::Timeout { .. })
    }
}

// ---------------------------------------------------------------------------
// Orchestrator-level failure
// ---------------------------------------------------------------------------

/// The stages of one run, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyncPhase {
    Fetch,
    Delete,
    Create,
    Sync,
}

impl std::fmt::Display for SyncPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SyncPhase::Fetch => "fetch",
            SyncPhase::Delete => "delete",
            SyncPhase::Create => "create",
            SyncPhase::Sync => "sync",
        };
        f.write_str(name)
    }
}

/// A failed run: the phase it stopped in and the first error encountered.
#[derive(Debug, Error)]
#[error("Sync failed during {phase} phase: {error}")]
pub struct PhaseFailure {
    pub phase: SyncPhase,
    #[source]
    pub error: SyncError,
}
