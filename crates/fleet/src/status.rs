//! Mapping from CI integration results to commit statuses.
//!
//! The result vocabulary belongs to the CI backend. Anything this module does
//! not recognise maps to [`CommitStatus::Error`], so an unexpected result can
//! never show up on a PR as a green check.

use crate::CommitStatus;

/// Maps an integration's raw result text to the status the PR should carry.
///
/// Matching ignores ASCII case and surrounding whitespace. `"unknown"` is what
/// the backend reports while an integration is still running.
pub fn map_result(result: &str) -> CommitStatus {
    match result.trim().to_ascii_lowercase().as_str() {
        "succeeded" | "warnings" | "analyzer-warnings" => CommitStatus::Success,
        "test-failures" | "build-failed" => CommitStatus::Failure,
        "build-errors" | "internal-error" | "canceled" | "cancelled" | "checkout-error"
        | "trigger-error" => CommitStatus::Error,
        "unknown" => CommitStatus::Pending,
        _ => CommitStatus::Error,
    }
}

/// What the sync phase has to do for one matched pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusAction {
    /// Nothing has been posted yet: start an integration and post `Pending`.
    StartIntegration,
    /// Post the contained status, then comment with the integration summary.
    Post(CommitStatus),
    /// The PR already reflects the latest integration.
    Unchanged,
}

/// Decides the transition from `current` (read from the repository) to
/// `expected` (mapped from the latest integration).
pub fn decide(current: CommitStatus, expected: CommitStatus) -> StatusAction {
    if current == CommitStatus::NoStatus {
        StatusAction::StartIntegration
    } else if current != expected {
        StatusAction::Post(expected)
    } else {
        StatusAction::Unchanged
    }
}
