//! Collaborator port traits.
//!
//! The reconciler never talks to GitHub or the CI bot server directly. Hosts
//! implement these traits over whatever transport they use; the reconciler
//! holds them as `Arc<dyn ...>` so follow-up tasks can outlive a single phase
//! call.
//!
//! Every method is an `async fn` whose returned future *is* the completion
//! signal. Dropping the future (which the bounded waiter does on timeout) is
//! the only cancellation request the core ever makes.

use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    BackendError, BotConfiguration, BotId, CommitSha, CommitStatus, Integration, PullRequest,
    PullRequestNumber,
};

/// Result type returned by every collaborator call.
pub type BackendResult<T> = Result<T, BackendError>;

/// The source repository: pull requests, commit statuses and comments.
#[async_trait]
pub trait RepositoryClient: Send + Sync {
    /// Lists the currently open pull requests.
    async fn fetch_pull_requests(&self) -> BackendResult<Vec<PullRequest>>;

    /// Reads the status currently posted on `sha`.
    ///
    /// Returns [`CommitStatus::NoStatus`] if nothing has been posted.
    async fn get_status(&self, sha: &CommitSha) -> BackendResult<CommitStatus>;

    /// Posts `status` on `sha`. Never called with [`CommitStatus::NoStatus`].
    async fn set_status(&self, status: CommitStatus, sha: &CommitSha) -> BackendResult<()>;

    /// Appends a comment to pull request `pr`.
    async fn add_comment(&self, pr: PullRequestNumber, text: &str) -> BackendResult<()>;
}

/// The CI bot server.
#[async_trait]
pub trait BotServer: Send + Sync {
    /// Lists every bot currently configured on the server.
    async fn fetch_bots(&self) -> BackendResult<Vec<Arc<dyn Bot>>>;

    /// Creates a bot from `config` and returns a handle to it.
    async fn create_bot(&self, config: &BotConfiguration) -> BackendResult<Arc<dyn Bot>>;
}

/// One bot on the CI bot server.
#[async_trait]
pub trait Bot: Send + Sync {
    fn id(&self) -> &BotId;

    /// Bot name; equals a PR's [`crate::BotKey`] when the two are matched.
    fn name(&self) -> &str;

    async fn delete(&self) -> BackendResult<()>;

    /// Starts a new integration and returns its initial snapshot.
    async fn integrate(&self) -> BackendResult<Integration>;

    /// Returns the most recent integration, or `None` if the bot never ran.
    async fn latest_integration(&self) -> BackendResult<Option<Integration>>;
}

impl std::fmt::Debug for dyn Bot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bot")
            .field("id", self.id())
            .field("name", &self.name())
            .finish()
    }
}
