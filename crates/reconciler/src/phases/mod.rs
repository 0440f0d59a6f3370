//! Phase executors.
//!
//! Each phase consumes one slice of the pair partition and processes its items
//! strictly one after another: an item's main-path calls complete (or time out)
//! before the next item starts, and the first error ends the phase.

mod create;
mod delete;
mod sync;

use std::sync::Arc;

use fleet::{BotConfigTemplate, BotServer, RepositoryClient, RepositoryId, SyncConfig};
use serde::Serialize;

use crate::waiter::BoundedWaiter;

pub use create::create_missing;
pub use delete::delete_orphans;
pub use sync::sync_statuses;

/// Collaborators and settings every phase reads.
#[derive(Clone)]
pub struct PhaseContext {
    pub repository: Arc<dyn RepositoryClient>,
    pub bot_server: Arc<dyn BotServer>,
    /// Repository the fleet builds; source of new bots' git URL.
    pub repository_id: RepositoryId,
    pub template: BotConfigTemplate,
    pub waiter: BoundedWaiter,
}

impl PhaseContext {
    pub fn new(
        repository: Arc<dyn RepositoryClient>,
        bot_server: Arc<dyn BotServer>,
        config: &SyncConfig,
    ) -> Self {
        Self {
            repository,
            bot_server,
            repository_id: config.repository.clone(),
            template: config.template.clone(),
            waiter: BoundedWaiter::new(config.timeout()),
        }
    }
}

/// What the phases of one run did.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RunCounts {
    pub bots_deleted: usize,
    pub bots_created: usize,
    /// Statuses posted on the main path (mismatch corrections).
    pub statuses_posted: usize,
    /// Integrations the bot accepted. Tallied from follow-ups when they are
    /// drained, so a request that failed or timed out is not counted.
    pub integrations_started: usize,
    /// Matched pairs that needed no action.
    pub unchanged: usize,
}
