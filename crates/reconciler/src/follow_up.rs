//! Best-effort follow-up work detached from a phase's error path.
//!
//! Starting an integration, posting the initial `Pending` status and
//! commenting with an integration summary never decide whether a run
//! succeeds. They are spawned here, run concurrently with the rest of the
//! phase under their own bounded waits, and log failures at `warn` instead of
//! propagating them. The orchestrator drains the set before the run returns,
//! and only then are integrations counted: one that failed to start is not.

use std::future::Future;
use std::sync::Arc;

use fleet::{Bot, CommitSha, CommitStatus, Operation, PullRequestNumber, RepositoryClient};
use tokio::task::JoinSet;
use tracing::{debug, info, warn, Instrument};

use crate::phases::RunCounts;
use crate::waiter::BoundedWaiter;

/// What a finished follow-up achieved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowUpOutcome {
    /// Integrate, then `Pending`. `started` is whether the bot accepted the
    /// integration request.
    Integration { started: bool },
    /// Summary comment after a status correction.
    Comment { posted: bool },
}

impl FollowUpOutcome {
    fn tally(self, counts: &mut RunCounts) {
        if let FollowUpOutcome::Integration { started: true } = self {
            counts.integrations_started += 1;
        }
    }
}

/// Detached follow-up tasks belonging to one run.
#[derive(Debug)]
pub struct FollowUps {
    tasks: JoinSet<FollowUpOutcome>,
    waiter: BoundedWaiter,
}

impl FollowUps {
    pub fn new(waiter: BoundedWaiter) -> Self {
        Self {
            tasks: JoinSet::new(),
            waiter,
        }
    }

    /// Number of follow-ups spawned and not yet drained.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Starts an integration on `bot`, then posts `Pending` on `sha` whatever
    /// the integration outcome.
    pub fn integrate_and_mark_pending(
        &mut self,
        bot: Arc<dyn Bot>,
        repository: Arc<dyn RepositoryClient>,
        sha: CommitSha,
    ) {
        let waiter = self.waiter;
        self.spawn(async move {
            let started = waiter
                .wait(Operation::new("start integration of bot", bot.name()), bot.integrate())
                .await;
            let outcome = match started {
                Ok(integration) => {
                    info!(
                        bot = bot.name(),
                        id = %bot.id(),
                        integration = %integration.number,
                        step = %integration.current_step,
                        "Integration started"
                    );
                    FollowUpOutcome::Integration { started: true }
                }
                Err(error) => {
                    warn!(bot = bot.name(), %error, "Integration did not start");
                    FollowUpOutcome::Integration { started: false }
                }
            };

            let posted = waiter
                .wait(
                    Operation::new("post pending status on commit", &sha),
                    repository.set_status(CommitStatus::Pending, &sha),
                )
                .await;
            if let Err(error) = posted {
                warn!(%sha, %error, "Pending status not posted");
            }
            outcome
        });
    }

    /// Appends `summary` as a comment on pull request `pr`.
    pub fn post_summary_comment(
        &mut self,
        repository: Arc<dyn RepositoryClient>,
        pr: PullRequestNumber,
        summary: String,
    ) {
        let waiter = self.waiter;
        self.spawn(async move {
            let posted = waiter
                .wait(
                    Operation::new("comment on pull request", format!("#{pr}")),
                    repository.add_comment(pr, &summary),
                )
                .await;
            match &posted {
                Ok(()) => debug!(%pr, "Summary comment added"),
                Err(error) => warn!(%pr, %error, "Summary comment not added"),
            }
            FollowUpOutcome::Comment {
                posted: posted.is_ok(),
            }
        });
    }

    /// Waits for every outstanding follow-up and adds what they achieved to
    /// `counts`. Each one is bounded by its own waits, so this is bounded too.
    /// A panicked task is logged and counts for nothing.
    pub async fn drain(&mut self, counts: &mut RunCounts) -> usize {
        let mut finished = 0;
        while let Some(joined) = self.tasks.join_next().await {
            match joined {
                Ok(outcome) => outcome.tally(counts),
                Err(error) => warn!(%error, "Follow-up task aborted"),
            }
            finished += 1;
        }
        finished
    }

    fn spawn<F>(&mut self, task: F)
    where
        F: Future<Output = FollowUpOutcome> + Send + 'static,
    {
        self.tasks.spawn(task.in_current_span());
    }
}
