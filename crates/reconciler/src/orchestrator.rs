//! The run orchestrator: fetch → delete → create → sync.
//!
//! A run is stateless. It snapshots open pull requests and existing bots,
//! pairs them, and walks the phases in order. The first error ends the run
//! and no later phase starts; the next run re-derives everything from fresh
//! state and picks up whatever was left undone.
//!
//! Overlapping runs against the same fleet are not guarded against. Callers
//! must not start a run while another is in progress.

use std::sync::Arc;

use fleet::{
    match_pairs, BotPrPair, BotServer, Operation, PhaseFailure, RepositoryClient, SyncConfig,
    SyncError, SyncPhase, SyncRunId, Timestamp,
};
use serde::Serialize;
use tracing::{error, info, info_span, Instrument};

use crate::follow_up::FollowUps;
use crate::phases::{self, PhaseContext, RunCounts};

/// Summary of a successful run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SyncReport {
    pub run_id: SyncRunId,
    pub started_at: Timestamp,
    pub finished_at: Timestamp,
    #[serde(flatten)]
    pub counts: RunCounts,
}

/// Keeps a bot fleet in step with a repository's open pull requests.
#[derive(Clone)]
pub struct Reconciler {
    ctx: PhaseContext,
}

impl Reconciler {
    pub fn new(
        repository: Arc<dyn RepositoryClient>,
        bot_server: Arc<dyn BotServer>,
        config: &SyncConfig,
    ) -> Self {
        Self::from_context(PhaseContext::new(repository, bot_server, config))
    }

    pub fn from_context(ctx: PhaseContext) -> Self {
        Self { ctx }
    }

    /// Performs one reconciliation run.
    ///
    /// # Errors
    ///
    /// Returns the first timeout, backend failure or duplicate-name conflict,
    /// tagged with the phase it occurred in. Phases that completed before the
    /// failure are not rolled back.
    pub async fn run(&self) -> Result<SyncReport, PhaseFailure> {
        let run_id = SyncRunId::new_random();
        let span = info_span!("sync_run", %run_id, repository = %self.ctx.repository_id);
        self.run_with_id(run_id).instrument(span).await
    }

    async fn run_with_id(&self, run_id: SyncRunId) -> Result<SyncReport, PhaseFailure> {
        let started_at = Timestamp::now();
        let mut follow_ups = FollowUps::new(self.ctx.waiter);
        let mut counts = RunCounts::default();

        let outcome = self.run_phases(&mut follow_ups, &mut counts).await;
        let drained = follow_ups.drain(&mut counts).await;

        match outcome {
            Ok(()) => {
                info!(
                    deleted = counts.bots_deleted,
                    created = counts.bots_created,
                    statuses_posted = counts.statuses_posted,
                    integrations_started = counts.integrations_started,
                    unchanged = counts.unchanged,
                    follow_ups = drained,
                    "Sync run completed"
                );
                Ok(SyncReport {
                    run_id,
                    started_at,
                    finished_at: Timestamp::now(),
                    counts,
                })
            }
            Err(failure) => {
                error!(phase = %failure.phase, error = %failure.error, "Sync run failed");
                Err(failure)
            }
        }
    }

    async fn run_phases(
        &self,
        follow_ups: &mut FollowUps,
        counts: &mut RunCounts,
    ) -> Result<(), PhaseFailure> {
        let pairs = self.fetch_pairs().await.map_err(failed_in(SyncPhase::Fetch))?;

        phases::delete_orphans(&self.ctx, &pairs, counts)
            .await
            .map_err(failed_in(SyncPhase::Delete))?;
        phases::create_missing(&self.ctx, &pairs, follow_ups, counts)
            .await
            .map_err(failed_in(SyncPhase::Create))?;
        phases::sync_statuses(&self.ctx, &pairs, follow_ups, counts)
            .await
            .map_err(failed_in(SyncPhase::Sync))?;
        Ok(())
    }

    /// Fetches pull requests and bots concurrently, each under its own bounded
    /// wait, and pairs them.
    async fn fetch_pairs(&self) -> Result<Vec<BotPrPair>, SyncError> {
        let waiter = self.ctx.waiter;
        let (prs, bots) = tokio::try_join!(
            waiter.wait(
                Operation::new("fetch pull requests from", &self.ctx.repository_id),
                self.ctx.repository.fetch_pull_requests(),
            ),
            waiter.wait(
                Operation::new("fetch bots for", &self.ctx.repository_id),
                self.ctx.bot_server.fetch_bots(),
            ),
        )?;
        info!(pull_requests = prs.len(), bots = bots.len(), "Fetched current state");
        match_pairs(&prs, &bots)
    }
}

fn failed_in(phase: SyncPhase) -> impl FnOnce(SyncError) -> PhaseFailure {
    move |error| PhaseFailure { phase, error }
}
