//! Reconciliation of a CI bot fleet against open pull requests.
//!
//! One run snapshots the open PRs and the existing bots, pairs them with
//! [`fleet::match_pairs`], then deletes orphaned bots, creates missing ones and
//! mirrors integration results back onto PRs as commit statuses and comments.
//!
//! ## Architectural Layer
//!
//! **Orchestration layer.** This crate sequences calls between the pure logic
//! in [`fleet`] and the collaborator traits ([`fleet::RepositoryClient`],
//! [`fleet::BotServer`], [`fleet::Bot`]). It contains no transport code.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`waiter`] | `BoundedWaiter` and callback completion signals |
//! | [`follow_up`] | Detached best-effort sub-steps |
//! | [`phases`] | Delete, create and sync phase executors |
//! | [`orchestrator`] | `Reconciler::run` and `SyncReport` |
//! | [`telemetry`] | Tracing subscriber setup |
//!
//! ## Example
//!
//! ```rust,ignore
//! let config = fleet::SyncConfig::from_path("fleet.toml")?;
//! let reconciler = reconciler::Reconciler::new(github, bot_server, &config);
//! let report = reconciler.run().await?;
//! ```

pub mod follow_up;
pub mod orchestrator;
pub mod phases;
pub mod telemetry;
pub mod waiter;

pub use follow_up::{FollowUpOutcome, FollowUps};
pub use orchestrator::{Reconciler, SyncReport};
pub use phases::{PhaseContext, RunCounts};
pub use telemetry::{init_tracing, LogFormat};
pub use waiter::{completion, BoundedWaiter, CompletionReceiver, CompletionSender};
