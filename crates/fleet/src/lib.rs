//! Domain model for keeping a CI bot fleet in step with open pull requests.
//!
//! This crate holds every domain concept the reconciler works with: newtype
//! identifiers, value types, the pure pair matcher and status mapper, the
//! error taxonomy, and the port traits that collaborators implement.
//!
//! ## Architectural Layer
//!
//! **Business logic + port definitions.** Nothing here performs network I/O.
//! It defines *what* a run needs; hosts supply repository and bot server
//! implementations of the traits in [`ports`], and the `reconciler` crate
//! drives them.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | Newtype identifiers (`CommitSha`, `BotKey`, `SyncRunId`, etc.) |
//! | [`types`] | Value types (`PullRequest`, `Integration`, `CommitStatus`, bot configuration) |
//! | [`status`] | Integration result → commit status mapping and transition decision |
//! | [`matcher`] | PR × bot pairing |
//! | [`ports`] | Collaborator traits (`RepositoryClient`, `BotServer`, `Bot`) |
//! | [`errors`] | Backend, run and phase error types |
//! | [`config`] | TOML run configuration |

pub mod config;
pub mod errors;
pub mod identifiers;
pub mod matcher;
pub mod ports;
pub mod status;
pub mod types;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use config::{ConfigError, SyncConfig, DEFAULT_TIMEOUT_SECS};
pub use errors::{BackendError, Operation, PhaseFailure, SyncError, SyncPhase};
pub use identifiers::{
    BotId, BotKey, BranchName, CommitSha, IntegrationNumber, PullRequestNumber, RepositoryId,
    SyncRunId,
};
pub use matcher::{match_pairs, BotPrPair};
pub use ports::{BackendResult, Bot, BotServer, RepositoryClient};
pub use status::{decide, map_result, StatusAction};
pub use types::{
    BotConfigTemplate, BotConfiguration, CommitStatus, Integration, PullRequest, ReadyPullRequest,
    Timestamp,
};
