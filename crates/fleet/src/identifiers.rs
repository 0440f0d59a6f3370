//! Newtype domain identifiers.
//!
//! Every concept with an identity is a distinct newtype so a [`CommitSha`]
//! cannot be passed where a [`BranchName`] is expected, and a
//! [`PullRequestNumber`] cannot be confused with an [`IntegrationNumber`].

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Macro for String-wrapped newtypes.
// Generates: struct, new() returning Option<Self>, as_str(), Display.
// ---------------------------------------------------------------------------
macro_rules! string_id {
    (
        $(#[$attr:meta])*
        $name:ident
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier, returning `None` if the value is empty.
            pub fn new(value: impl Into<String>) -> Option<Self> {
                let v = value.into();
                if v.is_empty() { None } else { Some(Self(v)) }
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Macro for u64-wrapped newtypes (backend-assigned integers).
// Generates: struct (Copy), new(), as_u64(), Display.
// ---------------------------------------------------------------------------
macro_rules! u64_id {
    (
        $(#[$attr:meta])*
        $name:ident
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(u64);

        impl $name {
            /// Creates a new identifier from a raw integer.
            pub fn new(value: u64) -> Self {
                Self(value)
            }

            /// Returns the underlying integer value.
            pub fn as_u64(self) -> u64 {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Identifiers — integer-backed
// ---------------------------------------------------------------------------

u64_id! {
    /// The number GitHub assigns to a pull request (`#7`).
    PullRequestNumber
}

u64_id! {
    /// Sequence number of an integration within one bot.
    IntegrationNumber
}

// ---------------------------------------------------------------------------
// Identifiers — UUID-backed (internally generated)
// ---------------------------------------------------------------------------

/// Identifies a single reconciliation run.
///
/// Generated fresh for every run and attached to the run's tracing span so all
/// activity from one run can be correlated in the logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SyncRunId(Uuid);

impl SyncRunId {
    /// Generates a new random run identifier.
    pub fn new_random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the underlying [`Uuid`].
    pub fn as_uuid(self) -> Uuid {
        self.0
    }
}

impl std::fmt::Display for SyncRunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Identifiers — String-backed
// ---------------------------------------------------------------------------

string_id! {
    /// Identifier the CI bot server assigns to a bot.
    BotId
}

string_id! {
    /// A Git branch name (e.g. `"main"`, `"feature/x"`).
    BranchName
}

string_id! {
    /// A Git commit SHA.
    CommitSha
}

string_id! {
    /// Identifies a GitHub repository in `"owner/repo"` format.
    RepositoryId
}

impl RepositoryId {
    /// SSH clone URL handed to newly created bots.
    pub fn git_ssh_url(&self) -> String {
        format!("git@github.com:{}.git", self.0)
    }
}

// ---------------------------------------------------------------------------
// Bot key
// ---------------------------------------------------------------------------

/// Normalised name shared by a pull request and the bot that builds it.
///
/// Derived from the PR title: surrounding whitespace is dropped and every
/// internal whitespace run becomes a single space. A bot matches a PR when its
/// name equals the key exactly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BotKey(String);

impl BotKey {
    /// Derives the key from a pull request title.
    ///
    /// Returns `None` if the title is empty or whitespace only.
    pub fn from_title(title: &str) -> Option<Self> {
        let normalised = title.split_whitespace().collect::<Vec<_>>().join(" ");
        if normalised.is_empty() {
            None
        } else {
            Some(Self(normalised))
        }
    }

    /// Returns the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BotKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bot_key_keeps_plain_title() {
        assert_eq!(BotKey::from_title("Fix X").unwrap().as_str(), "Fix X");
    }

    #[test]
    fn bot_key_collapses_whitespace() {
        let key = BotKey::from_title("  Fix \t  the\nbug  ").unwrap();
        assert_eq!(key.as_str(), "Fix the bug");
    }

    #[test]
    fn bot_key_rejects_blank_title() {
        assert!(BotKey::from_title("").is_none());
        assert!(BotKey::from_title("   \t").is_none());
    }

    #[test]
    fn string_ids_reject_empty() {
        assert!(CommitSha::new("").is_none());
        assert_eq!(CommitSha::new("abc").unwrap().to_string(), "abc");
    }

    #[test]
    fn repository_builds_ssh_url() {
        let repo = RepositoryId::new("org/repo").unwrap();
        assert_eq!(repo.git_ssh_url(), "git@github.com:org/repo.git");
    }
}
