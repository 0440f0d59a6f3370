//! Pairing of open pull requests with existing bots.
//!
//! [`match_pairs`] is the pure heart of reconciliation. Its output partitions
//! the inputs: every bot and every ready PR appears in exactly one
//! [`BotPrPair`], and the variant says what the run must do with it.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::debug;

use crate::ports::Bot;
use crate::{BotKey, PullRequest, PullRequestNumber, ReadyPullRequest, SyncError};

/// One reconciliation unit. At least one side is always present.
#[derive(Debug, Clone)]
pub enum BotPrPair {
    /// A bot whose PR is gone: delete it.
    BotOnly(Arc<dyn Bot>),
    /// A PR without a bot: create one.
    PrOnly(ReadyPullRequest),
    /// A bot building an open PR: mirror its status.
    Matched {
        bot: Arc<dyn Bot>,
        pr: ReadyPullRequest,
    },
}

impl BotPrPair {
    pub fn bot(&self) -> Option<&Arc<dyn Bot>> {
        match self {
            BotPrPair::BotOnly(bot) | BotPrPair::Matched { bot, .. } => Some(bot),
            BotPrPair::PrOnly(_) => None,
        }
    }

    pub fn pull_request(&self) -> Option<&ReadyPullRequest> {
        match self {
            BotPrPair::PrOnly(pr) | BotPrPair::Matched { pr, .. } => Some(pr),
            BotPrPair::BotOnly(_) => None,
        }
    }
}

/// Pairs every ready pull request with the bot named after its key.
///
/// PRs that are not ready (missing SHA, branch or title) are skipped. Output
/// order is the input PR order followed by unclaimed bots in input order.
///
/// # Errors
///
/// Duplicates make the pairing ambiguous and are rejected rather than
/// resolved by position:
///
/// - [`SyncError::DuplicateBotName`] if two bots share a name.
/// - [`SyncError::DuplicateBotKey`] if two ready PRs share a bot key.
pub fn match_pairs(
    prs: &[PullRequest],
    bots: &[Arc<dyn Bot>],
) -> Result<Vec<BotPrPair>, SyncError> {
    let mut bots_by_name: HashMap<&str, usize> = HashMap::with_capacity(bots.len());
    for (index, bot) in bots.iter().enumerate() {
        if bots_by_name.insert(bot.name(), index).is_some() {
            return Err(SyncError::DuplicateBotName {
                name: bot.name().to_string(),
            });
        }
    }

    let mut seen_keys: HashMap<BotKey, PullRequestNumber> = HashMap::new();
    let mut claimed: HashSet<usize> = HashSet::new();
    let mut pairs = Vec::with_capacity(prs.len() + bots.len());

    for pr in prs {
        let Some(ready) = pr.ready() else {
            debug!(pr = %pr.number, "Skipping pull request that is not ready");
            continue;
        };
        if let Some(first) = seen_keys.insert(ready.bot_key.clone(), ready.number) {
            return Err(SyncError::DuplicateBotKey {
                key: ready.bot_key,
                first,
                second: pr.number,
            });
        }

        match bots_by_name.get(ready.bot_key.as_str()) {
            Some(&index) => {
                claimed.insert(index);
                pairs.push(BotPrPair::Matched {
                    bot: Arc::clone(&bots[index]),
                    pr: ready,
                });
            }
            None => pairs.push(BotPrPair::PrOnly(ready)),
        }
    }

    pairs.extend(
        bots.iter()
            .enumerate()
            .filter(|(index, _)| !claimed.contains(index))
            .map(|(_, bot)| BotPrPair::BotOnly(Arc::clone(bot))),
    );

    Ok(pairs)
}
