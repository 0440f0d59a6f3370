//! Delete phase: remove bots whose pull request is gone.

use fleet::{BotPrPair, Operation, SyncError};
use tracing::info;

use super::{PhaseContext, RunCounts};

/// Deletes every bot whose pull request is gone.
///
/// The bot list is not re-fetched between deletions; the run works from the
/// snapshot it took at the start.
pub async fn delete_orphans(
    ctx: &PhaseContext,
    pairs: &[BotPrPair],
    counts: &mut RunCounts,
) -> Result<(), SyncError> {
    let orphans = pairs.iter().filter_map(|pair| match pair {
        BotPrPair::BotOnly(bot) => Some(bot),
        _ => None,
    });

    for bot in orphans {
        info!(bot = bot.name(), id = %bot.id(), "Deleting bot");
        ctx.waiter
            .wait(Operation::new("delete bot", bot.name()), bot.delete())
            .await?;
        counts.bots_deleted += 1;
    }
    Ok(())
}
