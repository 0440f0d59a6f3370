//! Create phase: one new bot per pull request that has none.

use std::sync::Arc;

use fleet::{BotPrPair, Operation, SyncError};
use tracing::info;

use super::{PhaseContext, RunCounts};
use crate::follow_up::FollowUps;

/// Creates a bot for every pull request that has none.
///
/// Only the create call itself can fail the phase. The integration start and
/// `Pending` post that follow a successful create are handed to `follow_ups`.
pub async fn create_missing(
    ctx: &PhaseContext,
    pairs: &[BotPrPair],
    follow_ups: &mut FollowUps,
    counts: &mut RunCounts,
) -> Result<(), SyncError> {
    let unbuilt = pairs.iter().filter_map(|pair| match pair {
        BotPrPair::PrOnly(pr) => Some(pr),
        _ => None,
    });

    for pr in unbuilt {
        let config = ctx.template.materialize(pr, &ctx.repository_id);
        info!(
            pr = %pr.number,
            bot = %config.name,
            branch = %config.branch,
            "Creating bot from pull request"
        );

        let bot = ctx
            .waiter
            .wait(
                Operation::new("create bot", &config.name),
                ctx.bot_server.create_bot(&config),
            )
            .await?;
        info!(bot = bot.name(), id = %bot.id(), "Bot created");
        counts.bots_created += 1;

        follow_ups.integrate_and_mark_pending(bot, Arc::clone(&ctx.repository), pr.sha.clone());
    }
    Ok(())
}
