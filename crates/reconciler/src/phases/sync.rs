//! Sync phase: mirror each matched bot's latest integration onto its PR.

use std::sync::Arc;

use fleet::{decide, map_result, BotPrPair, Operation, StatusAction, SyncError};
use tracing::{debug, info};

use super::{PhaseContext, RunCounts};
use crate::follow_up::FollowUps;

/// Mirrors each matched bot's latest integration onto its pull request.
///
/// Fetching the integration, reading the current status and posting a
/// corrected status are on the main path; the summary comment after a
/// correction, and the integration started for a PR with no status yet, are
/// follow-ups.
pub async fn sync_statuses(
    ctx: &PhaseContext,
    pairs: &[BotPrPair],
    follow_ups: &mut FollowUps,
    counts: &mut RunCounts,
) -> Result<(), SyncError> {
    let matched = pairs.iter().filter_map(|pair| match pair {
        BotPrPair::Matched { bot, pr } => Some((bot, pr)),
        _ => None,
    });

    for (bot, pr) in matched {
        let latest = ctx
            .waiter
            .wait(
                Operation::new("fetch latest integration of bot", bot.name()),
                bot.latest_integration(),
            )
            .await?;
        let Some(integration) = latest else {
            debug!(bot = bot.name(), "Bot has no integration yet");
            counts.unchanged += 1;
            continue;
        };

        let expected = map_result(&integration.result);
        info!(
            bot = bot.name(),
            integration = %integration.number,
            step = %integration.current_step,
            result = %integration.result,
            "Syncing status"
        );

        let current = ctx
            .waiter
            .wait(
                Operation::new("read status of commit", &pr.sha),
                ctx.repository.get_status(&pr.sha),
            )
            .await?;

        match decide(current, expected) {
            StatusAction::StartIntegration => {
                info!(bot = bot.name(), sha = %pr.sha, "No status posted yet, starting integration");
                follow_ups.integrate_and_mark_pending(
                    Arc::clone(bot),
                    Arc::clone(&ctx.repository),
                    pr.sha.clone(),
                );
                    }
            StatusAction::Post(status) => {
                info!(bot = bot.name(), from = %current, to = %status, "Updating status");
                ctx.waiter
                    .wait(
                        Operation::new("post status on commit", &pr.sha),
                        ctx.repository.set_status(status, &pr.sha),
                    )
                    .await?;
                counts.statuses_posted += 1;
                follow_ups.post_summary_comment(
                    Arc::clone(&ctx.repository),
                    pr.number,
                    integration.summary,
                );
            }
            StatusAction::Unchanged => {
                debug!(bot = bot.name(), status = %current, "Status unchanged");
                counts.unchanged += 1;
            }
        }
    }
    Ok(())
}
