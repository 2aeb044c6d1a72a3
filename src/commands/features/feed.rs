use teloxide::prelude::*;

use crate::app_context::AppContext;
use crate::scheduler::{self, RefreshPhase, TickOutcome};

/// Operator overview: subscriber count, stored freshness marker and the
/// scheduler phase. Never triggers a fetch.
pub(in crate::commands) async fn handle_feed_status(
    bot: &Bot,
    msg: &Message,
    app_context: &AppContext,
) -> ResponseResult<()> {
    let subscriber_count = app_context.store.subscribers.count();
    let last_valid_date = app_context
        .store
        .freshness
        .last_valid_date()
        .unwrap_or_default()
        .unwrap_or_else(|| "<none>".to_string());
    let last_retrieval = app_context
        .store
        .freshness
        .last_retrieval_timestamp()
        .unwrap_or_default()
        .unwrap_or_else(|| "<none>".to_string());
    let phase = match app_context.scheduler.lock().await.phase() {
        RefreshPhase::Idle => "idle",
        RefreshPhase::AwaitingFreshData => "awaiting fresh data",
    };

    let text = format!(
        "Subscribers: {}\nLast valid date: {} (retrieved on {})\nScheduler: {}",
        subscriber_count, last_valid_date, last_retrieval, phase
    );

    bot.send_message(msg.chat.id, text).await?;
    Ok(())
}

/// Forced refresh, restricted to the configured operator chat. Bypasses the
/// freshness check but leaves the scheduler phase untouched.
pub(in crate::commands) async fn handle_forced_refresh(
    bot: &Bot,
    msg: &Message,
    app_context: &AppContext,
) -> ResponseResult<()> {
    let authorized = app_context
        .config
        .admin_chat_id()
        .is_some_and(|admin| admin == msg.chat.id);

    if !authorized {
        log::warn!(
            "unauthorized forced refresh attempt chat_id={} command_text={:?}",
            msg.chat.id.0,
            msg.text()
        );
        bot.send_message(
            msg.chat.id,
            "This command is restricted to the bot operator.",
        )
        .await?;
        return Ok(());
    }

    let outcome = scheduler::run_forced_refresh(app_context).await;

    let reply = match outcome {
        TickOutcome::Refreshed => "Refresh completed, digests sent to all subscribers.",
        TickOutcome::NoSubscribers => "No subscribers in database, nothing was sent.",
        TickOutcome::NotNew => "Upstream data unchanged.",
        TickOutcome::Skipped => "A refresh is already running, try again shortly.",
        TickOutcome::Failed => "Refresh failed, check the logs.",
    };

    bot.send_message(msg.chat.id, reply).await?;
    Ok(())
}
