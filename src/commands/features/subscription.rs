use chrono::Utc;
use teloxide::prelude::*;

use crate::app_context::AppContext;

const STORE_ERROR_REPLY: &str = "Storage error, please try again later.";

pub(in crate::commands) async fn handle_subscribe(
    bot: &Bot,
    msg: &Message,
    app_context: &AppContext,
) -> ResponseResult<()> {
    let chat_id = msg.chat.id.0;
    log::debug!("adding new subscriber {} to store", chat_id);

    let reply = match app_context.store.subscribers.add(chat_id, Utc::now()) {
        Ok(()) => "Subscription registered (/status to check, /unsub to cancel).",
        Err(error) => {
            log::error!("failed to add subscriber {}: {}", chat_id, error);
            STORE_ERROR_REPLY
        }
    };

    bot.send_message(msg.chat.id, reply).await?;
    Ok(())
}

pub(in crate::commands) async fn handle_unsubscribe(
    bot: &Bot,
    msg: &Message,
    app_context: &AppContext,
) -> ResponseResult<()> {
    let chat_id = msg.chat.id.0;
    log::debug!("removing subscription of {} from store", chat_id);

    let reply = match app_context.store.subscribers.remove(chat_id) {
        Ok(()) => "Subscription cancelled (/status to check, /sub to subscribe again).",
        Err(error) => {
            log::error!("failed to remove subscriber {}: {}", chat_id, error);
            STORE_ERROR_REPLY
        }
    };

    bot.send_message(msg.chat.id, reply).await?;
    Ok(())
}

pub(in crate::commands) async fn handle_status(
    bot: &Bot,
    msg: &Message,
    app_context: &AppContext,
) -> ResponseResult<()> {
    let chat_id = msg.chat.id.0;

    let reply = match app_context.store.subscribers.contains(chat_id) {
        Ok(true) => {
            let subscribed_at = app_context
                .store
                .subscribers
                .subscribed_at(chat_id)
                .unwrap_or_default()
                .unwrap_or_else(|| "<unknown>".to_string());
            format!("Subscribed since {} (/unsub to cancel).", subscribed_at)
        }
        Ok(false) => "Currently not subscribed (/sub to subscribe).".to_string(),
        Err(error) => {
            log::error!("failed to read subscription of {}: {}", chat_id, error);
            STORE_ERROR_REPLY.to_string()
        }
    };

    bot.send_message(msg.chat.id, reply).await?;
    Ok(())
}
