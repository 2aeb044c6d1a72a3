use teloxide::prelude::*;
use teloxide::types::ParseMode;

const VERSION: &str = env!("CARGO_PKG_VERSION");

pub(in crate::commands) async fn handle_about(bot: &Bot, msg: &Message) -> ResponseResult<()> {
    bot.send_message(msg.chat.id, about_message())
        .parse_mode(ParseMode::Html)
        .await?;
    Ok(())
}

pub(in crate::commands) async fn handle_help(bot: &Bot, msg: &Message) -> ResponseResult<()> {
    bot.send_message(msg.chat.id, help_message())
        .parse_mode(ParseMode::Html)
        .await?;
    Ok(())
}

fn about_message() -> String {
    format!(
        "<b>Daily Epidemic Digest Bot</b> v.{}\nSubscribe to receive the national situation update every day shortly after publication. Or request the latest official numbers at any time. Ask /help for the command list.",
        VERSION
    )
}

fn help_message() -> String {
    format!(
        "<b>Daily Epidemic Digest Bot</b> v.{}\nSubscribe with /sub to receive the daily update, or ask for the current numbers with /plot or /digest.\n\nCommand list:\n  /sub - Subscribe to the daily update\n  /unsub - Cancel the subscription\n  /status - Subscription status\n  /plot - Request the situation chart\n  /digest - Request the daily digest\n  /region - Regional data\n  /province - Provincial data\n  /about - About this bot\n  /help - This list",
        VERSION
    )
}
