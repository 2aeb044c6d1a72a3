use teloxide::prelude::*;
use teloxide::types::{InputFile, ParseMode};

use crate::app_context::AppContext;

const RETRIEVAL_IN_PROGRESS_NOTICE: &str =
    "⏳ Today's data refresh is still in progress, the numbers below may be from yesterday.\n\n";

const PLOT_CAPTION: &str = "More about today's numbers: /digest";

/// Serves the cached digest without forcing a refresh.
pub(in crate::commands) async fn handle_digest(
    bot: &Bot,
    msg: &Message,
    app_context: &AppContext,
) -> ResponseResult<()> {
    let mut text = {
        let datasets = app_context.datasets.read().await;
        datasets.artifacts().digest.clone()
    };

    if app_context.is_refresh_in_progress().await {
        text = format!("{}{}", RETRIEVAL_IN_PROGRESS_NOTICE, text);
    }

    bot.send_message(msg.chat.id, text)
        .parse_mode(ParseMode::Html)
        .await?;

    log::debug!("sent requested digest to chat id {}", msg.chat.id.0);
    Ok(())
}

/// Serves the cached plot without forcing a refresh.
pub(in crate::commands) async fn handle_plot(
    bot: &Bot,
    msg: &Message,
    app_context: &AppContext,
) -> ResponseResult<()> {
    let plot_png = {
        let datasets = app_context.datasets.read().await;
        datasets.artifacts().plot_png.clone()
    };

    let mut caption = PLOT_CAPTION.to_string();
    if app_context.is_refresh_in_progress().await {
        caption = format!("{}{}", RETRIEVAL_IN_PROGRESS_NOTICE, caption);
    }

    bot.send_photo(
        msg.chat.id,
        InputFile::memory(plot_png).file_name("plot.png"),
    )
    .caption(caption)
    .await?;

    log::debug!("sent requested plot to chat id {}", msg.chat.id.0);
    Ok(())
}
