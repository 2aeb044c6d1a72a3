use teloxide::prelude::*;
use teloxide::types::ParseMode;

use crate::app_context::AppContext;
use crate::digest::{build_province_digest, build_top_provinces_digest};

const PROVINCE_SYNTAX_HINT: &str = "No province matched. The correct syntax is \n<b>/province part_of_the_name</b>\n(for example: /province berg, /province milano)";

// Placeholder rows ("being defined") carry codes from 500 upwards.
const PROVINCE_CODE_LIMIT: u32 = 500;

pub(in crate::commands) async fn handle_province(
    bot: &Bot,
    msg: &Message,
    app_context: &AppContext,
    query: &str,
) -> ResponseResult<()> {
    let query = query.trim();

    let text = {
        let datasets = app_context.datasets.read().await;

        if query.is_empty() {
            build_top_provinces_digest(datasets.provincial())
        } else {
            let needle = query.to_lowercase();
            let matched = datasets
                .provincial()
                .iter()
                .filter(|(code, _)| **code < PROVINCE_CODE_LIMIT)
                .map(|(_, series)| series)
                .find(|series| {
                    series
                        .last()
                        .and_then(|record| record.province_name.as_deref())
                        .is_some_and(|name| name.to_lowercase().contains(&needle))
                });

            match matched {
                Some(series) => build_province_digest(series),
                None => PROVINCE_SYNTAX_HINT.to_string(),
            }
        }
    };

    bot.send_message(msg.chat.id, text)
        .parse_mode(ParseMode::Html)
        .await?;

    log::debug!(
        "sent requested provincial data to chat id {}",
        msg.chat.id.0
    );
    Ok(())
}
