use teloxide::prelude::*;
use teloxide::types::{
    InlineKeyboardButton, InlineKeyboardMarkup, InputFile, MessageId, ParseMode,
};

use crate::app_context::AppContext;
use crate::data::catalog::{find_area, find_region, find_region_by_name, Region, AREAS};
use crate::digest::{build_region_digest, render_region_plot};

use super::super::callback::CallbackAction;

const KEYBOARD_COLUMNS: usize = 3;

const REGION_SYNTAX_HINT: &str = "No region matched. The correct syntax is \n<b>/region part_of_the_name</b>\n(for example: /region lomb, /region trento)";

pub(in crate::commands) async fn handle_region(
    bot: &Bot,
    msg: &Message,
    app_context: &AppContext,
    query: &str,
) -> ResponseResult<()> {
    let query = query.trim();

    if query.is_empty() {
        bot.send_message(msg.chat.id, "Regional data. Select an area:")
            .reply_markup(areas_keyboard())
            .await?;
        return Ok(());
    }

    let Some(region) = find_region_by_name(query) else {
        bot.send_message(msg.chat.id, REGION_SYNTAX_HINT)
            .parse_mode(ParseMode::Html)
            .await?;
        return Ok(());
    };

    send_region_digest_and_plot(bot, msg.chat.id, region, app_context).await?;
    log::debug!(
        "sent requested regional data ({}) to chat id {}",
        region.name,
        msg.chat.id.0
    );
    Ok(())
}

pub(in crate::commands) async fn show_areas_list(
    bot: &Bot,
    chat_id: ChatId,
    message_id: MessageId,
) -> ResponseResult<()> {
    bot.edit_message_text(chat_id, message_id, "Regional data. Select an area:")
        .reply_markup(areas_keyboard())
        .await?;
    Ok(())
}

pub(in crate::commands) async fn show_area_regions(
    bot: &Bot,
    chat_id: ChatId,
    message_id: MessageId,
    area_id: &str,
) -> ResponseResult<()> {
    let Some(area) = find_area(area_id) else {
        log::warn!("requested unknown area id: {}", area_id);
        return Ok(());
    };

    let mut buttons: Vec<InlineKeyboardButton> = area
        .regions
        .iter()
        .map(|region| {
            InlineKeyboardButton::callback(
                region.name,
                CallbackAction::ShowRegion {
                    region_id: region.id.to_string(),
                }
                .encode(),
            )
        })
        .collect();
    buttons.push(InlineKeyboardButton::callback(
        "<-",
        CallbackAction::ShowAreas.encode(),
    ));

    bot.edit_message_text(
        chat_id,
        message_id,
        format!("Regions of {}, select one:", area.name),
    )
    .reply_markup(keyboard_markup(buttons))
    .await?;
    Ok(())
}

pub(in crate::commands) async fn show_region_data(
    bot: &Bot,
    chat_id: ChatId,
    message_id: MessageId,
    region_id: &str,
    app_context: &AppContext,
) -> ResponseResult<()> {
    let Some(region) = find_region(region_id) else {
        log::warn!("requested unknown region id: {}", region_id);
        return Ok(());
    };

    let (digest, plot) = build_region_outputs(region, app_context).await;

    bot.edit_message_text(chat_id, message_id, digest)
        .parse_mode(ParseMode::Html)
        .await?;

    if let Some(png) = plot {
        bot.send_photo(chat_id, InputFile::memory(png).file_name("plot.png"))
            .await?;
    }

    log::debug!(
        "sent browsed regional data ({}) to chat id {}",
        region.name,
        chat_id.0
    );
    Ok(())
}

async fn send_region_digest_and_plot(
    bot: &Bot,
    chat_id: ChatId,
    region: &Region,
    app_context: &AppContext,
) -> ResponseResult<()> {
    let (digest, plot) = build_region_outputs(region, app_context).await;

    bot.send_message(chat_id, digest)
        .parse_mode(ParseMode::Html)
        .await?;

    if let Some(png) = plot {
        bot.send_photo(chat_id, InputFile::memory(png).file_name("plot.png"))
            .await?;
    }

    Ok(())
}

/// Region digest plus chart from the current snapshot. A missing series
/// yields a placeholder text; a render failure only drops the chart.
async fn build_region_outputs(
    region: &Region,
    app_context: &AppContext,
) -> (String, Option<Vec<u8>>) {
    let datasets = app_context.datasets.read().await;

    let Some(series) = datasets.region(region.code) else {
        return (
            format!("No data available yet for region {}.", region.name),
            None,
        );
    };

    let digest = build_region_digest(series, region.name, datasets.national());

    let plot = match render_region_plot(series, region.name, app_context.config.plot.window_days) {
        Ok(png) => Some(png),
        Err(error) => {
            log::warn!("region plot for {} not rendered: {}", region.name, error);
            None
        }
    };

    (digest, plot)
}

fn areas_keyboard() -> InlineKeyboardMarkup {
    let buttons: Vec<InlineKeyboardButton> = AREAS
        .iter()
        .map(|area| {
            InlineKeyboardButton::callback(
                area.name,
                CallbackAction::ShowArea {
                    area_id: area.id.to_string(),
                }
                .encode(),
            )
        })
        .collect();

    keyboard_markup(buttons)
}

fn keyboard_markup(buttons: Vec<InlineKeyboardButton>) -> InlineKeyboardMarkup {
    let rows: Vec<Vec<InlineKeyboardButton>> = buttons
        .chunks(KEYBOARD_COLUMNS)
        .map(|chunk| chunk.to_vec())
        .collect();

    InlineKeyboardMarkup::new(rows)
}
