use teloxide::prelude::*;

use crate::app_context::AppContext;

use super::callback::CallbackAction;
use super::command_def::MyCommands;
use super::features::regions;
use super::router::route_command;

pub async fn answer(
    bot: Bot,
    msg: Message,
    cmd: MyCommands,
    app_context: &AppContext,
) -> ResponseResult<()> {
    route_command(bot, msg, cmd, app_context).await
}

pub async fn answer_callback(
    bot: Bot,
    q: CallbackQuery,
    app_context: &AppContext,
) -> ResponseResult<()> {
    bot.answer_callback_query(&q.id).await?;

    let msg = match q.message {
        Some(msg) => msg,
        None => return Ok(()),
    };

    let data = match q.data {
        Some(data) => data,
        None => return Ok(()),
    };

    let action = match CallbackAction::parse(&data) {
        Some(action) => action,
        None => {
            log::warn!("ignoring unknown callback payload: {:?}", data);
            return Ok(());
        }
    };

    match action {
        CallbackAction::ShowAreas => regions::show_areas_list(&bot, msg.chat.id, msg.id).await?,
        CallbackAction::ShowArea { area_id } => {
            regions::show_area_regions(&bot, msg.chat.id, msg.id, &area_id).await?
        }
        CallbackAction::ShowRegion { region_id } => {
            regions::show_region_data(&bot, msg.chat.id, msg.id, &region_id, app_context).await?
        }
    }

    Ok(())
}
