use teloxide::prelude::*;

use crate::app_context::AppContext;

use super::command_def::MyCommands;
use super::features::{
    digest::{handle_digest, handle_plot},
    feed::{handle_feed_status, handle_forced_refresh},
    info::{handle_about, handle_help},
    provinces::handle_province,
    regions::handle_region,
    subscription::{handle_status, handle_subscribe, handle_unsubscribe},
};

pub(super) async fn route_command(
    bot: Bot,
    msg: Message,
    cmd: MyCommands,
    app_context: &AppContext,
) -> ResponseResult<()> {
    match cmd {
        MyCommands::Start | MyCommands::About => handle_about(&bot, &msg).await?,
        MyCommands::Help => handle_help(&bot, &msg).await?,
        MyCommands::Digest => handle_digest(&bot, &msg, app_context).await?,
        MyCommands::Plot => handle_plot(&bot, &msg, app_context).await?,
        MyCommands::Sub => handle_subscribe(&bot, &msg, app_context).await?,
        MyCommands::Unsub => handle_unsubscribe(&bot, &msg, app_context).await?,
        MyCommands::Status => handle_status(&bot, &msg, app_context).await?,
        MyCommands::Region(query) => handle_region(&bot, &msg, app_context, &query).await?,
        MyCommands::Province(query) => handle_province(&bot, &msg, app_context, &query).await?,
        MyCommands::Feedstatus => handle_feed_status(&bot, &msg, app_context).await?,
        MyCommands::Refresh => handle_forced_refresh(&bot, &msg, app_context).await?,
    }

    Ok(())
}
