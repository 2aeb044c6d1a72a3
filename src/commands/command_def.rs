use teloxide::utils::command::BotCommands;

#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase", description = "Available commands:")]
pub enum MyCommands {
    #[command(description = "About this bot.")]
    Start,
    #[command(description = "Show the command list.")]
    Help,
    #[command(description = "About this bot.")]
    About,
    #[command(description = "Request the latest daily digest.")]
    Digest,
    #[command(description = "Request the latest situation chart.")]
    Plot,
    #[command(description = "Subscribe to the daily update.")]
    Sub,
    #[command(description = "Cancel the subscription.")]
    Unsub,
    #[command(description = "Show subscription status.")]
    Status,
    #[command(description = "Regional data, e.g. /region lomb")]
    Region(String),
    #[command(description = "Provincial data, e.g. /province berg")]
    Province(String),
    #[command(description = "Show feed and subscriber status.")]
    Feedstatus,
    #[command(description = "Force a data refresh (operator only).")]
    Refresh,
}
