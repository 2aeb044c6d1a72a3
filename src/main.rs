mod app_context;
mod commands;
mod config;
mod data;
mod digest;
mod jobs;
mod notifier;
mod scheduler;
mod stats;
mod store;

use teloxide::prelude::*;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::app_context::AppContext;
use crate::commands::{answer, answer_callback, MyCommands};
use crate::config::{load_config, Config};
use crate::data::{DataProvider, FeedClient, FetchError};
use crate::digest::{ArtifactBuilder, PlotError};
use crate::jobs::start_background_jobs;
use crate::notifier::TelegramTransport;
use crate::store::{format_marker_date, BotStore};

const CONFIG_PATH: &str = "config.toml";

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn init_json_logging() {
    if let Err(error) = tracing_log::LogTracer::init() {
        eprintln!(
            "logging bridge initialization failed (continuing with existing logger): {}",
            error
        );
    }

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .json()
        .with_current_span(false)
        .with_span_list(false)
        .finish();

    if let Err(error) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("global logger initialization failed: {}", error);
    }
}

#[derive(Debug, Error)]
enum BootstrapError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Store(#[from] sled::Error),
    #[error(transparent)]
    Plot(#[from] PlotError),
    #[error("initial retrieve returned empty data")]
    EmptyDataset,
}

/// Unconditional initial fetch of all three datasets. The bot cannot serve
/// anything meaningful without a first snapshot, so any failure here is
/// fatal to startup.
async fn bootstrap(app_context: &AppContext) -> Result<(), BootstrapError> {
    log::debug!("retrieving initial datasets...");

    let national = app_context.feed.fetch_national().await?;
    log::debug!("national data: retrieved {} records", national.len());

    let regional = app_context.feed.fetch_regional().await?;
    let regional_record_count: usize = regional.values().map(|series| series.len()).sum();
    log::debug!("regional data: retrieved {} records", regional_record_count);

    let provincial = app_context.feed.fetch_provincial().await?;
    let provincial_record_count: usize = provincial.values().map(|series| series.len()).sum();
    log::debug!(
        "provincial data: retrieved {} records",
        provincial_record_count
    );

    let latest = national.last().ok_or(BootstrapError::EmptyDataset)?;
    let marker = format_marker_date(latest.date);
    app_context
        .store
        .freshness
        .commit(&marker, chrono::Utc::now())?;

    let artifacts = app_context.artifact_builder.build(&national)?;

    {
        let mut datasets = app_context.datasets.write().await;
        datasets.replace(national, regional, provincial, artifacts);
    }

    log::info!("bootstrap_complete marker_date={}", marker);
    Ok(())
}

#[tokio::main]
async fn main() {
    init_json_logging();

    let config: Config = match load_config(CONFIG_PATH) {
        Ok(config) => config,
        Err(error) => {
            log::error!("Configuration error: {}", error);
            return;
        }
    };

    log::info!("epibot v{} is starting...", VERSION);

    let store = match BotStore::open_from_config(&config) {
        Ok(store) => store,
        Err(error) => {
            log::error!("failed to open persistent store: {}", error);
            return;
        }
    };

    let feed = match FeedClient::from_config(&config) {
        Ok(feed) => feed,
        Err(error) => {
            log::error!("failed to build feed client: {}", error);
            return;
        }
    };

    let bot = Bot::new(&config.bot_token);
    let transport = TelegramTransport::new(bot.clone());

    let app_context = AppContext::new(config, store, feed, transport);

    if let Err(error) = bootstrap(&app_context).await {
        log::error!("error during initial data retrieve: {}. Exiting.", error);
        return;
    }

    start_background_jobs(app_context.clone());

    let handler = dptree::entry()
        .branch(
            Update::filter_message()
                .filter_command::<MyCommands>()
                .endpoint(
                    |bot: Bot, msg: Message, cmd: MyCommands, app_context: AppContext| async move {
                        answer(bot, msg, cmd, &app_context).await
                    },
                ),
        )
        .branch(Update::filter_callback_query().endpoint(
            |bot: Bot, q: CallbackQuery, app_context: AppContext| async move {
                answer_callback(bot, q, &app_context).await
            },
        ));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![app_context])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
}
