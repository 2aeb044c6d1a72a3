use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};

use crate::config::Config;
use crate::data::FeedClient;
use crate::digest::DigestArtifactBuilder;
use crate::notifier::TelegramTransport;
use crate::scheduler::{RefreshScheduler, TickContext};
use crate::store::{BotStore, DatasetStore};

/// Everything the bot shares across handlers and background jobs. The
/// scheduler is the sole writer of `datasets`; `tick_guard` keeps at most
/// one refresh tick in flight.
#[derive(Clone)]
pub struct AppContext {
    pub config: Config,
    pub datasets: Arc<RwLock<DatasetStore>>,
    pub store: BotStore,
    pub scheduler: Arc<Mutex<RefreshScheduler>>,
    pub tick_guard: Arc<Mutex<()>>,
    pub feed: Arc<FeedClient>,
    pub transport: Arc<TelegramTransport>,
    pub artifact_builder: Arc<DigestArtifactBuilder>,
}

impl AppContext {
    pub fn new(
        config: Config,
        store: BotStore,
        feed: FeedClient,
        transport: TelegramTransport,
    ) -> Self {
        let artifact_builder = DigestArtifactBuilder::new(config.plot.window_days);

        Self {
            config,
            datasets: Arc::new(RwLock::new(DatasetStore::default())),
            store,
            scheduler: Arc::new(Mutex::new(RefreshScheduler::default())),
            tick_guard: Arc::new(Mutex::new(())),
            feed: Arc::new(feed),
            transport: Arc::new(transport),
            artifact_builder: Arc::new(artifact_builder),
        }
    }

    pub(crate) fn tick_context(&self) -> TickContext<'_> {
        TickContext {
            datasets: self.datasets.as_ref(),
            store: &self.store,
            tick_guard: self.tick_guard.as_ref(),
        }
    }

    /// True while the daily polling sub-loop is still waiting for fresh data.
    pub async fn is_refresh_in_progress(&self) -> bool {
        self.scheduler.lock().await.is_awaiting()
    }
}
