mod datasets;
mod freshness;
mod subscribers;

pub use datasets::{DatasetStore, DigestArtifacts};
pub use freshness::{format_marker_date, format_retrieval_timestamp, FreshnessTracker};
pub use subscribers::SubscriberStore;

use crate::config::Config;

const TREE_MARKERS: &str = "markers";
const TREE_SUBSCRIBERS: &str = "subscribers";

/// Persistent side of the bot: the freshness marker pair and the subscriber
/// set, as trees of one sled database.
#[derive(Clone)]
pub struct BotStore {
    pub freshness: FreshnessTracker,
    pub subscribers: SubscriberStore,
}

impl BotStore {
    pub fn open_from_config(config: &Config) -> Result<Self, sled::Error> {
        Self::open_at(&config.store.path)
    }

    pub fn open_at(path: &str) -> Result<Self, sled::Error> {
        let db = sled::open(path)?;
        let markers = db.open_tree(TREE_MARKERS)?;
        let subscribers = db.open_tree(TREE_SUBSCRIBERS)?;

        Ok(Self {
            freshness: FreshnessTracker::new(markers),
            subscribers: SubscriberStore::new(subscribers),
        })
    }
}
