use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const SUBSCRIBED_AT_FORMAT: &str = "%d %b %Y %H:%M:%S";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SubscriberRecord {
    subscribed_at: String,
}

/// Subscriber set keyed by chat id, each entry carrying its subscription
/// timestamp. Subscribing again overwrites the timestamp.
#[derive(Clone)]
pub struct SubscriberStore {
    subscribers: sled::Tree,
}

impl SubscriberStore {
    pub(super) fn new(subscribers: sled::Tree) -> Self {
        Self { subscribers }
    }

    pub fn add(&self, chat_id: i64, now: DateTime<Utc>) -> Result<(), sled::Error> {
        let record = SubscriberRecord {
            subscribed_at: now.format(SUBSCRIBED_AT_FORMAT).to_string(),
        };

        if let Ok(value) = serde_json::to_vec(&record) {
            self.subscribers.insert(chat_id.to_be_bytes(), value)?;
        }

        Ok(())
    }

    pub fn remove(&self, chat_id: i64) -> Result<(), sled::Error> {
        self.subscribers.remove(chat_id.to_be_bytes())?;
        Ok(())
    }

    pub fn contains(&self, chat_id: i64) -> Result<bool, sled::Error> {
        Ok(self.subscribers.contains_key(chat_id.to_be_bytes())?)
    }

    pub fn subscribed_at(&self, chat_id: i64) -> Result<Option<String>, sled::Error> {
        Ok(self
            .subscribers
            .get(chat_id.to_be_bytes())?
            .and_then(|value| serde_json::from_slice::<SubscriberRecord>(&value).ok())
            .map(|record| record.subscribed_at))
    }

    pub fn list(&self) -> Vec<i64> {
        self.subscribers
            .iter()
            .keys()
            .filter_map(|key| key.ok())
            .filter_map(|key| key.as_ref().try_into().ok().map(i64::from_be_bytes))
            .collect()
    }

    pub fn count(&self) -> usize {
        self.subscribers.len()
    }
}
