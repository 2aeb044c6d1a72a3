use serde::Deserialize;

use super::defaults::*;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub bot_token: String,
    #[serde(default)]
    pub admin_chat_id: Option<i64>,
    #[serde(default)]
    pub schedule: Schedule,
    #[serde(default)]
    pub feed: Feed,
    #[serde(default)]
    pub store: Store,
    #[serde(default)]
    pub plot: Plot,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Schedule {
    #[serde(default = "default_trigger_hour")]
    pub trigger_hour: u8,
    #[serde(default = "default_trigger_minute")]
    pub trigger_minute: u8,
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Feed {
    #[serde(default = "default_national_url")]
    pub national_url: String,
    #[serde(default = "default_regional_url")]
    pub regional_url: String,
    #[serde(default = "default_provincial_url")]
    pub provincial_url: String,
    #[serde(default = "default_feed_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Store {
    #[serde(default = "default_store_path")]
    pub path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Plot {
    #[serde(default = "default_plot_window_days")]
    pub window_days: usize,
}
