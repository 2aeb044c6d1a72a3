use teloxide::types::ChatId;
use thiserror::Error;

use super::schema::Config;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
    #[error("invalid config: {0}")]
    Validation(String),
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bot_token.trim().is_empty() {
            return Err(ConfigError::Validation(
                "bot_token must not be empty".to_string(),
            ));
        }
        if self.schedule.trigger_hour > 23 {
            return Err(ConfigError::Validation(
                "schedule.trigger_hour must be between 0 and 23".to_string(),
            ));
        }
        if self.schedule.trigger_minute > 59 {
            return Err(ConfigError::Validation(
                "schedule.trigger_minute must be between 0 and 59".to_string(),
            ));
        }
        if self.schedule.poll_interval_secs == 0 {
            return Err(ConfigError::Validation(
                "schedule.poll_interval_secs must be greater than 0".to_string(),
            ));
        }
        validate_url("feed.national_url", &self.feed.national_url)?;
        validate_url("feed.regional_url", &self.feed.regional_url)?;
        validate_url("feed.provincial_url", &self.feed.provincial_url)?;
        if self.feed.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "feed.timeout_secs must be greater than 0".to_string(),
            ));
        }
        if self.store.path.trim().is_empty() {
            return Err(ConfigError::Validation(
                "store.path must not be empty".to_string(),
            ));
        }
        if self.plot.window_days < 2 {
            return Err(ConfigError::Validation(
                "plot.window_days must be at least 2".to_string(),
            ));
        }
        Ok(())
    }

    pub fn admin_chat_id(&self) -> Option<ChatId> {
        self.admin_chat_id.map(ChatId)
    }
}

fn validate_url(field: &str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!(
            "{} must not be empty",
            field
        )));
    }
    if !value.starts_with("http://") && !value.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{} must be an http(s) URL",
            field
        )));
    }
    Ok(())
}
