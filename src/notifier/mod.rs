use teloxide::prelude::*;
use teloxide::types::{InputFile, ParseMode};
use teloxide::{ApiError, RequestError};
use thiserror::Error;

use crate::store::{DigestArtifacts, SubscriberStore};

#[derive(Debug, Error)]
pub enum DeliveryError {
    /// The transport confirmed the recipient can never be reached again.
    #[error("recipient unreachable: {0}")]
    Permanent(String),
    #[error("delivery failed: {0}")]
    Transient(String),
}

/// Boundary to the notification transport. One implementation talks to
/// Telegram; tests substitute a recording mock.
pub trait SubscriberTransport {
    async fn send_plot(
        &self,
        chat_id: i64,
        png: &[u8],
        caption: &str,
    ) -> Result<(), DeliveryError>;

    async fn send_digest(&self, chat_id: i64, text: &str) -> Result<(), DeliveryError>;
}

#[derive(Clone)]
pub struct TelegramTransport {
    bot: Bot,
}

impl TelegramTransport {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

fn classify(error: RequestError) -> DeliveryError {
    match &error {
        RequestError::Api(
            ApiError::BotBlocked | ApiError::ChatNotFound | ApiError::UserDeactivated,
        ) => DeliveryError::Permanent(error.to_string()),
        _ => DeliveryError::Transient(error.to_string()),
    }
}

impl SubscriberTransport for TelegramTransport {
    async fn send_plot(
        &self,
        chat_id: i64,
        png: &[u8],
        caption: &str,
    ) -> Result<(), DeliveryError> {
        let photo = InputFile::memory(png.to_vec()).file_name("plot.png");
        let request = self.bot.send_photo(ChatId(chat_id), photo);

        let result = if caption.is_empty() {
            request.await
        } else {
            request.caption(caption).await
        };

        result.map(|_| ()).map_err(classify)
    }

    async fn send_digest(&self, chat_id: i64, text: &str) -> Result<(), DeliveryError> {
        self.bot
            .send_message(ChatId(chat_id), text)
            .parse_mode(ParseMode::Html)
            .await
            .map(|_| ())
            .map_err(classify)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NotifyReport {
    pub delivered: usize,
    pub pruned: usize,
    pub failed: usize,
}

/// Fans the cached artifact pair out to every subscriber, image first and
/// text second. Failures are isolated per subscriber: a permanent rejection
/// prunes the subscription, anything else is logged and retried naturally on
/// the next daily cycle.
pub async fn notify_all<T: SubscriberTransport>(
    transport: &T,
    subscribers: &SubscriberStore,
    artifacts: &DigestArtifacts,
) -> NotifyReport {
    let mut report = NotifyReport::default();

    for chat_id in subscribers.list() {
        match deliver_to(transport, chat_id, artifacts).await {
            Ok(()) => report.delivered += 1,
            Err(DeliveryError::Permanent(reason)) => {
                log::error!(
                    "removing subscription of {} after permanent delivery failure: {}",
                    chat_id,
                    reason
                );
                if let Err(error) = subscribers.remove(chat_id) {
                    log::error!("failed to remove subscriber {}: {}", chat_id, error);
                }
                report.pruned += 1;
            }
            Err(DeliveryError::Transient(reason)) => {
                log::error!("unable to send messages to {}: {}", chat_id, reason);
                report.failed += 1;
            }
        }
    }

    report
}

async fn deliver_to<T: SubscriberTransport>(
    transport: &T,
    chat_id: i64,
    artifacts: &DigestArtifacts,
) -> Result<(), DeliveryError> {
    transport
        .send_plot(chat_id, &artifacts.plot_png, "")
        .await?;
    transport.send_digest(chat_id, &artifacts.digest).await?;
    Ok(())
}

#[cfg(test)]
mod tests;
