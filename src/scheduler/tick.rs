use chrono::Utc;
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};

use crate::data::{DataProvider, FetchError};
use crate::digest::{ArtifactBuilder, PlotError};
use crate::notifier::{notify_all, SubscriberTransport};
use crate::store::{format_marker_date, BotStore, DatasetStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// New data was published: datasets refreshed and subscribers notified.
    Refreshed,
    /// Upstream still reports the previously seen date.
    NotNew,
    /// Nobody to notify; today's polling can stop without fetching.
    NoSubscribers,
    /// A previous tick is still running, this one was skipped.
    Skipped,
    /// The tick failed; the polling loop carries on and retries.
    Failed,
}

impl TickOutcome {
    pub fn stops_polling(self) -> bool {
        matches!(self, TickOutcome::Refreshed | TickOutcome::NoSubscribers)
    }
}

#[derive(Debug, Error)]
enum TickError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Store(#[from] sled::Error),
    #[error(transparent)]
    Plot(#[from] PlotError),
}

pub(crate) struct TickContext<'a> {
    pub datasets: &'a RwLock<DatasetStore>,
    pub store: &'a BotStore,
    pub tick_guard: &'a Mutex<()>,
}

/// One execution of the fetch-check-refresh-notify sequence. Every error is
/// contained here and mapped to an outcome; nothing propagates into the
/// polling loop.
pub(crate) async fn run_tick<P, A, T>(
    context: &TickContext<'_>,
    provider: &P,
    artifact_builder: &A,
    transport: &T,
    force: bool,
) -> TickOutcome
where
    P: DataProvider,
    A: ArtifactBuilder,
    T: SubscriberTransport,
{
    let Ok(_guard) = context.tick_guard.try_lock() else {
        log::warn!("tick_skipped reason=previous_tick_still_running");
        return TickOutcome::Skipped;
    };

    match run_tick_inner(context, provider, artifact_builder, transport, force).await {
        Ok(outcome) => outcome,
        Err(error) => {
            log::error!("refresh tick failed: {}", error);
            TickOutcome::Failed
        }
    }
}

async fn run_tick_inner<P, A, T>(
    context: &TickContext<'_>,
    provider: &P,
    artifact_builder: &A,
    transport: &T,
    force: bool,
) -> Result<TickOutcome, TickError>
where
    P: DataProvider,
    A: ArtifactBuilder,
    T: SubscriberTransport,
{
    if context.store.subscribers.count() == 0 {
        log::info!("no subscribers in database, skipping refresh cycle");
        return Ok(TickOutcome::NoSubscribers);
    }

    let national = provider.fetch_national().await?;
    // fetch_national rejects empty payloads, so the series has a last record.
    let candidate = match national.last() {
        Some(latest) => format_marker_date(latest.date),
        None => return Ok(TickOutcome::Failed),
    };

    if !force {
        let stored = context.store.freshness.last_valid_date()?;
        tracing::info!(
            target: "scheduler",
            candidate = %candidate,
            stored = stored.as_deref().unwrap_or("<none>"),
            "freshness_check"
        );

        if !context.store.freshness.is_new(&candidate)? {
            log::debug!(
                "dataset still reports {}, skipping transmission",
                candidate
            );
            return Ok(TickOutcome::NotNew);
        }
    }

    context.store.freshness.commit(&candidate, Utc::now())?;

    let regional = provider.fetch_regional().await?;
    let provincial = provider.fetch_provincial().await?;

    let artifacts = artifact_builder.build(&national)?;

    {
        let mut datasets = context.datasets.write().await;
        datasets.replace(national, regional, provincial, artifacts.clone());
    }

    let report = notify_all(transport, &context.store.subscribers, &artifacts).await;
    log::info!(
        "digest_fanout_complete delivered={} pruned={} failed={} marker_date={}",
        report.delivered,
        report.pruned,
        report.failed,
        candidate
    );

    Ok(TickOutcome::Refreshed)
}
