//! The refresh state machine. `Idle` until the daily trigger fires, then
//! `AwaitingFreshData` while a single polling sub-loop retries the
//! fetch-check-refresh-notify tick until the upstream feed publishes a new
//! reporting date.

mod tick;

pub use tick::TickOutcome;
pub(crate) use tick::{run_tick, TickContext};

use tokio::task::JoinHandle;
use tokio::time::{sleep, Duration};

use crate::app_context::AppContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RefreshPhase {
    #[default]
    Idle,
    AwaitingFreshData,
}

/// Owns the phase flag and the handle of the active polling sub-loop.
/// Re-arming aborts the previous sub-loop first, so at most one polling
/// timer exists at any moment.
#[derive(Debug, Default)]
pub struct RefreshScheduler {
    phase: RefreshPhase,
    poll_task: Option<JoinHandle<()>>,
}

impl RefreshScheduler {
    pub fn phase(&self) -> RefreshPhase {
        self.phase
    }

    pub fn is_awaiting(&self) -> bool {
        self.phase == RefreshPhase::AwaitingFreshData
    }

    /// Installs a new polling task, aborting and returning the previous one
    /// if it was still running.
    pub(crate) fn arm(&mut self, task: JoinHandle<()>) -> Option<JoinHandle<()>> {
        let previous = self.poll_task.replace(task);
        if let Some(handle) = &previous {
            handle.abort();
        }
        self.phase = RefreshPhase::AwaitingFreshData;
        previous
    }

    /// Called by the polling loop itself once the day's refresh completed.
    pub(crate) fn finish(&mut self) {
        self.poll_task = None;
        self.phase = RefreshPhase::Idle;
    }
}

/// Arms the polling sub-loop for today's refresh. Ticks run at the
/// configured interval until one of them reports that polling can stop.
pub(crate) async fn arm_polling(context: &AppContext) {
    let poll_interval = Duration::from_secs(context.config.schedule.poll_interval_secs);

    let loop_context = context.clone();
    let task = tokio::spawn(async move {
        loop {
            sleep(poll_interval).await;

            let tick_context = loop_context.tick_context();
            let outcome = run_tick(
                &tick_context,
                loop_context.feed.as_ref(),
                loop_context.artifact_builder.as_ref(),
                loop_context.transport.as_ref(),
                false,
            )
            .await;

            log::debug!("poll_tick_finished outcome={:?}", outcome);

            if outcome.stops_polling() {
                let mut scheduler = loop_context.scheduler.lock().await;
                scheduler.finish();
                log::info!("daily check terminated");
                break;
            }
        }
    });

    let mut scheduler = context.scheduler.lock().await;
    if scheduler.arm(task).is_some() {
        log::info!("previous polling task cancelled before re-arm");
    }
}

/// Operator-triggered refresh: same tick logic with the freshness check
/// bypassed. Does not change the state machine's phase.
pub(crate) async fn run_forced_refresh(context: &AppContext) -> TickOutcome {
    log::info!("forced refresh requested, bypassing freshness check");

    let tick_context = context.tick_context();
    run_tick(
        &tick_context,
        context.feed.as_ref(),
        context.artifact_builder.as_ref(),
        context.transport.as_ref(),
        true,
    )
    .await
}
