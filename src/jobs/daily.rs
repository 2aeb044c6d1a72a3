use chrono::{Days, Local, TimeZone};
use tokio::time::{sleep, Duration};

use crate::app_context::AppContext;
use crate::scheduler;

/// Fires once a day at the configured local wall-clock time and arms the
/// polling sub-loop. Arming is idempotent: a sub-loop still running from a
/// previous trigger is cancelled first.
pub(super) fn start_daily_trigger_job(app_context: AppContext) {
    tokio::spawn(async move {
        loop {
            let wait = duration_until_next_trigger(
                app_context.config.schedule.trigger_hour,
                app_context.config.schedule.trigger_minute,
            );
            sleep(wait).await;

            log::info!(
                "daily_trigger_fired hour={} minute={}",
                app_context.config.schedule.trigger_hour,
                app_context.config.schedule.trigger_minute
            );
            scheduler::arm_polling(&app_context).await;
        }
    });
}

fn duration_until_next_trigger(hour: u8, minute: u8) -> Duration {
    let now = Local::now();

    let today = now.date_naive();
    let Some(scheduled_today_naive) = today.and_hms_opt(hour as u32, minute as u32, 0) else {
        return Duration::from_secs(60);
    };

    let Some(mut scheduled) = Local.from_local_datetime(&scheduled_today_naive).earliest() else {
        return Duration::from_secs(60);
    };

    if scheduled <= now {
        let tomorrow = today.checked_add_days(Days::new(1)).unwrap_or(today);
        let Some(scheduled_tomorrow_naive) = tomorrow.and_hms_opt(hour as u32, minute as u32, 0)
        else {
            return Duration::from_secs(60);
        };
        scheduled = match Local.from_local_datetime(&scheduled_tomorrow_naive).earliest() {
            Some(value) => value,
            None => return Duration::from_secs(60),
        };
    }

    (scheduled - now)
        .to_std()
        .unwrap_or_else(|_| Duration::from_secs(60))
}
