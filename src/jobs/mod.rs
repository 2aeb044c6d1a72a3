use crate::app_context::AppContext;

mod daily;

pub fn start_background_jobs(app_context: AppContext) {
    daily::start_daily_trigger_job(app_context);
}
