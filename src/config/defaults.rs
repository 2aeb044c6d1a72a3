use super::schema::{Feed, Plot, Schedule, Store};

pub(super) fn default_trigger_hour() -> u8 {
    17
}

pub(super) fn default_trigger_minute() -> u8 {
    0
}

pub(super) fn default_poll_interval_secs() -> u64 {
    60
}

pub(super) fn default_national_url() -> String {
    "https://raw.githubusercontent.com/pcm-dpc/COVID-19/master/dati-json/dpc-covid19-ita-andamento-nazionale.json".to_string()
}

pub(super) fn default_regional_url() -> String {
    "https://raw.githubusercontent.com/pcm-dpc/COVID-19/master/dati-json/dpc-covid19-ita-regioni.json".to_string()
}

pub(super) fn default_provincial_url() -> String {
    "https://raw.githubusercontent.com/pcm-dpc/COVID-19/master/dati-json/dpc-covid19-ita-province.json".to_string()
}

pub(super) fn default_feed_timeout_secs() -> u64 {
    30
}

pub(super) fn default_store_path() -> String {
    "data/epibot".to_string()
}

pub(super) fn default_plot_window_days() -> usize {
    120
}

impl Default for Schedule {
    fn default() -> Self {
        Self {
            trigger_hour: default_trigger_hour(),
            trigger_minute: default_trigger_minute(),
            poll_interval_secs: default_poll_interval_secs(),
        }
    }
}

impl Default for Feed {
    fn default() -> Self {
        Self {
            national_url: default_national_url(),
            regional_url: default_regional_url(),
            provincial_url: default_provincial_url(),
            timeout_secs: default_feed_timeout_secs(),
        }
    }
}

impl Default for Store {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}

impl Default for Plot {
    fn default() -> Self {
        Self {
            window_days: default_plot_window_days(),
        }
    }
}
