use chrono::{DateTime, NaiveDateTime, Utc};

// Scalar keys inside the markers tree.
const KEY_LAST_VALID_DATE: &str = "last_valid_date";
const KEY_LAST_RETRIEVAL: &str = "last_retrieval";

const MARKER_DATE_FORMAT: &str = "%d %b %Y %H:%M:%S";
const RETRIEVAL_TIMESTAMP_FORMAT: &str = "%d/%b/%Y %H:%M:%S";

/// Canonical formatter for the freshness marker. `is_new` compares formatted
/// strings for exact equality, so every caller must go through this one
/// function or fresh data is silently mistaken for stale.
pub fn format_marker_date(date: NaiveDateTime) -> String {
    date.format(MARKER_DATE_FORMAT).to_string()
}

pub fn format_retrieval_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.format(RETRIEVAL_TIMESTAMP_FORMAT).to_string()
}

/// Persisted marker of the most recent known data date and the timestamp of
/// the last successful retrieval. The date string is the sole freshness
/// signal; the timestamp is informational.
#[derive(Clone)]
pub struct FreshnessTracker {
    markers: sled::Tree,
}

impl FreshnessTracker {
    pub(super) fn new(markers: sled::Tree) -> Self {
        Self { markers }
    }

    /// True when `candidate` differs from the stored marker (or no marker
    /// has been stored yet). Read-only: calling this twice without an
    /// intervening commit returns the same answer.
    pub fn is_new(&self, candidate: &str) -> Result<bool, sled::Error> {
        let stored = self.last_valid_date()?;
        Ok(stored.as_deref() != Some(candidate))
    }

    /// Persists the marker date, then the retrieval timestamp. A failed
    /// timestamp write is logged and tolerated: `is_new` only inspects the
    /// date key, so the marker stays comparable.
    pub fn commit(&self, candidate: &str, fetched_at: DateTime<Utc>) -> Result<(), sled::Error> {
        self.markers
            .insert(KEY_LAST_VALID_DATE, candidate.as_bytes())?;

        let timestamp = format_retrieval_timestamp(fetched_at);
        if let Err(error) = self.markers.insert(KEY_LAST_RETRIEVAL, timestamp.as_bytes()) {
            log::warn!(
                "freshness_timestamp_write_failed marker_date={} error={}",
                candidate,
                error
            );
        }

        Ok(())
    }

    pub fn last_valid_date(&self) -> Result<Option<String>, sled::Error> {
        self.read_string(KEY_LAST_VALID_DATE)
    }

    pub fn last_retrieval_timestamp(&self) -> Result<Option<String>, sled::Error> {
        self.read_string(KEY_LAST_RETRIEVAL)
    }

    fn read_string(&self, key: &str) -> Result<Option<String>, sled::Error> {
        Ok(self
            .markers
            .get(key)?
            .map(|value| String::from_utf8_lossy(&value).into_owned()))
    }
}
