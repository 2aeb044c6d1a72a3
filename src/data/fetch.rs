use std::time::Duration;

use thiserror::Error;

use crate::config::Config;

use super::model::{DailyRecord, ProvincialSeries, RegionalSeries, Series};

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed while fetching {url}: {source}")]
    Network { url: String, source: reqwest::Error },
    #[error("request for {url} returned status {status}")]
    Status { url: String, status: u16 },
    #[error("failed to parse feed payload from {url}: {source}")]
    Parse {
        url: String,
        source: serde_json::Error,
    },
    #[error("feed {url} returned an empty dataset")]
    Empty { url: String },
}

/// Boundary to the upstream data feeds. All three operations are idempotent
/// reads returning date-ascending series.
pub trait DataProvider {
    async fn fetch_national(&self) -> Result<Series, FetchError>;
    async fn fetch_regional(&self) -> Result<RegionalSeries, FetchError>;
    async fn fetch_provincial(&self) -> Result<ProvincialSeries, FetchError>;
}

pub struct FeedClient {
    http: reqwest::Client,
    national_url: String,
    regional_url: String,
    provincial_url: String,
}

impl FeedClient {
    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.feed.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            national_url: config.feed.national_url.clone(),
            regional_url: config.feed.regional_url.clone(),
            provincial_url: config.feed.provincial_url.clone(),
        })
    }

    async fn fetch_series(&self, url: &str) -> Result<Series, FetchError> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|source| FetchError::Network {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|source| FetchError::Network {
            url: url.to_string(),
            source,
        })?;

        let mut records: Series =
            serde_json::from_str(&body).map_err(|source| FetchError::Parse {
                url: url.to_string(),
                source,
            })?;

        if records.is_empty() {
            return Err(FetchError::Empty {
                url: url.to_string(),
            });
        }

        records.sort_by_key(|record| record.date);
        Ok(records)
    }
}

impl DataProvider for FeedClient {
    async fn fetch_national(&self) -> Result<Series, FetchError> {
        self.fetch_series(&self.national_url).await
    }

    async fn fetch_regional(&self) -> Result<RegionalSeries, FetchError> {
        let records = self.fetch_series(&self.regional_url).await?;
        Ok(group_by_code(records, |record| record.region_code))
    }

    async fn fetch_provincial(&self) -> Result<ProvincialSeries, FetchError> {
        let records = self.fetch_series(&self.provincial_url).await?;
        Ok(group_by_code(records, |record| record.province_code))
    }
}

/// Splits a date-sorted record list into per-entity series. Rows without the
/// grouping code are dropped; the per-series date order is preserved by the
/// caller's sort.
fn group_by_code(
    records: Series,
    code: impl Fn(&DailyRecord) -> Option<u32>,
) -> std::collections::HashMap<u32, Series> {
    let mut grouped: std::collections::HashMap<u32, Series> = std::collections::HashMap::new();

    for record in records {
        let Some(key) = code(&record) else {
            continue;
        };
        grouped.entry(key).or_default().push(record);
    }

    grouped
}

#[cfg(test)]
mod tests {
    use crate::data::model::{DailyRecord, Field};

    use super::group_by_code;

    #[test]
    fn groups_sorted_records_by_entity_code() {
        let records = vec![
            DailyRecord::for_date("2021-01-01T17:00:00").with_province(16, "Bergamo"),
            DailyRecord::for_date("2021-01-01T17:00:00").with_province(13, "Milano"),
            DailyRecord::for_date("2021-01-02T17:00:00")
                .with_province(16, "Bergamo")
                .with(Field::TotalCases, 10),
        ];

        let grouped = group_by_code(records, |record| record.province_code);

        assert_eq!(grouped.len(), 2);
        let bergamo = grouped.get(&16).expect("bergamo series");
        assert_eq!(bergamo.len(), 2);
        assert!(bergamo[0].date < bergamo[1].date);
    }

    #[test]
    fn drops_records_without_grouping_code() {
        let records = vec![
            DailyRecord::for_date("2021-01-01T17:00:00"),
            DailyRecord::for_date("2021-01-01T17:00:00").with_region(3, "Lombardia"),
        ];

        let grouped = group_by_code(records, |record| record.region_code);

        assert_eq!(grouped.len(), 1);
        assert!(grouped.contains_key(&3));
    }
}
