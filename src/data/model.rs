use std::collections::HashMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer};

/// Ordered, date-ascending sequence of daily records for one entity.
pub type Series = Vec<DailyRecord>;

/// Region code → series for that region.
pub type RegionalSeries = HashMap<u32, Series>;

/// Province code → series for that province.
pub type ProvincialSeries = HashMap<u32, Series>;

const FEED_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// One row of the civil-protection feed. The numeric fields are optional in
/// the upstream payload (provincial rows carry only a subset); a missing
/// field reads as 0 through [`DailyRecord::value`].
#[derive(Debug, Clone, Deserialize)]
pub struct DailyRecord {
    #[serde(rename = "data", deserialize_with = "deserialize_feed_date")]
    pub date: NaiveDateTime,
    #[serde(rename = "codice_regione", default)]
    pub region_code: Option<u32>,
    #[serde(rename = "denominazione_regione", default)]
    pub region_name: Option<String>,
    #[serde(rename = "codice_provincia", default)]
    pub province_code: Option<u32>,
    #[serde(rename = "denominazione_provincia", default)]
    pub province_name: Option<String>,
    #[serde(rename = "nuovi_positivi", default)]
    new_positives: Option<i64>,
    #[serde(rename = "dimessi_guariti", default)]
    recovered: Option<i64>,
    #[serde(rename = "deceduti", default)]
    deaths: Option<i64>,
    #[serde(rename = "totale_positivi", default)]
    current_positives: Option<i64>,
    #[serde(rename = "variazione_totale_positivi", default)]
    current_positives_delta: Option<i64>,
    #[serde(rename = "terapia_intensiva", default)]
    intensive_care: Option<i64>,
    #[serde(rename = "ricoverati_con_sintomi", default)]
    hospitalized: Option<i64>,
    #[serde(rename = "tamponi", default)]
    tests_performed: Option<i64>,
    #[serde(rename = "totale_casi", default)]
    total_cases: Option<i64>,
}

/// Selector for the named numeric fields of a [`DailyRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    NewPositives,
    Recovered,
    Deaths,
    CurrentPositives,
    CurrentPositivesDelta,
    IntensiveCare,
    Hospitalized,
    TestsPerformed,
    TotalCases,
}

impl DailyRecord {
    pub fn value(&self, field: Field) -> i64 {
        let value = match field {
            Field::NewPositives => self.new_positives,
            Field::Recovered => self.recovered,
            Field::Deaths => self.deaths,
            Field::CurrentPositives => self.current_positives,
            Field::CurrentPositivesDelta => self.current_positives_delta,
            Field::IntensiveCare => self.intensive_care,
            Field::Hospitalized => self.hospitalized,
            Field::TestsPerformed => self.tests_performed,
            Field::TotalCases => self.total_cases,
        };
        value.unwrap_or(0)
    }
}

fn deserialize_feed_date<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    NaiveDateTime::parse_from_str(&raw, FEED_DATE_FORMAT).map_err(serde::de::Error::custom)
}

#[cfg(test)]
impl DailyRecord {
    /// Record for the given `YYYY-MM-DDTHH:MM:SS` date with all fields unset.
    pub(crate) fn for_date(date: &str) -> Self {
        Self {
            date: NaiveDateTime::parse_from_str(date, FEED_DATE_FORMAT).expect("valid test date"),
            region_code: None,
            region_name: None,
            province_code: None,
            province_name: None,
            new_positives: None,
            recovered: None,
            deaths: None,
            current_positives: None,
            current_positives_delta: None,
            intensive_care: None,
            hospitalized: None,
            tests_performed: None,
            total_cases: None,
        }
    }

    pub(crate) fn with(mut self, field: Field, value: i64) -> Self {
        let slot = match field {
            Field::NewPositives => &mut self.new_positives,
            Field::Recovered => &mut self.recovered,
            Field::Deaths => &mut self.deaths,
            Field::CurrentPositives => &mut self.current_positives,
            Field::CurrentPositivesDelta => &mut self.current_positives_delta,
            Field::IntensiveCare => &mut self.intensive_care,
            Field::Hospitalized => &mut self.hospitalized,
            Field::TestsPerformed => &mut self.tests_performed,
            Field::TotalCases => &mut self.total_cases,
        };
        *slot = Some(value);
        self
    }

    pub(crate) fn with_province(mut self, code: u32, name: &str) -> Self {
        self.province_code = Some(code);
        self.province_name = Some(name.to_string());
        self
    }

    pub(crate) fn with_region(mut self, code: u32, name: &str) -> Self {
        self.region_code = Some(code);
        self.region_name = Some(name.to_string());
        self
    }
}
