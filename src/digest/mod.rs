//! HTML digest builders. All numbers flow through the aggregation
//! primitives in `stats`, so the wording here is presentation only.

mod plot;

pub use plot::{render_national_plot, render_region_plot, PlotError};

use crate::data::{DailyRecord, Field, ProvincialSeries};
use crate::stats::{
    before_previous, delta, format_int, format_int_signed, format_perc, last, last_date,
    percentage_of, previous,
};
use crate::store::DigestArtifacts;

/// Boundary for rebuilding the derived artifact pair. The scheduler depends
/// on chart rasterization only through this contract.
pub trait ArtifactBuilder {
    fn build(&self, national: &[DailyRecord]) -> Result<DigestArtifacts, PlotError>;
}

pub struct DigestArtifactBuilder {
    window_days: usize,
}

impl DigestArtifactBuilder {
    pub fn new(window_days: usize) -> Self {
        Self { window_days }
    }
}

impl ArtifactBuilder for DigestArtifactBuilder {
    fn build(&self, national: &[DailyRecord]) -> Result<DigestArtifacts, PlotError> {
        let digest = build_national_digest(national);
        let plot_png = render_national_plot(national, self.window_days)?;
        Ok(DigestArtifacts { digest, plot_png })
    }
}

const DIGEST_DATE_FORMAT: &str = "%d/%m/%Y";

// Pseudo-provinces ("being defined" buckets) carry codes from 500 upwards.
const PROVINCE_CODE_LIMIT: u32 = 500;

const TOP_PROVINCES_COUNT: usize = 10;

fn last_date_label(series: &[DailyRecord]) -> String {
    last_date(series)
        .map(|date| date.format(DIGEST_DATE_FORMAT).to_string())
        .unwrap_or_default()
}

/// Daily national digest sent to subscribers and served by `/digest`.
pub fn build_national_digest(series: &[DailyRecord]) -> String {
    let date = last_date_label(series);
    let new_cases = format_int(last(series, Field::NewPositives));
    let newly_recovered = format_int(delta(series, Field::Recovered));
    let new_deaths = format_int(delta(series, Field::Deaths));
    let current_positives = format_int(last(series, Field::CurrentPositives));
    let current_positives_delta = format_int_signed(last(series, Field::CurrentPositivesDelta));
    let hospitalized = format_int(last(series, Field::Hospitalized));
    let hospitalized_delta = format_int_signed(delta(series, Field::Hospitalized));
    let intensive_care = format_int(last(series, Field::IntensiveCare));
    let intensive_care_delta = format_int_signed(delta(series, Field::IntensiveCare));
    let tests = format_int(last(series, Field::TestsPerformed));

    let mut text = format!("<b>Update of {}</b>", date);
    text += &format!(
        "\nThere were <b>{}</b> new cases, <b>{}</b> recovered and <b>{}</b> deaths, for a total of <b>{}</b> currently positive (<b>{}</b> compared to yesterday).",
        new_cases, newly_recovered, new_deaths, current_positives, current_positives_delta
    );
    text += &format!(
        "\n<b>{}</b> people are hospitalized with symptoms (<b>{}</b> compared to the previous day) and <b>{}</b> are in intensive care (<b>{}</b> compared to the previous day).",
        hospitalized, hospitalized_delta, intensive_care, intensive_care_delta
    );
    text += &format!("\n<b>{}</b> tests have been performed so far.", tests);

    text
}

/// Region digest, including the region's share of the national case total.
pub fn build_region_digest(
    series: &[DailyRecord],
    region_name: &str,
    national: &[DailyRecord],
) -> String {
    let date = last_date_label(series);
    let name = html_escape::encode_text(region_name);
    let new_cases = format_int(last(series, Field::NewPositives));
    let current_positives = format_int(last(series, Field::CurrentPositives));
    let current_positives_delta = format_int_signed(last(series, Field::CurrentPositivesDelta));
    let hospitalized = format_int(last(series, Field::Hospitalized));
    let intensive_care = format_int(last(series, Field::IntensiveCare));
    let total_cases = last(series, Field::TotalCases);
    let national_share = format_perc(percentage_of(
        total_cases,
        last(national, Field::TotalCases),
    ));
    let recovered = format_int(last(series, Field::Recovered));
    let deaths = format_int(last(series, Field::Deaths));

    let mut text = format!("<b>Region {}: update of {}.</b>", name, date);
    text += &format!(
        "\nIn the last 24 hours there were <b>{}</b> new cases, for a total of <b>{}</b> currently positive (<b>{}</b> compared to yesterday).",
        new_cases, current_positives, current_positives_delta
    );
    text += &format!(
        "\n<b>{}</b> people are hospitalized and <b>{}</b> are in intensive care.",
        hospitalized, intensive_care
    );
    text += &format!(
        "\nSince the start of the epidemic the region has recorded <b>{}</b> cases (<b>{}</b> of the national total), <b>{}</b> recovered and <b>{}</b> deaths.",
        format_int(total_cases),
        national_share,
        recovered,
        deaths
    );

    text
}

/// Province digest. Provincial rows only carry the cumulative case count,
/// so new cases are the day-over-day delta of that total.
pub fn build_province_digest(series: &[DailyRecord]) -> String {
    let date = last_date_label(series);
    let province = series
        .last()
        .and_then(|record| record.province_name.as_deref())
        .unwrap_or("?");
    let region = series
        .last()
        .and_then(|record| record.region_name.as_deref())
        .unwrap_or("?");
    let new_cases = format_int(delta(series, Field::TotalCases));
    let total_cases = format_int(last(series, Field::TotalCases));

    let mut text = format!(
        "<b>Province of {} ({}): update of {}.</b>",
        html_escape::encode_text(province),
        html_escape::encode_text(region),
        date
    );
    text += &format!(
        "\nIn the last 24 hours there were <b>{}</b> new cases, for a total of <b>{}</b> since the start of the epidemic.",
        new_cases, total_cases
    );

    if series.len() >= 3 {
        let yesterday_new_cases =
            previous(series, Field::TotalCases) - before_previous(series, Field::TotalCases);
        text += &format!(
            "\nThe day before there were <b>{}</b> new cases.",
            format_int(yesterday_new_cases)
        );
    }

    text
}

/// Ranking of the provinces with the most new cases since the previous day.
pub fn build_top_provinces_digest(provincial: &ProvincialSeries) -> String {
    let mut ranked: Vec<(&str, i64, &[DailyRecord])> = provincial
        .iter()
        .filter(|(code, _)| **code < PROVINCE_CODE_LIMIT)
        .filter_map(|(_, series)| {
            let name = series.last()?.province_name.as_deref()?;
            Some((name, delta(series, Field::TotalCases), series.as_slice()))
        })
        .collect();

    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.truncate(TOP_PROVINCES_COUNT);

    let date = ranked
        .first()
        .map(|(_, _, series)| last_date_label(series))
        .unwrap_or_default();

    let mut text = format!(
        "<b>Provinces with the most new cases (as of {}):</b>\n",
        date
    );
    for (name, new_cases, _) in ranked {
        text += &format!(
            "\n{:>5} -> {}",
            format_int(new_cases),
            html_escape::encode_text(name)
        );
    }

    text
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use crate::data::{DailyRecord, Field, ProvincialSeries};

    use super::{
        build_national_digest, build_province_digest, build_region_digest,
        build_top_provinces_digest,
    };

    fn national_series() -> Vec<DailyRecord> {
        vec![
            DailyRecord::for_date("2021-01-01T17:00:00")
                .with(Field::NewPositives, 100)
                .with(Field::Recovered, 2000)
                .with(Field::Deaths, 300)
                .with(Field::Hospitalized, 1500)
                .with(Field::IntensiveCare, 120)
                .with(Field::TestsPerformed, 100000)
                .with(Field::TotalCases, 50000),
            DailyRecord::for_date("2021-01-02T17:00:00")
                .with(Field::NewPositives, 1234)
                .with(Field::Recovered, 2100)
                .with(Field::Deaths, 310)
                .with(Field::CurrentPositives, 40000)
                .with(Field::CurrentPositivesDelta, 678)
                .with(Field::Hospitalized, 1488)
                .with(Field::IntensiveCare, 123)
                .with(Field::TestsPerformed, 105000)
                .with(Field::TotalCases, 51234),
        ]
    }

    #[test]
    fn national_digest_reports_last_and_delta_values() {
        let digest = build_national_digest(&national_series());

        assert!(digest.contains("<b>Update of 02/01/2021</b>"));
        assert!(digest.contains("<b>1.234</b> new cases"));
        assert!(digest.contains("<b>100</b> recovered"));
        assert!(digest.contains("<b>10</b> deaths"));
        assert!(digest.contains("<b>+678</b> compared to yesterday"));
        assert!(digest.contains("<b>1.488</b> people are hospitalized with symptoms (<b>-12</b>"));
        assert!(digest.contains("<b>123</b> are in intensive care (<b>+3</b>"));
        assert!(digest.contains("<b>105.000</b> tests"));
    }

    #[test]
    fn region_digest_reports_share_of_national_total() {
        let region = vec![
            DailyRecord::for_date("2021-01-02T17:00:00")
                .with_region(3, "Lombardia")
                .with(Field::NewPositives, 400)
                .with(Field::CurrentPositives, 9000)
                .with(Field::CurrentPositivesDelta, -50)
                .with(Field::Hospitalized, 700)
                .with(Field::IntensiveCare, 60)
                .with(Field::TotalCases, 12500)
                .with(Field::Recovered, 8000)
                .with(Field::Deaths, 900),
        ];

        let digest = build_region_digest(&region, "Lombardia", &national_series());

        assert!(digest.contains("<b>Region Lombardia: update of 02/01/2021.</b>"));
        assert!(digest.contains("<b>400</b> new cases"));
        assert!(digest.contains("<b>-50</b> compared to yesterday"));
        // 12500 of 51234 national cases.
        assert!(digest.contains("<b>24,40%</b> of the national total"));
    }

    #[test]
    fn province_digest_uses_cumulative_case_delta() {
        let series = vec![
            DailyRecord::for_date("2021-01-01T17:00:00")
                .with_province(16, "Bergamo")
                .with_region(3, "Lombardia")
                .with(Field::TotalCases, 1000),
            DailyRecord::for_date("2021-01-02T17:00:00")
                .with_province(16, "Bergamo")
                .with_region(3, "Lombardia")
                .with(Field::TotalCases, 1050),
        ];

        let digest = build_province_digest(&series);

        assert!(digest.contains("<b>Province of Bergamo (Lombardia): update of 02/01/2021.</b>"));
        assert!(digest.contains("<b>50</b> new cases"));
        assert!(digest.contains("<b>1.050</b> since the start"));
        // Two records: no baseline for the day before, so no comparison line.
        assert!(!digest.contains("The day before"));
    }

    #[test]
    fn province_digest_adds_previous_day_comparison_when_available() {
        let series = vec![
            DailyRecord::for_date("2020-12-31T17:00:00")
                .with_province(16, "Bergamo")
                .with_region(3, "Lombardia")
                .with(Field::TotalCases, 970),
            DailyRecord::for_date("2021-01-01T17:00:00")
                .with_province(16, "Bergamo")
                .with_region(3, "Lombardia")
                .with(Field::TotalCases, 1000),
            DailyRecord::for_date("2021-01-02T17:00:00")
                .with_province(16, "Bergamo")
                .with_region(3, "Lombardia")
                .with(Field::TotalCases, 1050),
        ];

        let digest = build_province_digest(&series);

        assert!(digest.contains("<b>50</b> new cases"));
        assert!(digest.contains("The day before there were <b>30</b> new cases."));
    }

    #[test]
    fn top_provinces_ranks_by_new_cases_and_skips_placeholder_codes() {
        let mut provincial: ProvincialSeries = HashMap::new();
        for (code, name, day1, day2) in [
            (16u32, "Bergamo", 1000i64, 1080i64),
            (13, "Milano", 5000, 5020),
            (979, "In fase di definizione", 0, 999),
        ] {
            provincial.insert(
                code,
                vec![
                    DailyRecord::for_date("2021-01-01T17:00:00")
                        .with_province(code, name)
                        .with(Field::TotalCases, day1),
                    DailyRecord::for_date("2021-01-02T17:00:00")
                        .with_province(code, name)
                        .with(Field::TotalCases, day2),
                ],
            );
        }

        let digest = build_top_provinces_digest(&provincial);

        assert!(digest.contains("as of 02/01/2021"));
        assert!(!digest.contains("In fase di definizione"));
        let bergamo_pos = digest.find("Bergamo").expect("bergamo listed");
        let milano_pos = digest.find("Milano").expect("milano listed");
        assert!(bergamo_pos < milano_pos);
    }
}
