//! Pure aggregation primitives over a date-ordered record slice. Every
//! digest and chart reduces to `last`/`previous`/`delta`/`percentage_of`
//! plus the formatting helpers, so this module carries the bulk of the
//! numeric test coverage.

use chrono::NaiveDateTime;

use crate::data::{DailyRecord, Field};

/// Value of `field` in the record `offset` positions back from the end
/// (offset 0 = latest). Returns 0 when the series is shorter than
/// `offset + 1` records; partial data is a fallback case, not an error.
pub fn value_at(series: &[DailyRecord], field: Field, offset: usize) -> i64 {
    if series.len() < offset + 1 {
        return 0;
    }

    series[series.len() - 1 - offset].value(field)
}

pub fn last(series: &[DailyRecord], field: Field) -> i64 {
    value_at(series, field, 0)
}

pub fn previous(series: &[DailyRecord], field: Field) -> i64 {
    value_at(series, field, 1)
}

pub fn before_previous(series: &[DailyRecord], field: Field) -> i64 {
    value_at(series, field, 2)
}

/// Difference between the latest and the previous value. A single-record
/// series has no prior baseline, so its whole value counts as the delta.
pub fn delta(series: &[DailyRecord], field: Field) -> i64 {
    if series.len() == 1 {
        return last(series, field);
    }

    last(series, field) - previous(series, field)
}

/// Share of `part` over `whole`, in percent. Returns 0.0 for a zero whole.
pub fn percentage_of(part: i64, whole: i64) -> f64 {
    if whole == 0 {
        return 0.0;
    }

    (part as f64 / whole as f64) * 100.0
}

pub fn last_date(series: &[DailyRecord]) -> Option<NaiveDateTime> {
    series.last().map(|record| record.date)
}

/// Integer with Italian-locale thousands grouping: 1234567 → "1.234.567".
pub fn format_int(value: i64) -> String {
    let negative = value < 0;
    let digits = value.unsigned_abs().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (position, digit) in digits.chars().enumerate() {
        if position > 0 && (digits.len() - position) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }

    if negative {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

/// Like [`format_int`] but with an explicit sign: 50 → "+50", -3 → "-3",
/// 0 → "+0".
pub fn format_int_signed(value: i64) -> String {
    if value < 0 {
        format_int(value)
    } else {
        format!("+{}", format_int(value))
    }
}

/// Two-decimal percentage with Italian-locale separators: 12.345 → "12,35%".
pub fn format_perc(value: f64) -> String {
    let rendered = format!("{:.2}", value);
    let (integer_part, decimal_part) = rendered
        .split_once('.')
        .unwrap_or((rendered.as_str(), "00"));

    let negative = integer_part.starts_with('-');
    let magnitude: i64 = integer_part
        .trim_start_matches('-')
        .parse()
        .unwrap_or_default();
    let grouped = if negative {
        format!("-{}", format_int(magnitude))
    } else {
        format_int(magnitude)
    };

    format!("{},{}%", grouped, decimal_part)
}

#[cfg(test)]
mod tests {
    use crate::data::{DailyRecord, Field};

    use super::{
        before_previous, delta, format_int, format_int_signed, format_perc, last, last_date,
        percentage_of, previous, value_at,
    };

    fn two_day_series() -> Vec<DailyRecord> {
        vec![
            DailyRecord::for_date("2021-01-01T17:00:00").with(Field::NewPositives, 100),
            DailyRecord::for_date("2021-01-02T17:00:00").with(Field::NewPositives, 150),
        ]
    }

    #[test]
    fn last_previous_delta_over_two_records() {
        let series = two_day_series();

        assert_eq!(last(&series, Field::NewPositives), 150);
        assert_eq!(previous(&series, Field::NewPositives), 100);
        assert_eq!(delta(&series, Field::NewPositives), 50);
        assert_eq!(
            format_int_signed(delta(&series, Field::NewPositives)),
            "+50"
        );
    }

    #[test]
    fn delta_of_single_record_series_is_the_value_itself() {
        let series = vec![DailyRecord::for_date("2021-01-01T17:00:00").with(Field::TestsPerformed, 500)];

        assert_eq!(delta(&series, Field::TestsPerformed), 500);
    }

    #[test]
    fn delta_of_empty_series_is_zero() {
        let series: Vec<DailyRecord> = Vec::new();

        assert_eq!(delta(&series, Field::Deaths), 0);
        assert_eq!(last(&series, Field::Deaths), 0);
    }

    #[test]
    fn delta_matches_last_minus_previous_for_longer_series() {
        let series = vec![
            DailyRecord::for_date("2021-01-01T17:00:00").with(Field::IntensiveCare, 40),
            DailyRecord::for_date("2021-01-02T17:00:00").with(Field::IntensiveCare, 55),
            DailyRecord::for_date("2021-01-03T17:00:00").with(Field::IntensiveCare, 47),
        ];

        assert_eq!(
            delta(&series, Field::IntensiveCare),
            last(&series, Field::IntensiveCare) - previous(&series, Field::IntensiveCare)
        );
        assert_eq!(delta(&series, Field::IntensiveCare), -8);
        assert_eq!(before_previous(&series, Field::IntensiveCare), 40);
    }

    #[test]
    fn value_at_never_fails_for_any_offset() {
        let series = two_day_series();

        assert_eq!(value_at(&series, Field::NewPositives, 0), 150);
        assert_eq!(value_at(&series, Field::NewPositives, 1), 100);
        assert_eq!(value_at(&series, Field::NewPositives, 2), 0);
        assert_eq!(value_at(&series, Field::NewPositives, 100), 0);
        assert_eq!(value_at(&[], Field::NewPositives, 0), 0);
    }

    #[test]
    fn missing_field_reads_as_zero() {
        let series = vec![DailyRecord::for_date("2021-01-01T17:00:00")];

        assert_eq!(last(&series, Field::Hospitalized), 0);
    }

    #[test]
    fn percentage_of_handles_zero_whole() {
        assert_eq!(percentage_of(10, 0), 0.0);
        assert!((percentage_of(25, 200) - 12.5).abs() < f64::EPSILON);
    }

    #[test]
    fn integers_are_grouped_italian_style() {
        assert_eq!(format_int(0), "0");
        assert_eq!(format_int(999), "999");
        assert_eq!(format_int(1000), "1.000");
        assert_eq!(format_int(1234567), "1.234.567");
        assert_eq!(format_int(-54321), "-54.321");
    }

    #[test]
    fn signed_integers_always_carry_a_sign() {
        assert_eq!(format_int_signed(50), "+50");
        assert_eq!(format_int_signed(0), "+0");
        assert_eq!(format_int_signed(-1234), "-1.234");
        assert_eq!(format_int_signed(10000), "+10.000");
    }

    #[test]
    fn percentages_use_comma_decimals_and_grouping() {
        assert_eq!(format_perc(12.345), "12,35%");
        assert_eq!(format_perc(0.0), "0,00%");
        assert_eq!(format_perc(100.0), "100,00%");
        assert_eq!(format_perc(1234.5), "1.234,50%");
        assert_eq!(format_perc(-2.5), "-2,50%");
    }

    #[test]
    fn last_date_is_taken_from_the_trailing_record() {
        let series = two_day_series();

        let date = last_date(&series).expect("trailing date");
        assert_eq!(date.format("%d/%m/%Y").to_string(), "02/01/2021");
        assert!(last_date(&[]).is_none());
    }
}
