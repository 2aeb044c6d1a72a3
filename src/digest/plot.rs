use std::io::Cursor;

use image::{DynamicImage, ImageFormat, RgbImage};
use plotters::coord::Shift;
use plotters::prelude::*;
use thiserror::Error;

use crate::data::{DailyRecord, Field};
use crate::stats::{delta, format_int, format_int_signed, last, last_date};

const PLOT_WIDTH_PX: u32 = 1000;
const PLOT_HEIGHT_PX: u32 = 800;
const TOP_PANEL_HEIGHT_PX: u32 = 480;

const PLOT_DATE_FORMAT: &str = "%d/%m/%Y";
const AXIS_DATE_FORMAT: &str = "%d %b";

#[derive(Debug, Error)]
pub enum PlotError {
    #[error("not enough records to render")]
    NotEnoughRecords,
    #[error("render backend failure: {0}")]
    Backend(String),
    #[error("png encoding failure: {0}")]
    PngEncoding(String),
}

struct PlotStyle;

impl PlotStyle {
    const MARGIN: i32 = 12;
    const CAPTION_FONT_FAMILY: &'static str = "sans-serif";
    const CAPTION_FONT_SIZE: i32 = 22;
    const X_LABEL_AREA_SIZE: u32 = 32;
    const Y_LABEL_AREA_SIZE: u32 = 64;
    const X_LABEL_COUNT: usize = 8;
    const Y_LABEL_COUNT: usize = 6;
    const BACKGROUND: RGBColor = RGBColor(245, 245, 245);
    const NEW_CASES_BARS: RGBColor = RED;
    const HOSPITALIZED_LINE: RGBColor = RGBColor(139, 0, 0);
    const INTENSIVE_CARE_LINE: RGBColor = BLUE;
}

/// National chart: new-cases histogram on top, hospital occupancy lines
/// below, both over the trailing `window_days` records.
pub fn render_national_plot(
    series: &[DailyRecord],
    window_days: usize,
) -> Result<Vec<u8>, PlotError> {
    let window = trailing_window(series, window_days)?;

    let mut rgb_buffer =
        vec![255u8; PLOT_WIDTH_PX as usize * PLOT_HEIGHT_PX as usize * 3];

    {
        let drawing_area =
            BitMapBackend::with_buffer(&mut rgb_buffer, (PLOT_WIDTH_PX, PLOT_HEIGHT_PX))
                .into_drawing_area();
        drawing_area
            .fill(&PlotStyle::BACKGROUND)
            .map_err(|error| PlotError::Backend(format!("{:?}", error)))?;

        let (top, bottom) = drawing_area.split_vertically(TOP_PANEL_HEIGHT_PX as i32);

        let top_caption = format!(
            "New cases as of {} ({})",
            window_date_label(window),
            format_int_signed(last(window, Field::NewPositives))
        );
        draw_bar_panel(
            &top,
            window,
            Field::NewPositives,
            &top_caption,
            PlotStyle::NEW_CASES_BARS,
        )?;

        let bottom_caption = format!(
            "Hospitals: {} admitted ({}), {} in intensive care ({})",
            format_int(last(window, Field::Hospitalized)),
            format_int_signed(delta(window, Field::Hospitalized)),
            format_int(last(window, Field::IntensiveCare)),
            format_int_signed(delta(window, Field::IntensiveCare)),
        );
        draw_occupancy_panel(&bottom, window, &bottom_caption)?;

        drawing_area
            .present()
            .map_err(|error| PlotError::Backend(format!("{:?}", error)))?;
    }

    encode_png(rgb_buffer, PLOT_WIDTH_PX, PLOT_HEIGHT_PX)
}

/// Single-panel variant for one region's new-cases series.
pub fn render_region_plot(
    series: &[DailyRecord],
    region_name: &str,
    window_days: usize,
) -> Result<Vec<u8>, PlotError> {
    let window = trailing_window(series, window_days)?;

    let mut rgb_buffer =
        vec![255u8; PLOT_WIDTH_PX as usize * TOP_PANEL_HEIGHT_PX as usize * 3];

    {
        let drawing_area =
            BitMapBackend::with_buffer(&mut rgb_buffer, (PLOT_WIDTH_PX, TOP_PANEL_HEIGHT_PX))
                .into_drawing_area();
        drawing_area
            .fill(&PlotStyle::BACKGROUND)
            .map_err(|error| PlotError::Backend(format!("{:?}", error)))?;

        let caption = format!(
            "{}: new cases as of {} ({})",
            region_name,
            window_date_label(window),
            format_int_signed(last(window, Field::NewPositives))
        );
        draw_bar_panel(
            &drawing_area,
            window,
            Field::NewPositives,
            &caption,
            PlotStyle::NEW_CASES_BARS,
        )?;

        drawing_area
            .present()
            .map_err(|error| PlotError::Backend(format!("{:?}", error)))?;
    }

    encode_png(rgb_buffer, PLOT_WIDTH_PX, TOP_PANEL_HEIGHT_PX)
}

fn trailing_window(series: &[DailyRecord], window_days: usize) -> Result<&[DailyRecord], PlotError> {
    let window = &series[series.len().saturating_sub(window_days)..];
    if window.len() < 2 {
        return Err(PlotError::NotEnoughRecords);
    }
    Ok(window)
}

fn window_date_label(window: &[DailyRecord]) -> String {
    last_date(window)
        .map(|date| date.format(PLOT_DATE_FORMAT).to_string())
        .unwrap_or_default()
}

fn axis_labels(window: &[DailyRecord]) -> Vec<String> {
    window
        .iter()
        .map(|record| record.date.format(AXIS_DATE_FORMAT).to_string())
        .collect()
}

fn draw_bar_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    window: &[DailyRecord],
    field: Field,
    caption: &str,
    color: RGBColor,
) -> Result<(), PlotError> {
    let values: Vec<i64> = window.iter().map(|record| record.value(field)).collect();
    let y_max = values.iter().copied().max().unwrap_or(0).max(1) * 21 / 20;
    let labels = axis_labels(window);

    let mut chart = ChartBuilder::on(area)
        .margin(PlotStyle::MARGIN)
        .caption(
            caption,
            (PlotStyle::CAPTION_FONT_FAMILY, PlotStyle::CAPTION_FONT_SIZE),
        )
        .x_label_area_size(PlotStyle::X_LABEL_AREA_SIZE)
        .y_label_area_size(PlotStyle::Y_LABEL_AREA_SIZE)
        .build_cartesian_2d(0i32..window.len() as i32, 0i64..y_max)
        .map_err(|error| PlotError::Backend(format!("{:?}", error)))?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(PlotStyle::X_LABEL_COUNT)
        .y_labels(PlotStyle::Y_LABEL_COUNT)
        .x_label_formatter(&|index| {
            labels
                .get(*index as usize)
                .cloned()
                .unwrap_or_default()
        })
        .draw()
        .map_err(|error| PlotError::Backend(format!("{:?}", error)))?;

    chart
        .draw_series(values.iter().enumerate().map(|(index, value)| {
            Rectangle::new(
                [(index as i32, 0), (index as i32 + 1, *value)],
                color.filled(),
            )
        }))
        .map_err(|error| PlotError::Backend(format!("{:?}", error)))?;

    Ok(())
}

fn draw_occupancy_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    window: &[DailyRecord],
    caption: &str,
) -> Result<(), PlotError> {
    let hospitalized: Vec<i64> = window
        .iter()
        .map(|record| record.value(Field::Hospitalized))
        .collect();
    let intensive_care: Vec<i64> = window
        .iter()
        .map(|record| record.value(Field::IntensiveCare))
        .collect();

    let y_max = hospitalized
        .iter()
        .chain(intensive_care.iter())
        .copied()
        .max()
        .unwrap_or(0)
        .max(1)
        * 21
        / 20;
    let labels = axis_labels(window);

    let mut chart = ChartBuilder::on(area)
        .margin(PlotStyle::MARGIN)
        .caption(
            caption,
            (PlotStyle::CAPTION_FONT_FAMILY, PlotStyle::CAPTION_FONT_SIZE),
        )
        .x_label_area_size(PlotStyle::X_LABEL_AREA_SIZE)
        .y_label_area_size(PlotStyle::Y_LABEL_AREA_SIZE)
        .build_cartesian_2d(0i32..window.len() as i32, 0i64..y_max)
        .map_err(|error| PlotError::Backend(format!("{:?}", error)))?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(PlotStyle::X_LABEL_COUNT)
        .y_labels(PlotStyle::Y_LABEL_COUNT)
        .x_label_formatter(&|index| {
            labels
                .get(*index as usize)
                .cloned()
                .unwrap_or_default()
        })
        .draw()
        .map_err(|error| PlotError::Backend(format!("{:?}", error)))?;

    chart
        .draw_series(LineSeries::new(
            hospitalized
                .iter()
                .enumerate()
                .map(|(index, value)| (index as i32, *value)),
            &PlotStyle::HOSPITALIZED_LINE,
        ))
        .map_err(|error| PlotError::Backend(format!("{:?}", error)))?;

    chart
        .draw_series(LineSeries::new(
            intensive_care
                .iter()
                .enumerate()
                .map(|(index, value)| (index as i32, *value)),
            &PlotStyle::INTENSIVE_CARE_LINE,
        ))
        .map_err(|error| PlotError::Backend(format!("{:?}", error)))?;

    Ok(())
}

fn encode_png(rgb_buffer: Vec<u8>, width: u32, height: u32) -> Result<Vec<u8>, PlotError> {
    let rgb_image = RgbImage::from_raw(width, height, rgb_buffer)
        .ok_or_else(|| PlotError::Backend("image buffer conversion failed".to_string()))?;

    let mut output = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(rgb_image)
        .write_to(&mut output, ImageFormat::Png)
        .map_err(|error| PlotError::PngEncoding(error.to_string()))?;

    Ok(output.into_inner())
}

#[cfg(test)]
mod tests {
    use crate::data::{DailyRecord, Field};

    use super::{render_national_plot, render_region_plot, PlotError};

    #[test]
    fn rejects_empty_series() {
        let result = render_national_plot(&[], 120);
        assert!(matches!(result, Err(PlotError::NotEnoughRecords)));
    }

    #[test]
    fn rejects_single_record_series() {
        let series =
            vec![DailyRecord::for_date("2021-01-01T17:00:00").with(Field::NewPositives, 42)];

        let result = render_region_plot(&series, "Lombardia", 120);
        assert!(matches!(result, Err(PlotError::NotEnoughRecords)));
    }

    #[test]
    fn window_never_exceeds_the_series_length() {
        let series = vec![
            DailyRecord::for_date("2021-01-01T17:00:00").with(Field::NewPositives, 1),
            DailyRecord::for_date("2021-01-02T17:00:00").with(Field::NewPositives, 2),
        ];

        let window = super::trailing_window(&series, 120).expect("window");
        assert_eq!(window.len(), 2);
    }
}
