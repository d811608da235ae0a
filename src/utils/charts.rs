//! SVG Chart Generator for learning curves
//!
//! Renders line charts as standalone SVG files so they can be opened in any
//! browser or dropped into a report.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use super::error::{AslError, Result};

/// Chart styling constants
const CHART_WIDTH: f64 = 800.0;
const CHART_HEIGHT: f64 = 500.0;
const MARGIN_TOP: f64 = 60.0;
const MARGIN_RIGHT: f64 = 40.0;
const MARGIN_BOTTOM: f64 = 80.0;
const MARGIN_LEFT: f64 = 80.0;
const GRID_LINES: usize = 5;

pub const COLOR_PRIMARY: &str = "#3498db";
pub const COLOR_SECONDARY: &str = "#e67e22";
const COLOR_GRID: &str = "#ecf0f1";
const COLOR_AXIS: &str = "#2c3e50";
const COLOR_TEXT: &str = "#2c3e50";

/// A data point for a line chart
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DataPoint {
    pub x: f64,
    pub y: f64,
}

/// A named data series
#[derive(Debug, Clone)]
pub struct DataSeries {
    pub name: String,
    pub points: Vec<DataPoint>,
    pub color: String,
}

impl DataSeries {
    /// Build a series whose x values are the 1-based positions of `values`
    pub fn from_values(name: &str, values: &[f64], color: &str) -> Self {
        let points = values
            .iter()
            .enumerate()
            .map(|(i, &y)| DataPoint {
                x: (i + 1) as f64,
                y,
            })
            .collect();

        Self {
            name: name.to_string(),
            points,
            color: color.to_string(),
        }
    }
}

/// How the y axis is scaled and labelled
#[derive(Debug, Clone)]
pub struct YAxis {
    pub label: String,
    /// Fixed `(min, max)`, or `None` to fit the data
    pub range: Option<(f64, f64)>,
    /// Appended to tick labels, e.g. "%"
    pub unit: String,
}

impl YAxis {
    pub fn fixed(label: &str, min: f64, max: f64, unit: &str) -> Self {
        Self {
            label: label.to_string(),
            range: Some((min, max)),
            unit: unit.to_string(),
        }
    }

    pub fn fitted(label: &str, unit: &str) -> Self {
        Self {
            label: label.to_string(),
            range: None,
            unit: unit.to_string(),
        }
    }
}

/// Render a line chart to an SVG string
pub fn render_line_chart(title: &str, x_label: &str, y_axis: &YAxis, series: &[DataSeries]) -> Result<String> {
    let (x_min, x_max, data_y_min, data_y_max) = find_ranges(series)
        .ok_or_else(|| AslError::Chart(format!("chart '{}' has no data points", title)))?;

    let (y_min, y_max) = match y_axis.range {
        Some(range) => range,
        None => padded_range(data_y_min, data_y_max),
    };
    // A single epoch still needs a non-zero x span
    let (x_min, x_max) = if x_max > x_min { (x_min, x_max) } else { (x_min - 1.0, x_max + 1.0) };

    let plot_width = CHART_WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
    let plot_height = CHART_HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
    let to_x = |x: f64| MARGIN_LEFT + ((x - x_min) / (x_max - x_min)) * plot_width;
    let to_y = |y: f64| MARGIN_TOP + plot_height - ((y - y_min) / (y_max - y_min)) * plot_height;

    let mut svg = String::new();

    // SVG header and background
    let _ = write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {w} {h}" width="{w}" height="{h}">"#,
        w = CHART_WIDTH,
        h = CHART_HEIGHT
    );
    let _ = write!(svg, r#"<rect width="{}" height="{}" fill="white"/>"#, CHART_WIDTH, CHART_HEIGHT);

    // Title
    let _ = write!(
        svg,
        r#"<text x="{}" y="35" text-anchor="middle" font-family="Arial, sans-serif" font-size="18" font-weight="bold" fill="{}">{}</text>"#,
        CHART_WIDTH / 2.0,
        COLOR_TEXT,
        escape_xml(title)
    );

    // Grid lines with y tick labels
    for i in 0..=GRID_LINES {
        let fraction = i as f64 / GRID_LINES as f64;
        let value = y_min + fraction * (y_max - y_min);
        let y = to_y(value);

        let _ = write!(
            svg,
            r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}" stroke-width="1"/>"#,
            MARGIN_LEFT,
            y,
            MARGIN_LEFT + plot_width,
            y,
            COLOR_GRID
        );
        let _ = write!(
            svg,
            r#"<text x="{}" y="{}" text-anchor="end" font-family="Arial, sans-serif" font-size="12" fill="{}">{:.0}{}</text>"#,
            MARGIN_LEFT - 10.0,
            y + 4.0,
            COLOR_TEXT,
            value,
            escape_xml(&y_axis.unit)
        );
    }

    // Axes
    let _ = write!(
        svg,
        r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}" stroke-width="2"/>"#,
        MARGIN_LEFT,
        MARGIN_TOP + plot_height,
        MARGIN_LEFT + plot_width,
        MARGIN_TOP + plot_height,
        COLOR_AXIS
    );
    let _ = write!(
        svg,
        r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}" stroke-width="2"/>"#,
        MARGIN_LEFT,
        MARGIN_TOP,
        MARGIN_LEFT,
        MARGIN_TOP + plot_height,
        COLOR_AXIS
    );

    // Axis labels
    let _ = write!(
        svg,
        r#"<text x="{}" y="{}" text-anchor="middle" font-family="Arial, sans-serif" font-size="14" fill="{}">{}</text>"#,
        MARGIN_LEFT + plot_width / 2.0,
        CHART_HEIGHT - 20.0,
        COLOR_TEXT,
        escape_xml(x_label)
    );
    let _ = write!(
        svg,
        r#"<text x="20" y="{}" text-anchor="middle" font-family="Arial, sans-serif" font-size="14" fill="{}" transform="rotate(-90 20 {})">{}</text>"#,
        CHART_HEIGHT / 2.0,
        COLOR_TEXT,
        CHART_HEIGHT / 2.0,
        escape_xml(&y_axis.label)
    );

    // Series
    for series_data in series.iter().filter(|s| !s.points.is_empty()) {
        let mut path = String::new();
        for (i, point) in series_data.points.iter().enumerate() {
            let command = if i == 0 { "M" } else { " L" };
            let _ = write!(path, "{} {:.2} {:.2}", command, to_x(point.x), to_y(point.y));
        }

        let _ = write!(
            svg,
            r#"<path d="{}" fill="none" stroke="{}" stroke-width="3"/>"#,
            path,
            series_data.color
        );

        for point in &series_data.points {
            let _ = write!(
                svg,
                r#"<circle cx="{:.2}" cy="{:.2}" r="4" fill="{}" stroke="white" stroke-width="2"/>"#,
                to_x(point.x),
                to_y(point.y),
                series_data.color
            );
        }
    }

    // X-axis tick labels (from the first series)
    if let Some(first) = series.iter().find(|s| !s.points.is_empty()) {
        for point in &first.points {
            let _ = write!(
                svg,
                r#"<text x="{:.2}" y="{}" text-anchor="middle" font-family="Arial, sans-serif" font-size="11" fill="{}">{:.0}</text>"#,
                to_x(point.x),
                MARGIN_TOP + plot_height + 20.0,
                COLOR_TEXT,
                point.x
            );
        }
    }

    // Legend
    let mut legend_y = MARGIN_TOP + 10.0;
    for series_data in series {
        let _ = write!(
            svg,
            r#"<rect x="{}" y="{}" width="15" height="15" fill="{}"/>"#,
            CHART_WIDTH - MARGIN_RIGHT - 150.0,
            legend_y,
            series_data.color
        );
        let _ = write!(
            svg,
            r#"<text x="{}" y="{}" font-family="Arial, sans-serif" font-size="12" fill="{}">{}</text>"#,
            CHART_WIDTH - MARGIN_RIGHT - 130.0,
            legend_y + 12.0,
            COLOR_TEXT,
            escape_xml(&series_data.name)
        );
        legend_y += 25.0;
    }

    svg.push_str("</svg>");
    Ok(svg)
}

/// Render a line chart and write it to `output_path`
pub fn generate_line_chart(
    title: &str,
    x_label: &str,
    y_axis: &YAxis,
    series: &[DataSeries],
    output_path: &Path,
) -> Result<()> {
    let svg = render_line_chart(title, x_label, y_axis, series)?;
    fs::write(output_path, svg)?;
    Ok(())
}

fn find_ranges(series: &[DataSeries]) -> Option<(f64, f64, f64, f64)> {
    let mut points = series.iter().flat_map(|s| s.points.iter()).filter(|p| p.y.is_finite());
    let first = points.next()?;

    let init = (first.x, first.x, first.y, first.y);
    Some(points.fold(init, |(x_min, x_max, y_min, y_max), p| {
        (x_min.min(p.x), x_max.max(p.x), y_min.min(p.y), y_max.max(p.y))
    }))
}

/// Widen a data range by 5% on each side so lines do not touch the frame
fn padded_range(min: f64, max: f64) -> (f64, f64) {
    let span = max - min;
    if span <= f64::EPSILON {
        return (min - 1.0, max + 1.0);
    }
    (min - span * 0.05, max + span * 0.05)
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_chart_generation() {
        let series = vec![DataSeries::from_values("Test", &[36.84, 61.84, 65.79], COLOR_PRIMARY)];

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test_chart.svg");
        let axis = YAxis::fixed("Accuracy (%)", 0.0, 100.0, "%");
        generate_line_chart("Test Chart", "Epochs", &axis, &series, &path).unwrap();

        let svg = std::fs::read_to_string(&path).unwrap();
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains("Test Chart"));
    }

    #[test]
    fn test_fitted_axis_handles_negative_values() {
        let series = vec![DataSeries::from_values("Loss", &[-20.0, -35.5, -41.0], COLOR_SECONDARY)];
        let svg = render_line_chart("Loss", "Epochs", &YAxis::fitted("Loss (dB)", ""), &series).unwrap();

        assert_eq!(svg.matches("<circle").count(), 3);
        assert!(!svg.contains("NaN"));
    }

    #[test]
    fn test_single_point_chart() {
        let series = vec![DataSeries::from_values("Only", &[0.5], COLOR_PRIMARY)];
        let svg = render_line_chart("One", "Epochs", &YAxis::fitted("y", ""), &series).unwrap();
        assert!(!svg.contains("NaN"));
        assert!(!svg.contains("inf"));
    }

    #[test]
    fn test_empty_chart_is_error() {
        let err = render_line_chart("Empty", "x", &YAxis::fitted("y", ""), &[]).unwrap_err();
        assert!(matches!(err, AslError::Chart(_)));
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("a<b & c"), "a&lt;b &amp; c");
    }
}
