//! Plotters-powered sales chart widget for Ratatui.
//!
//! Why Plotters instead of Ratatui's built-in `Chart` widget?
//! - nicer axis + mesh rendering
//! - less manual work for ticks/labels
//! - several line/dot series on one set of axes
//!
//! We render Plotters output into the Ratatui buffer using `plotters-ratatui-backend`.

use chrono::{Datelike, NaiveDate};
use plotters::prelude::*;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesStyle {
    Line,
    Dots,
}

/// One series on the chart. X values are plain numbers; date series use
/// [`date_x`] so they can be labelled with [`fmt_axis_date`].
#[derive(Debug, Clone, Copy)]
pub struct ChartSeries<'a> {
    pub points: &'a [(f64, f64)],
    pub color: RGBColor,
    pub style: SeriesStyle,
}

/// A lightweight, render-only chart description.
///
/// All series and bounds are computed outside the render call.
pub struct SalesPlottersChart<'a> {
    /// Drawn in order; later series sit on top.
    pub series: &'a [ChartSeries<'a>],
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
    pub x_label: &'a str,
    pub y_label: &'a str,
    pub fmt_x: fn(f64) -> String,
    pub fmt_y: fn(f64) -> String,
}

impl<'a> Widget for SalesPlottersChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // When the available area is too small, Plotters may fail to build a chart.
        // In that case, we render a small hint rather than panicking.
        if area.width < 20 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let x0 = self.x_bounds[0];
        let x1 = self.x_bounds[1];
        let y0 = self.y_bounds[0];
        let y1 = self.y_bounds[1];

        let finite = x0.is_finite() && x1.is_finite() && y0.is_finite() && y1.is_finite();
        if !finite || x1 <= x0 || y1 <= y0 {
            return;
        }

        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                // Terminal cells are low-res, so keep label areas compact.
                .set_label_area_size(LabelAreaPosition::Left, 6)
                .set_label_area_size(LabelAreaPosition::Bottom, 3)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_desc(self.x_label)
                .y_desc(self.y_label)
                .x_labels(5)
                .y_labels(5)
                .x_label_formatter(&|v| (self.fmt_x)(*v))
                .y_label_formatter(&|v| (self.fmt_y)(*v))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .bold_line_style(&WHITE)
                .draw()?;

            for s in self.series {
                match s.style {
                    SeriesStyle::Line => {
                        chart.draw_series(LineSeries::new(s.points.iter().copied(), &s.color))?;
                    }
                    // `Pixel` rather than `Circle`: the backend maps circle radii
                    // to canvas units and draws them far too large.
                    SeriesStyle::Dots => {
                        let dots = s.points.iter().map(|&(x, y)| Pixel::new((x, y), s.color));
                        chart.draw_series(dots)?;
                    }
                }
            }

            Ok(())
        });

        widget.render(area, buf);
    }
}

/// Numeric x position of a date (days from the common era).
pub fn date_x(date: NaiveDate) -> f64 {
    f64::from(date.num_days_from_ce())
}

pub fn fmt_axis_date(v: f64) -> String {
    NaiveDate::from_num_days_from_ce_opt(v.round() as i32)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

pub fn fmt_axis_day(v: f64) -> String {
    format!("{v:.0}")
}

/// Compact money ticks: `$12K`, `$1.2M`.
pub fn fmt_axis_money(v: f64) -> String {
    let a = v.abs();
    if a >= 1_000_000.0 {
        format!("${:.1}M", v / 1_000_000.0)
    } else if a >= 1_000.0 {
        format!("${:.0}K", v / 1_000.0)
    } else {
        format!("${v:.0}")
    }
}

/// X/Y bounds covering every series, with 5% vertical padding.
pub fn series_bounds(series: &[ChartSeries<'_>]) -> ([f64; 2], [f64; 2]) {
    let (mut x_min, mut x_max) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut y_min, mut y_max) = (f64::INFINITY, f64::NEG_INFINITY);
    for s in series {
        for &(x, y) in s.points {
            x_min = x_min.min(x);
            x_max = x_max.max(x);
            y_min = y_min.min(y);
            y_max = y_max.max(y);
        }
    }

    if !x_min.is_finite() || !x_max.is_finite() {
        x_min = 0.0;
        x_max = 1.0;
    } else if x_max <= x_min {
        x_max = x_min + 1.0;
    }
    if !y_min.is_finite() || !y_max.is_finite() {
        y_min = 0.0;
        y_max = 1.0;
    } else if y_max <= y_min {
        y_min -= 1.0;
        y_max += 1.0;
    }

    let pad = ((y_max - y_min).abs() * 0.05).max(1e-12);
    ([x_min, x_max], [y_min - pad, y_max + pad])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_axis_round_trips_through_x() {
        let d = NaiveDate::from_ymd_opt(2017, 8, 15).unwrap();
        assert_eq!(fmt_axis_date(date_x(d)), "2017-08-15");
    }

    #[test]
    fn money_ticks_are_compact() {
        assert_eq!(fmt_axis_money(950.0), "$950");
        assert_eq!(fmt_axis_money(45_000.0), "$45K");
        assert_eq!(fmt_axis_money(1_500_000.0), "$1.5M");
    }

    #[test]
    fn bounds_cover_all_series_and_pad_flat_data() {
        let a = [(1.0, 10.0), (2.0, 10.0)];
        let b = [(3.0, 10.0)];
        let series = [
            ChartSeries { points: &a, color: WHITE, style: SeriesStyle::Line },
            ChartSeries { points: &b, color: WHITE, style: SeriesStyle::Dots },
        ];
        let (x, y) = series_bounds(&series);
        assert_eq!(x, [1.0, 3.0]);
        assert!(y[0] < 9.0 && y[1] > 11.0);

        let (x, y) = series_bounds(&[]);
        assert_eq!(x, [0.0, 1.0]);
        assert!(y[0] < 0.0 && y[1] > 1.0);
    }
}
