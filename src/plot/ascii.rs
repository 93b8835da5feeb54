//! ASCII/Unicode plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - history: `-` line
//! - rolling trend: `~` line
//! - forecast: `*` line
//! - confidence band edges: `.`

use chrono::NaiveDate;

use crate::app::pipeline::{ForecastView, OverviewView};

/// One line drawn on the grid.
#[derive(Debug, Clone, Copy)]
pub struct PlotSeries<'a> {
    pub points: &'a [(NaiveDate, f64)],
    pub glyph: char,
}

/// Daily sales over the full loaded range, with the rolling trend on top.
pub fn render_overview_plot(view: &OverviewView, width: usize, height: usize) -> String {
    render_date_plot(
        &[
            PlotSeries {
                points: &view.daily,
                glyph: '-',
            },
            PlotSeries {
                points: &view.trend,
                glyph: '~',
            },
        ],
        width,
        height,
    )
}

/// Last year of history followed by the forecast and its band.
pub fn render_forecast_plot(view: &ForecastView, width: usize, height: usize) -> String {
    let history: Vec<(NaiveDate, f64)> =
        view.history.iter().map(|r| (r.date, r.total_sales)).collect();
    let forecast: Vec<(NaiveDate, f64)> =
        view.points.iter().map(|p| (p.date, p.point_estimate)).collect();
    let lower: Vec<(NaiveDate, f64)> =
        view.points.iter().map(|p| (p.date, p.lower_bound)).collect();
    let upper: Vec<(NaiveDate, f64)> =
        view.points.iter().map(|p| (p.date, p.upper_bound)).collect();

    // Forecast last so it wins over the band where they touch.
    render_date_plot(
        &[
            PlotSeries {
                points: &history,
                glyph: '-',
            },
            PlotSeries {
                points: &lower,
                glyph: '.',
            },
            PlotSeries {
                points: &upper,
                glyph: '.',
            },
            PlotSeries {
                points: &forecast,
                glyph: '*',
            },
        ],
        width,
        height,
    )
}

/// Render any number of date series on a shared grid.
///
/// Later series overwrite earlier ones where they cross.
pub fn render_date_plot(series: &[PlotSeries<'_>], width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let Some((d_min, d_max)) = date_range(series) else {
        return "Plot: no data\n".to_string();
    };
    let (y_min, y_max) = y_range(series).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let x_min = 0.0;
    let x_max = ((d_max - d_min).num_days() as f64).max(1.0);

    let mut grid = vec![vec![' '; width]; height];
    for s in series {
        let pts: Vec<(f64, f64)> = s
            .points
            .iter()
            .map(|(d, y)| ((*d - d_min).num_days() as f64, *y))
            .collect();
        draw_curve(&mut grid, &pts, x_min, x_max, y_min, y_max, s.glyph);
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Plot: dates=[{d_min}, {d_max}] | sales=[{y_min:.1}, {y_max:.1}]\n"
    ));
    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }
    out
}

fn date_range(series: &[PlotSeries<'_>]) -> Option<(NaiveDate, NaiveDate)> {
    let mut dates = series.iter().flat_map(|s| s.points.iter().map(|(d, _)| *d));
    let first = dates.next()?;
    let (lo, hi) = dates.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d)));
    Some((lo, hi))
}

fn y_range(series: &[PlotSeries<'_>]) -> Option<(f64, f64)> {
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for s in series {
        for &(_, y) in s.points {
            min_y = min_y.min(y);
            max_y = max_y.max(y);
        }
    }

    if min_y.is_finite() && max_y.is_finite() && max_y > min_y {
        Some((min_y, max_y))
    } else if min_y.is_finite() {
        // Flat series: centre it.
        Some((min_y - 1.0, min_y + 1.0))
    } else {
        None
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(x: f64, x_min: f64, x_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((x - x_min) / (x_max - x_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

fn draw_curve(
    grid: &mut [Vec<char>],
    curve: &[(f64, f64)],
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
    ch: char,
) {
    let height = grid.len();
    let width = grid[0].len();

    let mut prev = None;
    for &(x, y) in curve {
        let col = map_x(x, x_min, x_max, width);
        let row = map_y(y, y_min, y_max, height);
        if let Some((x0, y0)) = prev {
            draw_line(grid, x0, y0, col, row, ch);
        } else {
            grid[row][col] = ch;
        }
        prev = Some((col, row));
    }
}

/// Integer line drawing (Bresenham-ish).
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0 && (y0 as usize) < grid.len() && x0 >= 0 && (x0 as usize) < grid[0].len() {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    #[test]
    fn plot_golden_snapshot_small() {
        let history = vec![(d(1), 100.0), (d(10), 100.0)];
        let forecast = vec![(d(10), 100.0), (d(10), 110.0)];

        let txt = render_date_plot(
            &[
                PlotSeries {
                    points: &history,
                    glyph: '-',
                },
                PlotSeries {
                    points: &forecast,
                    glyph: '*',
                },
            ],
            10,
            5,
        );
        let expected = concat!(
            "Plot: dates=[2024-01-01, 2024-01-10] | sales=[99.5, 110.5]\n",
            "         *\n",
            "         *\n",
            "         *\n",
            "         *\n",
            "---------*\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn empty_series_renders_placeholder() {
        assert_eq!(render_date_plot(&[], 10, 5), "Plot: no data\n");
    }

    #[test]
    fn forecast_plot_uses_all_glyphs() {
        let ds = crate::data::generate_demo(3, 200).unwrap();
        let view =
            crate::app::pipeline::build_view(crate::domain::Page::Forecasts, &ds, 30).unwrap();
        let crate::app::pipeline::PageView::Forecasts(view) = view else {
            panic!("expected forecast view");
        };
        let txt = render_forecast_plot(&view, 80, 20);
        let body: String = txt.lines().skip(1).collect();
        assert!(body.contains('-'));
        assert!(body.contains('*'));
        assert!(body.contains('.'));
        assert_eq!(txt.lines().count(), 21);
    }

    #[test]
    fn overview_plot_overlays_rolling_trend() {
        let ds = crate::data::generate_demo(3, 200).unwrap();
        let view =
            crate::app::pipeline::build_view(crate::domain::Page::Overview, &ds, 30).unwrap();
        let crate::app::pipeline::PageView::Overview(view) = view else {
            panic!("expected overview");
        };
        let txt = render_overview_plot(&view, 80, 20);
        let body: String = txt.lines().skip(1).collect();
        assert!(body.contains('-'));
        assert!(body.contains('~'));
    }
}
