//! Ratatui-based terminal UI.
//!
//! Five pages share one header (page tabs, data source, horizon) and one
//! footer (key help, status). Each page view is rebuilt from the cached
//! dataset whenever the page or the forecast horizon changes.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use plotters::style::RGBColor;
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{
        Bar, BarChart, BarGroup, Block, Borders, Cell, Clear, Paragraph, Row, Table, Tabs, Wrap,
    },
    Terminal,
};

use crate::analytics::{
    column_min, weekday_name, InsightTab, Insights, Metric, EXPECTED_IMPACT, MONTH_NAMES,
    ROLLING_WINDOW, WEEKDAYS,
};
use crate::app::pipeline::{
    build_view, ForecastView, ModelsView, OverviewView, PageView, SeasonalView,
};
use crate::domain::{DashboardConfig, DataSource, Page, HORIZON_MAX, HORIZON_MIN, HORIZON_STEP};
use crate::error::AppError;
use crate::io::Dataset;
use crate::report::{self, fmt_money};

mod plotters_chart;

use plotters_chart::{
    date_x, fmt_axis_date, fmt_axis_day, fmt_axis_money, series_bounds, ChartSeries,
    SalesPlottersChart, SeriesStyle,
};

const HISTORY_COLOR: RGBColor = RGBColor(160, 160, 160);
const FORECAST_COLOR: RGBColor = RGBColor(0, 255, 255);
const BAND_COLOR: RGBColor = RGBColor(255, 200, 0);
const SALES_COLOR: RGBColor = RGBColor(0, 200, 255);
const TREND_COLOR: RGBColor = RGBColor(255, 140, 0);

/// Start the TUI.
///
/// The dataset is loaded before the terminal is touched, so a load failure
/// is reported on a normal screen and the TUI is never entered.
pub fn run(config: DashboardConfig) -> Result<(), AppError> {
    let dataset = crate::io::initialize_dataset(&config.source)?;

    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(4, format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(dataset, &config);
    tracing::info!(page = app.page.display_name(), horizon = app.horizon, "entering tui");
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::new(4, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::new(4, format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

struct App<'a> {
    dataset: &'a Dataset,
    source_label: String,
    page: Page,
    horizon: usize,
    tab: InsightTab,
    view: Option<PageView>,
    status: String,
}

impl<'a> App<'a> {
    fn new(dataset: &'a Dataset, config: &DashboardConfig) -> Self {
        let mut app = Self {
            dataset,
            source_label: source_label(&config.source),
            page: config.page,
            horizon: config.horizon,
            tab: InsightTab::Inventory,
            view: None,
            status: String::new(),
        };
        app.rebuild_view();
        app
    }

    fn event_loop<B: ratatui::backend::Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
    ) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::new(4, format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            let ready = event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(4, format!("Event poll error: {e}")))?;
            if !ready {
                continue;
            }

            match event::read().map_err(|e| AppError::new(4, format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Apply one key press. Returns `true` when the user asked to quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Char(c @ '1'..='5') => {
                let n = c as usize - '0' as usize;
                if let Some(page) = Page::from_number(n) {
                    self.set_page(page);
                }
            }
            KeyCode::Tab | KeyCode::Right => self.set_page(self.page.next()),
            KeyCode::BackTab | KeyCode::Left => self.set_page(self.page.prev()),
            KeyCode::Char('+') | KeyCode::Char('=') | KeyCode::Up => {
                self.set_horizon((self.horizon + HORIZON_STEP).min(HORIZON_MAX));
            }
            KeyCode::Char('-') | KeyCode::Down => {
                self.set_horizon(self.horizon.saturating_sub(HORIZON_STEP).max(HORIZON_MIN));
            }
            KeyCode::Char('t') => {
                self.tab = self.tab.next();
                self.status = format!("Insights tab: {}", self.tab.title());
            }
            _ => {}
        }
        false
    }

    fn set_page(&mut self, page: Page) {
        if page != self.page {
            self.page = page;
            self.rebuild_view();
        }
    }

    fn set_horizon(&mut self, horizon: usize) {
        if horizon == self.horizon {
            return;
        }
        self.horizon = horizon;
        self.status = format!("Horizon: {horizon} days");
        // Only the forecast page depends on the horizon.
        if self.page == Page::Forecasts {
            self.rebuild_view();
        }
    }

    fn rebuild_view(&mut self) {
        match build_view(self.page, self.dataset, self.horizon) {
            Ok(view) => {
                self.view = Some(view);
                self.status = format!("{} ready", self.page.display_name());
            }
            Err(err) => {
                let page = self.page.display_name();
                tracing::warn!(page, error = %err, "page failed to build");
                self.view = None;
                self.status = err.message().to_string();
            }
        }
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(5), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Length(1), Constraint::Length(1)])
            .split(inner);

        let title = Line::from(vec![
            Span::styled("salesdash", Style::default().fg(Color::Cyan)),
            Span::raw(" | Retail Sales Forecasting Dashboard"),
        ]);
        frame.render_widget(Paragraph::new(title), rows[0]);

        let titles: Vec<String> = Page::ALL
            .iter()
            .map(|p| format!("{} {}", p.index() + 1, p.display_name()))
            .collect();
        let tabs = Tabs::new(titles)
            .select(self.page.index())
            .style(Style::default().fg(Color::Gray))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .divider("|");
        frame.render_widget(tabs, rows[1]);

        let range = match (self.dataset.first_date(), self.dataset.last_date()) {
            (Some(a), Some(b)) => format!("{a} to {b}"),
            _ => "-".to_string(),
        };
        let info = Line::from(Span::styled(
            format!(
                "source: {} | days: {} | range: {range} | horizon: {} days",
                self.source_label,
                self.dataset.daily.len(),
                self.horizon,
            ),
            Style::default().fg(Color::Gray),
        ));
        frame.render_widget(Paragraph::new(info), rows[2]);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let Some(view) = &self.view else {
            let msg = Paragraph::new(self.status.as_str())
                .style(Style::default().fg(Color::Yellow))
                .block(Block::default().title(self.page.display_name()).borders(Borders::ALL));
            frame.render_widget(msg, area);
            return;
        };

        match view {
            PageView::Overview(v) => draw_overview(frame, area, v),
            PageView::Seasonal(v) => draw_seasonal(frame, area, v),
            PageView::Models(v) => draw_models(frame, area, v),
            PageView::Forecasts(v) => draw_forecast(frame, area, v),
            PageView::Insights(v) => draw_insights(frame, area, v, self.tab),
        }
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "1-5/Tab page  +/- horizon  t insights tab  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

fn source_label(source: &DataSource) -> String {
    match source {
        DataSource::Directory(dir) => dir.display().to_string(),
        DataSource::Demo { seed, days } => format!("demo (seed {seed}, {days} days)"),
    }
}

fn draw_overview(frame: &mut ratatui::Frame<'_>, area: Rect, view: &OverviewView) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(8), Constraint::Length(11)])
        .split(area);

    let m = &view.metrics;
    let cards = [
        ("Total Sales", fmt_money(m.total_sales)),
        ("Average Daily Sales", fmt_money(m.average_daily_sales)),
        ("Peak Sales Day", fmt_money(m.peak_sales)),
        ("Date Range", format!("{} to {}", m.first_date, m.last_date)),
    ];
    draw_cards(frame, rows[0], &cards);

    let middle = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(rows[1]);

    let daily: Vec<(f64, f64)> = view.daily.iter().map(|(d, y)| (date_x(*d), *y)).collect();
    let trend: Vec<(f64, f64)> = view.trend.iter().map(|(d, y)| (date_x(*d), *y)).collect();
    let series = [
        ChartSeries {
            points: &daily,
            color: SALES_COLOR,
            style: SeriesStyle::Line,
        },
        ChartSeries {
            points: &trend,
            color: TREND_COLOR,
            style: SeriesStyle::Line,
        },
    ];
    let title = format!("Daily Sales Trend (orange: {ROLLING_WINDOW}-day average)");
    draw_line_chart(frame, middle[0], &title, &series, "date", fmt_axis_date);

    let monthly: Vec<(String, f64)> = view
        .monthly
        .iter()
        .map(|t| (t.month_end.format("%y-%m").to_string(), t.total_sales))
        .collect();
    draw_bars(frame, middle[1], "Monthly Sales", &monthly, 5, BarUnit::Money);

    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[2]);

    let dist_rows: Vec<Row> = report::distribution_rows(&view.distribution)
        .into_iter()
        .map(|(label, value)| Row::new(vec![Cell::from(label), Cell::from(value)]))
        .collect();
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let dist = Table::new(dist_rows, [Constraint::Length(8), Constraint::Min(10)])
        .header(Row::new(vec!["stat", "daily sales"]).style(bold))
        .block(Block::default().title("Sales Distribution").borders(Borders::ALL));
    frame.render_widget(dist, bottom[0]);

    let quality: Vec<Line> = report::quality_lines(view).into_iter().map(Line::from).collect();
    let p = Paragraph::new(Text::from(quality))
        .block(Block::default().title("Data Quality").borders(Borders::ALL));
    frame.render_widget(p, bottom[1]);
}

fn draw_seasonal(frame: &mut ratatui::Frame<'_>, area: Rect, view: &SeasonalView) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);
    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(rows[0]);
    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(35),
            Constraint::Percentage(20),
            Constraint::Percentage(45),
        ])
        .split(rows[1]);

    let b = &view.breakdown;
    let weekdays: Vec<(String, f64)> = WEEKDAYS
        .iter()
        .zip(b.by_weekday.iter())
        .filter_map(|(d, v)| v.map(|v| (weekday_name(*d)[..3].to_string(), v)))
        .collect();
    draw_bars(frame, top[0], "Avg Sales by Weekday", &weekdays, 4, BarUnit::Money);

    let months: Vec<(String, f64)> = MONTH_NAMES
        .iter()
        .zip(b.by_month.iter())
        .filter_map(|(name, v)| v.map(|v| (name[..3].to_string(), v)))
        .collect();
    draw_bars(frame, top[1], "Avg Sales by Month", &months, 4, BarUnit::Money);

    let mut lines: Vec<Line> = Vec::new();
    for l in report::weekday_extremes(view) {
        lines.push(Line::from(l));
    }
    for l in report::month_extremes(view) {
        lines.push(Line::from(l));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Promotion Impact",
        Style::default().add_modifier(Modifier::BOLD),
    )));
    for l in report::promotion_lines(view) {
        lines.push(Line::from(l));
    }
    let p = Paragraph::new(Text::from(lines))
        .wrap(Wrap { trim: true })
        .block(Block::default().title("Highlights").borders(Borders::ALL));
    frame.render_widget(p, bottom[0]);

    let promo = &view.promotion;
    let promo_groups = [("With", promo.mean_with), ("Without", promo.mean_without)];
    let promo_bars: Vec<(String, f64)> = promo_groups
        .into_iter()
        .filter_map(|(label, v)| v.map(|v| (label.to_string(), v)))
        .collect();
    draw_bars(frame, bottom[1], "Promotion", &promo_bars, 7, BarUnit::Money);

    let dom: Vec<(f64, f64)> =
        b.by_day_of_month.iter().map(|(d, v)| (f64::from(*d), *v)).collect();
    let series = [ChartSeries {
        points: &dom,
        color: SALES_COLOR,
        style: SeriesStyle::Line,
    }];
    let title = "Avg Sales by Day of Month";
    draw_line_chart(frame, bottom[2], title, &series, "day", fmt_axis_day);
}

fn draw_models(frame: &mut ratatui::Frame<'_>, area: Rect, view: &ModelsView) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Length(10), Constraint::Min(6)])
        .split(area);

    let note = Paragraph::new(report::MODELS_NOTE)
        .style(Style::default().fg(Color::Yellow))
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(note, rows[0]);

    let best = Style::default().fg(Color::Green).add_modifier(Modifier::BOLD);
    let table_rows: Vec<Row> = view
        .rows
        .iter()
        .map(|row| {
            let mut cells = vec![Cell::from(row.model_name)];
            for metric in Metric::ALL {
                let value = metric.value(row);
                let text = match metric {
                    Metric::Mape => format!("{value:.2}%"),
                    _ => format!("{value:.0}"),
                };
                let cell = Cell::from(text);
                cells.push(if value == column_min(metric) { cell.style(best) } else { cell });
            }
            Row::new(cells)
        })
        .collect();

    let mut header = vec!["Model"];
    header.extend(Metric::ALL.iter().map(|m| m.label()));
    let table = Table::new(
        table_rows,
        [
            Constraint::Length(18),
            Constraint::Length(10),
            Constraint::Length(10),
            Constraint::Length(10),
        ],
    )
    .header(Row::new(header).style(Style::default().add_modifier(Modifier::BOLD)))
    .block(
        Block::default()
            .title(report::best_model_line(view))
            .borders(Borders::ALL),
    );
    frame.render_widget(table, rows[1]);

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(rows[2]);
    let charts = [
        (Metric::Mae, BarUnit::Money),
        (Metric::Rmse, BarUnit::Money),
        (Metric::Mape, BarUnit::Percent),
    ];
    for ((metric, unit), rect) in charts.into_iter().zip(cols.iter()) {
        let data: Vec<(String, f64)> = view
            .rows
            .iter()
            .map(|r| (short_name(r.model_name), metric.value(r)))
            .collect();
        draw_bars(frame, *rect, metric.label(), &data, 7, unit);
    }
}

fn draw_forecast(frame: &mut ratatui::Frame<'_>, area: Rect, view: &ForecastView) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(area);

    let history: Vec<(f64, f64)> =
        view.history.iter().map(|r| (date_x(r.date), r.total_sales)).collect();
    let forecast: Vec<(f64, f64)> =
        view.points.iter().map(|p| (date_x(p.date), p.point_estimate)).collect();
    let lower: Vec<(f64, f64)> =
        view.points.iter().map(|p| (date_x(p.date), p.lower_bound)).collect();
    let upper: Vec<(f64, f64)> =
        view.points.iter().map(|p| (date_x(p.date), p.upper_bound)).collect();
    let series = [
        ChartSeries {
            points: &history,
            color: HISTORY_COLOR,
            style: SeriesStyle::Line,
        },
        ChartSeries {
            points: &lower,
            color: BAND_COLOR,
            style: SeriesStyle::Dots,
        },
        ChartSeries {
            points: &upper,
            color: BAND_COLOR,
            style: SeriesStyle::Dots,
        },
        ChartSeries {
            points: &forecast,
            color: FORECAST_COLOR,
            style: SeriesStyle::Line,
        },
    ];
    let title = format!(
        "{}-Day Sales Forecast (history grey, forecast cyan, band yellow)",
        view.horizon
    );
    draw_line_chart(frame, cols[0], &title, &series, "date", fmt_axis_date);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(6), Constraint::Min(0)])
        .split(cols[1]);

    let summary: Vec<Line> =
        report::forecast_summary_lines(view).into_iter().map(Line::from).collect();
    let p = Paragraph::new(Text::from(summary))
        .block(Block::default().title("Forecast Summary").borders(Borders::ALL));
    frame.render_widget(p, right[0]);

    let detail_rows: Vec<Row> = view
        .points
        .iter()
        .map(|p| {
            Row::new(vec![
                p.date.format("%Y-%m-%d").to_string(),
                fmt_money(p.point_estimate),
                fmt_money(p.lower_bound),
                fmt_money(p.upper_bound),
            ])
        })
        .collect();
    let table = Table::new(
        detail_rows,
        [
            Constraint::Length(10),
            Constraint::Length(10),
            Constraint::Length(10),
            Constraint::Length(10),
        ],
    )
    .header(
        Row::new(vec!["date", "forecast", "lower", "upper"])
            .style(Style::default().add_modifier(Modifier::BOLD)),
    )
    .block(Block::default().title("Forecast Details").borders(Borders::ALL));
    frame.render_widget(table, right[1]);
}

fn draw_insights(frame: &mut ratatui::Frame<'_>, area: Rect, ins: &Insights, tab: InsightTab) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(10), Constraint::Length(4)])
        .split(area);
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(rows[0]);

    let findings: Vec<Line> = report::key_findings(ins)
        .into_iter()
        .map(|l| {
            if l.starts_with('-') {
                Line::from(l)
            } else {
                Line::from(Span::styled(l, Style::default().add_modifier(Modifier::BOLD)))
            }
        })
        .collect();
    let p = Paragraph::new(Text::from(findings))
        .wrap(Wrap { trim: false })
        .block(Block::default().title("Key Findings").borders(Borders::ALL));
    frame.render_widget(p, cols[0]);

    let block = Block::default().title("Recommendations (t: next tab)").borders(Borders::ALL);
    let inner = block.inner(cols[1]);
    frame.render_widget(block, cols[1]);
    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(0)])
        .split(inner);

    let idx = InsightTab::ALL.iter().position(|t| *t == tab).unwrap_or(0);
    let tabs = Tabs::new(InsightTab::ALL.iter().map(|t| t.title()))
        .select(idx)
        .style(Style::default().fg(Color::Gray))
        .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
        .divider("|");
    frame.render_widget(tabs, parts[0]);

    let recs: Vec<Line> =
        report::recommendation_lines(tab, ins).into_iter().map(Line::from).collect();
    frame.render_widget(Paragraph::new(Text::from(recs)).wrap(Wrap { trim: false }), parts[1]);

    let impact: Vec<(&str, String)> = EXPECTED_IMPACT
        .iter()
        .map(|(label, range, caption)| (*label, format!("{range} ({caption})")))
        .collect();
    draw_cards(frame, rows[1], &impact);
}

fn draw_cards<S: AsRef<str>>(frame: &mut ratatui::Frame<'_>, area: Rect, cards: &[(&str, S)]) {
    if cards.is_empty() {
        return;
    }
    let share = 100 / cards.len() as u16;
    let constraints: Vec<Constraint> =
        cards.iter().map(|_| Constraint::Percentage(share)).collect();
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(area);

    for ((label, value), rect) in cards.iter().zip(cols.iter()) {
        let p = Paragraph::new(Line::from(Span::styled(
            value.as_ref().to_string(),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .block(Block::default().title(*label).borders(Borders::ALL));
        frame.render_widget(p, *rect);
    }
}

/// What the bar values measure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BarUnit {
    Money,
    Percent,
}

fn draw_bars(
    frame: &mut ratatui::Frame<'_>,
    area: Rect,
    title: &str,
    data: &[(String, f64)],
    bar_width: u16,
    unit: BarUnit,
) {
    let (divisor, suffix) = bar_scale(unit, data.iter().map(|(_, v)| *v));
    let bars: Vec<Bar> = data
        .iter()
        .map(|(label, v)| {
            Bar::default()
                .label(Line::from(label.as_str()))
                .value(bar_height(*v, divisor))
                .text_value(bar_text(unit, *v, divisor))
        })
        .collect();
    let chart = BarChart::default()
        .block(Block::default().title(format!("{title} ({suffix})")).borders(Borders::ALL))
        .data(BarGroup::default().bars(&bars))
        .bar_width(bar_width)
        .bar_gap(1)
        .bar_style(Style::default().fg(Color::Cyan))
        .value_style(Style::default().fg(Color::Black).bg(Color::Cyan));
    frame.render_widget(chart, area);
}

fn draw_line_chart(
    frame: &mut ratatui::Frame<'_>,
    area: Rect,
    title: &str,
    series: &[ChartSeries<'_>],
    x_label: &str,
    fmt_x: fn(f64) -> String,
) {
    let block = Block::default().title(title).borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    frame.render_widget(Clear, inner);

    let (x_bounds, y_bounds) = series_bounds(series);
    let (chart_rect, insets) = chart_layout(inner);
    let widget = SalesPlottersChart {
        series,
        x_bounds,
        y_bounds,
        x_label,
        y_label: "sales",
        fmt_x,
        fmt_y: fmt_axis_money,
    };
    frame.render_widget(widget, chart_rect);
    if let Some(insets) = insets {
        let axes = AxisLabels {
            x_bounds,
            y_bounds,
            fmt_x,
            fmt_y: fmt_axis_money,
            x_label,
            y_label: "sales",
        };
        draw_axis_ticks(frame, inner, chart_rect, insets, &axes);
    }
}

/// Bars carry integer heights: large money values are shown in thousands,
/// percentages in hundredths so small differences stay visible.
fn bar_scale(unit: BarUnit, values: impl Iterator<Item = f64>) -> (f64, &'static str) {
    if unit == BarUnit::Percent {
        return (0.01, "%");
    }
    let max = values.filter(|v| v.is_finite()).fold(0.0, f64::max);
    if max >= 100_000.0 { (1000.0, "$K") } else { (1.0, "$") }
}

fn bar_text(unit: BarUnit, v: f64, divisor: f64) -> String {
    match unit {
        BarUnit::Money => bar_height(v, divisor).to_string(),
        BarUnit::Percent if v.is_finite() => format!("{v:.1}"),
        BarUnit::Percent => "-".to_string(),
    }
}

fn bar_height(v: f64, divisor: f64) -> u64 {
    if v.is_finite() && v > 0.0 {
        (v / divisor).round() as u64
    } else {
        0
    }
}

/// Up to 7 characters, for bar labels.
fn short_name(name: &str) -> String {
    name.chars().take(7).collect()
}

#[derive(Debug, Clone, Copy)]
struct AxisInsets {
    left: u16,
    right: u16,
    top: u16,
    bottom: u16,
}

struct AxisLabels<'a> {
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
    fmt_x: fn(f64) -> String,
    fmt_y: fn(f64) -> String,
    x_label: &'a str,
    y_label: &'a str,
}

fn chart_layout(inner: Rect) -> (Rect, Option<AxisInsets>) {
    let insets = AxisInsets {
        left: 8,
        right: 2,
        top: 1,
        bottom: 2,
    };

    if inner.width <= insets.left + insets.right + 10
        || inner.height <= insets.top + insets.bottom + 5
    {
        return (inner, None);
    }

    let rect = Rect {
        x: inner.x + insets.left,
        y: inner.y + insets.top,
        width: inner.width - insets.left - insets.right,
        height: inner.height - insets.top - insets.bottom,
    };

    (rect, Some(insets))
}

fn draw_axis_ticks(
    frame: &mut ratatui::Frame<'_>,
    inner: Rect,
    chart: Rect,
    insets: AxisInsets,
    axes: &AxisLabels<'_>,
) {
    let ticks = 4usize;
    let style = Style::default().fg(Color::Gray);

    for i in 0..ticks {
        let u = i as f64 / (ticks as f64 - 1.0);
        let x_val = axes.x_bounds[0] + u * (axes.x_bounds[1] - axes.x_bounds[0]);
        let x = chart.x + ((chart.width - 1) as f64 * u).round() as u16;
        let label = (axes.fmt_x)(x_val);
        let label_len = label.len() as u16;
        let start = x
            .saturating_sub(label_len / 2)
            .min((chart.x + chart.width).saturating_sub(label_len));
        let y = chart.y + chart.height;
        if y >= inner.y + inner.height - 1 {
            continue;
        }
        frame.render_widget(
            Paragraph::new(label).style(style),
            Rect {
                x: start,
                y,
                width: label_len,
                height: 1,
            },
        );
    }

    for i in 0..ticks {
        let u = i as f64 / (ticks as f64 - 1.0);
        let y_val = axes.y_bounds[0] + u * (axes.y_bounds[1] - axes.y_bounds[0]);
        let y = chart.y + (chart.height - 1) - ((chart.height - 1) as f64 * u).round() as u16;
        let label = (axes.fmt_y)(y_val);
        let label_len = label.len() as u16;
        let x = inner.x + insets.left.saturating_sub(1);
        let start = x.saturating_sub(label_len);
        if start < inner.x {
            continue;
        }
        frame.render_widget(
            Paragraph::new(label).style(style),
            Rect {
                x: start,
                y,
                width: label_len,
                height: 1,
            },
        );
    }

    let x_label = Paragraph::new(axes.x_label)
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Gray));
    let x_rect = Rect {
        x: chart.x,
        y: chart.y + chart.height + 1,
        width: chart.width,
        height: 1,
    };
    if x_rect.y < inner.y + inner.height {
        frame.render_widget(x_label, x_rect);
    }

    let y_label = Paragraph::new(axes.y_label)
        .style(Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD));
    let y_rect = Rect {
        x: inner.x,
        y: inner.y,
        width: insets.left.saturating_sub(1),
        height: 1,
    };
    frame.render_widget(y_label, y_rect);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;

    fn demo() -> Dataset {
        crate::data::generate_demo(9, 800).unwrap()
    }

    fn config() -> DashboardConfig {
        DashboardConfig {
            source: DataSource::Demo { seed: 9, days: 800 },
            horizon: 30,
            page: Page::Overview,
            plot_width: 100,
            plot_height: 20,
        }
    }

    #[test]
    fn number_and_tab_keys_switch_pages() {
        let ds = demo();
        let mut app = App::new(&ds, &config());
        assert!(matches!(app.view, Some(PageView::Overview(_))));

        assert!(!app.handle_key(KeyCode::Char('4')));
        assert_eq!(app.page, Page::Forecasts);
        assert!(matches!(app.view, Some(PageView::Forecasts(_))));

        app.handle_key(KeyCode::Tab);
        assert_eq!(app.page, Page::Insights);
        app.handle_key(KeyCode::Tab);
        assert_eq!(app.page, Page::Overview);
        app.handle_key(KeyCode::Left);
        assert_eq!(app.page, Page::Insights);
    }

    #[test]
    fn horizon_keys_clamp_and_rebuild_forecast() {
        let ds = demo();
        let mut app = App::new(&ds, &config());
        app.handle_key(KeyCode::Char('4'));

        app.handle_key(KeyCode::Char('-'));
        assert_eq!(app.horizon, HORIZON_MIN);

        for _ in 0..20 {
            app.handle_key(KeyCode::Char('+'));
        }
        assert_eq!(app.horizon, HORIZON_MAX);
        let Some(PageView::Forecasts(view)) = &app.view else {
            panic!("expected forecast view");
        };
        assert_eq!(view.points.len(), HORIZON_MAX);
    }

    #[test]
    fn insight_tab_cycles_and_quit_key() {
        let ds = demo();
        let mut app = App::new(&ds, &config());
        assert_eq!(app.tab, InsightTab::Inventory);
        for _ in 0..4 {
            app.handle_key(KeyCode::Char('t'));
        }
        assert_eq!(app.tab, InsightTab::Inventory);
        assert!(app.handle_key(KeyCode::Char('q')));
    }

    #[test]
    fn every_page_draws_on_test_backend() {
        let ds = demo();
        let mut app = App::new(&ds, &config());
        let mut terminal = Terminal::new(TestBackend::new(160, 50)).unwrap();
        for n in ['1', '2', '3', '4', '5'] {
            app.handle_key(KeyCode::Char(n));
            terminal.draw(|f| app.draw(f)).unwrap();
        }
    }

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        terminal.backend().buffer().content.iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn pages_show_comparison_and_trend_charts() {
        let ds = demo();
        let mut app = App::new(&ds, &config());
        let mut terminal = Terminal::new(TestBackend::new(180, 50)).unwrap();

        terminal.draw(|f| app.draw(f)).unwrap();
        assert!(screen_text(&terminal).contains("30-day average"));

        app.handle_key(KeyCode::Char('2'));
        terminal.draw(|f| app.draw(f)).unwrap();
        assert!(screen_text(&terminal).contains("Promotion ($)"));

        app.handle_key(KeyCode::Char('3'));
        terminal.draw(|f| app.draw(f)).unwrap();
        let screen = screen_text(&terminal);
        assert!(screen.contains("MAE ($)"));
        assert!(screen.contains("RMSE ($)"));
        assert!(screen.contains("MAPE (%)"));
    }

    #[test]
    fn percent_bars_keep_one_decimal() {
        let (divisor, suffix) = bar_scale(BarUnit::Percent, [6.8, 12.4].into_iter());
        assert_eq!(suffix, "%");
        assert_eq!(bar_height(6.8, divisor), 680);
        assert_eq!(bar_text(BarUnit::Percent, 6.8, divisor), "6.8");
        assert_eq!(bar_text(BarUnit::Money, 45_600.0, 1000.0), "46");
    }

    #[test]
    fn bar_heights_switch_to_thousands_for_large_values() {
        let money = |values: [f64; 2]| bar_scale(BarUnit::Money, values.into_iter());
        assert_eq!(money([900.0, 1_200.0]), (1.0, "$"));
        assert_eq!(money([45_000.0, 650_000.0]), (1000.0, "$K"));
        assert_eq!(bar_height(45_600.0, 1000.0), 46);
        assert_eq!(bar_height(-5.0, 1.0), 0);
        assert_eq!(bar_height(f64::NAN, 1.0), 0);
    }
}
