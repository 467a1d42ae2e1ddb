//! Historical report screen: pick a device and sensor, read the
//! aggregate table, and see averages charted over the period.
//!
//! Layout:
//! ┌─ Weekly Report ──────────────────────────────────────────────────┐
//! │ Daily  [Weekly]  Monthly                                         │
//! │ Device ◂ Cold Aisle ▸ (1/3)    Sensor ◂ Rack 4 Inlet ▸ (2/5)      │
//! │ ┌─ Statistics ─────────────────────────────────────────────────┐ │
//! │ │ Period │ Min Temp │ Avg Temp │ Max Temp │ Avg Humidity │ ...  │ │
//! │ └──────────────────────────────────────────────────────────────┘ │
//! │ ┌─ Averages (Braille) ─────────────────────────────────────────┐ │
//! │ └──────────────────────────────────────────────────────────────┘ │
//! └──────────────────────────────────────────────────────────────────┘

use std::sync::Arc;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        Axis, Block, BorderType, Borders, Cell, Chart, Dataset, GraphType, LegendPosition,
        Paragraph, Row, Table,
    },
};
use strum::IntoEnumIterator;
use throbber_widgets_tui::{Throbber, ThrobberState};

use sensorium_core::{
    ChartSeries, Device, EXPORT_COLUMNS, Navigation, ReportPeriod, ReportRow, SensorDescriptor,
    chart_series, format_axis_tick, to_export_rows,
};

use crate::action::Action;
use crate::component::Component;
use crate::theme;
use crate::widgets::sub_tabs::render_sub_tabs;

pub struct ReportsScreen {
    focused: bool,
    period: ReportPeriod,
    devices: Vec<Device>,
    device_index: Option<usize>,
    sensors: Vec<SensorDescriptor>,
    sensor_index: Option<usize>,
    rows: Option<Arc<Vec<ReportRow>>>,
    loading: bool,
    error: Option<String>,
    throbber_state: ThrobberState,
}

impl ReportsScreen {
    pub fn new() -> Self {
        Self {
            focused: false,
            period: ReportPeriod::default(),
            devices: Vec::new(),
            device_index: None,
            sensors: Vec::new(),
            sensor_index: None,
            rows: None,
            loading: false,
            error: None,
            throbber_state: ThrobberState::default(),
        }
    }

    fn device(&self) -> Option<&Device> {
        self.device_index.and_then(|i| self.devices.get(i))
    }

    fn sensor(&self) -> Option<&SensorDescriptor> {
        self.sensor_index.and_then(|i| self.sensors.get(i))
    }

    fn cycle_device(&self, forward: bool) -> Option<Action> {
        let next = step(self.device_index, self.devices.len(), forward)?;
        if Some(next) == self.device_index {
            return None;
        }
        self.devices
            .get(next)
            .map(|d| Action::SelectReportDevice(d.id.clone()))
    }

    fn cycle_sensor(&self, forward: bool) -> Option<Action> {
        let next = step(self.sensor_index, self.sensors.len(), forward)?;
        if Some(next) == self.sensor_index {
            return None;
        }
        self.select_sensor_at(next)
    }

    fn select_sensor_at(&self, index: usize) -> Option<Action> {
        let device = self.device()?;
        let sensor = self.sensors.get(index)?;
        Some(Action::SelectReportSensor {
            device_id: device.id.clone(),
            sensor_id: sensor.id.clone(),
        })
    }
}

/// Wrap-around step through `len` items.
fn step(current: Option<usize>, len: usize, forward: bool) -> Option<usize> {
    if len == 0 {
        return None;
    }
    Some(match (current, forward) {
        (None, _) => 0,
        (Some(i), true) => (i + 1) % len,
        (Some(i), false) => (i + len - 1) % len,
    })
}

/// X-axis labels: first, middle and last period in the report.
pub fn axis_labels(rows: &[ReportRow], period: ReportPeriod) -> Vec<String> {
    match rows.len() {
        0 => Vec::new(),
        1 => vec![format_axis_tick(&rows[0].period, period)],
        n => {
            let mut picks = vec![0, n / 2, n - 1];
            picks.dedup();
            picks
                .into_iter()
                .map(|i| format_axis_tick(&rows[i].period, period))
                .collect()
        }
    }
}

/// Y-axis bounds covering every plotted point, padded by one unit.
pub fn y_bounds(series: &[ChartSeries]) -> [f64; 2] {
    let values = series.iter().flat_map(|s| s.points.iter().map(|(_, y)| *y));
    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if min.is_finite() && max.is_finite() {
        [(min - 1.0).floor(), (max + 1.0).ceil()]
    } else {
        [0.0, 1.0]
    }
}

impl Component for ReportsScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Char('l') | KeyCode::Right => self.cycle_device(true),
            KeyCode::Char('h') | KeyCode::Left => self.cycle_device(false),
            KeyCode::Char('j') | KeyCode::Down => self.cycle_sensor(true),
            KeyCode::Char('k') | KeyCode::Up => self.cycle_sensor(false),
            KeyCode::Char('r') => self.sensor_index.and_then(|i| self.select_sensor_at(i)),
            KeyCode::Char('x') => Some(Action::ExportReport),
            KeyCode::Char('[') => ReportPeriod::iter()
                .take_while(|p| *p != self.period)
                .last()
                .map(|prev| Action::Navigate(Navigation::SelectReport(prev))),
            KeyCode::Char(']') => ReportPeriod::iter()
                .skip_while(|p| *p != self.period)
                .nth(1)
                .map(|next| Action::Navigate(Navigation::SelectReport(next))),
            _ => None,
        };
        Ok(action)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::Navigate(Navigation::SelectReport(period)) => {
                if *period != self.period {
                    self.period = *period;
                    self.rows = None;
                    self.loading = self.sensor_index.is_some();
                }
            }

            Action::DevicesLoaded(devices) => {
                let current = self.device().map(|d| d.id.clone());
                self.devices.clone_from(devices);
                self.error = None;
                self.device_index =
                    current.and_then(|id| devices.iter().position(|d| d.id == id));
                if self.device_index.is_none() {
                    return Ok(self
                        .devices
                        .first()
                        .map(|d| Action::SelectReportDevice(d.id.clone())));
                }
            }

            Action::DevicesFailed(err) | Action::ReportFailed(err) => {
                self.error = Some(err.clone());
                self.loading = false;
            }

            Action::SelectReportDevice(id) => {
                self.device_index = self.devices.iter().position(|d| &d.id == id);
                self.sensors.clear();
                self.sensor_index = None;
                self.rows = None;
                self.error = None;
                self.loading = true;
            }

            Action::SensorsLoaded { device_id, sensors } => {
                if self.device().is_some_and(|d| &d.id == device_id) {
                    self.sensors.clone_from(sensors);
                    if sensors.is_empty() {
                        self.loading = false;
                    }
                    return Ok(self.select_sensor_at(0));
                }
            }

            Action::SelectReportSensor {
                device_id,
                sensor_id,
            } => {
                if self.device().is_some_and(|d| &d.id == device_id) {
                    self.sensor_index = self.sensors.iter().position(|s| &s.id == sensor_id);
                    self.loading = true;
                    self.error = None;
                }
            }

            Action::ReportLoaded(data) => {
                let matches = data.period == self.period
                    && self.device().is_some_and(|d| d.id == data.device_id)
                    && self.sensor().is_some_and(|s| s.id == data.sensor_id);
                if matches {
                    self.rows = Some(Arc::clone(&data.rows));
                    self.loading = false;
                }
            }

            Action::Tick if self.loading => self.throbber_state.calc_next(),
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(format!(" {} ", self.period.label()))
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border(self.focused));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [tabs_area, selector_area, table_area, chart_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(2),
            Constraint::Percentage(45),
            Constraint::Min(6),
        ])
        .areas(inner);

        let labels: Vec<&str> = ReportPeriod::iter().map(ReportPeriod::code).collect();
        let active = ReportPeriod::iter()
            .position(|p| p == self.period)
            .unwrap_or(0);
        frame.render_widget(Paragraph::new(render_sub_tabs(&labels, active)), tabs_area);

        self.render_selectors(frame, selector_area);

        if let Some(ref err) = self.error {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    format!("Could not load report: {err}"),
                    Style::default().fg(theme::ERROR_RED),
                )),
                table_area,
            );
            return;
        }

        match self.rows {
            Some(ref rows) if rows.is_empty() => {
                frame.render_widget(
                    Paragraph::new(Span::styled(
                        "No rows for this period.",
                        theme::muted(),
                    )),
                    table_area,
                );
            }
            Some(ref rows) => {
                self.render_table(frame, table_area, rows);
                self.render_chart(frame, chart_area, rows);
            }
            None if self.loading => {
                let throbber = Throbber::default()
                    .label("Loading report\u{2026}")
                    .style(theme::muted())
                    .throbber_style(Style::default().fg(theme::ACCENT));
                frame.render_stateful_widget(
                    throbber,
                    table_area,
                    &mut self.throbber_state.clone(),
                );
            }
            None => {
                let hint = if self.devices.is_empty() {
                    "No devices."
                } else if self.sensors.is_empty() {
                    "No sensors on this device."
                } else {
                    "Select a sensor."
                };
                frame.render_widget(
                    Paragraph::new(Span::styled(hint, theme::muted())),
                    table_area,
                );
            }
        }
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn hints(&self) -> &'static [(&'static str, &'static str)] {
        &[
            ("h/l", "device"),
            ("j/k", "sensor"),
            ("[/]", "period"),
            ("x", "export"),
        ]
    }
}

impl ReportsScreen {
    fn render_selectors(&self, frame: &mut Frame, area: Rect) {
        let picker = |label: &'static str, value: String, index: Option<usize>, len: usize| {
            let position = index.map_or_else(String::new, |i| format!(" ({}/{len})", i + 1));
            vec![
                Span::styled(format!("{label} "), theme::muted()),
                Span::styled("◂ ", theme::key_hint_key()),
                Span::styled(value, theme::active_entry()),
                Span::styled(" ▸", theme::key_hint_key()),
                Span::styled(position, theme::muted()),
            ]
        };

        let device = self
            .device()
            .map_or_else(|| "-".to_owned(), Device::display_name);
        let sensor = self
            .sensor()
            .map_or_else(|| "-".to_owned(), SensorDescriptor::display_label);

        let mut spans = picker("Device", device, self.device_index, self.devices.len());
        spans.push(Span::raw("    "));
        spans.extend(picker("Sensor", sensor, self.sensor_index, self.sensors.len()));

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn render_table(&self, frame: &mut Frame, area: Rect, rows: &[ReportRow]) {
        let header = Row::new(EXPORT_COLUMNS.iter().map(|c| Cell::from(*c)))
            .style(theme::table_header());

        let body: Vec<Row> = to_export_rows(rows, self.period)
            .into_iter()
            .map(|record| {
                Row::new(
                    EXPORT_COLUMNS
                        .iter()
                        .map(|c| Cell::from(record.get(c).cloned().unwrap_or_default())),
                )
                .style(theme::table_row())
            })
            .collect();

        let widths = [
            Constraint::Min(18),
            Constraint::Length(9),
            Constraint::Length(9),
            Constraint::Length(9),
            Constraint::Length(13),
            Constraint::Length(15),
            Constraint::Length(14),
        ];

        let table = Table::new(body, widths).header(header).block(
            Block::default()
                .title(" Statistics ")
                .title_style(theme::muted())
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(theme::border_default()),
        );
        frame.render_widget(table, area);
    }

    fn render_chart(&self, frame: &mut Frame, area: Rect, rows: &[ReportRow]) {
        let series = chart_series(rows);
        let datasets: Vec<Dataset> = series
            .iter()
            .zip(theme::CHART_SERIES.iter())
            .filter(|(s, _)| !s.points.is_empty())
            .map(|(s, color)| {
                Dataset::default()
                    .name(s.name)
                    .marker(Marker::Braille)
                    .graph_type(GraphType::Line)
                    .style(Style::default().fg(*color))
                    .data(&s.points)
            })
            .collect();

        let x_max = u32::try_from(rows.len().saturating_sub(1))
            .map_or(f64::from(u32::MAX), f64::from)
            .max(1.0);
        let [y_min, y_max] = y_bounds(&series);

        let chart = Chart::new(datasets)
            .block(
                Block::default()
                    .title(" Averages ")
                    .title_style(theme::muted())
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(theme::border_default()),
            )
            .legend_position(Some(LegendPosition::TopRight))
            .x_axis(
                Axis::default()
                    .bounds([0.0, x_max])
                    .labels(axis_labels(rows, self.period))
                    .style(Style::default().fg(theme::BORDER_GRAY)),
            )
            .y_axis(
                Axis::default()
                    .bounds([y_min, y_max])
                    .labels([y_min, y_max].map(|v| format!("{v:.0}")))
                    .style(Style::default().fg(theme::BORDER_GRAY)),
            );
        frame.render_widget(chart, area);
    }
}
