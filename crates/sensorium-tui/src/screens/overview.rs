//! Overview screen: fleet-wide counts and digital-sensor averages.
//!
//! Layout:
//! ┌─ Dashboard Overview ─────────────────────────────────────────────┐
//! │ ┌─ Devices ─┐ ┌─ Sensors ─┐ ┌─ Avg Temperature ─┐ ┌─ Avg Humidity ─┐ │
//! │ └───────────┘ └───────────┘ └───────────────────┘ └────────────────┘ │
//! │ updated 14:02:11                                                  │
//! └──────────────────────────────────────────────────────────────────┘

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};
use throbber_widgets_tui::{Throbber, ThrobberState};

use sensorium_core::{OverviewSummary, to_fixed};

use crate::action::Action;
use crate::component::Component;
use crate::theme;

pub struct OverviewScreen {
    focused: bool,
    summary: Option<OverviewSummary>,
    loading: bool,
    error: Option<String>,
    throbber_state: ThrobberState,
}

impl OverviewScreen {
    pub fn new() -> Self {
        Self {
            focused: false,
            summary: None,
            loading: false,
            error: None,
            throbber_state: ThrobberState::default(),
        }
    }
}

/// Label and rendered value for each metric tile.
pub fn metric_tiles(summary: &OverviewSummary) -> [(&'static str, String); 4] {
    let average = |value: Option<f64>, unit: &str| match value {
        Some(v) => format!("{} {unit}", to_fixed(v, 1)),
        None => "-".to_owned(),
    };
    [
        ("Devices", summary.total_devices.to_string()),
        ("Sensors", summary.total_sensors.to_string()),
        (
            "Avg Temperature",
            average(summary.average_temperature, "°C"),
        ),
        ("Avg Humidity", average(summary.average_humidity, "%RH")),
    ]
}

impl Component for OverviewScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match key.code {
            KeyCode::Char('r') => Ok(Some(Action::RefreshOverview)),
            _ => Ok(None),
        }
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::RefreshOverview => {
                self.loading = true;
                self.error = None;
            }
            Action::OverviewLoaded(summary) => {
                self.summary = Some(summary.clone());
                self.loading = false;
            }
            Action::OverviewFailed(err) => {
                self.error = Some(err.clone());
                self.loading = false;
            }
            Action::Tick if self.loading => self.throbber_state.calc_next(),
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" Dashboard Overview ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border(self.focused));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [tiles_area, footer_area, _] = Layout::vertical([
            Constraint::Length(5),
            Constraint::Length(2),
            Constraint::Min(0),
        ])
        .areas(inner);

        match self.summary {
            Some(ref summary) => render_tiles(frame, tiles_area, summary),
            None if self.error.is_none() => {
                let throbber = Throbber::default()
                    .label("Loading overview\u{2026}")
                    .style(theme::muted())
                    .throbber_style(Style::default().fg(theme::ACCENT));
                frame.render_stateful_widget(
                    throbber,
                    tiles_area,
                    &mut self.throbber_state.clone(),
                );
            }
            None => {}
        }

        let mut lines = Vec::new();
        if let Some(ref summary) = self.summary {
            lines.push(Line::from(vec![
                Span::styled("updated ", theme::muted()),
                Span::styled(
                    summary.updated_at.format("%H:%M:%S").to_string(),
                    theme::table_row(),
                ),
            ]));
        }
        if let Some(ref err) = self.error {
            lines.push(Line::from(Span::styled(
                format!("Could not load overview: {err}"),
                Style::default().fg(theme::ERROR_RED),
            )));
        }
        frame.render_widget(Paragraph::new(lines), footer_area);
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn hints(&self) -> &'static [(&'static str, &'static str)] {
        &[("r", "refresh")]
    }
}

fn render_tiles(frame: &mut Frame, area: Rect, summary: &OverviewSummary) {
    let columns = Layout::horizontal([Constraint::Ratio(1, 4); 4]).split(area);
    for ((label, value), tile) in metric_tiles(summary).into_iter().zip(columns.iter()) {
        let block = Block::default()
            .title(format!(" {label} "))
            .title_style(theme::muted())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_default());
        let body = Paragraph::new(vec![
            Line::default(),
            Line::from(Span::styled(value, theme::metric_value())),
        ])
        .alignment(Alignment::Center)
        .block(block);
        frame.render_widget(body, *tile);
    }
}
