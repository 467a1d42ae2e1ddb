//! Live readings for one sensor category, grouped into device cards.
//!
//! Layout:
//! ┌─ Digital Sensors ──────────────────────── ● live  updated 14:02:11 ─┐
//! │ ┌─ Cold Aisle ──────────────────────────────────────────────────┐ │
//! │ │ Serial Number AB12 · Firmware Version 2.1 · IPv4 Address ...  │ │
//! │ │ Rack 4 Inlet                                                  │ │
//! │ │   Temperature   21.3 °C      high 24.0 °C   low 19.2 °C       │ │
//! │ └───────────────────────────────────────────────────────────────┘ │
//! └───────────────────────────────────────────────────────────────────┘

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};
use throbber_widgets_tui::{Throbber, ThrobberState};

use sensorium_core::{
    DeviceGroup, LiveState, Navigation, PollStatus, SensorCategory, renderable_fields,
};

use crate::action::Action;
use crate::component::Component;
use crate::theme;

pub struct LiveScreen {
    focused: bool,
    category: Option<SensorCategory>,
    state: Option<LiveState>,
    /// Index of the first device card shown.
    scroll: usize,
    throbber_state: ThrobberState,
}

impl LiveScreen {
    pub fn new() -> Self {
        Self {
            focused: false,
            category: None,
            state: None,
            scroll: 0,
            throbber_state: ThrobberState::default(),
        }
    }

    fn device_count(&self) -> usize {
        self.state
            .as_ref()
            .and_then(|s| s.snapshot.as_ref())
            .map_or(0, |snap| snap.groups.len())
    }

    fn is_loading(&self) -> bool {
        self.state
            .as_ref()
            .is_none_or(|s| s.status == PollStatus::Loading)
    }
}

/// Body lines for one device card: the info line, then every sensor.
pub fn card_lines(group: &DeviceGroup, category: SensorCategory) -> Vec<Line<'static>> {
    let info: Vec<Span<'static>> = group
        .device
        .info_lines()
        .into_iter()
        .enumerate()
        .flat_map(|(i, (label, value))| {
            let sep = if i == 0 { "" } else { " · " };
            [
                Span::styled(format!("{sep}{label} "), theme::muted()),
                Span::styled(value, theme::table_row()),
            ]
        })
        .collect();

    let mut lines = vec![Line::from(info)];

    for reading in &group.readings {
        lines.push(Line::from(Span::styled(
            reading.display_label(),
            Style::default()
                .fg(theme::DIM_WHITE)
                .add_modifier(Modifier::BOLD),
        )));

        let fields = renderable_fields(reading, category);
        if fields.is_empty() {
            lines.push(Line::from(Span::styled("  no data", theme::muted())));
            continue;
        }

        for field in fields {
            let value_style = match field.indicator {
                Some(on) => theme::indicator(on),
                None => theme::metric_value(),
            };
            let mut spans = vec![
                Span::styled(format!("  {:<13}", field.kind.label()), theme::muted()),
                Span::styled(format!("{:<12}", field.value_with_unit()), value_style),
            ];
            if let Some((high, low)) = field.range_with_unit() {
                spans.push(Span::styled(" high ", theme::muted()));
                spans.push(Span::styled(format!("{high:<10}"), theme::table_row()));
                spans.push(Span::styled(" low ", theme::muted()));
                spans.push(Span::styled(low, theme::table_row()));
            }
            lines.push(Line::from(spans));
        }
    }

    lines
}

fn status_spans(state: Option<&LiveState>) -> Vec<Span<'static>> {
    let Some(state) = state else {
        return Vec::new();
    };
    let mut spans = match state.status {
        PollStatus::Loading => vec![Span::styled(
            "◐ loading",
            Style::default().fg(theme::AMBER),
        )],
        PollStatus::Live => vec![Span::styled(
            "● live",
            Style::default().fg(theme::SUCCESS_GREEN),
        )],
        PollStatus::Stale { .. } => vec![Span::styled(
            "○ stale",
            Style::default().fg(theme::ERROR_RED),
        )],
    };
    if let Some(ref snapshot) = state.snapshot {
        spans.push(Span::styled(
            format!("  updated {} ", snapshot.updated_at.format("%H:%M:%S")),
            theme::muted(),
        ));
    } else {
        spans.push(Span::raw(" "));
    }
    spans
}

impl Component for LiveScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                let last = self.device_count().saturating_sub(1);
                self.scroll = (self.scroll + 1).min(last);
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.scroll = self.scroll.saturating_sub(1);
            }
            KeyCode::Char('g') | KeyCode::Home => self.scroll = 0,
            _ => {}
        }
        Ok(None)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::Navigate(Navigation::SelectSensor(category)) => {
                if self.category != Some(*category) {
                    self.category = Some(*category);
                    self.state = None;
                    self.scroll = 0;
                }
            }
            Action::LiveUpdated(state) => {
                // Only the category on screen; a late publish for the
                // previous one must not replace it.
                if self.category == Some(state.category) {
                    self.state = Some(state.clone());
                    self.scroll = self.scroll.min(self.device_count().saturating_sub(1));
                }
            }
            Action::Tick if self.is_loading() => self.throbber_state.calc_next(),
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let title = self
            .category
            .map_or_else(|| " Live ".to_owned(), |c| format!(" {} ", c.label()));
        let block = Block::default()
            .title(title)
            .title_style(theme::title_style())
            .title_top(Line::from(status_spans(self.state.as_ref())).right_aligned())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border(self.focused));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let (Some(category), Some(state)) = (self.category, self.state.as_ref()) else {
            self.render_loading(frame, inner);
            return;
        };

        let mut body = inner;
        if let PollStatus::Stale { ref error } = state.status {
            let [warn_area, rest] =
                Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).areas(inner);
            frame.render_widget(
                Paragraph::new(Span::styled(
                    format!("⚠ refresh failed, showing last readings: {error}"),
                    Style::default().fg(theme::AMBER),
                )),
                warn_area,
            );
            body = rest;
        }

        let Some(ref snapshot) = state.snapshot else {
            if state.status == PollStatus::Loading {
                self.render_loading(frame, body);
            }
            return;
        };

        if snapshot.groups.is_empty() {
            frame.render_widget(
                Paragraph::new(Span::styled("No live readings.", theme::muted())),
                body,
            );
            return;
        }

        let mut y = body.y;
        let bottom = body.y.saturating_add(body.height);
        for group in snapshot.groups.iter().skip(self.scroll) {
            if y >= bottom {
                break;
            }
            let lines = card_lines(group, category);
            let wanted = u16::try_from(lines.len()).unwrap_or(u16::MAX).saturating_add(2);
            let height = wanted.min(bottom - y);
            let card_area = Rect::new(body.x, y, body.width, height);

            let card = Paragraph::new(lines).block(
                Block::default()
                    .title(format!(" {} ", group.device.display_name()))
                    .title_style(theme::active_entry())
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(theme::border_default()),
            );
            frame.render_widget(card, card_area);
            y = y.saturating_add(height);
        }
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn hints(&self) -> &'static [(&'static str, &'static str)] {
        &[("j/k", "scroll")]
    }
}

impl LiveScreen {
    fn render_loading(&self, frame: &mut Frame, area: Rect) {
        let throbber = Throbber::default()
            .label("Waiting for readings\u{2026}")
            .style(theme::muted())
            .throbber_style(Style::default().fg(theme::ACCENT));
        frame.render_stateful_widget(throbber, area, &mut self.throbber_state.clone());
    }
}
