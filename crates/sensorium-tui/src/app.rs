//! Application core: event loop, navigation, screen management, action dispatch.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use sensorium_core::{
    Dashboard, GenerationGuard, LivePoller, Navigation, Page, PollStatus, ViewState,
    export_file_name, reduce, to_export_rows, write_workbook,
};

use crate::action::{Action, Notification, NotificationLevel, ReportData};
use crate::component::Component;
use crate::data_bridge::{self, ReportRequest};
use crate::event::{Event, EventReader};
use crate::screen::ScreenId;
use crate::screens::create_screens;
use crate::theme;
use crate::tui::Tui;
use crate::widgets::sidebar::{Sidebar, SidebarEntry};

const NOTIFICATION_TTL: Duration = Duration::from_secs(3);
const SIDEBAR_WIDTH: u16 = 26;

/// Which pane receives keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Sidebar,
    Content,
}

/// The running live feed: the poller plus the task forwarding its state.
struct LiveFeed {
    poller: LivePoller,
    bridge_cancel: CancellationToken,
}

impl LiveFeed {
    fn stop(&self) {
        self.bridge_cancel.cancel();
        self.poller.stop();
    }
}

/// Top-level application state and event loop.
pub struct App {
    dashboard: Dashboard,
    view: ViewState,
    focus: Focus,
    sidebar: Sidebar,
    screens: HashMap<ScreenId, Box<dyn Component>>,
    running: bool,
    help_visible: bool,
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
    live: Option<LiveFeed>,
    /// Health of the feed for the category on screen.
    live_status: Option<PollStatus>,
    devices_requested: bool,
    /// Device and sensor the reports screen is showing.
    report_selection: Option<(String, String)>,
    report_guard: Arc<GenerationGuard>,
    /// Last committed report, the one `x` exports.
    last_report: Option<ReportData>,
    export_dir: PathBuf,
    notification: Option<(Notification, Instant)>,
}

impl App {
    pub fn new(dashboard: Dashboard, export_dir: PathBuf) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let screens: HashMap<ScreenId, Box<dyn Component>> =
            create_screens().into_iter().collect();

        Self {
            dashboard,
            view: ViewState::default(),
            focus: Focus::default(),
            sidebar: Sidebar::new(),
            screens,
            running: true,
            help_visible: false,
            action_tx,
            action_rx,
            live: None,
            live_status: None,
            devices_requested: false,
            report_selection: None,
            report_guard: Arc::new(GenerationGuard::new()),
            last_report: None,
            export_dir,
            notification: None,
        }
    }

    fn active_screen(&self) -> ScreenId {
        ScreenId::for_page(self.view.page)
    }

    /// Run the main event loop.
    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?;
        tui.enter()?;
        let (width, height) = tui.size()?;
        debug!(width, height, "terminal size");

        // The welcome page loads its summary on entry.
        self.action_tx.send(Action::RefreshOverview)?;

        let mut events = EventReader::new(
            Duration::from_millis(250), // 4 Hz tick
            Duration::from_millis(33),  // ~30 FPS render
        );

        info!(api_url = %self.dashboard.config().api_url, "TUI event loop started");

        while self.running {
            let Some(event) = events.next().await else {
                break;
            };

            match event {
                Event::Key(key) => {
                    if let Some(action) = self.handle_key_event(key)? {
                        self.action_tx.send(action)?;
                    }
                }
                Event::Resize(w, h) => self.action_tx.send(Action::Resize(w, h))?,
                Event::Tick => self.action_tx.send(Action::Tick)?,
                Event::Render => self.action_tx.send(Action::Render)?,
            }

            while let Ok(action) = self.action_rx.try_recv() {
                self.process_action(&action)?;

                if let Action::Render = action {
                    tui.draw(|frame| self.render(frame))?;
                }
            }
        }

        if let Some(feed) = self.live.take() {
            feed.stop();
        }
        events.stop();
        info!("TUI event loop ended");
        Ok(())
    }

    /// Map a key event to an action. Global keys first, then the focused pane.
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.help_visible {
            return match key.code {
                KeyCode::Esc | KeyCode::Char('?') => Ok(Some(Action::ToggleHelp)),
                _ => Ok(None),
            };
        }

        match (key.modifiers, key.code) {
            (KeyModifiers::CONTROL, KeyCode::Char('c'))
            | (KeyModifiers::NONE, KeyCode::Char('q')) => return Ok(Some(Action::Quit)),
            (KeyModifiers::NONE, KeyCode::Char('?')) => return Ok(Some(Action::ToggleHelp)),
            (KeyModifiers::NONE, KeyCode::Tab) | (KeyModifiers::SHIFT, KeyCode::BackTab) => {
                return Ok(Some(Action::ToggleFocus));
            }
            _ => {}
        }

        match self.focus {
            Focus::Sidebar => Ok(self.handle_sidebar_key(key)),
            Focus::Content => {
                if key.code == KeyCode::Esc {
                    return Ok(Some(Action::ToggleFocus));
                }
                let active = self.active_screen();
                match self.screens.get_mut(&active) {
                    Some(screen) => screen.handle_key_event(key),
                    None => Ok(None),
                }
            }
        }
    }

    fn handle_sidebar_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                self.sidebar.move_down(&self.view);
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.sidebar.move_up();
                None
            }
            KeyCode::Enter | KeyCode::Char(' ' | 'l') | KeyCode::Right => self
                .sidebar
                .selected(&self.view)
                .map(|entry| Action::Navigate(entry.navigation())),
            _ => None,
        }
    }

    /// Process a single action: update app state and propagate to screens.
    fn process_action(&mut self, action: &Action) -> Result<()> {
        match action {
            Action::Quit => self.running = false,

            Action::Resize(w, h) => debug!(width = w, height = h, "terminal resized"),

            Action::Render => {}

            Action::Tick => {
                if let Some((_, shown_at)) = self.notification {
                    if shown_at.elapsed() >= NOTIFICATION_TTL {
                        self.notification = None;
                    }
                }
                self.broadcast(action)?;
            }

            Action::ToggleHelp => self.help_visible = !self.help_visible,

            Action::ToggleFocus => self.set_focus(match self.focus {
                Focus::Sidebar => Focus::Content,
                Focus::Content => Focus::Sidebar,
            }),

            Action::Navigate(nav) => self.navigate(*nav)?,

            Action::RefreshOverview => {
                data_bridge::load_overview(self.dashboard.clone(), self.action_tx.clone());
                self.broadcast(action)?;
            }

            Action::LiveUpdated(state) => {
                if self.view.selected_category() == Some(state.category) {
                    self.live_status = Some(state.status.clone());
                }
                self.broadcast(action)?;
            }

            Action::SelectReportDevice(device_id) => {
                self.report_selection = None;
                self.last_report = None;
                self.report_guard.invalidate();
                data_bridge::load_sensors(
                    self.dashboard.clone(),
                    device_id.clone(),
                    self.action_tx.clone(),
                );
                self.broadcast(action)?;
            }

            Action::SelectReportSensor {
                device_id,
                sensor_id,
            } => {
                self.report_selection = Some((device_id.clone(), sensor_id.clone()));
                self.request_report();
                self.broadcast(action)?;
            }

            Action::ReportLoaded(data) => {
                if self.report_guard.try_commit(data.generation) {
                    self.last_report = Some(data.clone());
                    self.broadcast(action)?;
                } else {
                    debug!(generation = data.generation, "discarding stale report");
                }
            }

            Action::ExportReport => self.export_report(),

            Action::Notify(n) => {
                self.notification = Some((n.clone(), Instant::now()));
            }

            other => self.broadcast(other)?,
        }
        Ok(())
    }

    /// Deliver an action to every screen; follow-ups go back on the queue.
    fn broadcast(&mut self, action: &Action) -> Result<()> {
        for screen in self.screens.values_mut() {
            if let Some(follow_up) = screen.update(action)? {
                self.action_tx.send(follow_up)?;
            }
        }
        Ok(())
    }

    fn set_focus(&mut self, focus: Focus) {
        self.focus = focus;
        let active = self.active_screen();
        for (id, screen) in &mut self.screens {
            screen.set_focused(focus == Focus::Content && *id == active);
        }
    }

    fn navigate(&mut self, nav: Navigation) -> Result<()> {
        let previous = self.view;
        self.view = reduce(previous, nav);
        debug!(?nav, page = ?self.view.page, "navigate");

        let anchor = match nav {
            Navigation::SelectWelcome => SidebarEntry::Overview,
            Navigation::SelectSensor(c) => SidebarEntry::Category(c),
            Navigation::SelectReport(p) => SidebarEntry::Period(p),
            Navigation::ToggleReports => SidebarEntry::ReportsGroup,
        };
        self.sidebar.follow(&self.view, anchor);
        self.set_focus(self.focus);

        self.sync_live();
        self.broadcast(&Action::Navigate(nav))?;

        if previous.page == self.view.page {
            return Ok(());
        }

        match self.view.page {
            Page::Welcome => self.action_tx.send(Action::RefreshOverview)?,
            Page::Reports(_) => {
                if !self.devices_requested {
                    self.devices_requested = true;
                    data_bridge::load_devices(self.dashboard.clone(), self.action_tx.clone());
                }
                self.last_report = None;
                self.request_report();
            }
            Page::Sensors(_) => {}
        }

        if matches!(previous.page, Page::Reports(_))
            && !matches!(self.view.page, Page::Reports(_))
        {
            self.report_guard.invalidate();
        }
        Ok(())
    }

    /// Run the live poller only while a category page is showing.
    fn sync_live(&mut self) {
        match self.view.page {
            Page::Sensors(category) => {
                if let Some(ref feed) = self.live {
                    if feed.poller.category() != category {
                        self.live_status = Some(PollStatus::Loading);
                        feed.poller.set_category(category);
                    }
                    return;
                }

                let poller = self.dashboard.poll_live(category);
                let bridge_cancel = CancellationToken::new();
                tokio::spawn(data_bridge::spawn_live_bridge(
                    poller.subscribe(),
                    self.action_tx.clone(),
                    bridge_cancel.clone(),
                ));
                self.live_status = Some(PollStatus::Loading);
                self.live = Some(LiveFeed {
                    poller,
                    bridge_cancel,
                });
            }
            Page::Welcome | Page::Reports(_) => {
                if let Some(feed) = self.live.take() {
                    debug!("stopping live poller");
                    feed.stop();
                }
                self.live_status = None;
            }
        }
    }

    /// Fetch the report for the current selection and period, if any.
    fn request_report(&mut self) {
        let (Some(period), Some((device_id, sensor_id))) =
            (self.view.selected_period(), self.report_selection.clone())
        else {
            return;
        };
        self.last_report = None;
        data_bridge::load_report(
            self.dashboard.clone(),
            ReportRequest {
                device_id,
                sensor_id,
                period,
            },
            Arc::clone(&self.report_guard),
            self.action_tx.clone(),
        );
    }

    fn export_report(&mut self) {
        let Some(data) = self.last_report.clone() else {
            self.notification = Some((
                Notification::warning("No report loaded to export"),
                Instant::now(),
            ));
            return;
        };
        if data.rows.is_empty() {
            self.notification = Some((
                Notification::warning("Report has no rows to export"),
                Instant::now(),
            ));
            return;
        }

        let path = self.export_dir.join(export_file_name(
            data.period,
            &data.device_id,
            &data.sensor_id,
        ));
        self.notification = Some((
            Notification::info(format!("Writing {}\u{2026}", path.display())),
            Instant::now(),
        ));
        let tx = self.action_tx.clone();
        tokio::task::spawn_blocking(move || {
            let records = to_export_rows(&data.rows, data.period);
            let notification = match write_workbook(&records, &path) {
                Ok(()) => Notification::success(format!("Exported {}", path.display())),
                Err(e) => {
                    warn!(error = %e, path = %path.display(), "export failed");
                    Notification::error(format!("Export failed: {e}"))
                }
            };
            let _ = tx.send(Action::Notify(notification));
        });
    }

    // ── Rendering ────────────────────────────────────────────────────

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let [main_area, status_area] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(area);
        let [sidebar_area, content_area] =
            Layout::horizontal([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(1)])
                .areas(main_area);

        self.sidebar
            .render(frame, sidebar_area, &self.view, self.focus == Focus::Sidebar);

        if let Some(screen) = self.screens.get(&self.active_screen()) {
            screen.render(frame, content_area);
        }

        self.render_status_bar(frame, status_area);

        if let Some((ref notif, _)) = self.notification {
            render_notification(frame, area, notif);
        }

        if self.help_visible {
            render_help_overlay(frame, area);
        }
    }

    /// Bottom status bar: live feed health, API endpoint, key hints.
    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![Span::raw(" ")];

        match self.live_status {
            Some(PollStatus::Live) => spans.push(Span::styled(
                "● live",
                Style::default().fg(theme::SUCCESS_GREEN),
            )),
            Some(PollStatus::Loading) => spans.push(Span::styled(
                "◐ loading",
                Style::default().fg(theme::AMBER),
            )),
            Some(PollStatus::Stale { .. }) => spans.push(Span::styled(
                "○ stale",
                Style::default().fg(theme::ERROR_RED),
            )),
            None => spans.push(Span::styled("○ idle", theme::muted())),
        }

        spans.push(Span::styled(
            format!("  {}", self.dashboard.config().api_url),
            theme::muted(),
        ));
        spans.push(Span::styled(" │", theme::key_hint()));

        let hints: &[(&str, &str)] = match self.focus {
            Focus::Sidebar => &[("j/k", "move"), ("enter", "open")],
            Focus::Content => self
                .screens
                .get(&self.active_screen())
                .map(|s| s.hints())
                .unwrap_or_default(),
        };
        for (key, label) in hints
            .iter()
            .chain(&[("tab", "focus"), ("?", "help"), ("q", "quit")])
        {
            spans.push(Span::styled(format!(" {key}"), theme::key_hint_key()));
            spans.push(Span::styled(format!(" {label}"), theme::key_hint()));
        }

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}

fn render_notification(frame: &mut Frame, area: Rect, notif: &Notification) {
    let msg_len = u16::try_from(notif.message.chars().count()).unwrap_or(u16::MAX);
    let width = msg_len.saturating_add(6).clamp(20, 70).min(area.width);
    let height = 3u16;

    let x = area.width.saturating_sub(width + 1);
    let y = area.height.saturating_sub(height + 2); // above status bar
    let toast_area = Rect::new(area.x + x, area.y + y, width, height);

    let (border_color, icon) = match notif.level {
        NotificationLevel::Success => (theme::SUCCESS_GREEN, "✓"),
        NotificationLevel::Error => (theme::ERROR_RED, "✗"),
        NotificationLevel::Warning => (theme::AMBER, "!"),
        NotificationLevel::Info => (theme::ACCENT, "·"),
    };

    frame.render_widget(Clear, toast_area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border_color))
        .style(Style::default().bg(theme::BG_DARK));

    let line = Line::from(vec![
        Span::styled(format!(" {icon} "), Style::default().fg(border_color)),
        Span::styled(notif.message.as_str(), Style::default().fg(theme::DIM_WHITE)),
    ]);
    frame.render_widget(Paragraph::new(line).block(block), toast_area);
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let help_width = 52u16.min(area.width.saturating_sub(4));
    let help_height = 19u16.min(area.height.saturating_sub(4));
    let x = (area.width.saturating_sub(help_width)) / 2;
    let y = (area.height.saturating_sub(help_height)) / 2;
    let help_area = Rect::new(area.x + x, area.y + y, help_width, help_height);

    frame.render_widget(Clear, help_area);
    let block = Block::default()
        .title(" Keyboard Shortcuts ")
        .title_style(theme::title_style())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border_focused())
        .style(Style::default().bg(theme::BG_DARK));

    let key = |k: &'static str, what: &'static str| {
        Line::from(vec![
            Span::styled(format!("  {k:<10}"), theme::key_hint_key()),
            Span::styled(what, theme::key_hint()),
        ])
    };
    let heading = |text: &'static str| {
        Line::from(Span::styled(
            format!("  {text}"),
            Style::default().fg(theme::TEAL),
        ))
    };

    let help_text = vec![
        Line::default(),
        heading("Navigation"),
        key("j/k ↑/↓", "Move in sidebar"),
        key("Enter", "Open page / expand reports"),
        key("Tab", "Switch sidebar / content"),
        key("Esc", "Back to sidebar"),
        Line::default(),
        heading("Reports"),
        key("h/l ←/→", "Previous / next device"),
        key("j/k ↑/↓", "Previous / next sensor"),
        key("[ ]", "Previous / next period"),
        key("x", "Export to spreadsheet"),
        key("r", "Reload"),
        Line::default(),
        heading("Global"),
        key("?", "This help"),
        key("q", "Quit"),
    ];

    frame.render_widget(Paragraph::new(help_text).block(block), help_area);
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use pretty_assertions::assert_eq;
    use sensorium_core::{DashboardConfig, ReportPeriod, SensorCategory};

    use super::*;

    fn app() -> App {
        let dashboard = Dashboard::new(DashboardConfig {
            api_url: "http://127.0.0.1:9".into(),
            ..DashboardConfig::default()
        })
        .unwrap();
        App::new(dashboard, std::env::temp_dir())
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::from(code)
    }

    #[tokio::test]
    async fn poller_runs_only_on_category_pages() {
        let mut app = app();
        app.process_action(&Action::Navigate(Navigation::SelectSensor(
            SensorCategory::Power,
        )))
        .unwrap();
        let feed = app.live.as_ref().unwrap();
        assert_eq!(feed.poller.category(), SensorCategory::Power);

        app.process_action(&Action::Navigate(Navigation::SelectSensor(
            SensorCategory::Digital,
        )))
        .unwrap();
        assert_eq!(
            app.live.as_ref().unwrap().poller.category(),
            SensorCategory::Digital
        );

        app.process_action(&Action::Navigate(Navigation::SelectWelcome))
            .unwrap();
        assert!(app.live.is_none());
        assert_eq!(app.active_screen(), ScreenId::Overview);
    }

    #[tokio::test]
    async fn superseded_report_is_not_committed() {
        let mut app = app();
        let older = app.report_guard.issue();
        let newer = app.report_guard.issue();

        let data = |generation| ReportData {
            generation,
            device_id: "D1".into(),
            sensor_id: "S1".into(),
            period: ReportPeriod::Daily,
            rows: Arc::new(Vec::new()),
        };

        app.process_action(&Action::ReportLoaded(data(newer)))
            .unwrap();
        assert_eq!(app.last_report.as_ref().map(|d| d.generation), Some(newer));

        app.process_action(&Action::ReportLoaded(data(older)))
            .unwrap();
        assert_eq!(app.last_report.as_ref().map(|d| d.generation), Some(newer));
    }

    #[tokio::test]
    async fn exporting_without_rows_warns() {
        let mut app = app();
        app.process_action(&Action::ExportReport).unwrap();
        let (notif, _) = app.notification.as_ref().unwrap();
        assert_eq!(notif.level, NotificationLevel::Warning);
    }

    #[tokio::test]
    async fn sidebar_enter_navigates_to_selected_entry() {
        let mut app = app();
        app.handle_key_event(key(KeyCode::Down)).unwrap();
        let action = app.handle_key_event(key(KeyCode::Enter)).unwrap();
        assert!(matches!(
            action,
            Some(Action::Navigate(Navigation::SelectSensor(SensorCategory::Digital)))
        ));
    }

    #[tokio::test]
    async fn help_overlay_swallows_keys() {
        let mut app = app();
        app.process_action(&Action::ToggleHelp).unwrap();
        assert!(app.handle_key_event(key(KeyCode::Char('q'))).unwrap().is_none());
        assert!(matches!(
            app.handle_key_event(key(KeyCode::Esc)).unwrap(),
            Some(Action::ToggleHelp)
        ));
    }

    #[tokio::test]
    async fn opening_reports_follows_the_cursor() {
        let mut app = app();
        app.process_action(&Action::Navigate(Navigation::SelectReport(
            ReportPeriod::Weekly,
        )))
        .unwrap();
        assert!(app.view.reports_open);
        assert_eq!(
            app.sidebar.selected(&app.view),
            Some(SidebarEntry::Period(ReportPeriod::Weekly))
        );
        assert!(app.devices_requested);
    }
}
