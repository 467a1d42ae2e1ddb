//! Navigation sidebar: overview, the six live categories, and the
//! collapsible reports group.

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem, ListState},
};
use strum::IntoEnumIterator;

use sensorium_core::{Navigation, Page, ReportPeriod, SensorCategory, ViewState};

use crate::theme;

/// One row in the sidebar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SidebarEntry {
    Overview,
    Category(SensorCategory),
    ReportsGroup,
    Period(ReportPeriod),
}

impl SidebarEntry {
    pub fn label(self) -> &'static str {
        match self {
            Self::Overview => "Dashboard Overview",
            Self::Category(category) => category.label(),
            Self::ReportsGroup => "Reports",
            Self::Period(period) => period.label(),
        }
    }

    /// The navigation action selecting this entry dispatches.
    pub fn navigation(self) -> Navigation {
        match self {
            Self::Overview => Navigation::SelectWelcome,
            Self::Category(category) => Navigation::SelectSensor(category),
            Self::ReportsGroup => Navigation::ToggleReports,
            Self::Period(period) => Navigation::SelectReport(period),
        }
    }

    /// Whether this entry is the page currently showing.
    pub fn is_active(self, view: &ViewState) -> bool {
        match (self, view.page) {
            (Self::Overview, Page::Welcome) => true,
            (Self::Category(c), Page::Sensors(active)) => c == active,
            (Self::ReportsGroup, Page::Reports(_)) => !view.reports_open,
            (Self::Period(p), Page::Reports(active)) => p == active,
            _ => false,
        }
    }
}

/// Visible entries for `view`. Periods only appear while reports are open.
pub fn entries(view: &ViewState) -> Vec<SidebarEntry> {
    let mut out = vec![SidebarEntry::Overview];
    out.extend(SensorCategory::iter().map(SidebarEntry::Category));
    out.push(SidebarEntry::ReportsGroup);
    if view.reports_open {
        out.extend(ReportPeriod::iter().map(SidebarEntry::Period));
    }
    out
}

/// Cursor over the visible entries.
#[derive(Debug, Default)]
pub struct Sidebar {
    cursor: usize,
}

impl Sidebar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn move_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_down(&mut self, view: &ViewState) {
        let last = entries(view).len().saturating_sub(1);
        self.cursor = (self.cursor + 1).min(last);
    }

    pub fn selected(&self, view: &ViewState) -> Option<SidebarEntry> {
        entries(view).get(self.cursor).copied()
    }

    /// Keep the cursor on `entry` after the entry list changes shape.
    pub fn follow(&mut self, view: &ViewState, entry: SidebarEntry) {
        let list = entries(view);
        self.cursor = list
            .iter()
            .position(|e| *e == entry)
            .unwrap_or_else(|| self.cursor.min(list.len().saturating_sub(1)));
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, view: &ViewState, focused: bool) {
        let block = Block::default()
            .title(" Sensorium ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border(focused));

        let items: Vec<ListItem> = entries(view)
            .into_iter()
            .map(|entry| ListItem::new(entry_line(entry, view)))
            .collect();

        let highlight = if focused {
            theme::selected()
        } else {
            ratatui::style::Style::default()
        };
        let list = List::new(items).block(block).highlight_style(highlight);
        let mut state = ListState::default().with_selected(Some(self.cursor()));
        frame.render_stateful_widget(list, area, &mut state);
    }
}

fn entry_line(entry: SidebarEntry, view: &ViewState) -> Line<'static> {
    let active = entry.is_active(view);
    let style = if active {
        theme::active_entry()
    } else {
        theme::inactive_entry()
    };
    let marker = match entry {
        SidebarEntry::ReportsGroup if view.reports_open => "▾ ",
        SidebarEntry::ReportsGroup => "▸ ",
        SidebarEntry::Period(_) if active => "  ● ",
        SidebarEntry::Period(_) => "    ",
        _ if active => "● ",
        _ => "  ",
    };
    Line::from(vec![
        Span::styled(marker, style),
        Span::styled(entry.label(), style),
    ])
}
