//! Palette and semantic styling for the dashboard.

use ratatui::style::{Color, Modifier, Style};

// ── Core Palette ──────────────────────────────────────────────────────

pub const ACCENT: Color = Color::Rgb(94, 176, 255); // #5eb0ff
pub const TEAL: Color = Color::Rgb(72, 219, 196); // #48dbc4
pub const AMBER: Color = Color::Rgb(255, 196, 87); // #ffc457
pub const ROSE: Color = Color::Rgb(255, 110, 140); // #ff6e8c
pub const SUCCESS_GREEN: Color = Color::Rgb(80, 250, 123); // #50fa7b
pub const ERROR_RED: Color = Color::Rgb(255, 99, 99); // #ff6363

// ── Extended Palette ──────────────────────────────────────────────────

pub const DIM_WHITE: Color = Color::Rgb(200, 204, 214); // #c8ccd6
pub const BORDER_GRAY: Color = Color::Rgb(96, 110, 140); // #606e8c
pub const BG_HIGHLIGHT: Color = Color::Rgb(36, 42, 56); // #242a38
pub const BG_DARK: Color = Color::Rgb(24, 27, 36); // #181b24

/// Report chart series colors: temperature, humidity, heat index, dew point.
pub const CHART_SERIES: &[Color] = &[ROSE, ACCENT, AMBER, TEAL];

// ── Semantic Styles ───────────────────────────────────────────────────

/// Title text for blocks/panels.
pub fn title_style() -> Style {
    Style::default().fg(TEAL).add_modifier(Modifier::BOLD)
}

/// Border for a focused panel.
pub fn border_focused() -> Style {
    Style::default().fg(ACCENT)
}

/// Border for an unfocused panel.
pub fn border_default() -> Style {
    Style::default().fg(BORDER_GRAY)
}

/// Border style depending on focus.
pub fn border(focused: bool) -> Style {
    if focused {
        border_focused()
    } else {
        border_default()
    }
}

/// Table header row.
pub fn table_header() -> Style {
    Style::default()
        .fg(TEAL)
        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
}

/// Normal table row text.
pub fn table_row() -> Style {
    Style::default().fg(DIM_WHITE)
}

/// Selected sidebar entry or list row.
pub fn selected() -> Style {
    Style::default()
        .fg(ACCENT)
        .bg(BG_HIGHLIGHT)
        .add_modifier(Modifier::BOLD)
}

/// The page currently shown.
pub fn active_entry() -> Style {
    Style::default().fg(TEAL).add_modifier(Modifier::BOLD)
}

/// Inactive sidebar entry.
pub fn inactive_entry() -> Style {
    Style::default().fg(DIM_WHITE)
}

/// Big numbers on the overview.
pub fn metric_value() -> Style {
    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
}

/// Secondary labels and empty-state text.
pub fn muted() -> Style {
    Style::default().fg(BORDER_GRAY)
}

/// On / connected indicator.
pub fn indicator(on: bool) -> Style {
    Style::default()
        .fg(if on { SUCCESS_GREEN } else { ERROR_RED })
        .add_modifier(Modifier::BOLD)
}

/// Key hint text (e.g., "q quit  ? help").
pub fn key_hint() -> Style {
    Style::default().fg(BORDER_GRAY)
}

/// Key hint key character.
pub fn key_hint_key() -> Style {
    Style::default().fg(TEAL).add_modifier(Modifier::BOLD)
}
