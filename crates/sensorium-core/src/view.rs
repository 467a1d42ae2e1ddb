// ── Navigation view state ──
//
// Which page is showing and whether the reports group is expanded. State is
// immutable; every change goes through `reduce`.

use serde::Serialize;

use crate::model::{ReportPeriod, SensorCategory};

/// The page in the main content area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Page {
    #[default]
    Welcome,
    Sensors(SensorCategory),
    Reports(ReportPeriod),
}

/// Navigation state shared by the sidebar and the content area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ViewState {
    pub page: Page,
    pub reports_open: bool,
}

impl ViewState {
    pub fn selected_category(&self) -> Option<SensorCategory> {
        match self.page {
            Page::Sensors(category) => Some(category),
            _ => None,
        }
    }

    pub fn selected_period(&self) -> Option<ReportPeriod> {
        match self.page {
            Page::Reports(period) => Some(period),
            _ => None,
        }
    }
}

/// Navigation actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    SelectSensor(SensorCategory),
    SelectReport(ReportPeriod),
    SelectWelcome,
    ToggleReports,
}

/// Apply a navigation action.
pub fn reduce(state: ViewState, action: Navigation) -> ViewState {
    match action {
        Navigation::SelectSensor(category) => ViewState {
            page: Page::Sensors(category),
            reports_open: false,
        },
        Navigation::SelectReport(period) => ViewState {
            page: Page::Reports(period),
            reports_open: true,
        },
        Navigation::SelectWelcome => ViewState {
            page: Page::Welcome,
            reports_open: false,
        },
        Navigation::ToggleReports => ViewState {
            reports_open: !state.reports_open,
            ..state
        },
    }
}
