//! Screen identifier enum.

use std::fmt;

use sensorium_core::Page;

/// Identifies each content screen. One screen serves every page of its kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ScreenId {
    #[default]
    Overview,
    Live,
    Reports,
}

impl ScreenId {
    /// The screen that renders `page`.
    pub fn for_page(page: Page) -> Self {
        match page {
            Page::Welcome => Self::Overview,
            Page::Sensors(_) => Self::Live,
            Page::Reports(_) => Self::Reports,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Overview => "Overview",
            Self::Live => "Live",
            Self::Reports => "Reports",
        }
    }
}

impl fmt::Display for ScreenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
