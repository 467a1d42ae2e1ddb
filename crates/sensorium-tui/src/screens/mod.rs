//! Screen implementations. Each screen is a top-level Component.

pub mod live;
pub mod overview;
pub mod reports;

use crate::component::Component;
use crate::screen::ScreenId;

/// Create one component per content screen.
pub fn create_screens() -> Vec<(ScreenId, Box<dyn Component>)> {
    vec![
        (ScreenId::Overview, Box::new(overview::OverviewScreen::new())),
        (ScreenId::Live, Box::new(live::LiveScreen::new())),
        (ScreenId::Reports, Box::new(reports::ReportsScreen::new())),
    ]
}
