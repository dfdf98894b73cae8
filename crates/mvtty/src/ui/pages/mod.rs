//! Tab bodies: a form panel above the tab console.

use ratatui::layout::{Constraint, Layout, Rect};

pub mod analysis;
pub mod report;
pub mod utilities;

/// Minimum console rows kept below the form.
const MIN_CONSOLE_HEIGHT: u16 = 6;

/// Splits `area` into a top panel of `top_height` rows and the console,
/// shrinking the panel before the console drops below its minimum.
fn split_panel_and_console(area: Rect, top_height: u16) -> (Rect, Rect) {
    let top_height = top_height.min(area.height.saturating_sub(MIN_CONSOLE_HEIGHT));
    let [top, console] =
        Layout::vertical([Constraint::Length(top_height), Constraint::Min(0)]).areas(area);

    (top, console)
}
