//! Rendering: components draw fixed widgets, pages draw a tab body.

use ratatui::Frame;
use ratatui::layout::Rect;

use crate::app::App;

pub mod components;
pub mod pages;
pub mod router;
pub mod style;
pub mod text_util;

/// A widget drawn into a fixed area.
pub trait Component {
    fn render(&self, f: &mut Frame, area: Rect);
}

/// A full tab body.
pub trait Page {
    fn render(&mut self, f: &mut Frame, area: Rect);
}

/// Draws the whole screen for the current app state.
pub fn render(f: &mut Frame, app: &App) {
    let area = f.area();

    router::route_frame(f, area, app);
}
