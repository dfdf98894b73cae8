use crossterm::event::{KeyCode, KeyEvent};

use crate::app::App;
use crate::runtime::EventResult;

/// Handles key input while the app is in `AppMode::Message`.
pub(crate) fn handle(app: &mut App, key: KeyEvent) -> EventResult {
    if matches!(
        key.code,
        KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ' | 'q')
    ) {
        app.dismiss_message();
    }

    EventResult::Continue
}
