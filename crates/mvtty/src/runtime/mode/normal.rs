use crossterm::event::{KeyCode, KeyEvent};

use crate::app::App;
use crate::runtime::EventResult;
use crate::runtime::mode::{is_control_char_key, is_plain_char_key, is_shift_char_key};

const CONSOLE_PAGE_ROWS: u16 = 10;

/// Handles key input while the app is in `AppMode::Normal`.
pub(crate) fn handle(app: &mut App, key: KeyEvent) -> EventResult {
    if is_control_char_key(key, 'o') {
        app.open_path_picker();

        return EventResult::Continue;
    }

    match key.code {
        KeyCode::Char('q') if is_plain_char_key(key, 'q') => return EventResult::Quit,
        KeyCode::Tab | KeyCode::Right => app.next_tab(),
        KeyCode::BackTab | KeyCode::Left => app.previous_tab(),
        KeyCode::Down | KeyCode::Char('j')
            if key.code == KeyCode::Down || is_plain_char_key(key, 'j') =>
        {
            app.focus_next();
        }
        KeyCode::Up | KeyCode::Char('k')
            if key.code == KeyCode::Up || is_plain_char_key(key, 'k') =>
        {
            app.focus_previous();
        }
        KeyCode::Enter | KeyCode::Char(' ') => app.activate_focused(),
        KeyCode::Char('o') if is_plain_char_key(key, 'o') => {
            app.open_path_picker();
        }
        KeyCode::Char('s') if is_plain_char_key(key, 's') => app.stop_current_job(),
        KeyCode::Char('c') if is_plain_char_key(key, 'c') => app.clear_console(),
        KeyCode::PageUp => app.scroll_console_up(CONSOLE_PAGE_ROWS),
        KeyCode::PageDown => app.scroll_console_down(CONSOLE_PAGE_ROWS),
        KeyCode::Char('K' | 'k') if is_shift_char_key(key, 'k') => app.scroll_console_up(1),
        KeyCode::Char('J' | 'j') if is_shift_char_key(key, 'j') => app.scroll_console_down(1),
        KeyCode::End | KeyCode::Char('G' | 'g')
            if key.code == KeyCode::End || is_shift_char_key(key, 'g') =>
        {
            app.follow_console_tail();
        }
        _ => {}
    }

    EventResult::Continue
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyModifiers;

    use super::*;
    use crate::app::{AppMode, Tab};
    use crate::domain::{FieldId, JobLine};
    use crate::runtime::mode::test_support::new_test_app;

    #[test]
    fn test_handle_q_quits() {
        // Arrange
        let mut app = new_test_app();

        // Act
        let event_result = handle(
            &mut app,
            KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE),
        );

        // Assert
        assert_eq!(event_result, EventResult::Quit);
    }

    #[test]
    fn test_handle_tab_and_backtab_cycle_tabs() {
        // Arrange
        let mut app = new_test_app();

        // Act
        handle(&mut app, KeyEvent::new(KeyCode::Tab, KeyModifiers::NONE));
        handle(&mut app, KeyEvent::new(KeyCode::Tab, KeyModifiers::NONE));
        let after_forward = app.current_tab();
        handle(&mut app, KeyEvent::new(KeyCode::BackTab, KeyModifiers::SHIFT));

        // Assert
        assert_eq!(after_forward, Tab::Utilities);
        assert_eq!(app.current_tab(), Tab::Android);
    }

    #[test]
    fn test_handle_enter_on_text_field_starts_editing() {
        // Arrange
        let mut app = new_test_app();
        handle(&mut app, KeyEvent::new(KeyCode::Char('j'), KeyModifiers::NONE));
        handle(&mut app, KeyEvent::new(KeyCode::Char('j'), KeyModifiers::NONE));

        // Act
        handle(&mut app, KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));

        // Assert
        assert_eq!(
            app.current_state().form.focused_field().map(|field| field.id),
            Some(FieldId::Password)
        );
        assert_eq!(
            app.mode,
            AppMode::Editing {
                draft: String::new()
            }
        );
    }

    #[test]
    fn test_handle_o_opens_picker_on_path_field() {
        // Arrange
        let mut app = new_test_app();

        // Act
        handle(&mut app, KeyEvent::new(KeyCode::Char('o'), KeyModifiers::NONE));

        // Assert
        assert!(matches!(
            app.mode,
            AppMode::PathPicker(ref picker) if picker.field() == FieldId::BackupPath
        ));
    }

    #[test]
    fn test_handle_c_clears_console() {
        // Arrange
        let mut app = new_test_app();
        app.current_state_mut()
            .console
            .push(JobLine::output("leftover"), time::UtcOffset::UTC);

        // Act
        handle(&mut app, KeyEvent::new(KeyCode::Char('c'), KeyModifiers::NONE));

        // Assert
        assert!(app.current_state().console.is_empty());
    }

    #[test]
    fn test_handle_page_up_then_end_follows_tail() {
        // Arrange
        let mut app = new_test_app();

        // Act
        handle(&mut app, KeyEvent::new(KeyCode::PageUp, KeyModifiers::NONE));
        let scrolled = app.current_state().console.scroll_offset();
        handle(&mut app, KeyEvent::new(KeyCode::End, KeyModifiers::NONE));

        // Assert
        assert_eq!(scrolled, CONSOLE_PAGE_ROWS);
        assert_eq!(app.current_state().console.scroll_offset(), 0);
    }

    #[test]
    fn test_handle_s_without_job_reports_idle() {
        // Arrange
        let mut app = new_test_app();

        // Act
        handle(&mut app, KeyEvent::new(KeyCode::Char('s'), KeyModifiers::NONE));

        // Assert
        assert_eq!(app.status_message(), "No command is running");
    }
}
