use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{App, AppMode};
use crate::runtime::EventResult;
use crate::runtime::mode::is_control_char_key;

/// Handles key input while the app is in `AppMode::Editing`.
pub(crate) fn handle(app: &mut App, key: KeyEvent) -> EventResult {
    match key.code {
        KeyCode::Enter => {
            let mode = std::mem::replace(&mut app.mode, AppMode::Normal);
            if let AppMode::Editing { draft } = mode {
                app.commit_edit(&draft);
            } else {
                app.mode = mode;
            }
        }
        KeyCode::Esc => app.cancel_edit(),
        _ => {
            if let AppMode::Editing { draft } = &mut app.mode {
                edit_draft(draft, key);
            }
        }
    }

    EventResult::Continue
}

fn edit_draft(draft: &mut String, key: KeyEvent) {
    if is_control_char_key(key, 'u') {
        draft.clear();

        return;
    }

    match key.code {
        KeyCode::Backspace => {
            draft.pop();
        }
        KeyCode::Char(character)
            if !key
                .modifiers
                .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
        {
            draft.push(character);
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::Tab;
    use crate::domain::FieldId;
    use crate::runtime::mode::test_support::new_test_app;

    fn type_text(app: &mut App, text: &str) {
        for character in text.chars() {
            handle(app, KeyEvent::new(KeyCode::Char(character), KeyModifiers::NONE));
        }
    }

    #[test]
    fn test_handle_enter_commits_typed_value() {
        // Arrange
        let mut app = new_test_app();
        app.tabs.set(Tab::Android);
        app.focus_next();
        app.focus_next();
        app.activate_focused();

        // Act
        type_text(&mut app, "R58M3");
        handle(&mut app, KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));

        // Assert
        assert_eq!(app.mode, AppMode::Normal);
        assert_eq!(app.current_state().form.text(FieldId::Serial), "R58M3");
    }

    #[test]
    fn test_handle_backspace_and_ctrl_u_edit_draft() {
        // Arrange
        let mut app = new_test_app();
        app.mode = AppMode::Editing {
            draft: String::new(),
        };
        type_text(&mut app, "abc");

        // Act
        handle(&mut app, KeyEvent::new(KeyCode::Backspace, KeyModifiers::NONE));
        let after_backspace = app.mode.clone();
        handle(&mut app, KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL));

        // Assert
        assert_eq!(
            after_backspace,
            AppMode::Editing {
                draft: "ab".to_string()
            }
        );
        assert_eq!(
            app.mode,
            AppMode::Editing {
                draft: String::new()
            }
        );
    }

    #[test]
    fn test_handle_esc_discards_draft() {
        // Arrange
        let mut app = new_test_app();
        app.activate_focused();
        type_text(&mut app, "/tmp/backup");

        // Act
        handle(&mut app, KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE));

        // Assert
        assert_eq!(app.mode, AppMode::Normal);
        assert_eq!(app.current_state().form.text(FieldId::BackupPath), "");
    }
}
