use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent};

use crate::app::{App, AppMode};
use crate::runtime::EventResult;
use crate::runtime::mode::is_plain_char_key;

/// Handles key input while the app is in `AppMode::PathPicker`.
///
/// `Enter` descends into directories and picks files. `s` picks the
/// highlighted entry and `c` picks the directory being browsed.
pub(crate) fn handle(app: &mut App, key: KeyEvent) -> EventResult {
    let AppMode::PathPicker(picker) = &mut app.mode else {
        return EventResult::Continue;
    };

    let mut picked: Option<PathBuf> = None;
    match key.code {
        KeyCode::Esc | KeyCode::Char('q')
            if key.code == KeyCode::Esc || is_plain_char_key(key, 'q') =>
        {
            app.cancel_path_picker();

            return EventResult::Continue;
        }
        KeyCode::Down | KeyCode::Char('j')
            if key.code == KeyCode::Down || is_plain_char_key(key, 'j') =>
        {
            picker.select_next();
        }
        KeyCode::Up | KeyCode::Char('k')
            if key.code == KeyCode::Up || is_plain_char_key(key, 'k') =>
        {
            picker.select_previous();
        }
        KeyCode::Enter | KeyCode::Right | KeyCode::Char('l')
            if key.code != KeyCode::Char('l') || is_plain_char_key(key, 'l') =>
        {
            picked = picker.enter_selected();
        }
        KeyCode::Backspace | KeyCode::Left | KeyCode::Char('h')
            if key.code != KeyCode::Char('h') || is_plain_char_key(key, 'h') =>
        {
            picker.go_parent();
        }
        KeyCode::Char('.') => picker.toggle_hidden(),
        KeyCode::Char('s') if is_plain_char_key(key, 's') => {
            picked = Some(picker.highlighted_path());
        }
        KeyCode::Char('c') if is_plain_char_key(key, 'c') => {
            picked = Some(picker.current_dir().to_path_buf());
        }
        _ => {}
    }

    if let Some(path) = picked {
        let field = picker.field();
        app.apply_picked_path(field, &path);
    }

    EventResult::Continue
}

#[cfg(test)]
mod tests {
    use std::fs;

    use crossterm::event::KeyModifiers;
    use tempfile::tempdir;

    use super::*;
    use crate::app::PathPicker;
    use crate::domain::FieldId;
    use crate::runtime::mode::test_support::new_test_app;

    fn press(app: &mut App, code: KeyCode) {
        handle(app, KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn test_handle_c_picks_current_directory() {
        // Arrange
        let dir = tempdir().expect("failed to create temp dir");
        let mut app = new_test_app();
        app.mode = AppMode::PathPicker(PathPicker::open(FieldId::BackupPath, dir.path(), true));

        // Act
        press(&mut app, KeyCode::Char('c'));

        // Assert
        assert_eq!(app.mode, AppMode::Normal);
        assert_eq!(
            app.current_state().form.text(FieldId::BackupPath),
            dir.path().to_string_lossy()
        );
    }

    #[test]
    fn test_handle_enter_descends_then_s_picks_highlighted() {
        // Arrange
        let dir = tempdir().expect("failed to create temp dir");
        let backup_dir = dir.path().join("backup");
        fs::create_dir(&backup_dir).expect("failed to create backup dir");
        fs::write(backup_dir.join("Manifest.db"), "").expect("failed to write file");
        let mut app = new_test_app();
        app.mode = AppMode::PathPicker(PathPicker::open(FieldId::BackupPath, dir.path(), false));

        // Act
        press(&mut app, KeyCode::Enter);
        let browsing = match &app.mode {
            AppMode::PathPicker(picker) => picker.current_dir().to_path_buf(),
            _ => PathBuf::new(),
        };
        press(&mut app, KeyCode::Char('s'));

        // Assert
        assert_eq!(browsing, backup_dir);
        assert_eq!(
            app.current_state().form.text(FieldId::BackupPath),
            backup_dir.join("Manifest.db").to_string_lossy()
        );
    }

    #[test]
    fn test_handle_esc_keeps_field_unchanged() {
        // Arrange
        let dir = tempdir().expect("failed to create temp dir");
        let mut app = new_test_app();
        app.mode = AppMode::PathPicker(PathPicker::open(FieldId::BackupPath, dir.path(), true));

        // Act
        press(&mut app, KeyCode::Esc);

        // Assert
        assert_eq!(app.mode, AppMode::Normal);
        assert_eq!(app.current_state().form.text(FieldId::BackupPath), "");
    }
}
