use crate::app::picker::PathPicker;

/// Interaction mode deciding how keys are routed and which overlay renders.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum AppMode {
    /// Navigating tabs, fields and actions.
    Normal,
    /// Typing into the focused field. `draft` is committed on `Enter`.
    Editing { draft: String },
    /// Browsing the filesystem for the focused path field.
    PathPicker(PathPicker),
    /// Modal message dismissed with `Enter` or `Esc`.
    Message { title: String, message: String },
}
