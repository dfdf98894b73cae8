//! Form fields and focus handling for the tab panels.

use crate::domain::command::{Action, AndroidAction, IosAction, UtilityAction};

/// Identifies a form field independent of its position.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum FieldId {
    BackupPath,
    TargetPath,
    OutputPath,
    Serial,
    Password,
    AllApks,
    NonInteractive,
    ScanDir,
    DeviceType,
    FileName,
}

/// Device type choices offered on the report form.
pub const DEVICE_TYPE_OPTIONS: &[&str] = &["Auto", "iOS", "Android"];

/// Input behavior of one form field.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum FieldKind {
    Text,
    /// Text rendered masked.
    Secret,
    /// Text filled in by hand or through the path picker.
    Path { directory: bool },
    Toggle { checked: bool },
    Choice {
        options: &'static [&'static str],
        selected: usize,
    },
}

/// One labelled input on a form.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Field {
    pub id: FieldId,
    pub label: &'static str,
    pub placeholder: &'static str,
    pub kind: FieldKind,
    pub value: String,
}

impl Field {
    fn new(id: FieldId, label: &'static str, placeholder: &'static str, kind: FieldKind) -> Self {
        Self {
            id,
            label,
            placeholder,
            kind,
            value: String::new(),
        }
    }

    /// Returns whether the field accepts typed text.
    pub fn is_text_input(&self) -> bool {
        matches!(
            self.kind,
            FieldKind::Text | FieldKind::Secret | FieldKind::Path { .. }
        )
    }

    /// Returns whether the path picker can fill this field.
    pub fn is_path(&self) -> bool {
        matches!(self.kind, FieldKind::Path { .. })
    }

    /// Returns the value rendered in the form, masking secrets.
    pub fn display_value(&self) -> String {
        match &self.kind {
            FieldKind::Secret => "*".repeat(self.value.chars().count()),
            FieldKind::Toggle { checked } => {
                if *checked {
                    "[x]".to_string()
                } else {
                    "[ ]".to_string()
                }
            }
            FieldKind::Choice { options, selected } => options
                .get(*selected)
                .map_or_else(String::new, |option| format!("< {option} >")),
            FieldKind::Text | FieldKind::Path { .. } => self.value.clone(),
        }
    }

    /// Flips a toggle or advances a choice; other kinds are left unchanged.
    pub fn activate(&mut self) {
        match &mut self.kind {
            FieldKind::Toggle { checked } => *checked = !*checked,
            FieldKind::Choice { options, selected } => {
                *selected = (*selected + 1) % options.len().max(1);
            }
            FieldKind::Text | FieldKind::Secret | FieldKind::Path { .. } => {}
        }
    }
}

/// Focus position inside a form: fields come first, then actions.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Focus {
    Field(usize),
    Action(usize),
}

/// Fields and action buttons shown on one tab.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Form {
    fields: Vec<Field>,
    actions: Vec<Action>,
    focus: Focus,
}

impl Form {
    fn new(fields: Vec<Field>, actions: Vec<Action>) -> Self {
        let focus = if fields.is_empty() {
            Focus::Action(0)
        } else {
            Focus::Field(0)
        };

        Self {
            fields,
            actions,
            focus,
        }
    }

    /// iOS backup and filesystem analysis form.
    pub fn ios() -> Self {
        Self::new(
            vec![
                Field::new(
                    FieldId::BackupPath,
                    "Backup Path",
                    "Select iOS backup directory...",
                    FieldKind::Path { directory: true },
                ),
                Field::new(
                    FieldId::OutputPath,
                    "Output Path",
                    "Select output directory...",
                    FieldKind::Path { directory: true },
                ),
                Field::new(
                    FieldId::Password,
                    "Backup Password",
                    "Enter backup password (if encrypted)",
                    FieldKind::Secret,
                ),
            ],
            IosAction::ALL.into_iter().map(Action::Ios).collect(),
        )
    }

    /// Android device and artifact analysis form.
    pub fn android() -> Self {
        Self::new(
            vec![
                Field::new(
                    FieldId::TargetPath,
                    "Target Path",
                    "Select target directory or file...",
                    FieldKind::Path { directory: false },
                ),
                Field::new(
                    FieldId::OutputPath,
                    "Output Path",
                    "Select output directory...",
                    FieldKind::Path { directory: true },
                ),
                Field::new(
                    FieldId::Serial,
                    "Device Serial",
                    "Device serial number (optional)",
                    FieldKind::Text,
                ),
                Field::new(
                    FieldId::Password,
                    "Backup Password",
                    "Enter backup password (if required)",
                    FieldKind::Secret,
                ),
                Field::new(
                    FieldId::AllApks,
                    "Download All APKs",
                    "",
                    FieldKind::Toggle { checked: false },
                ),
                Field::new(
                    FieldId::NonInteractive,
                    "Non-interactive Mode",
                    "",
                    FieldKind::Toggle { checked: false },
                ),
            ],
            AndroidAction::ALL.into_iter().map(Action::Android).collect(),
        )
    }

    /// Utilities form: actions only.
    pub fn utilities() -> Self {
        Self::new(
            Vec::new(),
            UtilityAction::ALL.into_iter().map(Action::Utility).collect(),
        )
    }

    /// PDF report form.
    pub fn report() -> Self {
        Self::new(
            vec![
                Field::new(
                    FieldId::ScanDir,
                    "Results Directory",
                    "Select the MVT output directory...",
                    FieldKind::Path { directory: true },
                ),
                Field::new(
                    FieldId::DeviceType,
                    "Device Type",
                    "",
                    FieldKind::Choice {
                        options: DEVICE_TYPE_OPTIONS,
                        selected: 0,
                    },
                ),
                Field::new(
                    FieldId::FileName,
                    "Report File Name",
                    "Leave empty for a timestamped name",
                    FieldKind::Text,
                ),
            ],
            vec![Action::GenerateReport],
        )
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn field(&self, id: FieldId) -> Option<&Field> {
        self.fields.iter().find(|field| field.id == id)
    }

    pub fn field_mut(&mut self, id: FieldId) -> Option<&mut Field> {
        self.fields.iter_mut().find(|field| field.id == id)
    }

    /// Returns the trimmed text of a field, empty when absent.
    pub fn text(&self, id: FieldId) -> &str {
        self.field(id).map_or("", |field| field.value.trim())
    }

    /// Returns the untrimmed text of a field, or `""` when it is blank.
    /// Secrets keep surrounding spaces.
    pub fn raw_text(&self, id: FieldId) -> &str {
        match self.field(id) {
            Some(field) if !field.value.trim().is_empty() => &field.value,
            _ => "",
        }
    }

    /// Returns whether a toggle field is checked.
    pub fn is_checked(&self, id: FieldId) -> bool {
        self.field(id)
            .is_some_and(|field| matches!(field.kind, FieldKind::Toggle { checked: true }))
    }

    /// Returns the selected option of a choice field.
    pub fn choice(&self, id: FieldId) -> Option<&'static str> {
        match self.field(id)?.kind {
            FieldKind::Choice { options, selected } => options.get(selected).copied(),
            _ => None,
        }
    }

    pub fn set_text(&mut self, id: FieldId, value: &str) {
        if let Some(field) = self.field_mut(id) {
            field.value = value.to_string();
        }
    }

    pub fn set_checked(&mut self, id: FieldId, value: bool) {
        if let Some(field) = self.field_mut(id)
            && let FieldKind::Toggle { checked } = &mut field.kind
        {
            *checked = value;
        }
    }

    fn focus_slots(&self) -> usize {
        self.fields.len() + self.actions.len()
    }

    fn focus_index(&self) -> usize {
        match self.focus {
            Focus::Field(index) => index,
            Focus::Action(index) => self.fields.len() + index,
        }
    }

    fn set_focus_index(&mut self, index: usize) {
        self.focus = if index < self.fields.len() {
            Focus::Field(index)
        } else {
            Focus::Action(index - self.fields.len())
        };
    }

    /// Moves focus down, wrapping from the last action to the first field.
    pub fn focus_next(&mut self) {
        let slots = self.focus_slots();
        if slots == 0 {
            return;
        }

        self.set_focus_index((self.focus_index() + 1) % slots);
    }

    /// Moves focus up, wrapping from the first field to the last action.
    pub fn focus_previous(&mut self) {
        let slots = self.focus_slots();
        if slots == 0 {
            return;
        }

        self.set_focus_index((self.focus_index() + slots - 1) % slots);
    }

    pub fn focused_field(&self) -> Option<&Field> {
        match self.focus {
            Focus::Field(index) => self.fields.get(index),
            Focus::Action(_) => None,
        }
    }

    pub fn focused_field_mut(&mut self) -> Option<&mut Field> {
        match self.focus {
            Focus::Field(index) => self.fields.get_mut(index),
            Focus::Action(_) => None,
        }
    }

    pub fn focused_action(&self) -> Option<Action> {
        match self.focus {
            Focus::Field(_) => None,
            Focus::Action(index) => self.actions.get(index).copied(),
        }
    }
}
