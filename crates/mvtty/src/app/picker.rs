//! Directory browser used to fill path fields.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::domain::FieldId;
use crate::infra::paths::{self, DirEntry, ListOptions};

/// Browsing state of the path picker overlay.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PathPicker {
    field: FieldId,
    current_dir: PathBuf,
    entries: Vec<DirEntry>,
    selected: usize,
    options: ListOptions,
    error: Option<String>,
}

impl PathPicker {
    /// Opens the picker for `field`, starting at `start` or its closest
    /// existing ancestor.
    pub fn open(field: FieldId, start: &Path, directories_only: bool) -> Self {
        let current_dir = start
            .ancestors()
            .find(|candidate| candidate.is_dir())
            .map(Path::to_path_buf)
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("/"));

        let mut picker = Self {
            field,
            current_dir,
            entries: Vec::new(),
            selected: 0,
            options: ListOptions {
                show_hidden: false,
                directories_only,
            },
            error: None,
        };
        picker.refresh();

        picker
    }

    pub fn field(&self) -> FieldId {
        self.field
    }

    pub fn current_dir(&self) -> &Path {
        &self.current_dir
    }

    pub fn entries(&self) -> &[DirEntry] {
        &self.entries
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn shows_hidden(&self) -> bool {
        self.options.show_hidden
    }

    pub fn directories_only(&self) -> bool {
        self.options.directories_only
    }

    /// Re-reads the current directory.
    pub fn refresh(&mut self) {
        match paths::list_dir(&self.current_dir, self.options) {
            Ok(entries) => {
                self.entries = entries;
                self.error = None;
            }
            Err(error) => {
                debug!(dir = %self.current_dir.display(), %error, "failed to list directory");
                self.entries.clear();
                self.error = Some(error.to_string());
            }
        }
        self.selected = self.selected.min(self.entries.len().saturating_sub(1));
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.entries.len() {
            self.selected += 1;
        }
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Descends into the highlighted directory, or returns the highlighted
    /// file as the picked path.
    pub fn enter_selected(&mut self) -> Option<PathBuf> {
        let entry = self.entries.get(self.selected)?;
        if !entry.is_dir {
            return Some(entry.path.clone());
        }

        self.current_dir = entry.path.clone();
        self.selected = 0;
        self.refresh();

        None
    }

    /// Moves to the parent directory, keeping the left directory highlighted.
    pub fn go_parent(&mut self) {
        let Some(parent) = self.current_dir.parent().map(Path::to_path_buf) else {
            return;
        };
        let previous = std::mem::replace(&mut self.current_dir, parent);
        self.selected = 0;
        self.refresh();

        if let Some(index) = self.entries.iter().position(|entry| entry.path == previous) {
            self.selected = index;
        }
    }

    pub fn toggle_hidden(&mut self) {
        self.options.show_hidden = !self.options.show_hidden;
        self.refresh();
    }

    /// Returns the highlighted entry, or the current directory when the
    /// listing is empty.
    pub fn highlighted_path(&self) -> PathBuf {
        self.entries
            .get(self.selected)
            .map_or_else(|| self.current_dir.clone(), |entry| entry.path.clone())
    }
}
