//! Top-level tab definitions and state management.

use crate::domain::Form;

/// Available top-level tabs.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Tab {
    Ios,
    Android,
    Utilities,
    Report,
}

impl Tab {
    /// All tabs in display order.
    pub const ALL: [Tab; 4] = [Tab::Ios, Tab::Android, Tab::Utilities, Tab::Report];

    /// Returns the display label used in the tabs header.
    pub fn title(self) -> &'static str {
        match self {
            Tab::Ios => "iOS Analysis",
            Tab::Android => "Android Analysis",
            Tab::Utilities => "Utilities",
            Tab::Report => "Report",
        }
    }

    /// Returns the position of the tab in display order.
    pub fn index(self) -> usize {
        match self {
            Tab::Ios => 0,
            Tab::Android => 1,
            Tab::Utilities => 2,
            Tab::Report => 3,
        }
    }

    /// Builds the empty form shown on this tab.
    pub fn form(self) -> Form {
        match self {
            Tab::Ios => Form::ios(),
            Tab::Android => Form::android(),
            Tab::Utilities => Form::utilities(),
            Tab::Report => Form::report(),
        }
    }

    /// Cycles to the next tab in display order.
    #[must_use]
    pub fn next(self) -> Self {
        match self {
            Tab::Ios => Tab::Android,
            Tab::Android => Tab::Utilities,
            Tab::Utilities => Tab::Report,
            Tab::Report => Tab::Ios,
        }
    }

    /// Cycles to the previous tab in display order.
    #[must_use]
    pub fn previous(self) -> Self {
        match self {
            Tab::Ios => Tab::Report,
            Tab::Android => Tab::Ios,
            Tab::Utilities => Tab::Android,
            Tab::Report => Tab::Utilities,
        }
    }
}

/// Manages selection state for top-level tabs.
pub struct TabManager {
    current: Tab,
}

impl TabManager {
    /// Creates a manager with `Tab::Ios` selected.
    pub fn new() -> Self {
        Self { current: Tab::Ios }
    }

    /// Returns the currently selected tab.
    #[must_use]
    pub fn current(&self) -> Tab {
        self.current
    }

    /// Cycles selection to the next tab.
    pub fn next(&mut self) {
        self.current = self.current.next();
    }

    /// Cycles selection to the previous tab.
    pub fn previous(&mut self) {
        self.current = self.current.previous();
    }

    /// Sets the currently selected tab.
    pub fn set(&mut self, tab: Tab) {
        self.current = tab;
    }
}

impl Default for TabManager {
    fn default() -> Self {
        Self::new()
    }
}
