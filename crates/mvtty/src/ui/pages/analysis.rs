use ratatui::Frame;
use ratatui::layout::Rect;

use crate::app::{Tab, TabState};
use crate::ui::components::console::ConsoleView;
use crate::ui::components::form_panel::FormPanel;
use crate::ui::pages::split_panel_and_console;
use crate::ui::{Component, Page};

/// iOS or Android analysis tab: input paths, options and `mvt` actions.
pub struct AnalysisPage<'a> {
    draft: Option<&'a str>,
    state: &'a TabState,
    tab: Tab,
}

impl<'a> AnalysisPage<'a> {
    pub fn new(tab: Tab, state: &'a TabState, draft: Option<&'a str>) -> Self {
        Self { draft, state, tab }
    }
}

impl Page for AnalysisPage<'_> {
    fn render(&mut self, f: &mut Frame, area: Rect) {
        let form = &self.state.form;
        let (form_area, console_area) =
            split_panel_and_console(area, FormPanel::required_height(form));

        FormPanel::new(self.tab.title(), form)
            .draft(self.draft)
            .is_running(self.state.is_running())
            .render(f, form_area);
        ConsoleView::new(&self.state.console)
            .is_running(self.state.is_running())
            .render(f, console_area);
    }
}
