use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};

use crate::app::{App, AppMode, Tab};
use crate::ui::components::footer_bar::FooterBar;
use crate::ui::components::message_overlay::MessageOverlay;
use crate::ui::components::path_picker::PathPickerOverlay;
use crate::ui::components::status_bar::StatusBar;
use crate::ui::components::tab::Tabs;
use crate::ui::pages::analysis::AnalysisPage;
use crate::ui::pages::report::ReportPage;
use crate::ui::pages::utilities::UtilitiesPage;
use crate::ui::{Component, Page};

const CURRENT_VERSION: &str = concat!("v", env!("CARGO_PKG_VERSION"));

/// Lays out status bar, tabs, the current page and footer, then draws the
/// overlay of the current mode on top.
pub(crate) fn route_frame(f: &mut Frame, area: Rect, app: &App) {
    let [status_area, tabs_area, content_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(3),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    StatusBar::new(CURRENT_VERSION, app.status_message())
        .tool_status(app.tool_status())
        .busy_count(app.busy_count())
        .render(f, status_area);
    Tabs::new(app.current_tab())
        .running_tabs(running_tabs(app))
        .render(f, tabs_area);

    render_page(f, content_area, app);

    FooterBar::new(&app.mode, app.ioc_dir()).render(f, footer_area);

    render_overlay(f, area, app);
}

fn render_page(f: &mut Frame, area: Rect, app: &App) {
    let tab = app.current_tab();
    let state = app.tab_state(tab);
    let draft = match &app.mode {
        AppMode::Editing { draft } => Some(draft.as_str()),
        _ => None,
    };

    match tab {
        Tab::Ios | Tab::Android => AnalysisPage::new(tab, state, draft).render(f, area),
        Tab::Utilities => UtilitiesPage::new(state, app.ioc_dir()).render(f, area),
        Tab::Report => ReportPage::new(state, draft)
            .is_generating(app.is_report_in_flight())
            .render(f, area),
    }
}

fn render_overlay(f: &mut Frame, area: Rect, app: &App) {
    match &app.mode {
        AppMode::PathPicker(picker) => PathPickerOverlay::new(picker).render(f, area),
        AppMode::Message { title, message } => MessageOverlay::new(title, message).render(f, area),
        AppMode::Normal | AppMode::Editing { .. } => {}
    }
}

fn running_tabs(app: &App) -> Vec<Tab> {
    Tab::ALL
        .into_iter()
        .filter(|tab| {
            app.tab_state(*tab).is_running() || (*tab == Tab::Report && app.is_report_in_flight())
        })
        .collect()
}
