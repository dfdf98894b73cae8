use std::path::Path;

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph, Wrap};

use crate::app::{Tab, TabState};
use crate::infra::paths;
use crate::ui::components::console::ConsoleView;
use crate::ui::components::form_panel::FormPanel;
use crate::ui::pages::split_panel_and_console;
use crate::ui::{Component, Page};

const ACTIONS_WIDTH: u16 = 34;
const INFO_HEIGHT: u16 = 7;

/// Maintenance tab: indicator download, version check and MVT update.
pub struct UtilitiesPage<'a> {
    ioc_dir: &'a Path,
    state: &'a TabState,
}

impl<'a> UtilitiesPage<'a> {
    pub fn new(state: &'a TabState, ioc_dir: &'a Path) -> Self {
        Self { ioc_dir, state }
    }

    fn info_lines(&self) -> Vec<Line<'static>> {
        let label_style = Style::default()
            .fg(Color::Gray)
            .add_modifier(Modifier::BOLD);

        vec![
            Line::from(vec![
                Span::styled("Indicators: ", label_style),
                Span::styled(
                    paths::display_path(self.ioc_dir),
                    Style::default().fg(Color::Green),
                ),
            ]),
            Line::from(""),
            Line::from("Download/Update IOCs runs the download for iOS and Android."),
            Line::from("IOC checks on the analysis tabs read indicators from this directory."),
        ]
    }
}

impl Page for UtilitiesPage<'_> {
    fn render(&mut self, f: &mut Frame, area: Rect) {
        let form = &self.state.form;
        let top_height = FormPanel::required_height(form).max(INFO_HEIGHT);
        let (top_area, console_area) = split_panel_and_console(area, top_height);
        let [actions_area, info_area] =
            Layout::horizontal([Constraint::Length(ACTIONS_WIDTH), Constraint::Min(0)])
                .areas(top_area);

        FormPanel::new(Tab::Utilities.title(), form)
            .is_running(self.state.is_running())
            .render(f, actions_area);

        let info = Paragraph::new(self.info_lines())
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .title(" Indicators of Compromise "),
            );
        f.render_widget(info, info_area);

        ConsoleView::new(&self.state.console)
            .is_running(self.state.is_running())
            .render(f, console_area);
    }
}
