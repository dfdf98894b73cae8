use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Borders, Paragraph, Wrap};

use crate::app::{Tab, TabState};
use crate::domain::FieldId;
use crate::ui::components::console::ConsoleView;
use crate::ui::components::form_panel::FormPanel;
use crate::ui::pages::split_panel_and_console;
use crate::ui::{Component, Page};

const FORM_WIDTH_PERCENT: u16 = 60;

/// PDF report tab: results directory, device type and output name.
pub struct ReportPage<'a> {
    draft: Option<&'a str>,
    is_generating: bool,
    state: &'a TabState,
}

impl<'a> ReportPage<'a> {
    pub fn new(state: &'a TabState, draft: Option<&'a str>) -> Self {
        Self {
            draft,
            is_generating: false,
            state,
        }
    }

    #[must_use]
    pub fn is_generating(mut self, is_generating: bool) -> Self {
        self.is_generating = is_generating;
        self
    }

    /// Describes where the report will be written.
    fn output_lines(&self) -> Vec<Line<'static>> {
        let form = &self.state.form;
        let name = match form.text(FieldId::FileName) {
            "" => "MVT_Security_Report_<Type>_<timestamp>.pdf".to_string(),
            name if name.to_ascii_lowercase().ends_with(".pdf") => name.to_string(),
            name => format!("{name}.pdf"),
        };
        let directory = match form.text(FieldId::ScanDir) {
            "" => "<results directory>",
            directory => directory,
        };

        let mut lines = vec![
            Line::from("The report is written into the results directory:"),
            Line::from(""),
            Line::styled(
                format!("{}/{name}", directory.trim_end_matches('/')),
                Style::default().fg(Color::Green),
            ),
        ];
        if self.is_generating {
            lines.push(Line::from(""));
            lines.push(Line::styled(
                "Generating...",
                Style::default().fg(Color::Yellow),
            ));
        }

        lines
    }
}

impl Page for ReportPage<'_> {
    fn render(&mut self, f: &mut Frame, area: Rect) {
        let form = &self.state.form;
        let (top_area, console_area) =
            split_panel_and_console(area, FormPanel::required_height(form));
        let [form_area, output_area] = Layout::horizontal([
            Constraint::Percentage(FORM_WIDTH_PERCENT),
            Constraint::Min(0),
        ])
        .areas(top_area);

        FormPanel::new(Tab::Report.title(), form)
            .draft(self.draft)
            .is_running(self.is_generating)
            .render(f, form_area);

        let output = Paragraph::new(self.output_lines())
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .title(" Output "),
            );
        f.render_widget(output, output_area);

        ConsoleView::new(&self.state.console)
            .is_running(self.is_generating)
            .render(f, console_area);
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use time::UtcOffset;

    use super::*;
    use crate::app::App;
    use crate::config::Config;

    fn line_texts(lines: &[Line<'_>]) -> Vec<String> {
        lines
            .iter()
            .map(|line| {
                line.spans
                    .iter()
                    .map(|span| span.content.as_ref())
                    .collect()
            })
            .collect()
    }

    fn report_app() -> App {
        let config = Config {
            ioc_dir: PathBuf::from("/data/mvt/indicators"),
            home: PathBuf::from("/tmp/mvtty"),
            skip_tool_check: true,
        };

        App::new(&config, UtcOffset::UTC)
    }

    #[test]
    fn test_output_lines_show_default_name_pattern() {
        // Arrange
        let app = report_app();
        let page = ReportPage::new(app.tab_state(Tab::Report), None);

        // Act
        let texts = line_texts(&page.output_lines());

        // Assert
        assert_eq!(
            texts[2],
            "<results directory>/MVT_Security_Report_<Type>_<timestamp>.pdf"
        );
    }

    #[test]
    fn test_output_lines_append_pdf_extension() {
        // Arrange
        let mut app = report_app();
        let form = &mut app.tab_state_mut(Tab::Report).form;
        form.set_text(FieldId::ScanDir, "/cases/7/");
        form.set_text(FieldId::FileName, "case-7");
        let page = ReportPage::new(app.tab_state(Tab::Report), None).is_generating(true);

        // Act
        let texts = line_texts(&page.output_lines());

        // Assert
        assert_eq!(texts[2], "/cases/7/case-7.pdf");
        assert_eq!(texts.last().map(String::as_str), Some("Generating..."));
    }
}
