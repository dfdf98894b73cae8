use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

use crate::domain::{Field, FieldKind, Focus, Form};
use crate::ui::Component;
use crate::ui::style::{focused_style, placeholder_style};

const CURSOR: &str = "\u{2588}"; // █
const FOCUS_MARKER: &str = "\u{25b8} "; // ▸

/// Fields and action buttons of one tab.
pub struct FormPanel<'a> {
    draft: Option<&'a str>,
    form: &'a Form,
    is_running: bool,
    title: &'a str,
}

impl<'a> FormPanel<'a> {
    pub fn new(title: &'a str, form: &'a Form) -> Self {
        Self {
            draft: None,
            form,
            is_running: false,
            title,
        }
    }

    /// Shows `draft` with a cursor in place of the focused field value.
    #[must_use]
    pub fn draft(mut self, draft: Option<&'a str>) -> Self {
        self.draft = draft;
        self
    }

    /// Dims the action buttons while a job of this tab runs.
    #[must_use]
    pub fn is_running(mut self, is_running: bool) -> Self {
        self.is_running = is_running;
        self
    }

    /// Rows needed to draw every field and action inside the border.
    pub fn required_height(form: &Form) -> u16 {
        let field_rows = form.fields().len();
        let separator = usize::from(!form.fields().is_empty());
        let rows = field_rows + separator + form.actions().len() + 2;

        u16::try_from(rows).unwrap_or(u16::MAX)
    }

    fn lines(&self) -> Vec<Line<'static>> {
        let label_width = self
            .form
            .fields()
            .iter()
            .map(|field| field.label.chars().count())
            .max()
            .unwrap_or(0);

        let mut lines: Vec<Line<'static>> = self
            .form
            .fields()
            .iter()
            .enumerate()
            .map(|(index, field)| {
                let is_focused = self.form.focus() == Focus::Field(index);
                self.field_line(field, is_focused, label_width)
            })
            .collect();

        if !lines.is_empty() {
            lines.push(Line::from(""));
        }

        for (index, action) in self.form.actions().iter().enumerate() {
            let is_focused = self.form.focus() == Focus::Action(index);
            lines.push(self.action_line(action.label(), is_focused));
        }

        lines
    }

    fn field_line(&self, field: &Field, is_focused: bool, label_width: usize) -> Line<'static> {
        let marker = if is_focused { FOCUS_MARKER } else { "  " };
        let label_style = if is_focused {
            focused_style()
        } else {
            Style::default().fg(Color::Gray)
        };
        let mut spans = vec![
            Span::styled(marker, label_style),
            Span::styled(
                format!("{:<label_width$}  ", field.label),
                label_style,
            ),
        ];

        match self.draft.filter(|_| is_focused) {
            Some(draft) => {
                let shown = if field.kind == FieldKind::Secret {
                    "*".repeat(draft.chars().count())
                } else {
                    draft.to_string()
                };
                spans.push(Span::styled(shown, Style::default().fg(Color::White)));
                spans.push(Span::styled(
                    CURSOR,
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::SLOW_BLINK),
                ));
            }
            None if field.is_text_input() && field.value.is_empty() => {
                spans.push(Span::styled(field.placeholder, placeholder_style()));
            }
            None => {
                spans.push(Span::styled(
                    field.display_value(),
                    Style::default().fg(Color::White),
                ));
            }
        }

        Line::from(spans)
    }

    fn action_line(&self, label: &'static str, is_focused: bool) -> Line<'static> {
        let marker = if is_focused { FOCUS_MARKER } else { "  " };
        let button_style = if self.is_running {
            Style::default().fg(Color::DarkGray)
        } else if is_focused {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Cyan)
        };

        Line::from(vec![
            Span::styled(marker, focused_style()),
            Span::styled(format!("[ {label} ]"), button_style),
        ])
    }
}

impl Component for FormPanel<'_> {
    fn render(&self, f: &mut Frame, area: Rect) {
        let paragraph = Paragraph::new(self.lines()).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .title(format!(" {} ", self.title)),
        );

        f.render_widget(paragraph, area);
    }
}

#[cfg(test)]
mod tests {
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use super::*;
    use crate::domain::FieldId;

    fn render_text(panel: &FormPanel<'_>) -> String {
        let backend = TestBackend::new(70, 14);
        let mut terminal = Terminal::new(backend).expect("failed to create terminal");
        terminal
            .draw(|frame| {
                let area = frame.area();
                panel.render(frame, area);
            })
            .expect("failed to draw");

        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(ratatui::buffer::Cell::symbol)
            .collect()
    }

    #[test]
    fn test_required_height_counts_fields_separator_and_actions() {
        // Arrange
        let ios = Form::ios();
        let utilities = Form::utilities();

        // Act
        let heights = (
            FormPanel::required_height(&ios),
            FormPanel::required_height(&utilities),
        );

        // Assert
        assert_eq!(heights, (3 + 1 + 6 + 2, 3 + 2));
    }

    #[test]
    fn test_form_panel_render_shows_placeholder_and_masks_password() {
        // Arrange
        let mut form = Form::ios();
        form.set_text(FieldId::Password, "hunter2");
        let panel = FormPanel::new("iOS Analysis", &form);

        // Act
        let text = render_text(&panel);

        // Assert
        assert!(text.contains("Select iOS backup directory..."));
        assert!(text.contains("*******"));
        assert!(!text.contains("hunter2"));
        assert!(text.contains("[ Decrypt Backup ]"));
    }

    #[test]
    fn test_form_panel_render_shows_draft_with_cursor() {
        // Arrange
        let form = Form::ios();
        let panel = FormPanel::new("iOS Analysis", &form).draft(Some("/tmp/back"));

        // Act
        let text = render_text(&panel);

        // Assert
        assert!(text.contains(&format!("/tmp/back{CURSOR}")));
    }
}
