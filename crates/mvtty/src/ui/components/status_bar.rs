use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::infra::probe::ToolStatus;
use crate::ui::Component;
use crate::ui::style::tool_status_style;

const BUSY_INDICATOR: char = '\u{25cf}'; // ●

/// Top status bar showing the version, the last status message, MVT
/// availability and running work.
pub struct StatusBar<'a> {
    busy_count: usize,
    current_version: &'a str,
    message: &'a str,
    tool_status: ToolStatus,
}

impl<'a> StatusBar<'a> {
    pub fn new(current_version: &'a str, message: &'a str) -> Self {
        Self {
            busy_count: 0,
            current_version,
            message,
            tool_status: ToolStatus::Checking,
        }
    }

    #[must_use]
    pub fn tool_status(mut self, tool_status: ToolStatus) -> Self {
        self.tool_status = tool_status;
        self
    }

    /// Sets how many jobs or reports are in progress.
    #[must_use]
    pub fn busy_count(mut self, busy_count: usize) -> Self {
        self.busy_count = busy_count;
        self
    }

    fn right_text(&self) -> (Option<String>, &'static str) {
        let busy = (self.busy_count > 0)
            .then(|| format!("{BUSY_INDICATOR} {} running ", self.busy_count));

        (busy, self.tool_status.label())
    }
}

impl Component for StatusBar<'_> {
    fn render(&self, f: &mut Frame, area: Rect) {
        let title = format!(" MVT Dashboard {} ", self.current_version);
        let mut spans = vec![
            Span::styled(
                title.clone(),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("| "),
            Span::raw(self.message.to_string()),
        ];

        let (busy, tool_label) = self.right_text();
        let right_width = busy.as_ref().map_or(0, |text| text.chars().count()) + tool_label.len() + 1;
        let left_width = title.chars().count() + 2 + self.message.chars().count();
        let total_width = usize::from(area.width);
        if left_width + right_width < total_width {
            spans.push(Span::raw(" ".repeat(total_width - left_width - right_width)));
        } else {
            spans.push(Span::raw(" "));
        }

        if let Some(busy) = busy {
            spans.push(Span::styled(busy, Style::default().fg(Color::Yellow)));
        }
        spans.push(Span::styled(
            tool_label,
            tool_status_style(self.tool_status),
        ));

        let status_bar = Paragraph::new(Line::from(spans))
            .style(Style::default().bg(Color::DarkGray).fg(Color::White));
        f.render_widget(status_bar, area);
    }
}

#[cfg(test)]
mod tests {
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use super::*;

    fn render_text(status_bar: &StatusBar<'_>, width: u16) -> String {
        let backend = TestBackend::new(width, 1);
        let mut terminal = Terminal::new(backend).expect("failed to create terminal");
        terminal
            .draw(|frame| {
                let area = frame.area();
                crate::ui::Component::render(status_bar, frame, area);
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
    fn test_status_bar_render_shows_version_message_and_tool_status() {
        // Arrange
        let status_bar = StatusBar::new("v0.3.0", "Ready - MVT GUI Dashboard")
            .tool_status(ToolStatus::Ready);

        // Act
        let text = render_text(&status_bar, 100);

        // Assert
        assert!(text.contains("MVT Dashboard v0.3.0"));
        assert!(text.contains("Ready - MVT GUI Dashboard"));
        assert!(text.trim_end().ends_with("MVT Ready"));
        assert!(!text.contains("running"));
    }

    #[test]
    fn test_status_bar_render_shows_busy_indicator() {
        // Arrange
        let status_bar = StatusBar::new("v0.3.0", "Checking MVT version...")
            .tool_status(ToolStatus::Missing)
            .busy_count(2);

        // Act
        let text = render_text(&status_bar, 100);

        // Assert
        assert!(text.contains("2 running"));
        assert!(text.contains("MVT Missing"));
    }
}
