use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Padding, Paragraph, Wrap};

use crate::ui::Component;

const BODY_HORIZONTAL_PADDING: u16 = 2;
const BODY_VERTICAL_PADDING: u16 = 1;
const MIN_OVERLAY_HEIGHT: u16 = 9;
const MIN_OVERLAY_WIDTH: u16 = 44;
const OVERLAY_HEIGHT_PERCENT: u16 = 26;
const OVERLAY_WIDTH_PERCENT: u16 = 52;

/// Centered popup for validation messages, report results and the
/// installation warning.
pub struct MessageOverlay<'a> {
    message: &'a str,
    title: &'a str,
}

impl<'a> MessageOverlay<'a> {
    pub fn new(title: &'a str, message: &'a str) -> Self {
        Self { message, title }
    }

    /// Returns the border color: red for failures, yellow otherwise.
    fn border_color(&self) -> Color {
        let title = self.title.to_ascii_lowercase();
        if title.contains("failed") || title.contains("installation") {
            Color::Red
        } else {
            Color::Yellow
        }
    }

    /// Builds the body lines including the action row at the bottom.
    fn body_lines(&self) -> Vec<Line<'static>> {
        let mut lines: Vec<Line<'static>> = self
            .message
            .split('\n')
            .map(|line| Line::from(line.to_string()))
            .collect();

        lines.push(Line::from(""));
        lines.push(
            Line::from(vec![Span::styled(" OK ", ok_button_style())]).alignment(Alignment::Center),
        );

        lines
    }

    /// Returns popup width constrained by overlay defaults and frame bounds.
    fn popup_width(area: Rect) -> u16 {
        (area.width * OVERLAY_WIDTH_PERCENT / 100)
            .max(MIN_OVERLAY_WIDTH)
            .min(area.width)
    }

    /// Returns the message rendering width after subtracting borders and
    /// horizontal padding.
    fn message_width(width: u16) -> usize {
        let horizontal_chrome = 2 + (BODY_HORIZONTAL_PADDING * 2);

        usize::from(width.saturating_sub(horizontal_chrome).max(1))
    }

    /// Returns popup height sized to keep wrapped body content and the action
    /// row visible.
    fn popup_height(&self, area: Rect, width: u16) -> u16 {
        let vertical_chrome = 2 + (BODY_VERTICAL_PADDING * 2);
        let min_height = (area.height * OVERLAY_HEIGHT_PERCENT / 100)
            .max(MIN_OVERLAY_HEIGHT)
            .min(area.height);
        let message_width = Self::message_width(width);
        let required_inner_lines: usize = self
            .body_lines()
            .iter()
            .map(|line| line.width().max(1).div_ceil(message_width))
            .sum();
        let required_height =
            u16::try_from(required_inner_lines.saturating_add(usize::from(vertical_chrome)))
                .unwrap_or(area.height)
                .min(area.height);

        required_height.max(min_height)
    }
}

impl Component for MessageOverlay<'_> {
    fn render(&self, f: &mut Frame, area: Rect) {
        let width = Self::popup_width(area);
        let border_color = self.border_color();
        let title_text = format!(" {} ", self.title);
        let paragraph = Paragraph::new(self.body_lines())
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(border_color))
                    .padding(Padding::new(
                        BODY_HORIZONTAL_PADDING,
                        BODY_HORIZONTAL_PADDING,
                        BODY_VERTICAL_PADDING,
                        BODY_VERTICAL_PADDING,
                    ))
                    .title(Span::styled(title_text, title_style(border_color)))
                    .title_alignment(Alignment::Center),
            );

        let height = self.popup_height(area, width);
        let popup_area = Rect::new(
            area.x + (area.width.saturating_sub(width)) / 2,
            area.y + (area.height.saturating_sub(height)) / 2,
            width,
            height,
        );

        f.render_widget(Clear, popup_area);
        f.render_widget(paragraph, popup_area);
    }
}

/// Style for the popup title text, colored to match the border.
fn title_style(border_color: Color) -> Style {
    Style::default()
        .fg(border_color)
        .add_modifier(Modifier::BOLD)
}

/// Style for the `OK` confirmation button.
fn ok_button_style() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
}
