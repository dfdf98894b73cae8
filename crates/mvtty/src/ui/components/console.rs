use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::{Console, ConsoleLine};
use crate::infra::ansi::parse_ansi;
use crate::ui::Component;
use crate::ui::style::{line_kind_style, timestamp_style};
use crate::ui::text_util::wrap_spans;

/// Bordered view of a tab console, pinned to the tail unless scrolled.
pub struct ConsoleView<'a> {
    console: &'a Console,
    is_running: bool,
}

impl<'a> ConsoleView<'a> {
    pub fn new(console: &'a Console) -> Self {
        Self {
            console,
            is_running: false,
        }
    }

    #[must_use]
    pub fn is_running(mut self, is_running: bool) -> Self {
        self.is_running = is_running;
        self
    }

    fn title(&self) -> String {
        let mut title = " Console ".to_string();
        if self.is_running {
            title.push_str("(running) ");
        }
        if self.console.scroll_offset() > 0 {
            title.push_str(&format!("[+{}] ", self.console.scroll_offset()));
        }

        title
    }
}

impl Component for ConsoleView<'_> {
    fn render(&self, f: &mut Frame, area: Rect) {
        let border_color = if self.is_running {
            Color::Cyan
        } else {
            Color::Gray
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color))
            .title(self.title());
        let inner = block.inner(area);

        let lines = visible_lines(
            self.console,
            usize::from(inner.width),
            usize::from(inner.height),
            usize::from(self.console.scroll_offset()),
        );

        f.render_widget(Paragraph::new(lines).block(block), area);
    }
}

/// Styled spans of one console line: dim timestamp, then the text with its
/// ANSI colors over the line kind color.
fn line_spans(line: &ConsoleLine) -> Vec<Span<'static>> {
    let mut spans = vec![Span::styled(
        format!("[{}] ", line.timestamp),
        timestamp_style(),
    )];
    spans.extend(parse_ansi(&line.text, line_kind_style(line.kind)));

    spans
}

/// Wraps lines from the tail until `height` rows above `scroll_offset` are
/// filled. Offsets past the top clamp to the first row.
fn visible_lines(
    console: &Console,
    width: usize,
    height: usize,
    scroll_offset: usize,
) -> Vec<Line<'static>> {
    if height == 0 {
        return Vec::new();
    }

    let needed = height + scroll_offset;
    let mut rows: Vec<Line<'static>> = Vec::new();
    for line in console.lines().iter().rev() {
        let mut wrapped = wrap_spans(line_spans(line), width);
        wrapped.reverse();
        rows.extend(wrapped);

        if rows.len() >= needed {
            break;
        }
    }
    rows.reverse();

    let end = rows.len().saturating_sub(scroll_offset).max(height.min(rows.len()));
    let start = end.saturating_sub(height);

    rows.drain(start..end).collect()
}
