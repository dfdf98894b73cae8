use std::path::Path;

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::app::AppMode;
use crate::infra::paths;
use crate::ui::Component;
use crate::ui::text_util::truncate_start;

const IOC_INDICATOR: char = '\u{25c6}'; // ◆

/// Bottom bar with key hints for the current mode and the indicator directory.
pub struct FooterBar<'a> {
    hints: &'static str,
    ioc_dir: &'a Path,
}

impl<'a> FooterBar<'a> {
    pub fn new(mode: &AppMode, ioc_dir: &'a Path) -> Self {
        Self {
            hints: key_hints(mode),
            ioc_dir,
        }
    }
}

impl Component for FooterBar<'_> {
    fn render(&self, f: &mut Frame, area: Rect) {
        let left_text = format!(" {}", self.hints);
        let left_width = left_text.chars().count();
        let mut spans = vec![Span::styled(
            left_text,
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::DIM),
        )];

        let total_width = usize::from(area.width);
        let available = total_width.saturating_sub(left_width + 3);
        let ioc_label = format!("{IOC_INDICATOR} IOCs: ");
        let label_width = ioc_label.chars().count();
        if available > label_width + 8 {
            let ioc_dir = truncate_start(&paths::display_path(self.ioc_dir), available - label_width);
            let right_text = format!("{ioc_label}{ioc_dir}");
            let padding_width = total_width - left_width - right_text.chars().count() - 1;

            spans.push(Span::raw(" ".repeat(padding_width)));
            spans.push(Span::styled(right_text, Style::default().fg(Color::Green)));
        }

        let footer = Paragraph::new(Line::from(spans))
            .style(Style::default().bg(Color::DarkGray).fg(Color::White));

        f.render_widget(footer, area);
    }
}

/// Returns the key hints shown for `mode`.
fn key_hints(mode: &AppMode) -> &'static str {
    match mode {
        AppMode::Normal => {
            "Tab: tabs | j/k: move | Enter: select | o: browse | s: stop | c: clear | PgUp/PgDn: \
             scroll | q: quit"
        }
        AppMode::Editing { .. } => "Enter: save | Esc: cancel | Ctrl-u: clear",
        AppMode::PathPicker(_) => {
            "Enter: open/pick | s: pick highlighted | c: pick this dir | Backspace: up | .: hidden \
             | Esc: cancel"
        }
        AppMode::Message { .. } => "Enter: dismiss",
    }
}
