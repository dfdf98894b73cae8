use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Padding, Paragraph};

use crate::app::Tab;
use crate::ui::Component;

const RUNNING_MARKER: &str = "*";

/// Header tabs rendered above every page.
pub struct Tabs {
    current_tab: Tab,
    running_tabs: Vec<Tab>,
}

impl Tabs {
    /// Creates a tabs component with the provided active tab.
    pub fn new(current_tab: Tab) -> Self {
        Self {
            current_tab,
            running_tabs: Vec::new(),
        }
    }

    /// Marks tabs that have work in progress.
    #[must_use]
    pub fn running_tabs(mut self, running_tabs: Vec<Tab>) -> Self {
        self.running_tabs = running_tabs;
        self
    }
}

impl Component for Tabs {
    fn render(&self, f: &mut Frame, area: Rect) {
        let line = Line::from(tab_spans(self.current_tab, &self.running_tabs));
        let paragraph = Paragraph::new(line).block(
            Block::default()
                .borders(Borders::BOTTOM)
                .padding(Padding::top(1)),
        );
        f.render_widget(paragraph, area);
    }
}

fn tab_spans(current_tab: Tab, running_tabs: &[Tab]) -> Vec<Span<'static>> {
    Tab::ALL
        .iter()
        .map(|tab| {
            let marker = if running_tabs.contains(tab) {
                RUNNING_MARKER
            } else {
                ""
            };
            let label = format!(" {}{marker} ", tab.title());
            if *tab == current_tab {
                Span::styled(
                    label,
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                )
            } else {
                Span::styled(label, Style::default().fg(Color::Gray))
            }
        })
        .collect()
}
