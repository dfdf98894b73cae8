use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, List, ListItem, ListState, Paragraph};

use crate::app::PathPicker;
use crate::infra::paths;
use crate::ui::Component;
use crate::ui::text_util::{truncate_start, truncate_with_ellipsis};

const OVERLAY_HEIGHT_PERCENT: u16 = 70;
const OVERLAY_WIDTH_PERCENT: u16 = 70;
const MIN_OVERLAY_WIDTH: u16 = 40;
const MIN_OVERLAY_HEIGHT: u16 = 10;

/// Directory browser popup over the current page.
pub struct PathPickerOverlay<'a> {
    picker: &'a PathPicker,
}

impl<'a> PathPickerOverlay<'a> {
    pub fn new(picker: &'a PathPicker) -> Self {
        Self { picker }
    }

    fn popup_area(area: Rect) -> Rect {
        let width = (area.width * OVERLAY_WIDTH_PERCENT / 100)
            .max(MIN_OVERLAY_WIDTH)
            .min(area.width);
        let height = (area.height * OVERLAY_HEIGHT_PERCENT / 100)
            .max(MIN_OVERLAY_HEIGHT)
            .min(area.height);

        Rect::new(
            area.x + (area.width.saturating_sub(width)) / 2,
            area.y + (area.height.saturating_sub(height)) / 2,
            width,
            height,
        )
    }

    fn title(&self) -> &'static str {
        if self.picker.directories_only() {
            " Select Directory "
        } else {
            " Select File or Directory "
        }
    }

    fn items(&self, width: usize) -> Vec<ListItem<'static>> {
        self.picker
            .entries()
            .iter()
            .map(|entry| {
                let (name, style) = if entry.is_dir {
                    (
                        format!("{}/", entry.name),
                        Style::default()
                            .fg(Color::Cyan)
                            .add_modifier(Modifier::BOLD),
                    )
                } else {
                    (entry.name.clone(), Style::default().fg(Color::White))
                };

                ListItem::new(Line::from(Span::styled(
                    truncate_with_ellipsis(&name, width),
                    style,
                )))
            })
            .collect()
    }
}

impl Component for PathPickerOverlay<'_> {
    fn render(&self, f: &mut Frame, area: Rect) {
        let popup_area = Self::popup_area(area);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Cyan))
            .title(Span::styled(
                self.title(),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ));
        let inner = block.inner(popup_area);

        f.render_widget(Clear, popup_area);
        f.render_widget(block, popup_area);

        let [header_area, list_area, status_area] = Layout::vertical([
            Constraint::Length(2),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .areas(inner);

        let current_dir = paths::display_path(self.picker.current_dir());
        let header = Paragraph::new(Line::from(vec![
            Span::styled(" ", Style::default()),
            Span::styled(
                truncate_start(&current_dir, usize::from(inner.width.saturating_sub(2))),
                Style::default().fg(Color::Yellow),
            ),
        ]))
        .block(Block::default().borders(Borders::BOTTOM));
        f.render_widget(header, header_area);

        let list_width = usize::from(list_area.width.saturating_sub(3));
        if let Some(error) = self.picker.error() {
            f.render_widget(
                Paragraph::new(format!(" {error}")).style(Style::default().fg(Color::Red)),
                list_area,
            );
        } else if self.picker.entries().is_empty() {
            f.render_widget(
                Paragraph::new(" (empty)").style(Style::default().fg(Color::DarkGray)),
                list_area,
            );
        } else {
            let list = List::new(self.items(list_width))
                .highlight_style(Style::default().bg(Color::DarkGray))
                .highlight_symbol("\u{25b8} ");
            let mut state = ListState::default().with_selected(Some(self.picker.selected()));
            f.render_stateful_widget(list, list_area, &mut state);
        }

        let hidden = if self.picker.shows_hidden() {
            "hidden: shown"
        } else {
            "hidden: off"
        };
        let status = format!(" {} entries | {hidden}", self.picker.entries().len());
        f.render_widget(
            Paragraph::new(status).style(Style::default().fg(Color::DarkGray)),
            status_area,
        );
    }
}
