//! Shared colors for console lines and status indicators.

use ratatui::style::{Color, Modifier, Style};

use crate::domain::LineKind;
use crate::infra::probe::ToolStatus;

/// Base style of a console line before ANSI escapes are applied.
pub fn line_kind_style(kind: LineKind) -> Style {
    match kind {
        LineKind::Command => Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
        LineKind::Output => Style::default().fg(Color::White),
        LineKind::Info => Style::default().fg(Color::Blue),
        LineKind::Success => Style::default().fg(Color::Green),
        LineKind::Failure => Style::default().fg(Color::Red),
        LineKind::Warning => Style::default().fg(Color::Yellow),
    }
}

pub fn tool_status_style(status: ToolStatus) -> Style {
    let color = match status {
        ToolStatus::Checking | ToolStatus::Skipped => Color::Gray,
        ToolStatus::Ready => Color::Green,
        ToolStatus::Warning => Color::Yellow,
        ToolStatus::Missing => Color::Red,
    };

    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

/// Style of the focused field label or action.
pub fn focused_style() -> Style {
    Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD)
}

pub fn timestamp_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

pub fn placeholder_style() -> Style {
    Style::default()
        .fg(Color::DarkGray)
        .add_modifier(Modifier::ITALIC)
}
