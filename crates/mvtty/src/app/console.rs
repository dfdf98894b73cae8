//! Per-tab console buffer with timestamps and scroll state.

use std::collections::VecDeque;

use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};

use crate::domain::{JobLine, LineKind};

/// Oldest lines are dropped past this many.
pub const MAX_CONSOLE_LINES: usize = 10_000;

/// One rendered console line.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ConsoleLine {
    /// Local time formatted as `HH:MM:SS`.
    pub timestamp: String,
    pub kind: LineKind,
    /// Raw text, possibly containing SGR escapes.
    pub text: String,
}

/// Scrollable output log of one tab.
#[derive(Debug, Default)]
pub struct Console {
    lines: VecDeque<ConsoleLine>,
    /// Rows scrolled up from the bottom; `0` follows the tail.
    scroll_offset: u16,
}

impl Console {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a line stamped with the current time in `offset`.
    pub fn push(&mut self, line: JobLine, offset: UtcOffset) {
        self.push_at(line, OffsetDateTime::now_utc().to_offset(offset));
    }

    /// Appends a line stamped with `at`.
    pub fn push_at(&mut self, line: JobLine, at: OffsetDateTime) {
        if self.lines.len() == MAX_CONSOLE_LINES {
            self.lines.pop_front();
        }

        self.lines.push_back(ConsoleLine {
            timestamp: format_timestamp(at),
            kind: line.kind,
            text: line.text,
        });
    }

    pub fn lines(&self) -> &VecDeque<ConsoleLine> {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Removes all lines and resumes following the tail.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.scroll_offset = 0;
    }

    pub fn scroll_offset(&self) -> u16 {
        self.scroll_offset
    }

    pub fn scroll_up(&mut self, rows: u16) {
        self.scroll_offset = self.scroll_offset.saturating_add(rows);
    }

    pub fn scroll_down(&mut self, rows: u16) {
        self.scroll_offset = self.scroll_offset.saturating_sub(rows);
    }

    /// Jumps back to the newest line.
    pub fn follow_tail(&mut self) {
        self.scroll_offset = 0;
    }
}

fn format_timestamp(at: OffsetDateTime) -> String {
    let format = format_description!("[hour]:[minute]:[second]");

    at.format(format).unwrap_or_default()
}
