//! Page layout of a [`Document`] into absolutely positioned drawing
//! operations.
//!
//! Coordinates are PDF points on an A4 page with the origin at the bottom
//! left corner. Text widths are estimated from average glyph widths of the
//! standard PDF fonts, which is close enough for greedy line wrapping.

use crate::document::{Block, Document, Priority, TextStyle};

pub const PAGE_WIDTH: f32 = 595.28;
pub const PAGE_HEIGHT: f32 = 841.89;

const SIDE_MARGIN: f32 = 72.0;
const TOP_MARGIN: f32 = 72.0;
const BOTTOM_MARGIN: f32 = 18.0;
const CONTENT_WIDTH: f32 = PAGE_WIDTH - 2.0 * SIDE_MARGIN;

const BULLET_INDENT: f32 = 14.0;
const BULLET_MARKER: f32 = 3.0;
const TABLE_KEY_WIDTH: f32 = 180.0;
const TABLE_CELL_PADDING: f32 = 6.0;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FontFace {
    Regular,
    Bold,
    Mono,
}

impl FontFace {
    /// Average glyph advance as a fraction of the font size.
    fn width_factor(self) -> f32 {
        match self {
            FontFace::Regular => 0.5,
            FontFace::Bold => 0.55,
            FontFace::Mono => 0.6,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Color {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Color {
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const DARK_BLUE: Self = Self::rgb(0, 0, 139);
    pub const DARK_GREEN: Self = Self::rgb(0, 100, 0);
    pub const RED: Self = Self::rgb(255, 0, 0);
    pub const ORANGE: Self = Self::rgb(255, 165, 0);
    pub const LIGHT_GREY: Self = Self::rgb(211, 211, 211);
    pub const LIGHT_GREEN: Self = Self::rgb(144, 238, 144);
    pub const MISTY_ROSE: Self = Self::rgb(255, 228, 225);

    pub const fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }
}

/// One positioned drawing primitive.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    /// Text whose baseline starts at `(x, y)`.
    Text {
        x: f32,
        y: f32,
        size: f32,
        face: FontFace,
        color: Color,
        text: String,
    },
    /// Filled rectangle with its lower left corner at `(x, y)`.
    FillRect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: Color,
    },
    /// Thin stroked line segment.
    Line {
        from: (f32, f32),
        to: (f32, f32),
        color: Color,
    },
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Page {
    pub ops: Vec<DrawOp>,
}

impl Page {
    /// Text drawn on the page, in drawing order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

/// Estimated rendered width of `text` in points.
pub fn text_width(text: &str, face: FontFace, size: f32) -> f32 {
    #[allow(clippy::cast_precision_loss)]
    let glyphs = text.chars().count() as f32;

    glyphs * face.width_factor() * size
}

/// Greedily wraps `text` into lines no wider than `max_width`.
///
/// `\n` forces a line break. Leading spaces of each hard line are kept and
/// words wider than a whole line are split between characters.
pub fn wrap_text(text: &str, face: FontFace, size: f32, max_width: f32) -> Vec<String> {
    let fits = |candidate: &str| text_width(candidate, face, size) <= max_width;
    let mut lines = Vec::new();

    for hard_line in text.split('\n') {
        let trimmed = hard_line.trim_start();
        let mut current = hard_line[..hard_line.len() - trimmed.len()].to_string();
        let mut has_word = false;

        for word in trimmed.split_whitespace() {
            if has_word && !fits(&format!("{current} {word}")) {
                lines.push(std::mem::take(&mut current));
                has_word = false;
            }

            if !has_word && !fits(&format!("{current}{word}")) {
                for character in word.chars() {
                    current.push(character);
                    if !fits(&current) && current.chars().count() > 1 {
                        current.pop();
                        lines.push(std::mem::take(&mut current));
                        current.push(character);
                    }
                }
                has_word = true;
                continue;
            }

            if has_word {
                current.push(' ');
            }
            current.push_str(word);
            has_word = true;
        }

        lines.push(current);
    }

    lines
}

/// Visual parameters of one kind of text block.
struct BlockStyle {
    face: FontFace,
    size: f32,
    leading: f32,
    color: Color,
    background: Option<Color>,
    padding: f32,
    space_before: f32,
    space_after: f32,
}

impl BlockStyle {
    const fn plain(face: FontFace, size: f32, leading: f32, color: Color) -> Self {
        Self {
            face,
            size,
            leading,
            color,
            background: None,
            padding: 0.0,
            space_before: 0.0,
            space_after: 4.0,
        }
    }

    fn title() -> Self {
        Self {
            space_after: 30.0,
            ..Self::plain(FontFace::Bold, 24.0, 30.0, Color::DARK_BLUE)
        }
    }

    fn heading() -> Self {
        Self {
            background: Some(Color::LIGHT_GREY),
            padding: 5.0,
            space_before: 20.0,
            space_after: 12.0,
            ..Self::plain(FontFace::Bold, 16.0, 20.0, Color::DARK_BLUE)
        }
    }

    fn sub_heading() -> Self {
        Self {
            space_before: 15.0,
            space_after: 8.0,
            ..Self::plain(FontFace::Bold, 14.0, 18.0, Color::DARK_GREEN)
        }
    }

    fn paragraph(style: TextStyle) -> Self {
        match style {
            TextStyle::Normal => Self::plain(FontFace::Regular, 10.0, 12.0, Color::BLACK),
            TextStyle::Alert => Self::boxed(Color::RED, Color::MISTY_ROSE),
            TextStyle::Success => Self::boxed(Color::DARK_GREEN, Color::LIGHT_GREEN),
            TextStyle::Code => Self {
                background: Some(Color::LIGHT_GREY),
                padding: 2.0,
                space_before: 5.0,
                space_after: 5.0,
                ..Self::plain(FontFace::Mono, 10.0, 12.0, Color::BLACK)
            },
            TextStyle::Priority(priority) => {
                let color = match priority {
                    Priority::Immediate => Color::RED,
                    Priority::High => Color::ORANGE,
                    Priority::Medium => Color::BLACK,
                };
                Self::plain(FontFace::Regular, 10.0, 12.0, color)
            }
        }
    }

    fn boxed(color: Color, background: Color) -> Self {
        Self {
            background: Some(background),
            padding: 8.0,
            space_before: 10.0,
            space_after: 10.0,
            ..Self::plain(FontFace::Bold, 12.0, 15.0, color)
        }
    }

    /// Baseline offset below the top of a line box.
    fn baseline_offset(&self) -> f32 {
        (self.leading - self.size) / 2.0 + self.size * 0.8
    }
}

/// Places blocks top to bottom, starting new pages as space runs out.
struct Layouter {
    pages: Vec<Page>,
    current: Page,
    y: f32,
}

impl Layouter {
    fn new() -> Self {
        Self {
            pages: Vec::new(),
            current: Page::default(),
            y: PAGE_HEIGHT - TOP_MARGIN,
        }
    }

    fn new_page(&mut self) {
        self.pages.push(std::mem::take(&mut self.current));
        self.y = PAGE_HEIGHT - TOP_MARGIN;
    }

    /// Moves to a fresh page unless `height` still fits on this one. An empty
    /// page always accepts content so oversized items cannot loop.
    fn ensure_space(&mut self, height: f32) {
        if self.y - height < BOTTOM_MARGIN && !self.current.ops.is_empty() {
            self.new_page();
        }
    }

    fn advance(&mut self, amount: f32) {
        self.y -= amount;
        if self.y < BOTTOM_MARGIN {
            self.new_page();
        }
    }

    fn page_break(&mut self) {
        if !self.current.ops.is_empty() {
            self.new_page();
        }
    }

    fn text_block(&mut self, text: &str, style: &BlockStyle, indent: f32, centered: bool) {
        if !self.current.ops.is_empty() {
            self.advance(style.space_before);
        }

        let box_width = CONTENT_WIDTH - indent;
        let lines = wrap_text(
            text,
            style.face,
            style.size,
            box_width - 2.0 * style.padding,
        );
        let last_index = lines.len().saturating_sub(1);

        for (index, line) in lines.iter().enumerate() {
            let pad_top = if index == 0 { style.padding } else { 0.0 };
            let pad_bottom = if index == last_index {
                style.padding
            } else {
                0.0
            };
            let box_height = pad_top + style.leading + pad_bottom;
            self.ensure_space(box_height);

            if let Some(background) = style.background {
                self.current.ops.push(DrawOp::FillRect {
                    x: SIDE_MARGIN + indent,
                    y: self.y - box_height,
                    width: box_width,
                    height: box_height,
                    color: background,
                });
            }

            if !line.is_empty() {
                let x = if centered {
                    SIDE_MARGIN
                        + ((CONTENT_WIDTH - text_width(line, style.face, style.size)) / 2.0).max(0.0)
                } else {
                    SIDE_MARGIN + indent + style.padding
                };
                self.current.ops.push(DrawOp::Text {
                    x,
                    y: self.y - pad_top - style.baseline_offset(),
                    size: style.size,
                    face: style.face,
                    color: style.color,
                    text: line.clone(),
                });
            }

            self.y -= box_height;
        }

        self.advance(style.space_after);
    }

    fn bullet(&mut self, text: &str, level: u8) {
        let style = BlockStyle::paragraph(TextStyle::Normal);
        let indent = BULLET_INDENT * f32::from(level + 1);
        self.ensure_space(style.leading);

        let marker_y = self.y - style.baseline_offset() + style.size * 0.25;
        self.current.ops.push(DrawOp::FillRect {
            x: SIDE_MARGIN + indent - BULLET_INDENT / 2.0 - BULLET_MARKER / 2.0,
            y: marker_y,
            width: BULLET_MARKER,
            height: BULLET_MARKER,
            color: style.color,
        });
        self.text_block(text, &style, indent, false);
    }

    fn table(&mut self, header: &(String, String), rows: &[(String, String)]) {
        self.advance(6.0);
        self.table_row(header, true, Color::DARK_BLUE);
        for (index, row) in rows.iter().enumerate() {
            let background = if index % 2 == 0 {
                Color::WHITE
            } else {
                Color::LIGHT_GREY
            };
            self.table_row(row, false, background);
        }
        self.advance(6.0);
    }

    fn table_row(&mut self, (key, value): &(String, String), is_header: bool, background: Color) {
        let (face, size, color) = if is_header {
            (FontFace::Bold, 12.0, Color::WHITE)
        } else {
            (FontFace::Regular, 10.0, Color::BLACK)
        };
        let leading = size + 2.0;
        let value_width = CONTENT_WIDTH - TABLE_KEY_WIDTH;
        let key_lines = wrap_text(key, face, size, TABLE_KEY_WIDTH - 2.0 * TABLE_CELL_PADDING);
        let value_lines = wrap_text(value, face, size, value_width - 2.0 * TABLE_CELL_PADDING);

        #[allow(clippy::cast_precision_loss)]
        let line_count = key_lines.len().max(value_lines.len()) as f32;
        let row_height = line_count * leading + 2.0 * TABLE_CELL_PADDING;
        self.ensure_space(row_height);

        let top = self.y;
        let bottom = top - row_height;
        let left = SIDE_MARGIN;
        let divider = SIDE_MARGIN + TABLE_KEY_WIDTH;
        let right = SIDE_MARGIN + CONTENT_WIDTH;
        self.current.ops.push(DrawOp::FillRect {
            x: left,
            y: bottom,
            width: CONTENT_WIDTH,
            height: row_height,
            color: background,
        });

        for (column_x, lines) in [(left, &key_lines), (divider, &value_lines)] {
            for (index, line) in lines.iter().enumerate() {
                if line.is_empty() {
                    continue;
                }
                #[allow(clippy::cast_precision_loss)]
                let line_top = top - TABLE_CELL_PADDING - index as f32 * leading;
                self.current.ops.push(DrawOp::Text {
                    x: column_x + TABLE_CELL_PADDING,
                    y: line_top - size,
                    size,
                    face,
                    color,
                    text: line.clone(),
                });
            }
        }

        let grid = [
            ((left, top), (right, top)),
            ((left, bottom), (right, bottom)),
            ((left, top), (left, bottom)),
            ((divider, top), (divider, bottom)),
            ((right, top), (right, bottom)),
        ];
        self.current
            .ops
            .extend(grid.into_iter().map(|(from, to)| DrawOp::Line {
                from,
                to,
                color: Color::BLACK,
            }));

        self.y = bottom;
    }

    fn finish(mut self) -> Vec<Page> {
        if !self.current.ops.is_empty() || self.pages.is_empty() {
            self.pages.push(self.current);
        }

        self.pages
    }
}

/// Lays out `document` into pages of drawing operations.
pub fn layout(document: &Document) -> Vec<Page> {
    let mut layouter = Layouter::new();

    for block in &document.blocks {
        match block {
            Block::Title(text) => layouter.text_block(text, &BlockStyle::title(), 0.0, true),
            Block::Heading(text) => layouter.text_block(text, &BlockStyle::heading(), 0.0, false),
            Block::SubHeading(text) => {
                layouter.text_block(text, &BlockStyle::sub_heading(), 0.0, false);
            }
            Block::Paragraph { text, style } => {
                layouter.text_block(text, &BlockStyle::paragraph(*style), 0.0, false);
            }
            Block::Bullet { text, level } => layouter.bullet(text, *level),
            Block::Table { header, rows } => layouter.table(header, rows),
            Block::Spacer(height) => layouter.advance(*height),
            Block::PageBreak => layouter.page_break(),
        }
    }

    layouter.finish()
}
