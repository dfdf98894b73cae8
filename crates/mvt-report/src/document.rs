//! Renderer-independent report content.

/// Paragraph look, mirroring the report's visual vocabulary.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TextStyle {
    Normal,
    /// Red text on a tinted background for findings that need attention.
    Alert,
    /// Green text on a tinted background for clean results.
    Success,
    /// Monospaced text for timeline entries.
    Code,
    Priority(Priority),
}

/// Recommendation urgency.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Priority {
    Immediate,
    High,
    Medium,
}

impl Priority {
    pub fn label(self) -> &'static str {
        match self {
            Priority::Immediate => "IMMEDIATE",
            Priority::High => "HIGH",
            Priority::Medium => "MEDIUM",
        }
    }
}

/// One unit of report content.
#[derive(Clone, Debug, PartialEq)]
pub enum Block {
    Title(String),
    Heading(String),
    SubHeading(String),
    /// Text that may contain `\n` hard line breaks.
    Paragraph {
        text: String,
        style: TextStyle,
    },
    Bullet {
        text: String,
        level: u8,
    },
    /// Two-column table with a header row.
    Table {
        header: (String, String),
        rows: Vec<(String, String)>,
    },
    /// Vertical gap in points.
    Spacer(f32),
    PageBreak,
}

impl Block {
    pub fn heading(text: impl Into<String>) -> Self {
        Block::Heading(text.into())
    }

    pub fn sub_heading(text: impl Into<String>) -> Self {
        Block::SubHeading(text.into())
    }

    pub fn normal(text: impl Into<String>) -> Self {
        Block::Paragraph {
            text: text.into(),
            style: TextStyle::Normal,
        }
    }

    pub fn alert(text: impl Into<String>) -> Self {
        Block::Paragraph {
            text: text.into(),
            style: TextStyle::Alert,
        }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Block::Paragraph {
            text: text.into(),
            style: TextStyle::Success,
        }
    }

    pub fn code(text: impl Into<String>) -> Self {
        Block::Paragraph {
            text: text.into(),
            style: TextStyle::Code,
        }
    }

    pub fn bullet(text: impl Into<String>) -> Self {
        Block::Bullet {
            text: text.into(),
            level: 0,
        }
    }

    pub fn nested_bullet(text: impl Into<String>) -> Self {
        Block::Bullet {
            text: text.into(),
            level: 1,
        }
    }

    /// Plain text of the block, used for searching and tests.
    pub fn plain_text(&self) -> String {
        match self {
            Block::Title(text)
            | Block::Heading(text)
            | Block::SubHeading(text)
            | Block::Paragraph { text, .. }
            | Block::Bullet { text, .. } => text.clone(),
            Block::Table { header, rows } => std::iter::once(header)
                .chain(rows)
                .map(|(key, value)| format!("{key}: {value}"))
                .collect::<Vec<_>>()
                .join("\n"),
            Block::Spacer(_) | Block::PageBreak => String::new(),
        }
    }
}

/// Complete report content in reading order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Document {
    pub title: String,
    pub blocks: Vec<Block>,
}

impl Document {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            blocks: Vec::new(),
        }
    }

    pub fn extend(&mut self, blocks: impl IntoIterator<Item = Block>) {
        self.blocks.extend(blocks);
    }

    pub fn push(&mut self, block: Block) {
        self.blocks.push(block);
    }

    /// All text content joined by newlines.
    pub fn plain_text(&self) -> String {
        self.blocks
            .iter()
            .map(Block::plain_text)
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Titles of all top-level section headings, in order.
    pub fn headings(&self) -> Vec<&str> {
        self.blocks
            .iter()
            .filter_map(|block| match block {
                Block::Heading(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}
