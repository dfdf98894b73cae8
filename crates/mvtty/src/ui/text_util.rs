use ratatui::text::{Line, Span};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Truncate text to `max_width` columns and append `...` when it overflows.
pub fn truncate_with_ellipsis(text: &str, max_width: usize) -> String {
    if max_width == 0 {
        return String::new();
    }

    if text.width() <= max_width {
        return text.to_string();
    }

    if max_width <= 3 {
        return ".".repeat(max_width);
    }

    let visible_width = max_width - 3;
    let mut truncated = String::new();
    let mut used_width = 0;
    for character in text.chars() {
        let character_width = character.width().unwrap_or(0);
        if used_width + character_width > visible_width {
            break;
        }

        truncated.push(character);
        used_width += character_width;
    }

    format!("{truncated}...")
}

/// Keeps the tail of a path-like string within `max_width`, prefixing `...`.
pub fn truncate_start(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }

    if max_width <= 3 {
        return ".".repeat(max_width);
    }

    let visible_width = max_width - 3;
    let mut tail: Vec<char> = Vec::new();
    let mut used_width = 0;
    for character in text.chars().rev() {
        let character_width = character.width().unwrap_or(0);
        if used_width + character_width > visible_width {
            break;
        }

        tail.push(character);
        used_width += character_width;
    }

    let tail: String = tail.into_iter().rev().collect();

    format!("...{tail}")
}

/// Hard-wraps styled spans at `width` columns.
///
/// Whitespace is kept as-is so column-aligned tool output stays aligned.
/// Span styles carry over to continuation lines.
pub fn wrap_spans(spans: Vec<Span<'static>>, width: usize) -> Vec<Line<'static>> {
    if width == 0 {
        return vec![Line::from(spans)];
    }

    let mut wrapped_lines: Vec<Line<'static>> = Vec::new();
    let mut current_spans: Vec<Span<'static>> = Vec::new();
    let mut current_width: usize = 0;

    for span in spans {
        let style = span.style;
        let mut chunk = String::new();

        for character in span.content.chars() {
            let character_width = character.width().unwrap_or(0);
            if current_width + character_width > width && current_width > 0 {
                if !chunk.is_empty() {
                    current_spans.push(Span::styled(std::mem::take(&mut chunk), style));
                }
                wrapped_lines.push(Line::from(std::mem::take(&mut current_spans)));
                current_width = 0;
            }

            chunk.push(character);
            current_width += character_width;
        }

        if !chunk.is_empty() {
            current_spans.push(Span::styled(chunk, style));
        }
    }

    if !current_spans.is_empty() || wrapped_lines.is_empty() {
        wrapped_lines.push(Line::from(current_spans));
    }

    wrapped_lines
}

#[cfg(test)]
mod tests {
    use ratatui::style::{Color, Style};

    use super::*;

    fn line_text(line: &Line<'_>) -> String {
        line.spans
            .iter()
            .map(|span| span.content.as_ref())
            .collect()
    }

    #[test]
    fn test_truncate_with_ellipsis_keeps_short_text() {
        // Arrange
        let text = "MVT Ready";

        // Act
        let truncated = truncate_with_ellipsis(text, 20);

        // Assert
        assert_eq!(truncated, "MVT Ready");
    }

    #[test]
    fn test_truncate_with_ellipsis_counts_wide_characters() {
        // Arrange
        let text = "日本語のテキスト";

        // Act
        let truncated = truncate_with_ellipsis(text, 8);

        // Assert
        assert_eq!(truncated, "日本...");
    }

    #[test]
    fn test_truncate_start_keeps_path_tail() {
        // Arrange
        let text = "/home/analyst/cases/2024/iphone-backup";

        // Act
        let truncated = truncate_start(text, 16);

        // Assert
        assert_eq!(truncated, "...iphone-backup");
    }

    #[test]
    fn test_wrap_spans_preserves_spacing_and_styles() {
        // Arrange
        let red = Style::default().fg(Color::Red);
        let spans = vec![Span::raw("ab  "), Span::styled("cdef", red)];

        // Act
        let lines = wrap_spans(spans, 5);

        // Assert
        assert_eq!(lines.len(), 2);
        assert_eq!(line_text(&lines[0]), "ab  c");
        assert_eq!(line_text(&lines[1]), "def");
        assert_eq!(lines[1].spans[0].style, red);
    }

    #[test]
    fn test_wrap_spans_returns_one_line_for_empty_input() {
        // Arrange
        let spans = Vec::new();

        // Act
        let lines = wrap_spans(spans, 10);

        // Assert
        assert_eq!(lines.len(), 1);
        assert_eq!(line_text(&lines[0]), "");
    }
}
