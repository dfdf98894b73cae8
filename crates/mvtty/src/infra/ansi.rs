use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;

const ESCAPE: char = '\u{1b}';

const STANDARD_COLORS: [Color; 8] = [
    Color::Black,
    Color::Red,
    Color::Green,
    Color::Yellow,
    Color::Blue,
    Color::Magenta,
    Color::Cyan,
    Color::Gray,
];

const BRIGHT_COLORS: [Color; 8] = [
    Color::DarkGray,
    Color::LightRed,
    Color::LightGreen,
    Color::LightYellow,
    Color::LightBlue,
    Color::LightMagenta,
    Color::LightCyan,
    Color::White,
];

/// Splits `text` into spans styled by its SGR sequences, starting from
/// `base`. Non-SGR escape sequences are dropped.
pub fn parse_ansi(text: &str, base: Style) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    let mut style = base;
    let mut current = String::new();
    let mut chars = text.chars();

    while let Some(character) = chars.next() {
        if character != ESCAPE {
            current.push(character);
            continue;
        }

        match chars.next() {
            Some('[') => {}
            Some('(' | ')') => {
                chars.next();
                continue;
            }
            _ => continue,
        }
        let mut params = String::new();
        let mut final_byte = None;
        for next in chars.by_ref() {
            if ('\u{40}'..='\u{7e}').contains(&next) {
                final_byte = Some(next);
                break;
            }
            params.push(next);
        }

        if final_byte == Some('m') {
            if !current.is_empty() {
                spans.push(Span::styled(std::mem::take(&mut current), style));
            }
            style = apply_sgr(style, base, &params);
        }
    }

    if !current.is_empty() || spans.is_empty() {
        spans.push(Span::styled(current, style));
    }

    spans
}

fn apply_sgr(mut style: Style, base: Style, params: &str) -> Style {
    let mut codes = params
        .split(';')
        .map(|code| code.parse::<u8>().unwrap_or(0));

    while let Some(code) = codes.next() {
        match code {
            0 => style = base,
            1 => style = style.add_modifier(Modifier::BOLD),
            22 => style = style.remove_modifier(Modifier::BOLD),
            30..=37 => style = style.fg(STANDARD_COLORS[usize::from(code - 30)]),
            39 => style = style.fg(base.fg.unwrap_or(Color::Reset)),
            90..=97 => style = style.fg(BRIGHT_COLORS[usize::from(code - 90)]),
            38 | 48 => match codes.next() {
                Some(5) => {
                    codes.next();
                }
                Some(2) => {
                    codes.nth(2);
                }
                _ => {}
            },
            _ => {}
        }
    }

    style
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(spans: &[Span<'_>]) -> String {
        spans.iter().map(|span| span.content.as_ref()).collect()
    }

    #[test]
    fn test_parse_ansi_without_escapes_keeps_base_style() {
        // Arrange
        let base = Style::default().fg(Color::White);

        // Act
        let spans = parse_ansi("plain text", base);

        // Assert
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].content, "plain text");
        assert_eq!(spans[0].style, base);
    }

    #[test]
    fn test_parse_ansi_applies_colors_bold_and_reset() {
        // Arrange
        let text = "\u{1b}[1;31mALERT\u{1b}[0m done \u{1b}[92mok\u{1b}[39m!";

        // Act
        let spans = parse_ansi(text, Style::default());

        // Assert
        assert_eq!(plain(&spans), "ALERT done ok!");
        assert_eq!(
            spans[0].style,
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
        );
        assert_eq!(spans[1].style, Style::default());
        assert_eq!(spans[2].style, Style::default().fg(Color::LightGreen));
        assert_eq!(spans[3].style, Style::default().fg(Color::Reset));
    }

    #[test]
    fn test_parse_ansi_strips_other_sequences() {
        // Arrange
        let text = "\u{1b}[2Kprogress\u{1b}[1A\u{1b}(B";

        // Act
        let spans = parse_ansi(text, Style::default());

        // Assert
        assert_eq!(plain(&spans), "progress");
    }

    #[test]
    fn test_parse_ansi_skips_extended_color_arguments() {
        // Arrange
        let text = "\u{1b}[38;5;196;1mred";

        // Act
        let spans = parse_ansi(text, Style::default());

        // Assert
        assert_eq!(plain(&spans), "red");
        assert_eq!(spans[0].style, Style::default().add_modifier(Modifier::BOLD));
    }
}
