//! PDF output of laid-out pages.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use printpdf::path::{PaintMode, WindingOrder};
use printpdf::{
    BuiltinFont, Color as PdfColor, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference, Point, Pt, Rect, Rgb,
};

use crate::error::ReportError;
use crate::layout::{Color, DrawOp, FontFace, PAGE_HEIGHT, PAGE_WIDTH, Page};

const LAYER_NAME: &str = "Content";
const GRID_THICKNESS: f32 = 0.5;

/// Standard fonts registered once per document.
struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    mono: IndirectFontRef,
}

impl Fonts {
    fn register(document: &PdfDocumentReference) -> Result<Self, ReportError> {
        let add = |font| {
            document
                .add_builtin_font(font)
                .map_err(|err| ReportError::Pdf(err.to_string()))
        };

        Ok(Self {
            regular: add(BuiltinFont::Helvetica)?,
            bold: add(BuiltinFont::HelveticaBold)?,
            mono: add(BuiltinFont::Courier)?,
        })
    }

    fn get(&self, face: FontFace) -> &IndirectFontRef {
        match face {
            FontFace::Regular => &self.regular,
            FontFace::Bold => &self.bold,
            FontFace::Mono => &self.mono,
        }
    }
}

/// Characters of the WinAnsi `0x80..=0x9F` block that sit outside Latin-1.
const WIN_ANSI_EXTRAS: &[char] = &[
    '\u{20ac}', '\u{201a}', '\u{0192}', '\u{201e}', '\u{2026}', '\u{2020}', '\u{2021}', '\u{02c6}',
    '\u{2030}', '\u{0160}', '\u{2039}', '\u{0152}', '\u{017d}', '\u{2018}', '\u{2019}', '\u{201c}',
    '\u{201d}', '\u{2022}', '\u{2013}', '\u{2014}', '\u{02dc}', '\u{2122}', '\u{0161}', '\u{203a}',
    '\u{0153}', '\u{017e}', '\u{0178}',
];

/// Reduces text to what the standard PDF fonts encode with WinAnsi:
/// printable ASCII, the Latin-1 supplement and the `0x80..=0x9F` extras.
/// Everything else becomes `?`.
pub(crate) fn pdf_safe_text(text: &str) -> String {
    text.chars()
        .map(|character| match character {
            '\t' => ' ',
            _ if is_win_ansi(character) => character,
            _ => '?',
        })
        .collect()
}

fn is_win_ansi(character: char) -> bool {
    matches!(character, ' '..='~' | '\u{a0}'..='\u{ff}') || WIN_ANSI_EXTRAS.contains(&character)
}

fn mm(points: f32) -> Mm {
    Mm::from(Pt(points))
}

fn pdf_color(color: Color) -> PdfColor {
    PdfColor::Rgb(Rgb::new(
        f32::from(color.red) / 255.0,
        f32::from(color.green) / 255.0,
        f32::from(color.blue) / 255.0,
        None,
    ))
}

fn draw(layer: &PdfLayerReference, fonts: &Fonts, op: &DrawOp) {
    match op {
        DrawOp::Text {
            x,
            y,
            size,
            face,
            color,
            text,
        } => {
            layer.set_fill_color(pdf_color(*color));
            layer.use_text(pdf_safe_text(text), *size, mm(*x), mm(*y), fonts.get(*face));
        }
        DrawOp::FillRect {
            x,
            y,
            width,
            height,
            color,
        } => {
            layer.set_fill_color(pdf_color(*color));
            let rect = Rect::new(mm(*x), mm(*y), mm(x + width), mm(y + height))
                .with_mode(PaintMode::Fill)
                .with_winding(WindingOrder::NonZero);
            layer.add_rect(rect);
        }
        DrawOp::Line { from, to, color } => {
            layer.set_outline_color(pdf_color(*color));
            layer.set_outline_thickness(GRID_THICKNESS);
            layer.add_line(Line {
                points: vec![
                    (Point::new(mm(from.0), mm(from.1)), false),
                    (Point::new(mm(to.0), mm(to.1)), false),
                ],
                is_closed: false,
            });
        }
    }
}

/// Writes `pages` as an A4 PDF at `path`.
///
/// # Errors
/// Returns an error when the file cannot be created or the PDF cannot be
/// serialized.
pub fn write_pdf(title: &str, pages: &[Page], path: &Path) -> Result<(), ReportError> {
    let (document, first_page, first_layer) =
        PdfDocument::new(title, mm(PAGE_WIDTH), mm(PAGE_HEIGHT), LAYER_NAME);
    let fonts = Fonts::register(&document)?;

    for (index, page) in pages.iter().enumerate() {
        let layer = if index == 0 {
            document.get_page(first_page).get_layer(first_layer)
        } else {
            let (page_index, layer_index) =
                document.add_page(mm(PAGE_WIDTH), mm(PAGE_HEIGHT), LAYER_NAME);
            document.get_page(page_index).get_layer(layer_index)
        };

        for op in &page.ops {
            draw(&layer, &fonts, op);
        }
    }

    let file = File::create(path).map_err(|source| ReportError::io(path, source))?;
    document
        .save(&mut BufWriter::new(file))
        .map_err(|err| ReportError::Pdf(err.to_string()))?;

    Ok(())
}
