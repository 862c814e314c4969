//! Paginate a [`Layout`] onto A4 pages with the built-in Helvetica fonts.

use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference, Rgb,
};
use tracing::{debug, error};

use super::{layout_brief, Block, Layout};
use crate::error::{BriefError, Result};
use crate::types::BriefRecord;

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const INCH: f32 = 25.4;
const MARGIN_LEFT: f32 = 0.75 * INCH;
const MARGIN_RIGHT: f32 = 0.75 * INCH;
const MARGIN_TOP: f32 = 1.0 * INCH;
const MARGIN_BOTTOM: f32 = 0.75 * INCH;
const PT: f32 = INCH / 72.0;
/// Average Helvetica glyph advance, as a fraction of the font size.
const AVG_GLYPH_WIDTH: f32 = 0.5;
const LAYER_NAME: &str = "Layer 1";
const BULLET: &str = "• ";

#[derive(Debug, Clone, Copy)]
struct TextStyle {
    size: f32,
    leading: f32,
    space_before: f32,
    space_after: f32,
    color: (u8, u8, u8),
    bold: bool,
    centered: bool,
}

const TITLE: TextStyle = TextStyle {
    size: 28.0,
    leading: 34.0,
    space_before: 0.0,
    space_after: 30.0 + 0.4 * 72.0,
    color: (0x8b, 0x5c, 0xf6),
    bold: true,
    centered: true,
};

const SECTION: TextStyle = TextStyle {
    size: 16.0,
    leading: 20.0,
    space_before: 20.0,
    space_after: 12.0 + 0.1 * 72.0,
    color: (0xec, 0x48, 0x99),
    bold: true,
    centered: false,
};

const BODY: TextStyle = TextStyle {
    size: 11.0,
    leading: 16.0,
    space_before: 0.0,
    space_after: 8.0,
    color: (0x37, 0x41, 0x51),
    bold: false,
    centered: false,
};

const FOOTER: TextStyle = TextStyle {
    size: 9.0,
    leading: 12.0,
    space_before: 0.3 * 72.0 + 0.15 * 72.0,
    space_after: 0.0,
    color: (0x9c, 0xa3, 0xaf),
    bold: false,
    centered: true,
};

/// Render a brief as PDF bytes.
pub fn render_pdf(record: &BriefRecord) -> Result<Vec<u8>> {
    write_layout(&layout_brief(record)).map_err(|e| {
        error!(error = %e, "PDF generation failed");
        e
    })
}

/// Paginate an already-built layout.
pub fn write_layout(layout: &Layout) -> Result<Vec<u8>> {
    let mut writer = PageWriter::new()?;
    for block in &layout.blocks {
        match block {
            Block::Title(text) => writer.paragraph(text, &TITLE),
            Block::Section(text) => writer.paragraph(text, &SECTION),
            Block::Entry { label, value } => writer.paragraph(&format!("{label}: {value}"), &BODY),
            Block::Bullet(text) => writer.paragraph(&format!("{BULLET}{text}"), &BODY),
            Block::Footer(text) => writer.paragraph(text, &FOOTER),
        }
    }
    writer.finish()
}

struct PageWriter {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    /// Baseline cursor, in mm from the page bottom.
    y: f32,
    pages: usize,
}

impl PageWriter {
    fn new() -> Result<Self> {
        let (doc, page, layer) =
            PdfDocument::new("Brief musical", Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), LAYER_NAME);
        let regular = doc.add_builtin_font(BuiltinFont::Helvetica).map_err(render_error)?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(render_error)?;
        let layer = doc.get_page(page).get_layer(layer);
        Ok(Self {
            doc,
            layer,
            regular,
            bold,
            y: PAGE_HEIGHT - MARGIN_TOP,
            pages: 1,
        })
    }

    fn new_page(&mut self) {
        let (page, layer) = self
            .doc
            .add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), LAYER_NAME);
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.y = PAGE_HEIGHT - MARGIN_TOP;
        self.pages += 1;
    }

    fn paragraph(&mut self, text: &str, style: &TextStyle) {
        let usable = PAGE_WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
        let max_chars = (usable / (style.size * AVG_GLYPH_WIDTH * PT)).floor() as usize;
        let leading = style.leading * PT;

        self.y -= style.space_before * PT;
        let font = if style.bold {
            self.bold.clone()
        } else {
            self.regular.clone()
        };
        let (r, g, b) = style.color;

        for line in wrap(text, max_chars.max(1)) {
            if self.y - leading < MARGIN_BOTTOM {
                self.new_page();
            }
            self.y -= leading;

            let x = if style.centered {
                let width = line.chars().count() as f32 * style.size * AVG_GLYPH_WIDTH * PT;
                ((PAGE_WIDTH - width) / 2.0).max(MARGIN_LEFT)
            } else {
                MARGIN_LEFT
            };
            self.layer.set_fill_color(Color::Rgb(Rgb::new(
                f32::from(r) / 255.0,
                f32::from(g) / 255.0,
                f32::from(b) / 255.0,
                None,
            )));
            self.layer.use_text(line, style.size, Mm(x), Mm(self.y), &font);
        }

        self.y -= style.space_after * PT;
    }

    fn finish(self) -> Result<Vec<u8>> {
        debug!(pages = self.pages, "PDF laid out");
        self.doc.save_to_bytes().map_err(render_error)
    }
}

fn render_error(err: printpdf::Error) -> BriefError {
    BriefError::Render(err.to_string())
}

/// Greedy word wrap to at most `max_chars` characters per line. Words longer
/// than a line are split.
fn wrap(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > max_chars {
            if current_len > 0 {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let rest = word.split_off(max_chars);
            lines.push(word.into_iter().collect());
            word = rest;
        }
        if word.is_empty() {
            continue;
        }

        let needed = if current_len == 0 { word.len() } else { current_len + 1 + word.len() };
        if needed > max_chars {
            lines.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if current_len > 0 {
            current.push(' ');
            current_len += 1;
        }
        current.extend(word.iter());
        current_len += word.len();
    }

    if current_len > 0 || lines.is_empty() {
        lines.push(current);
    }
    lines
}
