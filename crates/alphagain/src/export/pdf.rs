//! PDF rendering for exported plans.
//!
//! Uses the built-in Helvetica font, so no font files are needed. Body
//! lines are word-wrapped to a fixed column count and laid out on A4 pages,
//! with the title on the first page.

use printpdf::{BuiltinFont, Mm, PdfDocument};

use super::ExportError;

const PAGE_WIDTH: Mm = Mm(210.0);
const PAGE_HEIGHT: Mm = Mm(297.0);
const MARGIN_MM: f32 = 20.0;
const TITLE_SIZE: f32 = 16.0;
const TITLE_GAP_MM: f32 = 12.0;
const BODY_SIZE: f32 = 11.0;
const LINE_HEIGHT_MM: f32 = 5.5;
const LAYER: &str = "Plan";

/// Columns per body line. Helvetica at 11pt fits about this many average
/// glyphs in the 170mm text column.
pub(crate) const WRAP_COLUMNS: usize = 85;

/// Characters the WinAnsi encoding of the built-in fonts has in
/// 0x80..=0x9F, on top of Latin-1.
const WIN_ANSI_EXTRAS: &str = "€‚ƒ„…†‡ˆ‰Š‹ŒŽ‘’“”•–—˜™š›œžŸ";

/// Replace characters Helvetica cannot show with `?`, and tabs with a space.
pub(crate) fn printable(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\t' => ' ',
            ' '..='~' | '\u{a0}'..='\u{ff}' => c,
            c if WIN_ANSI_EXTRAS.contains(c) => c,
            _ => '?',
        })
        .collect()
}

fn lines_per_page(first: bool) -> usize {
    let title = if first { TITLE_GAP_MM } else { 0.0 };
    ((PAGE_HEIGHT.0 - 2.0 * MARGIN_MM - title) / LINE_HEIGHT_MM) as usize
}

/// Wrap `body` and split it into pages of printable lines. Always returns
/// at least one page.
pub(crate) fn paginate(body: &str) -> Vec<Vec<String>> {
    let lines = body.lines().flat_map(|line| {
        let line = printable(line.trim_end());
        if line.is_empty() {
            vec![String::new()]
        } else {
            textwrap::wrap(&line, WRAP_COLUMNS)
                .into_iter()
                .map(|l| l.into_owned())
                .collect()
        }
    });

    let mut pages = Vec::new();
    let mut page = Vec::new();
    for line in lines {
        if page.len() == lines_per_page(pages.is_empty()) {
            pages.push(std::mem::take(&mut page));
        }
        page.push(line);
    }
    pages.push(page);
    pages
}

/// Render `title` and `body` into a complete PDF file.
pub(crate) fn render(title: &str, body: &str) -> Result<Vec<u8>, ExportError> {
    let title = printable(title);
    let (doc, first_page, first_layer) =
        PdfDocument::new(title.as_str(), PAGE_WIDTH, PAGE_HEIGHT, LAYER);
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| ExportError::Pdf(format!("{e:?}")))?;

    let mut first = Some(doc.get_page(first_page).get_layer(first_layer));
    for (index, lines) in paginate(body).iter().enumerate() {
        let layer = match first.take() {
            Some(layer) => layer,
            None => {
                let (page, layer) = doc.add_page(PAGE_WIDTH, PAGE_HEIGHT, LAYER);
                doc.get_page(page).get_layer(layer)
            }
        };

        let mut y = PAGE_HEIGHT.0 - MARGIN_MM;
        if index == 0 {
            layer.use_text(title.as_str(), TITLE_SIZE, Mm(MARGIN_MM), Mm(y), &font);
            y -= TITLE_GAP_MM;
        }
        for line in lines {
            layer.use_text(line.as_str(), BODY_SIZE, Mm(MARGIN_MM), Mm(y), &font);
            y -= LINE_HEIGHT_MM;
        }
    }

    doc.save_to_bytes()
        .map_err(|e| ExportError::Pdf(format!("{e:?}")))
}
