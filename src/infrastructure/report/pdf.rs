//! Minimal PDF 1.4 writer for link set reports.
//!
//! Output is plain text on A4 pages using the built-in Helvetica font, so no
//! font files are embedded. Printable ASCII and Latin-1 text is written in
//! WinAnsi encoding; any other character is replaced with `?`.

use crate::domain::entities::LinkSet;

const PAGE_WIDTH: f32 = 595.0;
const PAGE_HEIGHT: f32 = 842.0;
const MARGIN_LEFT: f32 = 28.0;
const MARGIN_TOP: f32 = 62.0;
const MARGIN_BOTTOM: f32 = 40.0;
const FONT_SIZE: u32 = 12;

const HEADER_ADVANCE: f32 = 22.0;
const LINK_ADVANCE: f32 = 20.0;
const SET_GAP: f32 = 11.0;

/// Longest line that fits between the margins at 12pt Helvetica.
const MAX_LINE_CHARS: usize = 88;

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One line of report text and the vertical space it consumes.
struct Line {
    text: String,
    advance: f32,
}

/// Renders `sets` as a PDF document, in the given order.
///
/// Each set gets a header line `Set <id> - created: <timestamp>` followed by
/// one `<url> - <label>` line per submitted link, duplicates included. Links
/// without a stored result are reported as `unknown`.
pub fn render_pdf(sets: &[LinkSet]) -> Vec<u8> {
    let pages = paginate(report_lines(sets));
    write_document(&pages)
}

fn report_lines(sets: &[LinkSet]) -> Vec<Line> {
    let mut lines = Vec::new();

    for set in sets {
        lines.push(Line {
            text: format!(
                "Set {} - created: {}",
                set.id,
                set.created_at.format(DATE_FORMAT)
            ),
            advance: HEADER_ADVANCE,
        });

        for url in &set.links {
            let label = set
                .results
                .get(url)
                .map(|r| r.state.label())
                .unwrap_or("unknown");
            lines.push(Line {
                text: format!("{url} - {label}"),
                advance: LINK_ADVANCE,
            });
        }

        if let Some(last) = lines.last_mut() {
            last.advance += SET_GAP;
        }
    }

    lines
}

/// Splits lines into pages, returning `(y, text)` positions per page.
fn paginate(lines: Vec<Line>) -> Vec<Vec<(f32, String)>> {
    let mut pages = vec![Vec::new()];
    let mut y = PAGE_HEIGHT - MARGIN_TOP;

    for line in lines {
        if y < MARGIN_BOTTOM {
            pages.push(Vec::new());
            y = PAGE_HEIGHT - MARGIN_TOP;
        }
        if let Some(page) = pages.last_mut() {
            page.push((y, line.text));
        }
        y -= line.advance;
    }

    pages
}

fn write_document(pages: &[Vec<(f32, String)>]) -> Vec<u8> {
    // Object layout: 1 catalog, 2 page tree, 3 font, then a page and its
    // content stream for every page.
    let page_ids: Vec<usize> = (0..pages.len()).map(|i| 4 + i * 2).collect();

    let mut objects = Vec::with_capacity(3 + pages.len() * 2);
    objects.push("<< /Type /Catalog /Pages 2 0 R >>".to_string());

    let kids = page_ids
        .iter()
        .map(|id| format!("{id} 0 R"))
        .collect::<Vec<_>>()
        .join(" ");
    objects.push(format!(
        "<< /Type /Pages /Kids [{kids}] /Count {} >>",
        pages.len()
    ));
    objects.push(
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
            .to_string(),
    );

    for (page, page_id) in pages.iter().zip(&page_ids) {
        objects.push(format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {PAGE_WIDTH} {PAGE_HEIGHT}] \
             /Resources << /Font << /F1 3 0 R >> >> /Contents {} 0 R >>",
            page_id + 1
        ));

        let content = page_content(page);
        objects.push(format!(
            "<< /Length {} >>\nstream\n{content}\nendstream",
            content.len()
        ));
    }

    let mut out = Vec::new();
    out.extend_from_slice(b"%PDF-1.4\n");

    let mut offsets = Vec::with_capacity(objects.len());
    for (i, body) in objects.iter().enumerate() {
        offsets.push(out.len());
        out.extend_from_slice(format!("{} 0 obj\n{body}\nendobj\n", i + 1).as_bytes());
    }

    let xref_offset = out.len();
    let mut xref = format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1);
    for offset in offsets {
        xref.push_str(&format!("{offset:010} 00000 n \n"));
    }
    xref.push_str(&format!(
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_offset}\n%%EOF\n",
        objects.len() + 1
    ));
    out.extend_from_slice(xref.as_bytes());

    out
}

fn page_content(lines: &[(f32, String)]) -> String {
    let mut content = String::new();
    for (y, text) in lines {
        content.push_str(&format!(
            "BT /F1 {FONT_SIZE} Tf {MARGIN_LEFT} {y:.1} Td ({}) Tj ET\n",
            escape_text(text)
        ));
    }
    content
}

/// Escapes a line for a PDF literal string and truncates it to fit the page.
///
/// Latin-1 characters are written as octal escapes, which WinAnsi maps to the
/// same glyphs.
fn escape_text(text: &str) -> String {
    let mut chars: Vec<char> = text
        .chars()
        .map(|c| if is_encodable(c) { c } else { '?' })
        .collect();

    if chars.len() > MAX_LINE_CHARS {
        chars.truncate(MAX_LINE_CHARS - 3);
        chars.extend(['.', '.', '.']);
    }

    let mut escaped = String::with_capacity(chars.len());
    for c in chars {
        match c {
            '\\' | '(' | ')' => {
                escaped.push('\\');
                escaped.push(c);
            }
            c if c.is_ascii() => escaped.push(c),
            c => escaped.push_str(&format!("\\{:03o}", u32::from(c))),
        }
    }
    escaped
}

fn is_encodable(c: char) -> bool {
    (' '..='~').contains(&c) || ('\u{a0}'..='\u{ff}').contains(&c)
}
