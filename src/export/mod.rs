/// Transcript export
///
/// TXT export writes the space-joined transcript as UTF-8. PDF export renders
/// the same text onto A4 pages with a title line, a fixed font size, and
/// automatic page breaks, matching the layout of the original export.

use anyhow::Result;
use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use tracing::info;

use crate::transcript::Transcript;

const PDF_TITLE: &str = "YouTube Transcript";

// A4 layout, top-down coordinates in millimeters
const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const LEFT_MARGIN_MM: f32 = 10.0;
const TITLE_Y_MM: f32 = 10.0;
const BODY_START_Y_MM: f32 = 20.0;
const LINE_STEP_MM: f32 = 7.0;
const PAGE_BREAK_Y_MM: f32 = 270.0;
const FONT_SIZE_PT: f32 = 14.0;

// Wrap width approximating 180mm of body text at the fixed font size
const MAX_LINE_CHARS: usize = 90;

/// Write the transcript as plain UTF-8 text
pub async fn write_txt(transcript: &Transcript, path: &Path) -> Result<()> {
    let text_content = transcript.join_text();
    tokio::fs::write(path, text_content).await?;
    info!("💾 Saved transcript text to: {}", path.display());
    Ok(())
}

/// Write the transcript as a paginated PDF document
pub fn write_pdf(transcript: &Transcript, path: &Path) -> Result<()> {
    let text_content = transcript.join_text();
    let lines = wrap_text(&text_content, MAX_LINE_CHARS);

    let (doc, page, layer) =
        PdfDocument::new(PDF_TITLE, Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
    let font = doc.add_builtin_font(BuiltinFont::Helvetica)?;

    let mut current_layer = doc.get_page(page).get_layer(layer);
    place_line(&current_layer, &font, PDF_TITLE, TITLE_Y_MM);

    let mut y = BODY_START_Y_MM;
    for line in &lines {
        if y > PAGE_BREAK_Y_MM {
            let (next_page, next_layer) =
                doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
            current_layer = doc.get_page(next_page).get_layer(next_layer);
            y = BODY_START_Y_MM;
        }
        place_line(&current_layer, &font, line, y);
        y += LINE_STEP_MM;
    }

    doc.save(&mut BufWriter::new(File::create(path)?))?;
    info!("💾 Saved transcript PDF to: {}", path.display());

    Ok(())
}

/// Place one text line at a top-down y offset
fn place_line(layer: &printpdf::PdfLayerReference, font: &IndirectFontRef, text: &str, y: f32) {
    layer.use_text(
        text,
        FONT_SIZE_PT,
        Mm(LEFT_MARGIN_MM),
        Mm(PAGE_HEIGHT_MM - y),
        font,
    );
}

/// Greedy word wrap to a maximum line length
///
/// Words longer than the limit are hard-split so no emitted line exceeds it.
fn wrap_text(text: &str, max_line_length: usize) -> Vec<String> {
    let words: Vec<&str> = text.split_whitespace().collect();
    let mut lines = Vec::new();
    let mut current_line = String::new();

    for word in words {
        if word.len() > max_line_length {
            if !current_line.is_empty() {
                lines.push(std::mem::take(&mut current_line));
            }
            for ch in word.chars() {
                if current_line.len() + ch.len_utf8() > max_line_length {
                    lines.push(std::mem::take(&mut current_line));
                }
                current_line.push(ch);
            }
        } else if current_line.is_empty() {
            current_line = word.to_string();
        } else if current_line.len() + 1 + word.len() <= max_line_length {
            current_line.push(' ');
            current_line.push_str(word);
        } else {
            lines.push(current_line);
            current_line = word.to_string();
        }
    }

    if !current_line.is_empty() {
        lines.push(current_line);
    }

    lines
}
