//! Document export: lays the resume out on fixed US letter pages and writes a
//! PDF with one sheet per laid-out page.
//!
//! Text is set in the PDF base fonts (Helvetica or Times), whose widths the
//! static metric tables approximate.

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::Utc;
use printpdf::{BuiltinFont, IndirectFontRef, Line, Mm, PdfDocument, PdfLayerReference, Point};
use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::layout::{
    heading_scale, letter_page_config, paginate, FontFamily, Page, PageConfig, PageLine,
    BULLET_INDENT_EM,
};
use crate::presenter::markdown::parse_blocks;

const MM_PER_INCH: f32 = 25.4;
const MM_PER_POINT: f32 = MM_PER_INCH / 72.0;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to build PDF: {0}")]
    Pdf(String),
}

/// Where the exported document landed.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportedDocument {
    pub path: PathBuf,
    pub page_count: usize,
}

#[async_trait]
pub trait DocumentExporter: Send + Sync {
    /// `label` distinguishes exports of the same moment, e.g. "translated".
    async fn export(
        &self,
        markdown: &str,
        font: FontFamily,
        label: &str,
    ) -> Result<ExportedDocument, ExportError>;
}

/// Writes `resume-<label>-<timestamp>.pdf` files into a directory.
pub struct LetterPageExporter {
    dir: PathBuf,
}

impl LetterPageExporter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl DocumentExporter for LetterPageExporter {
    async fn export(
        &self,
        markdown: &str,
        font: FontFamily,
        label: &str,
    ) -> Result<ExportedDocument, ExportError> {
        let config = letter_page_config(font);
        let pages = paginate(&parse_blocks(markdown), &config);
        let document = render_pdf(&pages, &config, "Resume")?;

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|source| ExportError::Io {
                path: self.dir.clone(),
                source,
            })?;

        let path = self.dir.join(format!(
            "resume-{label}-{}.pdf",
            Utc::now().format("%Y%m%dT%H%M%S%.3f")
        ));
        tokio::fs::write(&path, document)
            .await
            .map_err(|source| ExportError::Io {
                path: path.clone(),
                source,
            })?;

        info!("Exported {} page(s) to {}", pages.len(), path.display());
        Ok(ExportedDocument {
            path,
            page_count: pages.len(),
        })
    }
}

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

/// Renders laid-out pages as PDF bytes, one sheet per page.
pub fn render_pdf(pages: &[Page], config: &PageConfig, title: &str) -> Result<Vec<u8>, ExportError> {
    let width = Mm(config.page_width_in * MM_PER_INCH);
    let height = Mm(config.page_height_in * MM_PER_INCH);
    let (doc, first_page, first_layer) = PdfDocument::new(title, width, height, "Text");

    let (regular, bold) = match config.font {
        FontFamily::Sans => (BuiltinFont::Helvetica, BuiltinFont::HelveticaBold),
        FontFamily::Serif => (BuiltinFont::TimesRoman, BuiltinFont::TimesBold),
    };
    let fonts = Fonts {
        regular: doc.add_builtin_font(regular).map_err(pdf_error)?,
        bold: doc.add_builtin_font(bold).map_err(pdf_error)?,
    };

    for (i, page) in pages.iter().enumerate() {
        let (page_index, layer_index) = if i == 0 {
            (first_page, first_layer)
        } else {
            doc.add_page(width, height, "Text")
        };
        let layer = doc.get_page(page_index).get_layer(layer_index);
        draw_page(&layer, page, config, &fonts);
    }

    doc.save_to_bytes().map_err(pdf_error)
}

fn draw_page(layer: &PdfLayerReference, page: &Page, config: &PageConfig, fonts: &Fonts) {
    let size = f32::from(config.font_size_pt);
    let em = size * MM_PER_POINT;
    let margin = config.margin_in * MM_PER_INCH;
    let right = config.page_width_in * MM_PER_INCH - margin;
    let top = config.page_height_in * MM_PER_INCH - margin;
    let line_height = (config.page_height_in - 2.0 * config.margin_in) * MM_PER_INCH
        / f32::from(config.lines_per_page.max(1));

    for (slot, line) in page.lines.iter().enumerate() {
        // Baseline sits a fifth of a slot above the slot's bottom edge.
        let baseline = top - line_height * (slot as f32 + 0.8);
        match line {
            PageLine::Heading { level, text } => {
                layer.use_text(
                    text.as_str(),
                    size * heading_scale(*level),
                    Mm(margin),
                    Mm(baseline),
                    &fonts.bold,
                );
            }
            PageLine::Bullet {
                depth,
                marker,
                text,
            } => {
                let indent = margin + BULLET_INDENT_EM * (*depth + 1) as f32 * em;
                if let Some(marker) = marker {
                    layer.use_text(
                        marker.as_str(),
                        size,
                        Mm(indent - BULLET_INDENT_EM * em),
                        Mm(baseline),
                        &fonts.regular,
                    );
                }
                layer.use_text(text.as_str(), size, Mm(indent), Mm(baseline), &fonts.regular);
            }
            PageLine::Text { text } => {
                layer.use_text(text.as_str(), size, Mm(margin), Mm(baseline), &fonts.regular);
            }
            PageLine::Rule => {
                let y = top - line_height * (slot as f32 + 0.5);
                layer.set_outline_thickness(0.5);
                layer.add_line(Line {
                    points: vec![
                        (Point::new(Mm(margin), Mm(y)), false),
                        (Point::new(Mm(right), Mm(y)), false),
                    ],
                    is_closed: false,
                });
            }
            PageLine::Blank => {}
        }
    }
}

fn pdf_error(e: impl std::fmt::Display) -> ExportError {
    ExportError::Pdf(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_export_writes_letter_sized_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = LetterPageExporter::new(dir.path().join("exports"));

        let doc = exporter
            .export("# Ana Silva\n\n1. Go\n   - gRPC\n\n---\n\nRecife", FontFamily::Sans, "original")
            .await
            .unwrap();

        assert_eq!(doc.page_count, 1);
        assert!(doc.path.starts_with(dir.path().join("exports")));
        let file_name = doc.path.file_name().unwrap().to_string_lossy().to_string();
        assert!(file_name.starts_with("resume-original-"));
        assert!(file_name.ends_with(".pdf"));

        let bytes = std::fs::read(&doc.path).unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
    }

    #[tokio::test]
    async fn test_export_into_unwritable_location_fails() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, "x").unwrap();
        let exporter = LetterPageExporter::new(&blocker);
        let err = exporter
            .export("# x", FontFamily::Serif, "original")
            .await
            .unwrap_err();
        assert!(matches!(err, ExportError::Io { .. }));
    }

    #[test]
    fn test_render_pdf_emits_every_page() {
        let config = letter_page_config(FontFamily::Serif);
        let page = |text: &str| Page {
            lines: vec![PageLine::Text { text: text.into() }, PageLine::Rule],
        };
        let one = render_pdf(&[page("one")], &config, "Resume").unwrap();
        let three = render_pdf(&[page("one"), page("two"), page("three")], &config, "Resume").unwrap();
        assert!(one.starts_with(b"%PDF-"));
        assert!(three.starts_with(b"%PDF-"));
        assert!(three.len() > one.len());
    }
}
