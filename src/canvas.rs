// Drawing backends. The engine only talks to `Canvas`; `PdfCanvas` writes
// through printpdf and `RecordingCanvas` keeps the ops for inspection.

use std::fs::File;
use std::io::BufWriter;

use printpdf::path::{PaintMode as PdfPaintMode, WindingOrder};
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerIndex, PdfLayerReference, PdfPageIndex, Polygon, Rgb,
};

use crate::document::PageSetup;
use crate::error::{AppError, Result};
use crate::paint::{PaintMode, PaintOp, Path, PathSegment, Point, BLACK};

/// Points to millimetres.
const PT_TO_MM: f32 = 0.352_777_78;

pub trait Canvas {
    /// Starts a new page; must be called before the first `paint`.
    fn begin_page(&mut self) -> Result<()>;

    fn paint(&mut self, op: &PaintOp) -> Result<()>;
}

// ============================================================================
// Recording
// ============================================================================

/// Keeps every op, grouped per page.
#[derive(Debug, Default)]
pub struct RecordingCanvas {
    pub pages: Vec<Vec<PaintOp>>,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Every text string painted, in order, across all pages.
    pub fn texts(&self) -> Vec<&str> {
        self.pages
            .iter()
            .flatten()
            .filter_map(|op| match op {
                PaintOp::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Canvas for RecordingCanvas {
    fn begin_page(&mut self) -> Result<()> {
        self.pages.push(Vec::new());
        Ok(())
    }

    fn paint(&mut self, op: &PaintOp) -> Result<()> {
        let page = self
            .pages
            .last_mut()
            .ok_or_else(|| AppError::RenderFailure("painted before the first page".to_string()))?;
        page.push(op.clone());
        Ok(())
    }
}

// ============================================================================
// PDF
// ============================================================================

pub struct PdfCanvas {
    doc: PdfDocumentReference,
    first_page: (PdfPageIndex, PdfLayerIndex),
    layer: Option<PdfLayerReference>,
    font_regular: IndirectFontRef,
    font_bold: IndirectFontRef,
    page_width: f32,
    page_height: f32,
    pages: usize,
}

impl PdfCanvas {
    pub fn new(title: &str, page: &PageSetup) -> Result<Self> {
        let (doc, page1, layer1) = PdfDocument::new(
            title,
            Mm(page.width * PT_TO_MM),
            Mm(page.height * PT_TO_MM),
            "Layer 1",
        );

        let font_regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| AppError::RenderFailure(e.to_string()))?;
        let font_bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| AppError::RenderFailure(e.to_string()))?;

        Ok(Self {
            doc,
            first_page: (page1, layer1),
            layer: None,
            font_regular,
            font_bold,
            page_width: page.width,
            page_height: page.height,
            pages: 0,
        })
    }

    pub fn save(self, writer: &mut BufWriter<File>) -> Result<()> {
        self.doc
            .save(writer)
            .map_err(|e| AppError::RenderFailure(e.to_string()))
    }

    fn layer(&self) -> Result<&PdfLayerReference> {
        self.layer
            .as_ref()
            .ok_or_else(|| AppError::RenderFailure("painted before the first page".to_string()))
    }

    /// Top-left origin points to PDF millimetres.
    fn to_pdf(&self, p: Point) -> printpdf::Point {
        printpdf::Point::new(Mm(p.x * PT_TO_MM), Mm((self.page_height - p.y) * PT_TO_MM))
    }

    /// printpdf draws a cubic curve where the current point and the point
    /// after it are both flagged; the next two points are the second control
    /// point and the end point.
    fn points(&self, path: &Path) -> Vec<(printpdf::Point, bool)> {
        let mut points: Vec<(printpdf::Point, bool)> = Vec::with_capacity(path.segments.len() + 4);
        for segment in &path.segments {
            match *segment {
                PathSegment::MoveTo(p) | PathSegment::LineTo(p) => {
                    points.push((self.to_pdf(p), false));
                }
                PathSegment::CurveTo { c1, c2, end } => {
                    if let Some(last) = points.last_mut() {
                        last.1 = true;
                    }
                    points.push((self.to_pdf(c1), true));
                    points.push((self.to_pdf(c2), false));
                    points.push((self.to_pdf(end), false));
                }
            }
        }
        points
    }
}

fn gray(level: f32) -> Color {
    Color::Rgb(Rgb::new(level, level, level, None))
}

impl Canvas for PdfCanvas {
    fn begin_page(&mut self) -> Result<()> {
        let layer = if self.pages == 0 {
            let (page, layer) = self.first_page;
            self.doc.get_page(page).get_layer(layer)
        } else {
            let (page, layer) = self.doc.add_page(
                Mm(self.page_width * PT_TO_MM),
                Mm(self.page_height * PT_TO_MM),
                "Layer 1",
            );
            self.doc.get_page(page).get_layer(layer)
        };
        self.layer = Some(layer);
        self.pages += 1;
        Ok(())
    }

    fn paint(&mut self, op: &PaintOp) -> Result<()> {
        let layer = self.layer()?;
        match op {
            PaintOp::Path {
                path,
                mode,
                line_width,
                fill,
            } => {
                let points = self.points(path);
                layer.set_outline_color(gray(BLACK));
                layer.set_outline_thickness(*line_width);
                match mode {
                    PaintMode::Stroke => layer.add_line(Line {
                        points,
                        is_closed: path.closed,
                    }),
                    PaintMode::FillStroke => {
                        layer.set_fill_color(gray(*fill));
                        layer.add_polygon(Polygon {
                            rings: vec![points],
                            mode: PdfPaintMode::FillStroke,
                            winding_order: WindingOrder::NonZero,
                        });
                        layer.set_fill_color(gray(BLACK));
                    }
                }
            }
            PaintOp::Text {
                text,
                x,
                baseline,
                size,
                bold,
                color,
            } => {
                let font = if *bold {
                    &self.font_bold
                } else {
                    &self.font_regular
                };
                layer.set_fill_color(gray(*color));
                layer.use_text(
                    text.as_str(),
                    *size,
                    Mm(x * PT_TO_MM),
                    Mm((self.page_height - baseline) * PT_TO_MM),
                    font,
                );
                layer.set_fill_color(gray(BLACK));
            }
        }
        Ok(())
    }
}
