// A titled, paginated list of composed blocks and how it gets to disk.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::canvas::{Canvas, PdfCanvas};
use crate::engine::Engine;
use crate::error::Result;
use crate::layout::LayoutBox;
use crate::style::Style;

/// Page size and margins in points. Defaults to A4 with 20pt margins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageSetup {
    pub width: f32,
    pub height: f32,
    pub margin_top: f32,
    pub margin_right: f32,
    pub margin_bottom: f32,
    pub margin_left: f32,
}

impl Default for PageSetup {
    fn default() -> Self {
        Self {
            width: 595.28,
            height: 841.89,
            margin_top: 20.0,
            margin_right: 20.0,
            margin_bottom: 20.0,
            margin_left: 20.0,
        }
    }
}

impl PageSetup {
    pub fn content_width(&self) -> f32 {
        (self.width - self.margin_left - self.margin_right).max(0.0)
    }

    pub fn content_height(&self) -> f32 {
        (self.height - self.margin_top - self.margin_bottom).max(0.0)
    }
}

pub struct FormDocument {
    pub title: String,
    pub page: PageSetup,
    pub style: Style,
    pub blocks: Vec<LayoutBox>,
}

impl FormDocument {
    pub fn new(title: impl Into<String>, page: PageSetup, style: Style) -> Self {
        Self {
            title: title.into(),
            page,
            style,
            blocks: Vec::new(),
        }
    }

    pub fn push(&mut self, block: LayoutBox) {
        self.blocks.push(block);
    }

    /// Paints every block onto `canvas`, returning the number of pages.
    /// An empty document still gets one blank page.
    pub fn render(&self, canvas: &mut dyn Canvas) -> Result<usize> {
        let engine = Engine::new(&self.style);
        let pages = engine.paginate(&self.blocks, &self.page);
        for (index, page) in pages.iter().enumerate() {
            canvas.begin_page()?;
            debug!("page {}: {} blocks", index + 1, page.len());
            for placed in page {
                engine.paint(placed, canvas)?;
            }
        }
        Ok(pages.len())
    }

    /// Renders to PDF and writes `path`. The bytes go to a sibling temp file
    /// first, so a failed render or write never leaves a file at `path`.
    pub fn save(&self, path: &Path) -> Result<usize> {
        let mut canvas = PdfCanvas::new(&self.title, &self.page)?;
        let pages = self.render(&mut canvas)?;

        let temp = temp_path(path);
        let written = write_pdf(canvas, &temp).and_then(|_| Ok(fs::rename(&temp, path)?));
        if let Err(e) = written {
            fs::remove_file(&temp).ok();
            return Err(e);
        }

        info!("wrote {} ({} pages)", path.display(), pages);
        Ok(pages)
    }
}

/// printpdf leaves its bytes in the writer, so flush and sync before the
/// caller renames the file into place.
fn write_pdf(canvas: PdfCanvas, path: &Path) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    canvas.save(&mut writer)?;
    let file = writer.into_inner().map_err(|e| e.into_error())?;
    file.sync_all()?;
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "form.pdf".to_string());
    path.with_file_name(format!(".{}.tmp", name))
}
