// The layout tree produced by composition and consumed by the engine.
//
// A `LayoutBox` is a cell: content (text, a nested grid, or nothing) plus the
// cell properties the engine honours (border, padding, minimum height,
// colspan) and any decorations painted against its final rectangle.

use crate::error::{AppError, Result};
use crate::metrics::Span;
use crate::style::FontRole;

/// Outer border style of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Border {
    None,
    /// Plain rectangle on all four sides.
    Box,
    /// Single rule along the bottom edge (fill-in line).
    Bottom,
    /// Left, bottom and right edges joined by rounded corners; no top edge.
    RoundedBottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Padding {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Padding {
    pub fn all(value: f32) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }

    pub fn zero() -> Self {
        Self::default()
    }

    pub fn left(mut self, value: f32) -> Self {
        self.left = value;
        self
    }

    pub fn top(mut self, value: f32) -> Self {
        self.top = value;
        self
    }

    pub fn bottom(mut self, value: f32) -> Self {
        self.bottom = value;
        self
    }

    pub fn horizontal(&self) -> f32 {
        self.left + self.right
    }

    pub fn vertical(&self) -> f32 {
        self.top + self.bottom
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HAlign {
    Left,
    Center,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VAlign {
    Top,
    Middle,
    Bottom,
}

/// Shapes painted after placement, relative to the owning cell's rect.
#[derive(Debug, Clone, PartialEq)]
pub enum Decoration {
    /// Filled square at the top-left corner with `text` centered inside.
    TopLeftSquare { size: f32, text: String },
    /// Unfilled square centered in the cell.
    CenteredSquare { size: f32, line_width: f32 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextLeaf {
    pub spans: Vec<Span>,
    pub align: HAlign,
    pub valign: VAlign,
}

impl TextLeaf {
    /// The words of the leaf, spans joined by a single space.
    pub fn plain_text(&self) -> String {
        self.spans
            .iter()
            .map(|s| s.text.as_str())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

// ============================================================================
// Grid
// ============================================================================

/// Fixed column count with percentage widths; cells fill row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    widths: Vec<f32>,
    cells: Vec<LayoutBox>,
}

impl Grid {
    /// Builds a grid from relative weights, normalized to sum to 100.
    pub fn new(weights: &[f32]) -> Result<Self> {
        if weights.is_empty() {
            return Err(AppError::InvalidInput(
                "a grid needs at least one column".to_string(),
            ));
        }
        if let Some(bad) = weights.iter().find(|w| !w.is_finite() || **w <= 0.0) {
            return Err(AppError::InvalidInput(format!(
                "column weights must be positive, got {}",
                bad
            )));
        }
        let total: f32 = weights.iter().sum();
        Ok(Self {
            widths: weights.iter().map(|w| w * 100.0 / total).collect(),
            cells: Vec::new(),
        })
    }

    /// `columns` columns of equal width.
    pub fn uniform(columns: usize) -> Result<Self> {
        Self::new(&vec![1.0; columns])
    }

    pub fn columns(&self) -> usize {
        self.widths.len()
    }

    /// Column widths as percentages of the grid width.
    pub fn widths(&self) -> &[f32] {
        &self.widths
    }

    pub fn cells(&self) -> &[LayoutBox] {
        &self.cells
    }

    pub fn push(&mut self, cell: LayoutBox) {
        self.cells.push(cell);
    }

    /// Columns already occupied in the row being filled (0 when the last
    /// row is complete).
    pub fn open_columns(&self) -> usize {
        self.rows()
            .last()
            .map(|row| {
                let used: usize = row.iter().map(|c| c.span).sum();
                used % self.columns()
            })
            .unwrap_or(0)
    }

    /// Appends blank borderless cells until the last row is complete.
    pub fn pad_last_row(&mut self) {
        let open = self.open_columns();
        if open > 0 {
            for _ in open..self.columns() {
                self.push(LayoutBox::blank());
            }
        }
    }

    pub fn is_rectangular(&self) -> bool {
        self.open_columns() == 0
    }

    /// Cells grouped into rows. A colspan wider than what is left of the
    /// row is clamped to the remaining columns.
    pub fn rows(&self) -> Vec<Vec<GridSlot<'_>>> {
        let columns = self.columns();
        let mut rows = Vec::new();
        let mut row: Vec<GridSlot<'_>> = Vec::new();
        let mut col = 0;

        for cell in &self.cells {
            let span = cell.colspan.clamp(1, columns - col);
            row.push(GridSlot {
                column: col,
                span,
                cell,
            });
            col += span;
            if col == columns {
                rows.push(std::mem::take(&mut row));
                col = 0;
            }
        }
        if !row.is_empty() {
            rows.push(row);
        }
        rows
    }
}

/// A cell's position within its grid row.
#[derive(Debug, Clone, Copy)]
pub struct GridSlot<'a> {
    pub column: usize,
    pub span: usize,
    pub cell: &'a LayoutBox,
}

// ============================================================================
// LayoutBox
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Content {
    Text(TextLeaf),
    Grid(Grid),
    Blank,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutBox {
    pub content: Content,
    pub border: Border,
    pub border_width: f32,
    pub padding: Padding,
    /// 0 means size to content.
    pub min_height: f32,
    pub colspan: usize,
    pub decorations: Vec<Decoration>,
}

impl LayoutBox {
    fn with_content(content: Content) -> Self {
        Self {
            content,
            border: Border::None,
            border_width: 0.5,
            padding: Padding::zero(),
            min_height: 0.0,
            colspan: 1,
            decorations: Vec::new(),
        }
    }

    pub fn text(spans: Vec<Span>) -> Self {
        Self::with_content(Content::Text(TextLeaf {
            spans,
            align: HAlign::Left,
            valign: VAlign::Top,
        }))
    }

    pub fn label(text: impl Into<String>, role: FontRole) -> Self {
        Self::text(vec![Span::new(text, role)])
    }

    pub fn grid(grid: Grid) -> Self {
        Self::with_content(Content::Grid(grid))
    }

    pub fn blank() -> Self {
        Self::with_content(Content::Blank)
    }

    pub fn with_border(mut self, border: Border, width: f32) -> Self {
        self.border = border;
        self.border_width = width;
        self
    }

    pub fn with_padding(mut self, padding: Padding) -> Self {
        self.padding = padding;
        self
    }

    pub fn with_min_height(mut self, height: f32) -> Self {
        self.min_height = height.max(0.0);
        self
    }

    pub fn with_colspan(mut self, colspan: usize) -> Self {
        self.colspan = colspan.max(1);
        self
    }

    pub fn with_decoration(mut self, decoration: Decoration) -> Self {
        self.decorations.push(decoration);
        self
    }

    /// Alignment of text content; no effect on grids.
    pub fn with_align(mut self, align: HAlign, valign: VAlign) -> Self {
        if let Content::Text(leaf) = &mut self.content {
            leaf.align = align;
            leaf.valign = valign;
        }
        self
    }

    pub fn as_grid(&self) -> Option<&Grid> {
        match &self.content {
            Content::Grid(grid) => Some(grid),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&TextLeaf> {
        match &self.content {
            Content::Text(leaf) => Some(leaf),
            _ => None,
        }
    }

    pub fn is_blank(&self) -> bool {
        matches!(self.content, Content::Blank)
    }
}
