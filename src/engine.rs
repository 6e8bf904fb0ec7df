// Measure, place and paint layout trees.
//
// Placement is a first pass that resolves every cell to a rectangle; paint
// callbacks only run in the second pass, against those final rectangles.

use log::{debug, warn};

use crate::canvas::Canvas;
use crate::document::PageSetup;
use crate::error::Result;
use crate::layout::{Border, Content, Decoration, Grid, HAlign, LayoutBox, VAlign};
use crate::metrics::{layout_lines, lines_height, Line, CAP_HEIGHT};
use crate::paint::{self, PaintOp, Rect, BLACK};
use crate::style::Style;

/// A wrapped line positioned on the page.
#[derive(Debug, Clone)]
pub struct PlacedLine {
    pub line: Line,
    pub x: f32,
    pub top: f32,
}

#[derive(Debug, Clone)]
pub enum PlacedBody<'a> {
    Text(Vec<PlacedLine>),
    Grid(Vec<Placed<'a>>),
    Blank,
}

/// A layout box resolved to its final rectangle.
#[derive(Debug, Clone)]
pub struct Placed<'a> {
    pub node: &'a LayoutBox,
    pub rect: Rect,
    pub body: PlacedBody<'a>,
}

impl<'a> Placed<'a> {
    pub fn children(&self) -> &[Placed<'a>] {
        match &self.body {
            PlacedBody::Grid(children) => children,
            _ => &[],
        }
    }
}

pub struct Engine<'a> {
    style: &'a Style,
}

impl<'a> Engine<'a> {
    pub fn new(style: &'a Style) -> Self {
        Self { style }
    }

    /// Height of `node` laid out at `width`: content plus padding, never
    /// less than its minimum height.
    pub fn measure(&self, node: &LayoutBox, width: f32) -> f32 {
        let inner = (width - node.padding.horizontal()).max(0.0);
        let content = match &node.content {
            Content::Text(leaf) => lines_height(&layout_lines(&leaf.spans, inner, self.style)),
            Content::Grid(grid) => self.row_heights(grid, inner).iter().sum(),
            Content::Blank => 0.0,
        };
        (content + node.padding.vertical()).max(node.min_height)
    }

    /// Every cell in a row is as tall as the tallest one.
    fn row_heights(&self, grid: &Grid, width: f32) -> Vec<f32> {
        grid.rows()
            .iter()
            .map(|row| {
                row.iter()
                    .map(|slot| {
                        let (_, w) = column_extent(grid, slot.column, slot.span, width);
                        self.measure(slot.cell, w)
                    })
                    .fold(0.0, f32::max)
            })
            .collect()
    }

    /// First pass: resolve `node` and its descendants inside `rect`.
    ///
    /// Grid cells stretch to their row height. A nested grid keeps its
    /// natural row heights from the top of its cell; text is aligned inside
    /// its cell.
    pub fn place<'b>(&self, node: &'b LayoutBox, rect: Rect) -> Placed<'b> {
        let pad = node.padding;
        let inner = Rect::new(
            rect.x + pad.left,
            rect.y + pad.top,
            (rect.width - pad.horizontal()).max(0.0),
            (rect.height - pad.vertical()).max(0.0),
        );

        let body = match &node.content {
            Content::Text(leaf) => {
                let lines = layout_lines(&leaf.spans, inner.width, self.style);
                let total = lines_height(&lines);
                let mut top = match leaf.valign {
                    VAlign::Top => inner.y,
                    VAlign::Middle => inner.y + (inner.height - total) / 2.0,
                    VAlign::Bottom => inner.bottom() - total,
                };
                let placed = lines
                    .into_iter()
                    .map(|line| {
                        let x = match leaf.align {
                            HAlign::Left => inner.x,
                            HAlign::Center => inner.x + (inner.width - line.width) / 2.0,
                        };
                        let placed = PlacedLine { x, top, line };
                        top += placed.line.height;
                        placed
                    })
                    .collect();
                PlacedBody::Text(placed)
            }
            Content::Grid(grid) => {
                let heights = self.row_heights(grid, inner.width);
                let mut y = inner.y;
                let mut children = Vec::with_capacity(grid.cells().len());
                for (row, height) in grid.rows().iter().zip(heights) {
                    for slot in row {
                        let (offset, w) = column_extent(grid, slot.column, slot.span, inner.width);
                        let cell = Rect::new(inner.x + offset, y, w, height);
                        children.push(self.place(slot.cell, cell));
                    }
                    y += height;
                }
                PlacedBody::Grid(children)
            }
            Content::Blank => PlacedBody::Blank,
        };

        Placed { node, rect, body }
    }

    /// Second pass: border, decorations, text, then children.
    pub fn paint(&self, placed: &Placed<'_>, canvas: &mut dyn Canvas) -> Result<()> {
        for op in self.paint_ops(placed) {
            canvas.paint(&op)?;
        }
        for child in placed.children() {
            self.paint(child, canvas)?;
        }
        Ok(())
    }

    /// Ops for `placed` itself, excluding its children.
    pub fn paint_ops(&self, placed: &Placed<'_>) -> Vec<PaintOp> {
        let node = placed.node;
        let rect = placed.rect;
        let mut ops = match node.border {
            Border::None => Vec::new(),
            Border::Box => paint::box_border(rect, node.border_width),
            Border::Bottom => paint::bottom_rule(rect, node.border_width),
            Border::RoundedBottom => {
                paint::rounded_bottom_border(rect, self.style.corner_radius, node.border_width)
            }
        };

        for decoration in &node.decorations {
            match decoration {
                Decoration::TopLeftSquare { size, text } => {
                    ops.extend(paint::top_left_square(rect, *size, text, self.style))
                }
                Decoration::CenteredSquare { size, line_width } => {
                    ops.extend(paint::centered_square(rect, *size, *line_width))
                }
            }
        }

        if let PlacedBody::Text(lines) = &placed.body {
            for placed_line in lines {
                let line = &placed_line.line;
                let cap = CAP_HEIGHT / 1000.0 * line.font_size;
                let baseline = placed_line.top + (line.height + cap) / 2.0;
                for fragment in &line.fragments {
                    let font = self.style.font(fragment.role);
                    ops.push(PaintOp::Text {
                        text: fragment.text.clone(),
                        x: placed_line.x + fragment.x,
                        baseline,
                        size: font.size,
                        bold: font.bold,
                        color: BLACK,
                    });
                }
            }
        }
        ops
    }

    /// Splits top-level blocks over pages. A block that does not fit in the
    /// space left moves whole to the next page; one taller than a page is
    /// placed at the top of a fresh page and overflows.
    pub fn paginate<'b>(&self, blocks: &'b [LayoutBox], page: &PageSetup) -> Vec<Vec<Placed<'b>>> {
        let width = page.content_width();
        let bottom = page.height - page.margin_bottom;
        let mut pages: Vec<Vec<Placed<'b>>> = vec![Vec::new()];
        let mut y = page.margin_top;

        for (index, block) in blocks.iter().enumerate() {
            let height = self.measure(block, width);
            let page_is_empty = pages.last().map(|p| p.is_empty()).unwrap_or(true);
            if !page_is_empty && y + height > bottom {
                debug!("block {} moves to page {}", index, pages.len() + 1);
                pages.push(Vec::new());
                y = page.margin_top;
            }
            if height > page.content_height() {
                warn!(
                    "block {} is taller than a page ({:.1}pt > {:.1}pt) and will overflow",
                    index,
                    height,
                    page.content_height()
                );
            }

            let placed = self.place(block, Rect::new(page.margin_left, y, width, height));
            if let Some(current) = pages.last_mut() {
                current.push(placed);
            }
            y += height + self.style.block_spacing;
        }
        pages
    }
}

/// Left offset and width of `span` columns starting at `column`.
fn column_extent(grid: &Grid, column: usize, span: usize, width: f32) -> (f32, f32) {
    let widths = grid.widths();
    let offset: f32 = widths[..column].iter().sum();
    let spanned: f32 = widths[column..column + span].iter().sum();
    (offset * width / 100.0, spanned * width / 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::RecordingCanvas;
    use crate::compose::FieldComposer;
    use crate::field::{pair_options, FieldSpec, OtherField};
    use crate::layout::Padding;
    use crate::paint::{PaintMode, PathSegment};
    use crate::style::FontRole;

    const LONG_TEXT: &str = "Engenheiro de Software - Desenvolvedor Full Stack com experiencia em \
        sistemas distribuidos, microservicos e arquiteturas cloud-native. Especializado em \
        Java, Spring Boot e tecnologias de containerizacao.";

    #[test]
    fn test_min_height_is_a_floor() {
        let style = Style::default();
        let engine = Engine::new(&style);
        let composer = FieldComposer::new(&style);

        let short = composer
            .compose(&FieldSpec::descriptive("32", "Ocupacao", Some("x"), Some(60.0)))
            .unwrap();
        assert_eq!(engine.measure(&short, 200.0), 60.0);

        let long = composer
            .compose(&FieldSpec::descriptive("32", "Ocupacao", Some(LONG_TEXT), Some(20.0)))
            .unwrap();
        assert!(engine.measure(&long, 200.0) > 20.0);

        let unconstrained = composer
            .compose(&FieldSpec::descriptive("32", "Ocupacao", Some("x"), Some(0.0)))
            .unwrap();
        assert!(engine.measure(&unconstrained, 200.0) < 60.0);
    }

    #[test]
    fn test_narrower_box_grows_taller() {
        let style = Style::default();
        let engine = Engine::new(&style);
        let leaf = LayoutBox::label(LONG_TEXT, FontRole::Content).with_padding(Padding::all(5.0));
        assert!(engine.measure(&leaf, 120.0) > engine.measure(&leaf, 500.0));
    }

    #[test]
    fn test_row_cells_stretch_to_row_height() {
        let style = Style::default();
        let engine = Engine::new(&style);
        let mut grid = Grid::new(&[50.0, 50.0]).unwrap();
        grid.push(LayoutBox::label(LONG_TEXT, FontRole::Content));
        grid.push(LayoutBox::label("short", FontRole::Content));
        let node = LayoutBox::grid(grid);

        let height = engine.measure(&node, 200.0);
        let placed = engine.place(&node, Rect::new(10.0, 10.0, 200.0, height));
        let children = placed.children();
        assert_eq!(children.len(), 2);
        assert_eq!(children[0].rect.height, children[1].rect.height);
        assert_eq!(children[1].rect.x, 110.0);
        assert_eq!(children[1].rect.width, 100.0);
    }

    #[test]
    fn test_colspan_cell_covers_merged_columns() {
        let style = Style::default();
        let composer = FieldComposer::new(&style);
        let engine = Engine::new(&style);
        let field = composer
            .compose(&FieldSpec::multiple_choice(
                "33",
                "Sinais",
                "1 - Sim",
                pair_options(&["A", "B", "C", "D"], &[]),
                4,
                Some(OtherField::default()),
            ))
            .unwrap();

        let height = engine.measure(&field, 400.0);
        let placed = engine.place(&field, Rect::new(0.0, 0.0, 400.0, height));
        let other_row = &placed.children()[2];
        let cells = other_row.children();
        assert_eq!(cells.len(), 2);
        let total = cells[0].rect.width + cells[1].rect.width;
        assert!((total - other_row.rect.width + other_row.node.padding.horizontal()).abs() < 1e-3);
        assert!((cells[1].rect.width - 3.0 * cells[0].rect.width).abs() < 1e-3);
    }

    #[test]
    fn test_paint_order_and_shapes() {
        let style = Style::default();
        let composer = FieldComposer::new(&style);
        let engine = Engine::new(&style);
        let field = composer
            .compose(&FieldSpec::legend_with_answer("29", "Zona", &["1 - Urbana"], Some("1")))
            .unwrap();
        let height = engine.measure(&field, 150.0);
        let placed = engine.place(&field, Rect::new(20.0, 20.0, 150.0, height));

        let mut canvas = RecordingCanvas::new();
        canvas.begin_page().unwrap();
        engine.paint(&placed, &mut canvas).unwrap();

        let ops = &canvas.pages[0];
        // The outer rounded border is painted first, with its two curves.
        match &ops[0] {
            PaintOp::Path { path, .. } => {
                let curves = path
                    .segments
                    .iter()
                    .filter(|s| matches!(s, PathSegment::CurveTo { .. }))
                    .count();
                assert_eq!(curves, 2);
            }
            other => panic!("expected border path, got {:?}", other),
        }
        let filled = ops
            .iter()
            .filter(|op| matches!(op, PaintOp::Path { mode: PaintMode::FillStroke, .. }))
            .count();
        assert_eq!(filled, 1);
        assert_eq!(canvas.texts(), vec!["29", "Zona", "1 - Urbana", "1"]);
    }

    #[test]
    fn test_answer_box_stays_at_top() {
        let style = Style::default();
        let composer = FieldComposer::new(&style);
        let engine = Engine::new(&style);
        let lines = ["linha 1", "linha 2", "linha 3", "linha 4", "linha 5"];
        let field = composer
            .compose(&FieldSpec::legend_with_answer("29", "Zona", &lines, Some("1")))
            .unwrap();
        let height = engine.measure(&field, 200.0);
        let placed = engine.place(&field, Rect::new(0.0, 0.0, 200.0, height));

        let right = &placed.children()[1];
        let answer = &right.children()[0];
        let header = &placed.children()[0].children()[0];
        assert_eq!(answer.rect.y, header.rect.y);
        assert!(answer.rect.height < right.rect.height);
    }

    #[test]
    fn test_pagination_moves_blocks() {
        let style = Style::default();
        let composer = FieldComposer::new(&style);
        let engine = Engine::new(&style);
        let page = PageSetup::default();

        let blocks: Vec<LayoutBox> = (0..3)
            .map(|i| {
                composer
                    .compose(&FieldSpec::descriptive(
                        i.to_string(),
                        "Bloco",
                        None,
                        Some(page.content_height() * 0.4),
                    ))
                    .unwrap()
            })
            .collect();

        let pages = engine.paginate(&blocks, &page);
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].len(), 2);
        assert_eq!(pages[1].len(), 1);
        assert_eq!(pages[1][0].rect.y, page.margin_top);
    }

    #[test]
    fn test_oversized_block_gets_its_own_page() {
        let style = Style::default();
        let composer = FieldComposer::new(&style);
        let engine = Engine::new(&style);
        let page = PageSetup::default();

        let small = composer.compose(&FieldSpec::descriptive("1", "A", None, None)).unwrap();
        let huge = composer
            .compose(&FieldSpec::descriptive("2", "B", None, Some(page.height * 2.0)))
            .unwrap();
        let blocks = vec![small, huge];
        let pages = engine.paginate(&blocks, &page);
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[1][0].rect.y, page.margin_top);
    }
}
