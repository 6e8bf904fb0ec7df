// Paint callbacks: pure functions from a resolved cell rectangle to drawing
// commands. Coordinates are points with the origin at the top-left of the
// page and y growing downward; the canvas flips them for PDF.

use crate::metrics::{text_width, CAP_HEIGHT};
use crate::style::{FontRole, Style};

/// Cubic Bézier control-point factor for a quarter circle.
pub const KAPPA: f32 = 0.5523;

/// Gray levels for fills and text.
pub const BLACK: f32 = 0.0;
pub const WHITE: f32 = 1.0;

// ============================================================================
// Geometry
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathSegment {
    MoveTo(Point),
    LineTo(Point),
    CurveTo { c1: Point, c2: Point, end: Point },
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Path {
    pub segments: Vec<PathSegment>,
    pub closed: bool,
}

impl Path {
    pub fn move_to(mut self, x: f32, y: f32) -> Self {
        self.segments.push(PathSegment::MoveTo(Point::new(x, y)));
        self
    }

    pub fn line_to(mut self, x: f32, y: f32) -> Self {
        self.segments.push(PathSegment::LineTo(Point::new(x, y)));
        self
    }

    pub fn curve_to(mut self, c1: Point, c2: Point, end: Point) -> Self {
        self.segments.push(PathSegment::CurveTo { c1, c2, end });
        self
    }

    pub fn close(mut self) -> Self {
        self.closed = true;
        self
    }

    fn rect(x: f32, y: f32, width: f32, height: f32) -> Self {
        Path::default()
            .move_to(x, y)
            .line_to(x + width, y)
            .line_to(x + width, y + height)
            .line_to(x, y + height)
            .close()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaintMode {
    Stroke,
    FillStroke,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PaintOp {
    Path {
        path: Path,
        mode: PaintMode,
        line_width: f32,
        fill: f32,
    },
    Text {
        text: String,
        x: f32,
        baseline: f32,
        size: f32,
        bold: bool,
        color: f32,
    },
}

fn stroke(path: Path, line_width: f32) -> PaintOp {
    PaintOp::Path {
        path,
        mode: PaintMode::Stroke,
        line_width,
        fill: BLACK,
    }
}

// ============================================================================
// Borders
// ============================================================================

/// Left edge down, rounded turn into the bottom edge, symmetric turn up the
/// right edge. The top edge is left open.
pub fn rounded_bottom_border(rect: Rect, radius: f32, line_width: f32) -> Vec<PaintOp> {
    let r = radius.min(rect.width / 2.0).min(rect.height).max(0.0);
    let k = KAPPA * r;
    let (left, right, top, bottom) = (rect.x, rect.right(), rect.y, rect.bottom());

    let path = Path::default()
        .move_to(left, top)
        .line_to(left, bottom - r)
        .curve_to(
            Point::new(left, bottom - r + k),
            Point::new(left + r - k, bottom),
            Point::new(left + r, bottom),
        )
        .line_to(right - r, bottom)
        .curve_to(
            Point::new(right - r + k, bottom),
            Point::new(right, bottom - r + k),
            Point::new(right, bottom - r),
        )
        .line_to(right, top);

    vec![stroke(path, line_width)]
}

pub fn box_border(rect: Rect, line_width: f32) -> Vec<PaintOp> {
    vec![stroke(
        Path::rect(rect.x, rect.y, rect.width, rect.height),
        line_width,
    )]
}

pub fn bottom_rule(rect: Rect, line_width: f32) -> Vec<PaintOp> {
    let path = Path::default()
        .move_to(rect.x, rect.bottom())
        .line_to(rect.right(), rect.bottom());
    vec![stroke(path, line_width)]
}

// ============================================================================
// Squares
// ============================================================================

/// Black square at the cell's top-left corner with `text` centered in it.
///
/// The square is inset by half the stroke width so the stroke stays inside
/// the cell.
pub fn top_left_square(rect: Rect, size: f32, text: &str, style: &Style) -> Vec<PaintOp> {
    let inset = style.border_width / 2.0;
    let x = rect.x + inset;
    let y = rect.y + inset;

    let mut ops = vec![PaintOp::Path {
        path: Path::rect(x, y, size, size),
        mode: PaintMode::FillStroke,
        line_width: style.border_width,
        fill: BLACK,
    }];

    if !text.is_empty() {
        let font = style.font(FontRole::Number);
        let width = text_width(text, font.size, font.bold);
        let cap = CAP_HEIGHT / 1000.0 * font.size;
        ops.push(PaintOp::Text {
            text: text.to_string(),
            x: x + (size - width) / 2.0,
            baseline: y + (size + cap) / 2.0 - style.number_nudge,
            size: font.size,
            bold: font.bold,
            color: WHITE,
        });
    }
    ops
}

/// Unfilled square centered in the cell.
pub fn centered_square(rect: Rect, size: f32, line_width: f32) -> Vec<PaintOp> {
    let x = rect.x + (rect.width - size) / 2.0;
    let y = rect.y + (rect.height - size) / 2.0;
    vec![stroke(Path::rect(x, y, size, size), line_width)]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path_of(op: &PaintOp) -> &Path {
        match op {
            PaintOp::Path { path, .. } => path,
            other => panic!("expected path, got {:?}", other),
        }
    }

    #[test]
    fn test_rounded_border_has_two_curves_and_open_top() {
        let rect = Rect::new(10.0, 20.0, 100.0, 40.0);
        let ops = rounded_bottom_border(rect, 4.0, 0.5);
        assert_eq!(ops.len(), 1);
        let path = path_of(&ops[0]);
        assert!(!path.closed);

        let curves = path
            .segments
            .iter()
            .filter(|s| matches!(s, PathSegment::CurveTo { .. }))
            .count();
        assert_eq!(curves, 2);

        // Starts and ends on the top edge, never draws along it.
        assert_eq!(path.segments[0], PathSegment::MoveTo(Point::new(10.0, 20.0)));
        assert_eq!(
            path.segments.last(),
            Some(&PathSegment::LineTo(Point::new(110.0, 20.0)))
        );
    }

    #[test]
    fn test_rounded_border_control_points_use_kappa() {
        let rect = Rect::new(0.0, 0.0, 100.0, 50.0);
        let ops = rounded_bottom_border(rect, 4.0, 0.5);
        let path = path_of(&ops[0]);
        match path.segments[2] {
            PathSegment::CurveTo { c1, c2, end } => {
                assert!((c1.y - (46.0 + 4.0 * KAPPA)).abs() < 1e-4);
                assert!((c2.x - (4.0 - 4.0 * KAPPA)).abs() < 1e-4);
                assert_eq!(end, Point::new(4.0, 50.0));
            }
            other => panic!("expected curve, got {:?}", other),
        }
    }

    #[test]
    fn test_radius_clamped_for_small_rects() {
        let rect = Rect::new(0.0, 0.0, 4.0, 2.0);
        let ops = rounded_bottom_border(rect, 10.0, 0.5);
        let path = path_of(&ops[0]);
        assert_eq!(path.segments[1], PathSegment::LineTo(Point::new(0.0, 0.0)));
    }

    #[test]
    fn test_top_left_square_inset_by_half_stroke() {
        let style = Style::default();
        let rect = Rect::new(50.0, 60.0, 200.0, 30.0);
        let ops = top_left_square(rect, 11.0, "28", &style);
        assert_eq!(ops.len(), 2);

        let path = path_of(&ops[0]);
        let inset = style.border_width / 2.0;
        assert_eq!(
            path.segments[0],
            PathSegment::MoveTo(Point::new(50.0 + inset, 60.0 + inset))
        );

        match &ops[1] {
            PaintOp::Text { text, x, color, .. } => {
                assert_eq!(text, "28");
                assert_eq!(*color, WHITE);
                // Centered horizontally inside the square.
                let font = style.font(FontRole::Number);
                let w = text_width("28", font.size, font.bold);
                assert!((x - (50.0 + inset + (11.0 - w) / 2.0)).abs() < 1e-4);
            }
            other => panic!("expected text, got {:?}", other),
        }
    }

    #[test]
    fn test_centered_square() {
        let rect = Rect::new(0.0, 0.0, 40.0, 20.0);
        let ops = centered_square(rect, 10.0, 0.5);
        let path = path_of(&ops[0]);
        assert_eq!(path.segments[0], PathSegment::MoveTo(Point::new(15.0, 5.0)));
        assert!(path.closed);
    }
}
