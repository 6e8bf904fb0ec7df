// Text measurement for the builtin Helvetica faces and greedy word wrapping.

use crate::style::{FontRole, Style};

/// Cap height of Helvetica in text-space units (per 1000).
pub const CAP_HEIGHT: f32 = 718.0;

const FIRST_CHAR: u32 = 32;

/// Glyph widths for U+0020..=U+007E (AFM units).
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, //
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, //
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, //
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, //
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, //
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, //
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611, //
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778, //
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556, //
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611, //
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

const HELVETICA_DEFAULT: u16 = 556;
const HELVETICA_BOLD_DEFAULT: u16 = 611;

/// Accented Latin letters are as wide as their base letter in Helvetica.
fn fold_accent(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'ç' => 'c',
        'Á' | 'À' | 'Â' | 'Ã' | 'Ä' => 'A',
        'É' | 'È' | 'Ê' | 'Ë' => 'E',
        'Í' | 'Ì' | 'Î' | 'Ï' => 'I',
        'Ó' | 'Ò' | 'Ô' | 'Õ' | 'Ö' => 'O',
        'Ú' | 'Ù' | 'Û' | 'Ü' => 'U',
        'Ç' => 'C',
        other => other,
    }
}

fn glyph_width(c: char, bold: bool) -> u16 {
    let (table, fallback) = if bold {
        (&HELVETICA_BOLD_WIDTHS, HELVETICA_BOLD_DEFAULT)
    } else {
        (&HELVETICA_WIDTHS, HELVETICA_DEFAULT)
    };
    let code = fold_accent(c) as u32;
    code.checked_sub(FIRST_CHAR)
        .and_then(|i| table.get(i as usize))
        .copied()
        .unwrap_or(fallback)
}

/// Width of `text` in points at `size`.
pub fn text_width(text: &str, size: f32, bold: bool) -> f32 {
    let units: u32 = text.chars().map(|c| glyph_width(c, bold) as u32).sum();
    units as f32 * size / 1000.0
}

pub fn role_width(text: &str, role: FontRole, style: &Style) -> f32 {
    let font = style.font(role);
    text_width(text, font.size, font.bold)
}

// ============================================================================
// Wrapping
// ============================================================================

/// A run of text set in one role. `gap_before` adds horizontal space in
/// front of the run when it does not start a line.
#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    pub text: String,
    pub role: FontRole,
    pub gap_before: f32,
}

impl Span {
    pub fn new(text: impl Into<String>, role: FontRole) -> Self {
        Self {
            text: text.into(),
            role,
            gap_before: 0.0,
        }
    }

    pub fn with_gap(mut self, gap: f32) -> Self {
        self.gap_before = gap;
        self
    }
}

/// Text placed on a line at `x` from the line's left edge.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    pub text: String,
    pub role: FontRole,
    pub x: f32,
    pub width: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub fragments: Vec<Fragment>,
    pub width: f32,
    pub height: f32,
    pub font_size: f32,
}

impl Line {
    fn empty(role: FontRole, style: &Style) -> Self {
        Self {
            fragments: Vec::new(),
            width: 0.0,
            height: style.line_height(role),
            font_size: style.font(role).size,
        }
    }

    fn push(&mut self, word: &str, role: FontRole, gap: f32, style: &Style) {
        let word_width = role_width(word, role, style);
        let line_height = style.line_height(role);
        let font_size = style.font(role).size;
        let was_empty = self.fragments.is_empty();

        if let Some(last) = self.fragments.last_mut() {
            let space = role_width(" ", role, style);
            if last.role == role && gap == 0.0 {
                last.text.push(' ');
                last.text.push_str(word);
                last.width += space + word_width;
                self.width = last.x + last.width;
            } else {
                let x = self.width + space + gap;
                self.fragments.push(Fragment {
                    text: word.to_string(),
                    role,
                    x,
                    width: word_width,
                });
                self.width = x + word_width;
            }
        } else {
            self.fragments.push(Fragment {
                text: word.to_string(),
                role,
                x: 0.0,
                width: word_width,
            });
            self.width = word_width;
        }

        if was_empty {
            self.height = line_height;
            self.font_size = font_size;
        } else {
            self.height = self.height.max(line_height);
            self.font_size = self.font_size.max(font_size);
        }
    }

    /// Width this line would have after appending `word`.
    fn width_with(&self, word: &str, role: FontRole, gap: f32, style: &Style) -> f32 {
        let word_width = role_width(word, role, style);
        if self.fragments.is_empty() {
            word_width
        } else {
            self.width + role_width(" ", role, style) + gap + word_width
        }
    }
}

enum Token<'a> {
    Word {
        text: &'a str,
        role: FontRole,
        gap: f32,
    },
    Break(FontRole),
}

/// Runs of several spaces are kept as extra gap so legends like
/// "1 - Urbana    2 - Rural" keep their spacing.
fn tokenize<'a>(spans: &'a [Span], style: &Style) -> Vec<Token<'a>> {
    let mut tokens = Vec::new();
    for span in spans {
        let space = role_width(" ", span.role, style);
        let mut first_word = true;
        for (line_idx, line) in span.text.split('\n').enumerate() {
            if line_idx > 0 {
                tokens.push(Token::Break(span.role));
            }
            let mut extra_spaces = 0;
            for word in line.trim_end_matches('\r').split(' ') {
                if word.is_empty() {
                    extra_spaces += 1;
                    continue;
                }
                let mut gap = extra_spaces as f32 * space;
                if first_word {
                    gap += span.gap_before;
                    first_word = false;
                }
                extra_spaces = 0;
                tokens.push(Token::Word {
                    text: word,
                    role: span.role,
                    gap,
                });
            }
        }
    }
    tokens
}

/// Greedy word wrap of `spans` into lines no wider than `max_width`.
///
/// A word wider than `max_width` gets a line of its own and overflows.
/// Explicit newlines force a break. Text with no words still yields one
/// empty line so fill-in areas keep their height.
pub fn layout_lines(spans: &[Span], max_width: f32, style: &Style) -> Vec<Line> {
    let Some(first) = spans.first() else {
        return Vec::new();
    };

    let mut lines = Vec::new();
    let mut current = Line::empty(first.role, style);

    for token in tokenize(spans, style) {
        match token {
            Token::Word { text, role, gap } => {
                if !current.fragments.is_empty()
                    && current.width_with(text, role, gap, style) > max_width
                {
                    let finished = std::mem::replace(&mut current, Line::empty(role, style));
                    lines.push(finished);
                }
                let gap = if current.fragments.is_empty() { 0.0 } else { gap };
                current.push(text, role, gap, style);
            }
            Token::Break(role) => {
                let finished = std::mem::replace(&mut current, Line::empty(role, style));
                lines.push(finished);
            }
        }
    }
    lines.push(current);
    lines
}

pub fn lines_height(lines: &[Line]) -> f32 {
    lines.iter().map(|l| l.height).sum()
}
