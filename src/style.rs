// Fonts, sizes and stroke widths shared by composition and rendering.

use serde::{Deserialize, Serialize};

/// Which of the fixed text styles a run of text is set in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontRole {
    Title,
    Legend,
    Content,
    Number,
    Checkbox,
}

/// Resolved font selection for a role.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontSpec {
    pub size: f32,
    pub bold: bool,
}

/// Every length is in PDF points.
///
/// Built once at startup (defaults, optionally overridden by the `style`
/// section of a form file) and passed by reference into composition and
/// rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Style {
    pub title_size: f32,
    pub legend_size: f32,
    pub content_size: f32,
    pub number_size: f32,
    pub checkbox_text_size: f32,
    /// Line height as a multiple of the font size.
    pub leading: f32,

    /// Side of the black square carrying the field number.
    pub number_square: f32,
    /// Gap between the number square and the title text.
    pub square_margin: f32,
    /// Baseline nudge applied to the field number so cap-height digits look
    /// centered in the square.
    pub number_nudge: f32,
    pub checkbox_size: f32,
    pub answer_box_size: f32,

    pub corner_radius: f32,
    pub border_width: f32,
    pub answer_border_width: f32,
    pub field_padding: f32,
    pub content_padding: f32,
    /// Extra space between the title and the inline legend of a
    /// multiple-choice field.
    pub legend_gap: f32,
    /// Vertical space between consecutive rows on the page.
    pub block_spacing: f32,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            title_size: 8.0,
            legend_size: 7.0,
            content_size: 9.0,
            number_size: 7.0,
            checkbox_text_size: 7.0,
            leading: 1.25,
            number_square: 11.0,
            square_margin: 3.0,
            number_nudge: 0.6,
            checkbox_size: 9.0,
            answer_box_size: 16.0,
            corner_radius: 4.0,
            border_width: 0.5,
            answer_border_width: 1.0,
            field_padding: 3.0,
            content_padding: 5.0,
            legend_gap: 10.0,
            block_spacing: 8.0,
        }
    }
}

impl Style {
    pub fn font(&self, role: FontRole) -> FontSpec {
        match role {
            FontRole::Title => FontSpec {
                size: self.title_size,
                bold: true,
            },
            FontRole::Legend => FontSpec {
                size: self.legend_size,
                bold: false,
            },
            FontRole::Content => FontSpec {
                size: self.content_size,
                bold: false,
            },
            FontRole::Number => FontSpec {
                size: self.number_size,
                bold: true,
            },
            FontRole::Checkbox => FontSpec {
                size: self.checkbox_text_size,
                bold: false,
            },
        }
    }

    pub fn line_height(&self, role: FontRole) -> f32 {
        self.font(role).size * self.leading
    }

    /// Left inset that puts text just right of the number square.
    pub fn title_indent(&self) -> f32 {
        self.number_square + self.square_margin
    }
}
