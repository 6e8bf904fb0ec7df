// Field composition: FieldSpec -> LayoutBox.
//
// Every composed field is a grid wrapped in a rounded-bottom border. Number
// squares, checkboxes and answer boxes are decorations painted against the
// owning cell, never bordered sub-cells.

use crate::error::{AppError, Result};
use crate::field::{
    Descriptive, FieldKind, FieldSpec, LegendWithAnswer, MultipleChoice, OtherField,
};
use crate::layout::{Border, Decoration, Grid, HAlign, LayoutBox, Padding, VAlign};
use crate::metrics::Span;
use crate::style::{FontRole, Style};

/// Label of the free-text row under a multiple-choice grid.
pub const OTHER_LABEL: &str = "Outros:";

/// Widest option grid accepted.
pub const MAX_COLUMNS: i64 = 64;

/// Checkbox / label split inside one option cell.
const OPTION_WEIGHTS: [f32; 2] = [12.0, 88.0];
/// Title+legend / answer box split of a legend field.
const LEGEND_ANSWER_WEIGHTS: [f32; 2] = [85.0, 15.0];

const OPTION_PADDING: f32 = 2.0;
const LABEL_INDENT: f32 = 3.0;
const HEADER_GAP: f32 = 5.0;

pub struct FieldComposer<'a> {
    style: &'a Style,
}

impl<'a> FieldComposer<'a> {
    pub fn new(style: &'a Style) -> Self {
        Self { style }
    }

    pub fn compose(&self, field: &FieldSpec) -> Result<LayoutBox> {
        match &field.kind {
            FieldKind::Descriptive(desc) => {
                self.compose_descriptive(&field.number, &field.title, desc)
            }
            FieldKind::LegendWithAnswer(desc) => {
                self.compose_legend_with_answer(&field.number, &field.title, desc)
            }
            FieldKind::MultipleChoice(desc) => {
                self.compose_multiple_choice(&field.number, &field.title, desc)
            }
        }
    }

    /// Header row above free text that grows with its content.
    pub fn compose_descriptive(
        &self,
        number: &str,
        title: &str,
        desc: &Descriptive,
    ) -> Result<LayoutBox> {
        let mut stack = Grid::uniform(1)?;
        stack.push(self.header(number, vec![Span::new(title, FontRole::Title)]));
        stack.push(
            LayoutBox::label(desc.content.as_deref().unwrap_or(""), FontRole::Content)
                .with_padding(Padding::all(self.style.content_padding)),
        );

        let mut field = self.field_box(stack, self.style.field_padding);
        if let Some(height) = desc.min_height.filter(|h| *h > 0.0) {
            field = field.with_min_height(height);
        }
        Ok(field)
    }

    /// Title and legend lines on the left, answer box on the right,
    /// top-aligned with the title row.
    pub fn compose_legend_with_answer(
        &self,
        number: &str,
        title: &str,
        desc: &LegendWithAnswer,
    ) -> Result<LayoutBox> {
        let mut left = Grid::uniform(1)?;
        left.push(self.header(number, vec![Span::new(title, FontRole::Title)]));
        for line in &desc.legend_lines {
            left.push(
                LayoutBox::label(line.as_str(), FontRole::Legend)
                    .with_padding(Padding::zero().left(self.style.title_indent()).top(1.0)),
            );
        }

        // A nested grid keeps its natural height, so the box stays at the top
        // of the field instead of centering on the whole legend.
        let mut right = Grid::uniform(1)?;
        right.push(self.answer_box(desc.answer.as_deref().unwrap_or("")));

        let mut content = Grid::new(&LEGEND_ANSWER_WEIGHTS)?;
        content.push(LayoutBox::grid(left));
        content.push(LayoutBox::grid(right));

        Ok(self.field_box(content, self.style.field_padding))
    }

    /// Header with inline legend, a row-major grid of checkbox options and an
    /// optional "Outros" fill-in row.
    pub fn compose_multiple_choice(
        &self,
        number: &str,
        title: &str,
        desc: &MultipleChoice,
    ) -> Result<LayoutBox> {
        if desc.columns < 1 || desc.columns > MAX_COLUMNS {
            return Err(AppError::InvalidInput(format!(
                "field {}: multiple-choice grid needs 1 to {} columns, got {}",
                number, MAX_COLUMNS, desc.columns
            )));
        }
        let columns = desc.columns as usize;

        let mut spans = vec![Span::new(title, FontRole::Title)];
        if !desc.legend.is_empty() {
            spans.push(
                Span::new(desc.legend.as_str(), FontRole::Legend).with_gap(self.style.legend_gap),
            );
        }

        let mut stack = Grid::uniform(1)?;
        stack.push(
            self.header(number, spans).with_padding(
                Padding::zero()
                    .left(self.style.title_indent())
                    .bottom(HEADER_GAP),
            ),
        );

        let mut options = Grid::uniform(columns)?;
        for option in &desc.options {
            let answer = option.answer.as_deref().unwrap_or("");
            options.push(self.option_cell(&option.label, answer)?);
        }
        options.pad_last_row();
        stack.push(LayoutBox::grid(options));

        if let Some(other) = &desc.other {
            stack.push(
                self.other_row(columns, other)?
                    .with_padding(Padding::zero().top(HEADER_GAP)),
            );
        }

        Ok(self.field_box(stack, self.style.content_padding))
    }

    /// Places fields side by side. Each field's outer border becomes a plain
    /// box, replacing the rounded bottom border it was composed with.
    pub fn compose_row(&self, boxes: Vec<LayoutBox>, weights: &[f32]) -> Result<LayoutBox> {
        if boxes.len() != weights.len() {
            return Err(AppError::InvalidInput(format!(
                "row has {} fields but {} widths",
                boxes.len(),
                weights.len()
            )));
        }

        let mut row = Grid::new(weights)?;
        for field in boxes {
            row.push(
                field
                    .with_border(Border::Box, self.style.border_width)
                    .with_colspan(1),
            );
        }
        Ok(LayoutBox::grid(row))
    }

    // ------------------------------------------------------------------------

    fn field_box(&self, content: Grid, padding: f32) -> LayoutBox {
        LayoutBox::grid(content)
            .with_border(Border::RoundedBottom, self.style.border_width)
            .with_padding(Padding::all(padding))
    }

    /// Title text pushed right of the number square painted at the cell's
    /// top-left corner.
    fn header(&self, number: &str, spans: Vec<Span>) -> LayoutBox {
        LayoutBox::text(spans)
            .with_align(HAlign::Left, VAlign::Middle)
            .with_padding(Padding::zero().left(self.style.title_indent()))
            .with_min_height(self.style.number_square + self.style.border_width)
            .with_decoration(Decoration::TopLeftSquare {
                size: self.style.number_square,
                text: number.to_string(),
            })
    }

    fn answer_box(&self, answer: &str) -> LayoutBox {
        LayoutBox::label(answer, FontRole::Content)
            .with_align(HAlign::Center, VAlign::Middle)
            .with_min_height(self.style.answer_box_size + self.style.answer_border_width)
            .with_decoration(Decoration::CenteredSquare {
                size: self.style.answer_box_size,
                line_width: self.style.answer_border_width,
            })
    }

    fn checkbox(&self, answer: &str) -> LayoutBox {
        LayoutBox::label(answer, FontRole::Checkbox)
            .with_align(HAlign::Center, VAlign::Middle)
            .with_min_height(self.style.checkbox_size + self.style.border_width)
            .with_decoration(Decoration::CenteredSquare {
                size: self.style.checkbox_size,
                line_width: self.style.border_width,
            })
    }

    fn option_cell(&self, label: &str, answer: &str) -> Result<LayoutBox> {
        let mut micro = Grid::new(&OPTION_WEIGHTS)?;
        micro.push(self.checkbox(answer));
        micro.push(
            LayoutBox::label(label, FontRole::Legend)
                .with_align(HAlign::Left, VAlign::Middle)
                .with_padding(Padding::zero().left(LABEL_INDENT)),
        );
        Ok(LayoutBox::grid(micro).with_padding(Padding::all(OPTION_PADDING)))
    }

    /// Same column weights as the options grid: checkbox + label in the
    /// first column, the fill-in line merged across the rest. With a single
    /// column the fill-in line drops to its own row.
    fn other_row(&self, columns: usize, other: &OtherField) -> Result<LayoutBox> {
        let mut row = Grid::uniform(columns)?;
        row.push(self.option_cell(OTHER_LABEL, "")?);
        row.push(
            LayoutBox::label(other.value.as_deref().unwrap_or(""), FontRole::Content)
                .with_align(HAlign::Left, VAlign::Bottom)
                .with_border(Border::Bottom, self.style.border_width)
                .with_padding(Padding::zero().left(LABEL_INDENT).bottom(2.0))
                .with_colspan((columns - 1).max(1)),
        );
        Ok(LayoutBox::grid(row))
    }
}
