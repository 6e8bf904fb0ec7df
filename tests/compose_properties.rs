//! Property-based tests for field composition and layout
//!
//! Checks the option grid shape, answer pairing and measured heights over
//! arbitrary option lists and column counts.

use form_fields_pdf::engine::Engine;
use form_fields_pdf::layout::LayoutBox;
use form_fields_pdf::{pair_options, FieldComposer, FieldSpec, OtherField, Style};
use proptest::prelude::*;

fn label_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z /]{0,24}"
}

fn answer_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        Just("1".to_string()),
        Just("2".to_string()),
        Just("9".to_string()),
    ]
}

fn options_grid(field: &LayoutBox) -> &form_fields_pdf::layout::Grid {
    let stack = field.as_grid().expect("field is a grid");
    stack.cells()[1].as_grid().expect("options grid")
}

fn option_label(cell: &LayoutBox) -> String {
    cell.as_grid().expect("option cell").cells()[1]
        .as_text()
        .expect("label")
        .plain_text()
}

fn option_answer(cell: &LayoutBox) -> String {
    cell.as_grid().expect("option cell").cells()[0]
        .as_text()
        .expect("checkbox")
        .plain_text()
}

proptest! {
    #[test]
    fn test_option_grid_is_padded_rectangle(
        labels in prop::collection::vec(label_strategy(), 0..30),
        columns in 1i64..7,
    ) {
        let style = Style::default();
        let composer = FieldComposer::new(&style);
        let refs: Vec<&str> = labels.iter().map(String::as_str).collect();
        let options = pair_options(&refs, &[]);
        let field = composer
            .compose(&FieldSpec::multiple_choice("1", "T", "L", options, columns, None))
            .unwrap();

        let grid = options_grid(&field);
        let c = columns as usize;
        let expected = (labels.len() + c - 1) / c * c;
        prop_assert_eq!(grid.cells().len(), expected);
        prop_assert!(grid.is_rectangular());
        prop_assert!(grid.cells()[labels.len()..].iter().all(|cell| cell.is_blank()));
    }

    #[test]
    fn test_options_fill_row_major(
        labels in prop::collection::vec(label_strategy(), 1..30),
        columns in 1i64..7,
    ) {
        let style = Style::default();
        let composer = FieldComposer::new(&style);
        let refs: Vec<&str> = labels.iter().map(String::as_str).collect();
        let options = pair_options(&refs, &[]);
        let field = composer
            .compose(&FieldSpec::multiple_choice("1", "T", "L", options, columns, None))
            .unwrap();

        let rows = options_grid(&field).rows();
        let c = columns as usize;
        for (i, label) in labels.iter().enumerate() {
            let slot = rows[i / c][i % c];
            prop_assert_eq!(slot.column, i % c);
            prop_assert_eq!(&option_label(slot.cell), label);
        }
    }

    #[test]
    fn test_short_answer_lists_leave_blanks(
        labels in prop::collection::vec(label_strategy(), 1..20),
        answers in prop::collection::vec(answer_strategy(), 0..20),
    ) {
        let style = Style::default();
        let composer = FieldComposer::new(&style);
        let labels: Vec<&str> = labels.iter().map(String::as_str).collect();
        let answers: Vec<&str> = answers.iter().map(String::as_str).collect();
        let options = pair_options(&labels, &answers);
        let field = composer
            .compose(&FieldSpec::multiple_choice("1", "T", "L", options, 3, None))
            .unwrap();

        let grid = options_grid(&field);
        for i in 0..labels.len() {
            let expected = answers.get(i).copied().unwrap_or("");
            prop_assert_eq!(option_answer(&grid.cells()[i]), expected);
        }
    }

    #[test]
    fn test_measured_height_respects_min_height(
        content in "[a-z ]{0,400}",
        min_height in 0.0f32..300.0,
        width in 80.0f32..560.0,
    ) {
        let style = Style::default();
        let composer = FieldComposer::new(&style);
        let engine = Engine::new(&style);
        let field =
            FieldSpec::descriptive("32", "Ocupação", Some(content.as_str()), Some(min_height));
        let field = composer.compose(&field).unwrap();
        prop_assert!(engine.measure(&field, width) >= min_height);
    }

    #[test]
    fn test_other_row_spans_remaining_columns(columns in 2i64..7) {
        let style = Style::default();
        let composer = FieldComposer::new(&style);
        let field = composer
            .compose(&FieldSpec::multiple_choice(
                "1",
                "T",
                "L",
                pair_options(&["A"], &[]),
                columns,
                Some(OtherField::default()),
            ))
            .unwrap();

        let other = field.as_grid().unwrap().cells()[2].as_grid().unwrap();
        let rows = other.rows();
        prop_assert_eq!(rows.len(), 1);
        prop_assert_eq!(rows[0][1].span, columns as usize - 1);
    }
}
