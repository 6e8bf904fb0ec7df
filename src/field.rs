// Field descriptions: what a form field says, independent of how it is laid out.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Printed in the black square, e.g. "29".
    pub number: String,
    #[serde(default)]
    pub title: String,
    #[serde(flatten)]
    pub kind: FieldKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldKind {
    Descriptive(Descriptive),
    LegendWithAnswer(LegendWithAnswer),
    MultipleChoice(MultipleChoice),
}

/// Free text that grows with its content.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Descriptive {
    #[serde(default)]
    pub content: Option<String>,
    /// Absent or <= 0 means size to content.
    #[serde(default)]
    pub min_height: Option<f32>,
}

/// Coded answer in a box, with the code legend under the title.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LegendWithAnswer {
    #[serde(default)]
    pub legend_lines: Vec<String>,
    #[serde(default)]
    pub answer: Option<String>,
}

/// Grid of checkbox options, optionally followed by an "Outros" fill-in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultipleChoice {
    #[serde(default)]
    pub legend: String,
    pub options: Vec<OptionAnswer>,
    /// Signed so that a bad count reaches the composer and is reported there.
    pub columns: i64,
    #[serde(default)]
    pub other: Option<OtherField>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionAnswer {
    pub label: String,
    #[serde(default)]
    pub answer: Option<String>,
}

impl OptionAnswer {
    pub fn new(label: impl Into<String>, answer: Option<&str>) -> Self {
        Self {
            label: label.into(),
            answer: answer.map(str::to_string),
        }
    }
}

/// Presence, not content, decides whether the "Outros" row is drawn.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OtherField {
    #[serde(default)]
    pub value: Option<String>,
}

impl FieldSpec {
    pub fn descriptive(
        number: impl Into<String>,
        title: impl Into<String>,
        content: Option<&str>,
        min_height: Option<f32>,
    ) -> Self {
        Self {
            number: number.into(),
            title: title.into(),
            kind: FieldKind::Descriptive(Descriptive {
                content: content.map(str::to_string),
                min_height,
            }),
        }
    }

    pub fn legend_with_answer(
        number: impl Into<String>,
        title: impl Into<String>,
        legend_lines: &[&str],
        answer: Option<&str>,
    ) -> Self {
        Self {
            number: number.into(),
            title: title.into(),
            kind: FieldKind::LegendWithAnswer(LegendWithAnswer {
                legend_lines: legend_lines.iter().map(|l| l.to_string()).collect(),
                answer: answer.map(str::to_string),
            }),
        }
    }

    pub fn multiple_choice(
        number: impl Into<String>,
        title: impl Into<String>,
        legend: impl Into<String>,
        options: Vec<OptionAnswer>,
        columns: i64,
        other: Option<OtherField>,
    ) -> Self {
        Self {
            number: number.into(),
            title: title.into(),
            kind: FieldKind::MultipleChoice(MultipleChoice {
                legend: legend.into(),
                options,
                columns,
                other,
            }),
        }
    }
}

/// Zips option labels with their answers by index. Missing or empty answers
/// leave the checkbox blank.
pub fn pair_options(labels: &[&str], answers: &[&str]) -> Vec<OptionAnswer> {
    labels
        .iter()
        .enumerate()
        .map(|(i, label)| {
            let answer = answers.get(i).copied().filter(|a| !a.is_empty());
            OptionAnswer::new(*label, answer)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_pair_options_with_short_answers() {
        let options = pair_options(&["Febre", "Cefaleia", "Mialgia"], &["1"]);
        assert_eq!(
            options,
            vec![
                OptionAnswer::new("Febre", Some("1")),
                OptionAnswer::new("Cefaleia", None),
                OptionAnswer::new("Mialgia", None),
            ]
        );
    }

    #[test]
    fn test_kind_is_tagged_in_json() {
        let json = r#"{
            "number": "29",
            "title": "Zona",
            "kind": "legend_with_answer",
            "legend_lines": ["1 - Urbana", "2 - Rural"],
            "answer": "1"
        }"#;
        let field: FieldSpec = serde_json::from_str(json).unwrap();
        assert_eq!(
            field,
            FieldSpec::legend_with_answer("29", "Zona", &["1 - Urbana", "2 - Rural"], Some("1"))
        );
    }

    #[test]
    fn test_multiple_choice_from_json() {
        let json = r#"{
            "number": "35",
            "title": "Resultado",
            "kind": "multiple_choice",
            "legend": "1 - Marcar",
            "columns": 2,
            "options": [{"label": "Positivo"}, {"label": "Negativo", "answer": "1"}],
            "other": {}
        }"#;
        let field: FieldSpec = serde_json::from_str(json).unwrap();
        match field.kind {
            FieldKind::MultipleChoice(mc) => {
                assert_eq!(mc.columns, 2);
                assert_eq!(mc.options[1].answer.as_deref(), Some("1"));
                assert_eq!(mc.other, Some(OtherField { value: None }));
            }
            other => panic!("unexpected kind {:?}", other),
        }
    }
}
