// Form descriptions loaded from JSON, and the built-in sample form.

use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::compose::FieldComposer;
use crate::document::{FormDocument, PageSetup};
use crate::error::{AppError, Result};
use crate::field::{pair_options, FieldSpec, OtherField};
use crate::layout::LayoutBox;
use crate::style::Style;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormSpec {
    pub title: String,
    #[serde(default)]
    pub page: PageSetup,
    #[serde(default)]
    pub style: Style,
    pub rows: Vec<RowSpec>,
}

/// Fields placed side by side on one line of the form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowSpec {
    pub fields: Vec<RowField>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowField {
    /// Relative width within the row.
    pub width: f32,
    pub field: FieldSpec,
}

impl RowSpec {
    pub fn single(field: FieldSpec) -> Self {
        Self {
            fields: vec![RowField { width: 100.0, field }],
        }
    }

    pub fn of(fields: Vec<(f32, FieldSpec)>) -> Self {
        Self {
            fields: fields
                .into_iter()
                .map(|(width, field)| RowField { width, field })
                .collect(),
        }
    }
}

impl FormSpec {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::FormError(format!("{}: {}", path.display(), e)))?;
        serde_json::from_str(&content)
            .map_err(|e| AppError::FormError(format!("Invalid JSON in {}: {}", path.display(), e)))
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| AppError::FormError(e.to_string()))
    }

    /// One block per row, each field composed and laid side by side.
    pub fn build(&self, composer: &FieldComposer) -> Result<Vec<LayoutBox>> {
        self.rows
            .iter()
            .enumerate()
            .map(|(index, row)| {
                debug!("row {}: {} fields", index + 1, row.fields.len());
                let boxes = row
                    .fields
                    .iter()
                    .map(|f| composer.compose(&f.field))
                    .collect::<Result<Vec<_>>>()?;
                let weights: Vec<f32> = row.fields.iter().map(|f| f.width).collect();
                composer.compose_row(boxes, &weights).map_err(|e| match e {
                    AppError::InvalidInput(msg) => {
                        AppError::InvalidInput(format!("row {}: {}", index + 1, msg))
                    }
                    other => other,
                })
            })
            .collect()
    }

    pub fn into_document(self) -> Result<FormDocument> {
        let blocks = self.build(&FieldComposer::new(&self.style))?;
        let mut doc = FormDocument::new(self.title, self.page, self.style);
        doc.blocks = blocks;
        Ok(doc)
    }

    pub fn field_count(&self) -> usize {
        self.rows.iter().map(|r| r.fields.len()).sum()
    }
}

// ============================================================================
// Sample
// ============================================================================

const SYMPTOMS: [&str; 21] = [
    "Febre",
    "Cefaléia",
    "Dor Abdominal",
    "Mialgia",
    "Náusea/Vômito",
    "Exantema",
    "Diarréia",
    "Icterícia",
    "Hiperemia Conjuntival",
    "Hepatomegalia/Esplenomegalia",
    "Petéquias",
    "Manifestações hemorrágicas",
    "Linfadenopatia",
    "Convulsão",
    "Necrose de extremidades",
    "Prostração",
    "Choque/Hipotensão",
    "Estupor/Coma",
    "Sufusão hemorrágica",
    "Alterações Respiratórias",
    "Oligúria/Anúria",
];

/// 1 = Sim, 2 = Não, 9 = Ignorado, empty = not filled in.
const SYMPTOM_ANSWERS: [&str; 21] = [
    "1", "2", "1", "9", "", "2", "1", "2", "", "9", "2", "2", "", "2", "2", "1", "2", "2", "2",
    "1", "2",
];

/// A notification form exercising every field kind.
pub fn sample_form() -> FormSpec {
    let phone = FieldSpec::descriptive("28", "(DDD) Telefone", Some("(11) 99999-9999"), None);
    let zone = FieldSpec::legend_with_answer(
        "29",
        "Zona",
        &["1 - Urbana    2 - Rural", "3 - Periurbana  9 - Ignorado"],
        Some("1"),
    );
    let country =
        FieldSpec::descriptive("30", "País (se residente fora do Brasil)", Some(""), None);

    let occupation = FieldSpec::descriptive(
        "32",
        "Ocupação",
        Some(
            "Engenheiro de Software - Desenvolvedor Full Stack com experiência em \
             sistemas distribuídos, microserviços e arquiteturas cloud-native. \
             Especializado em Java, Spring Boot e tecnologias de containerização.",
        ),
        Some(40.0),
    );

    let symptoms = FieldSpec::multiple_choice(
        "33",
        "Sinais e Sintomas",
        "1 - Sim    2 - Não    9 - Ignorado",
        pair_options(&SYMPTOMS, &SYMPTOM_ANSWERS),
        4,
        Some(OtherField {
            value: Some("Tosse seca persistente".to_string()),
        }),
    );

    let exams = FieldSpec::multiple_choice(
        "34",
        "Exames Solicitados",
        "1 - Sim  2 - Não  9 - Ignorado",
        pair_options(
            &["Hemograma", "Bioquímica", "Sorologia", "PCR", "Cultura", "Imagem"],
            &["1", "1", "2", "1", "9", "2"],
        ),
        2,
        None,
    );
    let result = FieldSpec::multiple_choice(
        "35",
        "Resultado",
        "1 - Marcar opção",
        pair_options(
            &["Positivo", "Negativo", "Inconclusivo", "Aguardando"],
            &["", "1", "", ""],
        ),
        2,
        None,
    );

    FormSpec {
        title: "Ficha de Notificação".to_string(),
        page: PageSetup::default(),
        style: Style::default(),
        rows: vec![
            RowSpec::of(vec![(30.0, phone), (25.0, zone), (45.0, country)]),
            RowSpec::single(occupation),
            RowSpec::single(symptoms),
            RowSpec::of(vec![(50.0, exams), (50.0, result)]),
        ],
    }
}
