//! Numbered form fields (free text, coded answer boxes, checkbox grids)
//! composed into grid layouts and rendered to PDF.

pub mod canvas;
pub mod compose;
pub mod document;
pub mod engine;
pub mod error;
pub mod field;
pub mod form;
pub mod layout;
pub mod metrics;
pub mod paint;
pub mod style;

pub use canvas::{Canvas, PdfCanvas, RecordingCanvas};
pub use compose::{FieldComposer, OTHER_LABEL};
pub use document::{FormDocument, PageSetup};
pub use engine::Engine;
pub use error::{AppError, Result};
pub use field::{pair_options, FieldKind, FieldSpec, OptionAnswer, OtherField};
pub use form::{sample_form, FormSpec, RowField, RowSpec};
pub use layout::{Border, LayoutBox};
pub use style::{FontRole, Style};
