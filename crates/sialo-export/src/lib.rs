//! sialo-export
//!
//! Narrative report and diagnosis rendering, plus the JSON, CSV, print-ready
//! HTML and DOCX exports of one evaluation.

pub mod csv;
pub mod docx;
pub mod error;
pub mod json;
pub mod print;
pub mod render;
pub mod styles;

use serde::{Deserialize, Serialize};
use sialo_core::models::config::Config;
use sialo_core::models::evaluation::EvaluationData;
use sialo_core::models::record::EvaluationRecord;
use sialo_instruments::assessment::Assessment;

use error::ExportError;
use render::{DIAGNOSIS_TITLE, SECTION_TITLES};
use styles::DocumentStyles;

const FILE_PREFIX: &str = "sialorrhea_assessment";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    Json,
    Csv,
    Html,
    Docx,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
            Self::Html => "html",
            Self::Docx => "docx",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::Csv => "text/csv",
            Self::Html => "text/html",
            Self::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
        }
    }
}

/// `sialorrhea_assessment_<name>_<date>`: whitespace runs in the name become
/// underscores, a blank name becomes "patient" and a blank date becomes
/// today's date.
pub fn file_base(data: &EvaluationData) -> String {
    let name = data.patient_name.split_whitespace().collect::<Vec<_>>().join("_");
    let name = if name.is_empty() { "patient".to_string() } else { name };
    let date = match data.evaluation_date.trim() {
        "" => jiff::Zoned::now().date().to_string(),
        date => date.to_string(),
    };
    format!("{FILE_PREFIX}_{name}_{date}")
}

/// Produce one export of `record` as bytes.
pub fn export(
    format: ExportFormat,
    config: &Config,
    record: &EvaluationRecord,
) -> Result<Vec<u8>, ExportError> {
    let data = &record.data;
    let assessment = Assessment::derive(config, data);
    let styles = DocumentStyles::default();

    let bytes = match format {
        ExportFormat::Json => json::export_json(config, record)?.into_bytes(),
        ExportFormat::Csv => csv::export_csv(config, data, &assessment)?.into_bytes(),
        ExportFormat::Html => {
            let text = render::report_text(data, &assessment)?;
            print::print_html(&text, &styles)?.into_bytes()
        }
        ExportFormat::Docx => {
            let report = render::report_text(data, &assessment)?;
            let diagnosis = render::diagnosis_text(data, &assessment)?;
            let mut headings = SECTION_TITLES.to_vec();
            headings.push(DIAGNOSIS_TITLE);
            docx::generate_docx(&[report.as_str(), diagnosis.as_str()], &headings, &styles)?
        }
    };

    tracing::info!(
        id = %record.id,
        format = format.extension(),
        bytes = bytes.len(),
        "evaluation exported"
    );
    Ok(bytes)
}
