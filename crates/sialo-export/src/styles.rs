use serde::{Deserialize, Serialize};

/// Typography shared by the DOCX and print-ready HTML exports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentStyles {
    /// Font for body text (e.g. "Times New Roman", "Calibri").
    pub body_font: String,

    /// Font for headings.
    pub heading_font: String,

    /// Body text font size in points.
    pub body_size: usize,

    /// Report title size in points.
    pub title_size: usize,

    /// Section heading size in points.
    pub section_size: usize,

    /// Page margin in inches (applied uniformly).
    pub margin_inches: f64,
}

impl Default for DocumentStyles {
    fn default() -> Self {
        Self {
            body_font: "Times New Roman".to_string(),
            heading_font: "Arial".to_string(),
            body_size: 12,
            title_size: 16,
            section_size: 13,
            margin_inches: 1.0,
        }
    }
}
