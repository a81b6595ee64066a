use serde::Serialize;

use crate::error::ExportError;
use crate::render::render_template;
use crate::styles::DocumentStyles;

const PRINT_TEMPLATE: &str = include_str!("../templates/print.html");

pub const PRINT_TITLE: &str = "Report - Sialorrhea Assessment";

#[derive(Serialize)]
struct PrintContext<'a> {
    title: &'a str,
    text: &'a str,
    body_font: &'a str,
    body_size: usize,
    margin_inches: f64,
}

/// Wrap report text in a minimal HTML page that opens the print dialog on
/// load. The text is HTML-escaped.
pub fn print_html(text: &str, styles: &DocumentStyles) -> Result<String, ExportError> {
    let context = PrintContext {
        title: PRINT_TITLE,
        text,
        body_font: &styles.body_font,
        body_size: styles.body_size,
        margin_inches: styles.margin_inches,
    };
    render_template("print.html", PRINT_TEMPLATE, &context)
}
