use sialo_core::models::config::Config;
use sialo_core::models::record::EvaluationRecord;
use sialo_export::csv::{export_csv, quote_cell};
use sialo_export::json::{APP_NAME, EXPORT_VERSION, ExportSnapshot};
use sialo_export::print::print_html;
use sialo_export::styles::DocumentStyles;
use sialo_export::{ExportFormat, export, file_base};
use sialo_instruments::assessment::Assessment;

fn record() -> (Config, EvaluationRecord) {
    let config = Config::default();
    let mut record = EvaluationRecord::new(&config);
    record.data.patient_name = "  Ana   María Soto ".to_string();
    record.data.evaluation_date = "2024-05-02".to_string();
    record.data.age_years = "7".to_string();
    (config, record)
}

#[test]
fn cells_are_quoted_and_flattened() {
    assert_eq!(quote_cell("plain"), "\"plain\"");
    assert_eq!(quote_cell("say \"hi\""), "\"say \"\"hi\"\"\"");
    assert_eq!(quote_cell("line one\nline two"), "\"line one\\nline two\"");
    assert_eq!(quote_cell("a\r\nb"), "\"a\\nb\"");
}

#[test]
fn csv_has_one_record_per_line() {
    let (config, mut record) = record();
    record.data.integration_comment = "first\nsecond".to_string();
    let assessment = Assessment::derive(&config, &record.data);
    let csv = export_csv(&config, &record.data, &assessment).unwrap();

    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], "\"field\",\"value\"");
    assert!(lines.iter().all(|l| l.starts_with('"') && l.ends_with('"')));
    assert!(lines.contains(&"\"integration_comment\",\"first\\nsecond\""));
    assert!(lines.contains(&"\"patient_name\",\"Ana   María Soto\""));
    assert!(lines.contains(&"\"dq5_average_pct\",\"0.0\""));
    assert!(lines.contains(&"\"dis_total\",\"10\""));
    assert!(lines.contains(&"\"impact_level\",\"LOW\""));
    assert!(lines.iter().any(|l| l.starts_with("\"narrative_report\",\"SIALORRHEA ASSESSMENT\\n")));
}

#[test]
fn csv_lists_every_instrument_subscale() {
    let (mut config, mut record) = record();
    config.add_impact_item();
    record.data.reconcile(&config);
    record.data.activity.intervals[2] = 1;
    record.data.severity = 4;
    record.data.impact_scores[10] = 7;
    let assessment = Assessment::derive(&config, &record.data);
    let csv = export_csv(&config, &record.data, &assessment).unwrap();
    let lines: Vec<&str> = csv.lines().collect();

    assert!(lines.contains(&"\"dq5_activity_03\",\"1\""));
    assert!(lines.contains(&"\"dq5_rest_20\",\"0\""));
    assert!(lines.contains(&"\"daily_frequency_eating_drinking\",\"0\""));
    assert!(lines.contains(&"\"thomas_stonell_severity\",\"4\""));
    assert!(lines.contains(&"\"dis_item_11\",\"7\""));
    assert!(lines.contains(&"\"dis_item_11_label\",\"New DIS item\""));
}

#[test]
fn json_snapshot_carries_meta_config_and_record() {
    let (config, record) = record();
    let bytes = export(ExportFormat::Json, &config, &record).unwrap();
    let snapshot: ExportSnapshot = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(snapshot.meta.app, APP_NAME);
    assert_eq!(snapshot.meta.version, EXPORT_VERSION);
    assert_eq!(snapshot.config, config);
    assert_eq!(snapshot.evaluation, record);
}

#[test]
fn print_html_escapes_report_text() {
    let html = print_html("Score <b>&</b> \"quoted\"", &DocumentStyles::default()).unwrap();
    assert!(html.starts_with("<!doctype html>"));
    assert!(html.contains("Score &lt;b&gt;&amp;"));
    assert!(!html.contains("<b>"));
    assert!(html.contains("window.print()"));
}

#[test]
fn html_export_uses_stored_report() {
    let (config, mut record) = record();
    record.data.report = "Hand-written report".to_string();
    let bytes = export(ExportFormat::Html, &config, &record).unwrap();
    let html = String::from_utf8(bytes).unwrap();
    assert!(html.contains("<pre>Hand-written report</pre>"));
}

#[test]
fn docx_export_is_a_zip_package() {
    let (config, record) = record();
    let bytes = export(ExportFormat::Docx, &config, &record).unwrap();
    assert!(bytes.len() > 100);
    assert_eq!(&bytes[..2], b"PK");
}

#[test]
fn file_base_normalises_name() {
    let (_, mut record) = record();
    assert_eq!(
        file_base(&record.data),
        "sialorrhea_assessment_Ana_María_Soto_2024-05-02"
    );

    record.data.patient_name = "   ".to_string();
    assert_eq!(
        file_base(&record.data),
        "sialorrhea_assessment_patient_2024-05-02"
    );
}

#[test]
fn format_metadata() {
    assert_eq!(ExportFormat::Csv.extension(), "csv");
    assert_eq!(ExportFormat::Json.content_type(), "application/json");
    assert!(ExportFormat::Docx.content_type().contains("wordprocessingml"));
}
