//! Two-column `field,value` export of raw fields and derived results.

use sialo_core::models::config::Config;
use sialo_core::models::evaluation::{EvaluationData, ObservationSession, Objective, SessionKind};
use sialo_instruments::all_instruments;
use sialo_instruments::assessment::Assessment;
use sialo_instruments::scoring::format_pct;

use crate::error::ExportError;
use crate::render::{diagnosis_text, report_text};

struct Rows(Vec<(String, String)>);

impl Rows {
    fn push(&mut self, field: impl Into<String>, value: impl ToString) {
        self.0.push((field.into(), value.to_string()));
    }

    fn session(&mut self, kind: SessionKind, session: &ObservationSession) {
        let prefix = format!("dq5_{}", kind.label());
        self.push(format!("{prefix}_context"), &session.context);

        let c = &session.conditions;
        self.push(format!("{prefix}_condition_awake"), c.awake);
        self.push(format!("{prefix}_condition_seated"), c.seated);
        self.push(format!("{prefix}_condition_no_intake"), c.no_intake);
        self.push(format!("{prefix}_condition_baseline_activity"), c.baseline_activity);
        self.push(format!("{prefix}_condition_other"), c.other);
        self.push(format!("{prefix}_condition_other_text"), &c.other_text);

        let p = &session.pattern;
        self.push(format!("{prefix}_pattern_anterior_spill"), p.anterior_spill);
        self.push(format!("{prefix}_pattern_open_mouth_posture"), p.open_mouth_posture);
        self.push(format!("{prefix}_pattern_reduced_swallowing"), p.reduced_swallowing);
        self.push(format!("{prefix}_pattern_hypotonia"), p.hypotonia);
        self.push(format!("{prefix}_pattern_other"), p.other);
        self.push(format!("{prefix}_pattern_other_text"), &p.other_text);
    }
}

/// Quote a cell: double embedded quotes, flatten line breaks to a literal `\n`.
pub fn quote_cell(value: &str) -> String {
    let flat = value.replace("\r\n", "\\n").replace(['\n', '\r'], "\\n");
    format!("\"{}\"", flat.replace('"', "\"\""))
}

/// Build the CSV text. The report and diagnosis columns hold the stored
/// text when present, the generated text otherwise.
pub fn export_csv(
    config: &Config,
    data: &EvaluationData,
    assessment: &Assessment,
) -> Result<String, ExportError> {
    let mut rows = Rows(Vec::new());
    rows.push("field", "value");

    // Identification
    rows.push("patient_name", data.display_name());
    rows.push(
        "record_number",
        if data.record_number.trim().is_empty() { "NN" } else { data.record_number.trim() },
    );
    rows.push("evaluation_date", &data.evaluation_date);
    rows.push("age_years", &data.age_years);
    rows.push(
        "age_months",
        data.age_months.map(|m| m.to_string()).unwrap_or_default(),
    );
    rows.push("base_diagnosis", &data.base_diagnosis);
    rows.push("context", data.context.label());
    rows.push("evaluator", &data.evaluator);
    rows.push("general_observations", &data.general_observations);

    // Context and history
    rows.push("evaluation_reason", &data.evaluation_reason);
    rows.push("previous_date", &data.previous.date);
    rows.push("previous_elapsed", &data.previous.elapsed);
    rows.push("previous_results", &data.previous.results);

    // DQ5
    rows.session(SessionKind::Activity, &data.activity);
    rows.session(SessionKind::Rest, &data.rest);

    // Raw scores, one row per subscale of each instrument
    for instrument in all_instruments(config) {
        let entries = instrument.score_entries(data);
        for subscale in instrument.domains().iter().flat_map(|d| &d.subscales) {
            if let Some(entry) = entries.iter().find(|e| e.subscale_id == subscale.id) {
                rows.push(format!("{}_{}", instrument.id(), subscale.id), entry.value);
            }
        }
    }

    let dual = &assessment.dual;
    rows.push("dq5_activity_escapes", dual.activity.escape_count);
    rows.push("dq5_activity_pct", format_pct(dual.activity.pct));
    rows.push("dq5_rest_escapes", dual.rest.escape_count);
    rows.push("dq5_rest_pct", format_pct(dual.rest.pct));
    rows.push("dq5_average_pct", format_pct(dual.average));
    rows.push("dq5_category", dual.category.label());

    rows.push("daily_total", assessment.daily.total);
    rows.push("daily_description", &assessment.daily.description);

    rows.push("thomas_stonell_severity_category", assessment.backup.severity.label());
    rows.push("thomas_stonell_frequency_category", assessment.backup.frequency.label());

    for (i, label) in config.impact_items.iter().enumerate() {
        rows.push(format!("dis_item_{:02}_label", i + 1), label);
    }
    rows.push("dis_total", assessment.impact.total);
    rows.push("dis_max", assessment.impact.max);
    rows.push("dis_pct", format_pct(assessment.impact.pct));
    rows.push("dis_category", assessment.impact.category.label());

    // Synthesis
    rows.push("impact_level", assessment.classification.level.label());
    rows.push("is_high_impact", assessment.classification.is_high_impact);
    rows.push("worsened", assessment.classification.worsened);
    rows.push("evolution", assessment.evolution.label());
    rows.push("concordance", assessment.concordance.code());
    rows.push("clinical_profile", &assessment.profile.label);
    rows.push("integration_comment", &data.integration_comment);
    rows.push("etiology", data.etiology.qualifier());

    // Plan
    for objective in Objective::ALL {
        rows.push(
            format!("objective_{}", objective_id(objective)),
            data.plan.objectives.is_selected(objective),
        );
    }
    rows.push("reevaluation_weeks", data.plan.reevaluation_weeks);
    rows.push("referral_medical", data.plan.referrals.medical);
    rows.push("referral_dermatology", data.plan.referrals.dermatology);
    rows.push("referral_dentistry", data.plan.referrals.dentistry);
    rows.push("plan_notes", &data.plan.notes);

    rows.push("narrative_report", report_text(data, assessment)?);
    rows.push("diagnosis", diagnosis_text(data, assessment)?);

    let lines: Vec<String> = rows
        .0
        .iter()
        .map(|(field, value)| format!("{},{}", quote_cell(field), quote_cell(value)))
        .collect();
    Ok(lines.join("\n"))
}

fn objective_id(objective: Objective) -> &'static str {
    match objective {
        Objective::LipSeal => "lip_seal",
        Objective::SwallowFrequency => "swallow_frequency",
        Objective::SensoryAwareness => "sensory_awareness",
        Objective::PosturalManagement => "postural_management",
        Objective::CaregiverTraining => "caregiver_training",
    }
}
