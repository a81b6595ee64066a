use serde::Serialize;
use tera::{Context, Tera};

use sialo_core::models::evaluation::{EvaluationData, INTERVAL_COUNT, UNKNOWN_AGE};
use sialo_instruments::assessment::Assessment;
use sialo_instruments::scoring::format_pct;
use sialo_instruments::synthesis::ImpactLevel;

use crate::error::ExportError;

const NARRATIVE_TEMPLATE: &str = include_str!("../templates/narrative.txt");
const DIAGNOSIS_TEMPLATE: &str = include_str!("../templates/diagnosis.txt");

/// Lines of the narrative report that open a section, title first.
pub const SECTION_TITLES: [&str; 9] = [
    "SIALORRHEA ASSESSMENT",
    "Identification",
    "Context and history",
    "Drooling frequency scale",
    "Drooling impact scale",
    "DQ5",
    "In summary,",
    "Recommendations and agreements",
    "Disposition",
];

/// Title line of the orienting diagnosis.
pub const DIAGNOSIS_TITLE: &str = "ORIENTING SPEECH-LANGUAGE DIAGNOSIS";

const NOT_SPECIFIED: &str = "[not specified]";
const DEFAULT_REASON: &str = "follow-up";
const NO_ELAPSED: &str = "[time not specified]";
const NO_PREVIOUS: &str = "[no previous information]";
const NO_CONTEXT: &str = "unspecified";

/// Render a Tera template against any serializable value.
///
/// The `template_content` is the raw template string (Jinja2 syntax).
/// Names ending in `.html` are autoescaped.
pub fn render_template<T: Serialize>(
    template_name: &str,
    template_content: &str,
    value: &T,
) -> Result<String, ExportError> {
    let mut tera = Tera::default();
    tera.add_raw_template(template_name, template_content)
        .map_err(|e| ExportError::TemplateParse(e.to_string()))?;

    let value = serde_json::to_value(value)?;
    let context = Context::from_value(value)
        .map_err(|e| ExportError::TemplateRender(e.to_string()))?;

    let rendered = tera.render(template_name, &context)?;
    Ok(rendered)
}

#[derive(Serialize)]
struct NarrativeContext<'a> {
    patient_name: &'a str,
    record_number: &'a str,
    age: String,
    evaluation_date: &'a str,
    base_diagnosis: &'a str,
    setting: &'static str,
    evaluator: &'a str,
    reason: &'a str,
    elapsed: &'a str,
    previous_results: &'a str,
    daily_total: u8,
    daily_max: u8,
    daily_description: &'a str,
    impact_total: u32,
    impact_max: u32,
    impact_pct: String,
    activity_pct: String,
    activity_context: &'a str,
    activity_escapes: usize,
    rest_pct: String,
    rest_context: &'a str,
    rest_escapes: usize,
    dq5_average: String,
    impact_level: &'static str,
    evolution: &'static str,
    recommendation: &'static str,
    plan_lines: Vec<String>,
}

#[derive(Serialize)]
struct DiagnosisContext {
    etiology: &'static str,
    dq5_pct: String,
    dq5_escapes: usize,
    dq5_slots: usize,
    dq5_category: &'static str,
    severity: &'static str,
    frequency: String,
    impact_total: u32,
    impact_max: u32,
    impact_pct: String,
    impact_category: String,
    profile: &'static str,
}

/// Trimmed text, or `placeholder` when blank.
fn or<'a>(text: &'a str, placeholder: &'a str) -> &'a str {
    let trimmed = text.trim();
    if trimmed.is_empty() { placeholder } else { trimmed }
}

fn age_text(data: &EvaluationData) -> String {
    let years = data.age_years.trim();
    if years.is_empty() || years.eq_ignore_ascii_case(UNKNOWN_AGE) {
        return UNKNOWN_AGE.to_string();
    }
    match data.age_months {
        Some(months) if months > 0 => format!("{years} years {months} months"),
        _ => format!("{years} years"),
    }
}

fn recommendation(assessment: &Assessment) -> &'static str {
    if assessment.classification.is_high_impact {
        "intensive speech-language intervention with interdisciplinary management"
    } else if assessment.classification.level == ImpactLevel::Moderate {
        "speech-language intervention focused on salivary control"
    } else {
        "continued follow-up with periodic reevaluation"
    }
}

fn plan_lines(data: &EvaluationData) -> Vec<String> {
    let plan = &data.plan;
    let mut lines: Vec<String> = plan
        .objectives
        .selected_labels()
        .into_iter()
        .map(|label| format!("- {label}"))
        .collect();

    let referrals: Vec<&str> = [
        (plan.referrals.medical, "medical"),
        (plan.referrals.dermatology, "dermatology"),
        (plan.referrals.dentistry, "dentistry"),
    ]
    .into_iter()
    .filter_map(|(on, name)| on.then_some(name))
    .collect();
    if !referrals.is_empty() {
        lines.push(format!("Referrals: {}.", referrals.join(", ")));
    }

    lines.push(format!(
        "Reevaluation in {} weeks.",
        plan.reevaluation_weeks
    ));
    if !plan.notes.trim().is_empty() {
        lines.push(plan.notes.trim().to_string());
    }
    lines
}

/// Generate the narrative report. Pure: the same inputs always produce the
/// same text.
pub fn render_report(data: &EvaluationData, assessment: &Assessment) -> Result<String, ExportError> {
    let dual = &assessment.dual;
    let context = NarrativeContext {
        patient_name: data.display_name(),
        record_number: or(&data.record_number, "NN"),
        age: age_text(data),
        evaluation_date: or(&data.evaluation_date, NOT_SPECIFIED),
        base_diagnosis: or(&data.base_diagnosis, NOT_SPECIFIED),
        setting: data.context.label(),
        evaluator: or(&data.evaluator, NOT_SPECIFIED),
        reason: or(&data.evaluation_reason, DEFAULT_REASON),
        elapsed: or(&data.previous.elapsed, NO_ELAPSED),
        previous_results: or(&data.previous.results, NO_PREVIOUS),
        daily_total: assessment.daily.total,
        daily_max: assessment.daily.max,
        daily_description: &assessment.daily.description,
        impact_total: assessment.impact.total,
        impact_max: assessment.impact.max,
        impact_pct: format_pct(assessment.impact.pct),
        activity_pct: format_pct(dual.activity.pct),
        activity_context: or(&dual.activity_context, NO_CONTEXT),
        activity_escapes: dual.activity.escape_count,
        rest_pct: format_pct(dual.rest.pct),
        rest_context: or(&dual.rest_context, NO_CONTEXT),
        rest_escapes: dual.rest.escape_count,
        dq5_average: format_pct(dual.average),
        impact_level: match assessment.classification.level {
            ImpactLevel::High => "high",
            ImpactLevel::Moderate => "moderate",
            ImpactLevel::Low => "low",
        },
        evolution: assessment.evolution.label(),
        recommendation: recommendation(assessment),
        plan_lines: plan_lines(data),
    };
    render_template("narrative.txt", NARRATIVE_TEMPLATE, &context)
}

/// Generate the orienting diagnosis text.
pub fn render_diagnosis(data: &EvaluationData, assessment: &Assessment) -> Result<String, ExportError> {
    let frequency = &assessment.representative;
    let context = DiagnosisContext {
        etiology: data.etiology.qualifier(),
        dq5_pct: format_pct(frequency.pct),
        dq5_escapes: frequency.escape_count,
        dq5_slots: 2 * INTERVAL_COUNT,
        dq5_category: frequency.category.label(),
        severity: assessment.backup.severity.label(),
        frequency: assessment.backup.frequency.label().to_lowercase(),
        impact_total: assessment.impact.total,
        impact_max: assessment.impact.max,
        impact_pct: format_pct(assessment.impact.pct),
        impact_category: assessment.impact.category.label().to_lowercase(),
        profile: assessment.profile.profile.label(),
    };
    render_template("diagnosis.txt", DIAGNOSIS_TEMPLATE, &context)
}

/// The report as it should be exported: the stored text when the clinician
/// has written or edited one, otherwise freshly generated.
pub fn report_text(data: &EvaluationData, assessment: &Assessment) -> Result<String, ExportError> {
    if data.report.trim().is_empty() {
        render_report(data, assessment)
    } else {
        Ok(data.report.clone())
    }
}

/// Same policy as [`report_text`], for the diagnosis.
pub fn diagnosis_text(data: &EvaluationData, assessment: &Assessment) -> Result<String, ExportError> {
    if data.diagnosis.trim().is_empty() {
        render_diagnosis(data, assessment)
    } else {
        Ok(data.diagnosis.clone())
    }
}
