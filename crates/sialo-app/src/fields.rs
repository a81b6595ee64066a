//! Dotted field paths for the command line, e.g. `activity.interval.3` or
//! `daily.eating_drinking`, turned into [`FieldEdit`]s.
//!
//! Slot and item numbers are 1-based, as printed on the forms. Enum values
//! use their snake_case names. Numbers are passed through unclamped; the
//! record clamps them when the edit is applied.

use serde::de::DeserializeOwned;
use serde_json::Value;

use sialo_core::edit::FieldEdit;
use sialo_core::models::evaluation::SessionKind;

use crate::error::AppError;

/// Every accepted path shape, for help output.
pub const FIELD_PATHS: &[&str] = &[
    "patient_name",
    "record_number",
    "evaluation_date",
    "age_years",
    "age_months",
    "base_diagnosis",
    "context",
    "evaluator",
    "general_observations",
    "evaluation_reason",
    "previous.date",
    "previous.elapsed",
    "previous.results",
    "<activity|rest>.interval.<1-20>",
    "<activity|rest>.context",
    "<activity|rest>.condition.<awake|seated|no_intake|baseline_activity|other>",
    "<activity|rest>.condition_other",
    "<activity|rest>.pattern.<anterior_spill|open_mouth_posture|reduced_swallowing|hypotonia|other>",
    "<activity|rest>.pattern_other",
    "daily.<seated|standing|in_bed|speaking|eating_drinking>",
    "severity",
    "frequency",
    "impact.<item>",
    "integration_comment",
    "etiology",
    "objective.<lip_seal|swallow_frequency|sensory_awareness|postural_management|caregiver_training>",
    "reevaluation_weeks",
    "referral.<medical|dermatology|dentistry>",
    "plan_notes",
    "report",
    "diagnosis",
];

pub fn parse_edit(path: &str, value: &str) -> Result<FieldEdit, AppError> {
    let parts: Vec<&str> = path.trim().split('.').collect();
    let text = || value.to_string();

    let edit = match parts.as_slice() {
        ["patient_name"] => FieldEdit::PatientName(text()),
        ["record_number"] => FieldEdit::RecordNumber(text()),
        ["evaluation_date"] => FieldEdit::EvaluationDate(text()),
        ["age_years"] => FieldEdit::AgeYears(text()),
        ["age_months"] if value.trim().is_empty() => FieldEdit::AgeMonths(None),
        ["age_months"] => FieldEdit::AgeMonths(Some(number(path, value)?)),
        ["base_diagnosis"] => FieldEdit::BaseDiagnosis(text()),
        ["context"] => FieldEdit::Context(variant(path, value, "clinical, educational, home or other")?),
        ["evaluator"] => FieldEdit::Evaluator(text()),
        ["general_observations"] => FieldEdit::GeneralObservations(text()),

        ["evaluation_reason"] => FieldEdit::EvaluationReason(text()),
        ["previous", "date"] => FieldEdit::PreviousDate(text()),
        ["previous", "elapsed"] => FieldEdit::PreviousElapsed(text()),
        ["previous", "results"] => FieldEdit::PreviousResults(text()),

        [session @ ("activity" | "rest"), rest @ ..] => {
            let session = if *session == "activity" {
                SessionKind::Activity
            } else {
                SessionKind::Rest
            };
            session_edit(session, rest, path, value)?
        }

        ["daily", activity] => FieldEdit::DailyFrequency {
            activity: variant(path, activity, "a daily activity")?,
            score: number(path, value)?,
        },
        ["severity"] => FieldEdit::Severity(number(path, value)?),
        ["frequency"] => FieldEdit::Frequency(number(path, value)?),
        ["impact", item] => FieldEdit::ImpactScore {
            index: ordinal(path, item)?,
            score: number(path, value)?,
        },

        ["integration_comment"] => FieldEdit::IntegrationComment(text()),
        ["etiology"] => FieldEdit::Etiology(variant(
            path,
            value,
            "neuromotor, sensory, mixed or under_evaluation",
        )?),

        ["objective", objective] => FieldEdit::Objective {
            objective: variant(path, objective, "a plan objective")?,
            on: flag(path, value)?,
        },
        ["reevaluation_weeks"] => FieldEdit::ReevaluationWeeks(number(path, value)?),
        ["referral", referral] => FieldEdit::Referral {
            referral: variant(path, referral, "medical, dermatology or dentistry")?,
            on: flag(path, value)?,
        },
        ["plan_notes"] => FieldEdit::PlanNotes(text()),

        ["report"] => FieldEdit::Report(text()),
        ["diagnosis"] => FieldEdit::Diagnosis(text()),

        _ => return Err(AppError::UnknownField(path.to_string())),
    };
    Ok(edit)
}

fn session_edit(
    session: SessionKind,
    rest: &[&str],
    path: &str,
    value: &str,
) -> Result<FieldEdit, AppError> {
    let edit = match rest {
        ["interval", slot] => FieldEdit::Interval {
            session,
            index: ordinal(path, slot)?,
            escaped: flag(path, value)?,
        },
        ["context"] => FieldEdit::SessionContext {
            session,
            text: value.to_string(),
        },
        ["condition", condition] => FieldEdit::Condition {
            session,
            condition: variant(path, condition, "an observation condition")?,
            on: flag(path, value)?,
        },
        ["condition_other"] => FieldEdit::ConditionOther {
            session,
            text: value.to_string(),
        },
        ["pattern", pattern] => FieldEdit::Pattern {
            session,
            pattern: variant(path, pattern, "an observed pattern")?,
            on: flag(path, value)?,
        },
        ["pattern_other"] => FieldEdit::PatternOther {
            session,
            text: value.to_string(),
        },
        _ => return Err(AppError::UnknownField(path.to_string())),
    };
    Ok(edit)
}

fn invalid(field: &str, value: &str, expected: &'static str) -> AppError {
    AppError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        expected,
    }
}

/// Parse a snake_case enum name through its serde representation.
fn variant<T: DeserializeOwned>(
    field: &str,
    value: &str,
    expected: &'static str,
) -> Result<T, AppError> {
    let name = value.trim().to_ascii_lowercase().replace('-', "_");
    serde_json::from_value(Value::String(name)).map_err(|_| invalid(field, value, expected))
}

fn number(field: &str, value: &str) -> Result<f64, AppError> {
    value
        .trim()
        .parse()
        .map_err(|_| invalid(field, value, "a number"))
}

fn flag(field: &str, value: &str) -> Result<bool, AppError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(invalid(field, value, "true or false")),
    }
}

/// 1-based position to 0-based index.
pub fn ordinal(field: &str, value: &str) -> Result<usize, AppError> {
    match value.trim().parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n - 1),
        _ => Err(invalid(field, value, "a position starting at 1")),
    }
}
