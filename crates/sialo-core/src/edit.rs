//! Scalar field edits.
//!
//! The presentation layer writes one field at a time. Numeric entries are
//! clamped into their declared range here, at the point of entry, and are
//! never rejected.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreError;
use crate::models::config::Config;
use crate::models::evaluation::{
    AGE_MONTHS, Bounds, Condition, DAILY_FREQUENCY, DailyActivity, Etiology, EvaluationContext,
    EvaluationData, FREQUENCY, INTERVAL_COUNT, Objective, Pattern, REEVALUATION_WEEKS, Referral,
    SEVERITY, SessionKind,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
#[ts(export)]
pub enum FieldEdit {
    PatientName(String),
    RecordNumber(String),
    EvaluationDate(String),
    AgeYears(String),
    /// `None` clears the field.
    AgeMonths(Option<f64>),
    BaseDiagnosis(String),
    Context(EvaluationContext),
    Evaluator(String),
    GeneralObservations(String),

    EvaluationReason(String),
    PreviousDate(String),
    PreviousElapsed(String),
    PreviousResults(String),

    Interval {
        session: SessionKind,
        index: usize,
        escaped: bool,
    },
    SessionContext {
        session: SessionKind,
        text: String,
    },
    Condition {
        session: SessionKind,
        condition: Condition,
        on: bool,
    },
    ConditionOther {
        session: SessionKind,
        text: String,
    },
    Pattern {
        session: SessionKind,
        pattern: Pattern,
        on: bool,
    },
    PatternOther {
        session: SessionKind,
        text: String,
    },

    DailyFrequency {
        activity: DailyActivity,
        score: f64,
    },
    Severity(f64),
    Frequency(f64),
    ImpactScore {
        index: usize,
        score: f64,
    },

    IntegrationComment(String),
    Etiology(Etiology),

    Objective {
        objective: Objective,
        on: bool,
    },
    ReevaluationWeeks(f64),
    Referral {
        referral: Referral,
        on: bool,
    },
    PlanNotes(String),

    Report(String),
    Diagnosis(String),
}

impl EvaluationData {
    /// Write a single field. Only out-of-range indices fail; numeric values
    /// are clamped.
    pub fn apply(&mut self, edit: FieldEdit, config: &Config) -> Result<(), CoreError> {
        match edit {
            FieldEdit::PatientName(v) => self.patient_name = v,
            FieldEdit::RecordNumber(v) => self.record_number = v,
            FieldEdit::EvaluationDate(v) => self.evaluation_date = v,
            FieldEdit::AgeYears(v) => self.age_years = v,
            FieldEdit::AgeMonths(v) => self.age_months = v.map(|raw| AGE_MONTHS.clamp(raw)),
            FieldEdit::BaseDiagnosis(v) => self.base_diagnosis = v,
            FieldEdit::Context(v) => self.context = v,
            FieldEdit::Evaluator(v) => self.evaluator = v,
            FieldEdit::GeneralObservations(v) => self.general_observations = v,

            FieldEdit::EvaluationReason(v) => self.evaluation_reason = v,
            FieldEdit::PreviousDate(v) => self.previous.date = v,
            FieldEdit::PreviousElapsed(v) => self.previous.elapsed = v,
            FieldEdit::PreviousResults(v) => self.previous.results = v,

            FieldEdit::Interval {
                session,
                index,
                escaped,
            } => {
                if index >= INTERVAL_COUNT {
                    return Err(CoreError::IndexOutOfRange {
                        field: "intervals",
                        index,
                        len: INTERVAL_COUNT,
                    });
                }
                self.session_mut(session).intervals[index] = u8::from(escaped);
            }
            FieldEdit::SessionContext { session, text } => self.session_mut(session).context = text,
            FieldEdit::Condition {
                session,
                condition,
                on,
            } => *self.session_mut(session).conditions.flag_mut(condition) = on,
            FieldEdit::ConditionOther { session, text } => {
                self.session_mut(session).conditions.other_text = text
            }
            FieldEdit::Pattern {
                session,
                pattern,
                on,
            } => *self.session_mut(session).pattern.flag_mut(pattern) = on,
            FieldEdit::PatternOther { session, text } => {
                self.session_mut(session).pattern.other_text = text
            }

            FieldEdit::DailyFrequency { activity, score } => {
                self.daily_frequency
                    .set(activity, DAILY_FREQUENCY.clamp(score))
            }
            FieldEdit::Severity(v) => self.severity = SEVERITY.clamp(v),
            FieldEdit::Frequency(v) => self.frequency = FREQUENCY.clamp(v),
            FieldEdit::ImpactScore { index, score } => {
                let len = self.impact_scores.len();
                let scale = config.impact_scale.normalized();
                let bounds = Bounds::new(scale.min, scale.max);
                let slot = self
                    .impact_scores
                    .get_mut(index)
                    .ok_or(CoreError::IndexOutOfRange {
                        field: "impact_scores",
                        index,
                        len,
                    })?;
                *slot = bounds.clamp(score);
            }

            FieldEdit::IntegrationComment(v) => self.integration_comment = v,
            FieldEdit::Etiology(v) => self.etiology = v,

            FieldEdit::Objective { objective, on } => *self.plan.objectives.flag_mut(objective) = on,
            FieldEdit::ReevaluationWeeks(v) => self.plan.reevaluation_weeks = REEVALUATION_WEEKS.clamp(v),
            FieldEdit::Referral { referral, on } => *self.plan.referrals.flag_mut(referral) = on,
            FieldEdit::PlanNotes(v) => self.plan.notes = v,

            FieldEdit::Report(v) => self.report = v,
            FieldEdit::Diagnosis(v) => self.diagnosis = v,
        }
        Ok(())
    }

    /// Flip one DQ5 slot.
    pub fn toggle_interval(&mut self, session: SessionKind, index: usize) -> Result<(), CoreError> {
        let slot = self
            .session_mut(session)
            .intervals
            .get_mut(index)
            .ok_or(CoreError::IndexOutOfRange {
                field: "intervals",
                index,
                len: INTERVAL_COUNT,
            })?;
        *slot = if *slot == 1 { 0 } else { 1 };
        Ok(())
    }
}
