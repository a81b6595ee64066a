//! The nine-step data-entry flow: per-step completeness checks and the
//! navigation rules for guided and quick mode.

use serde::{Deserialize, Serialize};
use sialo_core::models::config::Config;
use sialo_core::models::evaluation::{EvaluationData, UNKNOWN_AGE};
use sialo_core::models::record::Mode;
use ts_rs::TS;

use crate::Instrument;
use crate::assessment::Assessment;
use crate::error::InstrumentError;
use crate::instruments::thomas_stonell::{SEVERITY_ID, ThomasStonell};
use crate::synthesis::MIN_COMMENT_CHARS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Step {
    Identification,
    ContextHistory,
    Dq5Activity,
    Dq5Rest,
    DroolingFrequency,
    ThomasStonell,
    Dis,
    Synthesis,
    FinalReport,
}

impl Step {
    pub const ALL: [Step; 9] = [
        Self::Identification,
        Self::ContextHistory,
        Self::Dq5Activity,
        Self::Dq5Rest,
        Self::DroolingFrequency,
        Self::ThomasStonell,
        Self::Dis,
        Self::Synthesis,
        Self::FinalReport,
    ];

    pub const FIRST: Step = Self::Identification;
    pub const LAST: Step = Self::FinalReport;

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Result<Self, InstrumentError> {
        Self::ALL
            .get(index)
            .copied()
            .ok_or(InstrumentError::UnknownStep(index))
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Identification => "Identification",
            Self::ContextHistory => "Context/History",
            Self::Dq5Activity => "DQ5 Activity",
            Self::Dq5Rest => "DQ5 Rest",
            Self::DroolingFrequency => "Drooling Frequency",
            Self::ThomasStonell => "Thomas-Stonell",
            Self::Dis => "DIS",
            Self::Synthesis => "Synthesis",
            Self::FinalReport => "Final Report",
        }
    }

    pub fn hint(self) -> &'static str {
        match self {
            Self::Identification => "Fill in the fields to begin.",
            Self::ContextHistory => "Reason for evaluation and previous evaluation.",
            Self::Dq5Activity => "Observation during activity (5 min, 20 intervals).",
            Self::Dq5Rest => "Observation at rest (5 min, 20 intervals).",
            Self::DroolingFrequency => "0-15 scale across daily activities.",
            Self::ThomasStonell => "Clinical backup (not shown in the report).",
            Self::Dis => "Functional impact (1-10 per item).",
            Self::Synthesis => "Automatic classification and interpretation.",
            Self::FinalReport => "Editable, exportable narrative text.",
        }
    }

    fn next(self) -> Option<Self> {
        Self::ALL.get(self.index() + 1).copied()
    }

    fn prev(self) -> Option<Self> {
        self.index().checked_sub(1).map(|i| Self::ALL[i])
    }
}

/// Which synthesis rules apply. The legacy flow asks for a clinical comment
/// whenever the instruments disagree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum WizardFlow {
    #[default]
    Current,
    Legacy,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct StepCheck {
    pub valid: bool,
    pub message: Option<String>,
}

impl StepCheck {
    fn ok() -> Self {
        Self {
            valid: true,
            message: None,
        }
    }

    fn fail(message: &'static str) -> Self {
        Self {
            valid: false,
            message: Some(message.to_string()),
        }
    }

    fn into_result(self) -> Result<(), InstrumentError> {
        if self.valid {
            Ok(())
        } else {
            Err(InstrumentError::StepIncomplete(self.message.unwrap_or_default()))
        }
    }
}

pub const MISSING_DATE: &str = "Evaluation date is missing.";
pub const MISSING_AGE: &str = "Age (years) is missing; enter a number or \"NN\".";
pub const INVALID_AGE: &str = "Age (years) must be greater than 0 or \"NN\".";
pub const MISSING_SEVERITY: &str = "Complete the severity rating (Thomas-Stonell).";
pub const MISSING_FREQUENCY: &str = "Complete the frequency rating (Thomas-Stonell).";
pub const MISSING_COMMENT: &str =
    "Results are discordant: add a clinical integration comment before continuing.";

/// Completeness check for one step.
pub fn validate_step(
    step: Step,
    flow: WizardFlow,
    config: &Config,
    data: &EvaluationData,
) -> StepCheck {
    match step {
        Step::Identification => check_identification(data),
        Step::ThomasStonell => check_backup(data),
        Step::Synthesis if flow == WizardFlow::Legacy => check_synthesis(config, data),
        _ => StepCheck::ok(),
    }
}

fn check_identification(data: &EvaluationData) -> StepCheck {
    if data.evaluation_date.trim().is_empty() {
        return StepCheck::fail(MISSING_DATE);
    }
    let age = data.age_years.trim();
    if age.is_empty() {
        return StepCheck::fail(MISSING_AGE);
    }
    if age.eq_ignore_ascii_case(UNKNOWN_AGE) {
        return StepCheck::ok();
    }
    match age.parse::<f64>() {
        Ok(years) if years.is_finite() && years > 0.0 => StepCheck::ok(),
        _ => StepCheck::fail(INVALID_AGE),
    }
}

fn check_backup(data: &EvaluationData) -> StepCheck {
    let instrument = ThomasStonell;
    match instrument
        .validate_scores(&instrument.score_entries(data))
        .first()
    {
        None => StepCheck::ok(),
        Some(err) if err.subscale_id == SEVERITY_ID => StepCheck::fail(MISSING_SEVERITY),
        Some(_) => StepCheck::fail(MISSING_FREQUENCY),
    }
}

fn check_synthesis(config: &Config, data: &EvaluationData) -> StepCheck {
    let assessment = Assessment::derive(config, data);
    if assessment.concordance.requires_comment()
        && data.integration_comment.trim().chars().count() < MIN_COMMENT_CHARS
    {
        return StepCheck::fail(MISSING_COMMENT);
    }
    StepCheck::ok()
}

/// Display status of a step relative to the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum StepStatus {
    Active,
    Done,
    Invalid,
    Pending,
}

/// Outcome of a successful `next`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    Moved(Step),
    /// Already on the last step; the caller shows the review summary.
    Review,
}

/// Current position in the flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Wizard {
    pub step: Step,
    pub mode: Mode,
    pub flow: WizardFlow,
}

impl Default for Wizard {
    fn default() -> Self {
        Self {
            step: Step::FIRST,
            mode: Mode::default(),
            flow: WizardFlow::default(),
        }
    }
}

impl Wizard {
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// Guided mode refuses to leave an incomplete step. Quick mode moves
    /// unconditionally.
    pub fn next(&mut self, config: &Config, data: &EvaluationData) -> Result<Advance, InstrumentError> {
        if self.mode == Mode::Guided {
            validate_step(self.step, self.flow, config, data).into_result()?;
        }
        match self.step.next() {
            Some(step) => {
                self.step = step;
                Ok(Advance::Moved(step))
            }
            None => Ok(Advance::Review),
        }
    }

    /// Always allowed; a no-op on the first step.
    pub fn prev(&mut self) -> Step {
        if let Some(step) = self.step.prev() {
            self.step = step;
        }
        self.step
    }

    pub fn jump(&mut self, target: Step) -> Result<Step, InstrumentError> {
        if self.mode == Mode::Guided && target > self.step {
            return Err(InstrumentError::ForwardJump {
                current: self.step.index(),
                target: target.index(),
            });
        }
        self.step = target;
        Ok(target)
    }

    pub fn can_advance(&self, config: &Config, data: &EvaluationData) -> bool {
        self.mode == Mode::Quick || validate_step(self.step, self.flow, config, data).valid
    }

    pub fn statuses(&self, config: &Config, data: &EvaluationData) -> Vec<(Step, StepStatus)> {
        Step::ALL
            .iter()
            .map(|&step| {
                let status = if step == self.step {
                    StepStatus::Active
                } else if step > self.step {
                    StepStatus::Pending
                } else if validate_step(step, self.flow, config, data).valid {
                    StepStatus::Done
                } else {
                    StepStatus::Invalid
                };
                (step, status)
            })
            .collect()
    }
}
