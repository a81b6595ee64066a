use serde::Serialize;

use sialo_core::models::config::Config;
use sialo_core::models::evaluation::EvaluationData;
use sialo_export::error::ExportError;
use sialo_export::render::report_text;
use sialo_instruments::assessment::Assessment;
use sialo_instruments::instruments::dis::ImpactCategory;
use sialo_instruments::scoring::format_pct;
use sialo_instruments::synthesis::ImpactLevel;
use sialo_instruments::wizard::{Step, WizardFlow, validate_step};

/// Shown for a step that is incomplete but has no specific message.
pub const PENDING: &str = "Pending";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChecklistEntry {
    pub step: Step,
    pub title: &'static str,
    pub valid: bool,
    /// "OK", or why the step is incomplete.
    pub note: String,
}

/// Traffic-light tone of a headline value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Ok,
    Warn,
    Bad,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Headline {
    pub dq5_average_pct: f64,
    pub daily_total: u8,
    pub daily_max: u8,
    pub impact_pct: f64,
    pub impact_tone: Tone,
    pub level: ImpactLevel,
    pub level_tone: Tone,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Review {
    pub headline: Headline,
    pub high_impact: bool,
    pub worsened: bool,
    pub checklist: Vec<ChecklistEntry>,
    /// Stored report text, or the generated one when none is stored.
    pub report_preview: String,
}

/// Closing summary shown after the final step.
pub fn build_review(
    config: &Config,
    data: &EvaluationData,
    flow: WizardFlow,
) -> Result<Review, ExportError> {
    let assessment = Assessment::derive(config, data);

    let checklist = Step::ALL
        .iter()
        .map(|&step| {
            let check = validate_step(step, flow, config, data);
            let note = if check.valid {
                "OK".to_string()
            } else {
                check.message.unwrap_or_else(|| PENDING.to_string())
            };
            ChecklistEntry {
                step,
                title: step.title(),
                valid: check.valid,
                note,
            }
        })
        .collect();

    let impact_tone = match assessment.impact.category {
        ImpactCategory::Severe => Tone::Bad,
        ImpactCategory::Moderate => Tone::Warn,
        ImpactCategory::Low => Tone::Ok,
    };
    let classification = &assessment.classification;

    Ok(Review {
        headline: Headline {
            dq5_average_pct: assessment.dual.average,
            daily_total: assessment.daily.total,
            daily_max: assessment.daily.max,
            impact_pct: assessment.impact.pct,
            impact_tone,
            level: classification.level,
            level_tone: if classification.is_high_impact {
                Tone::Bad
            } else {
                Tone::Ok
            },
        },
        high_impact: classification.is_high_impact,
        worsened: classification.worsened,
        checklist,
        report_preview: report_text(data, &assessment)?,
    })
}

impl Review {
    /// Plain-text rendering for the terminal.
    pub fn to_text(&self) -> String {
        let h = &self.headline;
        let mut out = String::new();
        out.push_str("Clinical summary\n");
        out.push_str(&format!("  DQ5 average: {}%\n", format_pct(h.dq5_average_pct)));
        out.push_str(&format!("  Drooling frequency: {}/{}\n", h.daily_total, h.daily_max));
        out.push_str(&format!("  DIS impact: {}%\n", format_pct(h.impact_pct)));
        out.push_str(&format!("  Classification: {} IMPACT\n", h.level.label()));
        if self.high_impact {
            out.push_str("  ! HIGH IMPACT\n");
        }
        if self.worsened {
            out.push_str("  ! WORSENING\n");
        }

        out.push_str("\nEvaluation status\n");
        for (i, entry) in self.checklist.iter().enumerate() {
            let mark = if entry.valid { "ok " } else { "!! " };
            out.push_str(&format!("  {mark}Step {i}: {} - {}\n", entry.title, entry.note));
        }

        out.push_str("\nNarrative report preview\n\n");
        out.push_str(&self.report_preview);
        if !self.report_preview.ends_with('\n') {
            out.push('\n');
        }
        out
    }
}
