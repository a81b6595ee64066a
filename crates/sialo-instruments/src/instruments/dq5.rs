use serde::{Deserialize, Serialize};
use sialo_core::models::config::{Config, FrequencyBands};
use sialo_core::models::evaluation::{EvaluationData, INTERVAL_COUNT, SessionKind};
use ts_rs::TS;

use crate::Instrument;
use crate::scoring::{Domain, ScoreEntry, ScoreRange, ScoreType, Subscale, percent, round1};

/// DQ5: Drooling Quotient over 5 minutes.
/// Twenty 15-second slots per session, each scored 1 when a new anterior
/// saliva escape is seen. Administered once in activity and once at rest.
pub struct Dq5;

const SESSIONS: [SessionKind; 2] = [SessionKind::Activity, SessionKind::Rest];

fn slot_id(session: SessionKind, index: usize) -> String {
    format!("{}_{:02}", session.label(), index + 1)
}

impl Instrument for Dq5 {
    fn id(&self) -> &str {
        "dq5"
    }

    fn name(&self) -> &str {
        "DQ5"
    }

    fn domains(&self) -> &[Domain] {
        static DOMAINS: std::sync::LazyLock<Vec<Domain>> = std::sync::LazyLock::new(|| {
            SESSIONS
                .iter()
                .map(|&session| Domain {
                    id: session.label().to_string(),
                    name: format!("DQ5 {}", session.label()),
                    subscales: (0..INTERVAL_COUNT)
                        .map(|i| Subscale {
                            id: slot_id(session, i),
                            name: format!("Interval {}", i + 1),
                            score_type: ScoreType::Binary,
                            range: ScoreRange::integer(0, 1),
                            description: None,
                        })
                        .collect(),
                    composite_range: Some(ScoreRange::integer(0, INTERVAL_COUNT as u8)),
                    description: Some("Escape count over 20 slots of 15 seconds".to_string()),
                })
                .collect()
        });
        &DOMAINS
    }

    fn score_entries(&self, data: &EvaluationData) -> Vec<ScoreEntry> {
        SESSIONS
            .iter()
            .flat_map(|&session| {
                data.session(session)
                    .intervals
                    .iter()
                    .enumerate()
                    .map(move |(i, &slot)| ScoreEntry::new(slot_id(session, i), slot))
            })
            .collect()
    }
}

/// Frequency band of a DQ5 percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum FrequencyCategory {
    Low,
    Mild,
    Moderate,
    High,
}

impl FrequencyCategory {
    /// Bands are inclusive on their upper edge, so a value sitting exactly
    /// on a cut-point takes the lower band.
    pub fn classify(pct: f64, bands: &FrequencyBands) -> Self {
        if pct <= bands.low {
            Self::Low
        } else if pct <= bands.mild {
            Self::Mild
        } else if pct <= bands.moderate {
            Self::Moderate
        } else {
            Self::High
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Low => "Low frequency",
            Self::Mild => "Mild frequency",
            Self::Moderate => "Moderate frequency",
            Self::High => "High frequency",
        }
    }
}

/// Result of one observation session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SessionScore {
    pub escape_count: usize,
    pub pct: f64,
}

/// Activity and rest sessions plus their average.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DualScore {
    pub activity: SessionScore,
    pub rest: SessionScore,
    pub average: f64,
    pub category: FrequencyCategory,
    pub activity_context: String,
    pub rest_context: String,
}

/// The single DQ5 figure fed to cross-instrument analysis: escapes summed
/// over both sessions, percentage and band taken from the dual average.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RepresentativeScore {
    pub escape_count: usize,
    pub pct: f64,
    pub category: FrequencyCategory,
}

/// Score a single session. Only slots equal to 1 count as escapes; the
/// denominator is always the 20 protocol slots.
pub fn score_session(intervals: &[u8]) -> SessionScore {
    let escape_count = intervals.iter().filter(|&&slot| slot == 1).count();
    SessionScore {
        escape_count,
        pct: percent(escape_count as f64, INTERVAL_COUNT as f64),
    }
}

pub fn score_dual(config: &Config, data: &EvaluationData) -> DualScore {
    let activity = score_session(&data.activity.intervals);
    let rest = score_session(&data.rest.intervals);
    let average = round1((activity.pct + rest.pct) / 2.0);
    DualScore {
        activity,
        rest,
        average,
        category: FrequencyCategory::classify(average, &config.frequency_bands),
        activity_context: data.activity.context.clone(),
        rest_context: data.rest.context.clone(),
    }
}

impl DualScore {
    pub fn representative(&self) -> RepresentativeScore {
        RepresentativeScore {
            escape_count: self.activity.escape_count + self.rest.escape_count,
            pct: self.average,
            category: self.category,
        }
    }
}
