use serde::{Deserialize, Serialize};
use sialo_core::models::evaluation::{EvaluationData, FREQUENCY, SEVERITY};
use ts_rs::TS;

use crate::Instrument;
use crate::scoring::{Domain, ScoreEntry, ScoreRange, ScoreType, Subscale};

/// Thomas-Stonell & Greenberg drooling rating.
/// Severity 1–5 and frequency 1–4, rated by the clinician. Kept as clinical
/// backup; it does not appear as a table in the narrative report.
pub struct ThomasStonell;

pub const SEVERITY_ID: &str = "severity";
pub const FREQUENCY_ID: &str = "frequency";

impl Instrument for ThomasStonell {
    fn id(&self) -> &str {
        "thomas_stonell"
    }

    fn name(&self) -> &str {
        "Thomas-Stonell"
    }

    fn domains(&self) -> &[Domain] {
        static DOMAINS: std::sync::LazyLock<Vec<Domain>> = std::sync::LazyLock::new(|| {
            vec![Domain {
                id: "thomas_stonell".to_string(),
                name: "Thomas-Stonell & Greenberg".to_string(),
                subscales: vec![
                    Subscale {
                        id: SEVERITY_ID.to_string(),
                        name: "Severity".to_string(),
                        score_type: ScoreType::Ordinal,
                        range: ScoreRange::integer(SEVERITY.min, SEVERITY.max),
                        description: Some(
                            "1 dry, 2 wet lips, 3 wet lips and chin, 4 damp clothing, 5 soaked clothing"
                                .to_string(),
                        ),
                    },
                    Subscale {
                        id: FREQUENCY_ID.to_string(),
                        name: "Frequency".to_string(),
                        score_type: ScoreType::Ordinal,
                        range: ScoreRange::integer(FREQUENCY.min, FREQUENCY.max),
                        description: Some(
                            "1 never, 2 occasionally, 3 frequently, 4 constantly".to_string(),
                        ),
                    },
                ],
                composite_range: None,
                description: None,
            }]
        });
        &DOMAINS
    }

    fn score_entries(&self, data: &EvaluationData) -> Vec<ScoreEntry> {
        vec![
            ScoreEntry::new(SEVERITY_ID, data.severity),
            ScoreEntry::new(FREQUENCY_ID, data.frequency),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum SeverityCategory {
    Mild,
    Moderate,
    Severe,
}

impl SeverityCategory {
    pub fn from_rating(severity: u8) -> Self {
        match severity {
            0..=2 => Self::Mild,
            3 => Self::Moderate,
            _ => Self::Severe,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Mild => "Mild",
            Self::Moderate => "Moderate",
            Self::Severe => "Severe",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum FrequencyRating {
    Absent,
    Occasional,
    Frequent,
    Constant,
}

impl FrequencyRating {
    pub fn from_rating(frequency: u8) -> Self {
        match frequency {
            0..=1 => Self::Absent,
            2 => Self::Occasional,
            3 => Self::Frequent,
            _ => Self::Constant,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Absent => "Absent",
            Self::Occasional => "Occasional",
            Self::Frequent => "Frequent",
            Self::Constant => "Constant",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BackupScore {
    pub severity: SeverityCategory,
    pub frequency: FrequencyRating,
}

impl BackupScore {
    /// Severe drooling or constant frequency.
    pub fn is_high(&self) -> bool {
        self.severity == SeverityCategory::Severe || self.frequency == FrequencyRating::Constant
    }
}

pub fn score(data: &EvaluationData) -> BackupScore {
    BackupScore {
        severity: SeverityCategory::from_rating(data.severity),
        frequency: FrequencyRating::from_rating(data.frequency),
    }
}
