use serde::{Deserialize, Serialize};
use sialo_core::models::config::{Config, ImpactBands};
use sialo_core::models::evaluation::{EvaluationData, IMPACT_ITEM_MAX};
use ts_rs::TS;

use crate::Instrument;
use crate::scoring::{Domain, ScoreEntry, ScoreRange, ScoreType, Subscale, percent};

/// DIS: Drooling Impact Scale.
/// One 1–10 rating per configured item. The item list is editable, so the
/// domain is built from the active configuration.
pub struct Dis {
    domains: Vec<Domain>,
}

fn item_id(index: usize) -> String {
    format!("item_{:02}", index + 1)
}

impl Dis {
    pub fn new(config: &Config) -> Self {
        let scale = config.impact_scale.normalized();
        let item_range = ScoreRange::integer(scale.min, scale.max);
        let subscales = config
            .impact_items
            .iter()
            .enumerate()
            .map(|(i, label)| Subscale {
                id: item_id(i),
                name: label.clone(),
                score_type: ScoreType::Rating,
                range: item_range,
                description: None,
            })
            .collect();

        Self {
            domains: vec![Domain {
                id: "dis_items".to_string(),
                name: "DIS Items".to_string(),
                subscales,
                composite_range: Some(ScoreRange {
                    min: 0.0,
                    max: max_score(config.item_count()) as f64,
                    step: Some(1.0),
                }),
                description: None,
            }],
        }
    }
}

impl Instrument for Dis {
    fn id(&self) -> &str {
        "dis"
    }

    fn name(&self) -> &str {
        "DIS"
    }

    fn domains(&self) -> &[Domain] {
        &self.domains
    }

    fn score_entries(&self, data: &EvaluationData) -> Vec<ScoreEntry> {
        data.impact_scores
            .iter()
            .enumerate()
            .map(|(i, &score)| ScoreEntry::new(item_id(i), score))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum ImpactCategory {
    Low,
    Moderate,
    Severe,
}

impl ImpactCategory {
    /// Two cut-points, three bands; a value on a cut-point takes the lower band.
    pub fn classify(pct: f64, bands: &ImpactBands) -> Self {
        if pct <= bands.low {
            Self::Low
        } else if pct <= bands.moderate {
            Self::Moderate
        } else {
            Self::Severe
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Low => "Low impact",
            Self::Moderate => "Moderate impact",
            Self::Severe => "Severe impact",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ImpactScore {
    pub total: u32,
    pub max: u32,
    pub pct: f64,
    pub category: ImpactCategory,
}

/// Denominator of the impact percentage: the item count times the fixed
/// item maximum of 10.
pub fn max_score(item_count: usize) -> u32 {
    item_count as u32 * u32::from(IMPACT_ITEM_MAX)
}

pub fn score(config: &Config, data: &EvaluationData) -> ImpactScore {
    let total: u32 = data.impact_scores.iter().map(|&s| u32::from(s)).sum();
    let max = max_score(data.impact_scores.len());
    let pct = percent(f64::from(total), f64::from(max));
    ImpactScore {
        total,
        max,
        pct,
        category: ImpactCategory::classify(pct, &config.impact_bands),
    }
}
