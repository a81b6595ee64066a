use serde::{Deserialize, Serialize};
use sialo_core::models::evaluation::{DAILY_FREQUENCY, DailyActivity, EvaluationData};
use ts_rs::TS;

use crate::Instrument;
use crate::scoring::{Domain, ScoreEntry, ScoreRange, ScoreType, Subscale};

/// Drooling frequency scale over five routine activities.
/// Each activity 0–3 (dry, excess saliva, mild-moderate drooling, continuous
/// drooling). Total 0–15.
pub struct DailyFrequency;

pub const MAX_TOTAL: u8 = 15;

/// Sentence used when every activity is rated 3.
pub const MAXIMAL_DESCRIPTION: &str = "continuous drooling, wet clothing and/or constant use of a handkerchief in activities of daily living such as sitting, standing, lying in bed, speaking, eating and drinking";

impl Instrument for DailyFrequency {
    fn id(&self) -> &str {
        "daily_frequency"
    }

    fn name(&self) -> &str {
        "Drooling Frequency Scale"
    }

    fn domains(&self) -> &[Domain] {
        static DOMAINS: std::sync::LazyLock<Vec<Domain>> = std::sync::LazyLock::new(|| {
            let item_range = ScoreRange::integer(DAILY_FREQUENCY.min, DAILY_FREQUENCY.max);
            let names = ["Seated", "Standing", "In bed", "Speaking", "Eating and drinking"];

            let subscales = DailyActivity::ALL
                .iter()
                .zip(names)
                .map(|(activity, name)| Subscale {
                    id: activity.id().to_string(),
                    name: name.to_string(),
                    score_type: ScoreType::Rating,
                    range: item_range,
                    description: None,
                })
                .collect();

            vec![Domain {
                id: "daily_activities".to_string(),
                name: "Daily Activities".to_string(),
                subscales,
                composite_range: Some(ScoreRange::integer(0, MAX_TOTAL)),
                description: Some(
                    "0 dry, 1 excess saliva without drooling, 2 mild-moderate drooling, 3 continuous drooling"
                        .to_string(),
                ),
            }]
        });
        &DOMAINS
    }

    fn score_entries(&self, data: &EvaluationData) -> Vec<ScoreEntry> {
        DailyActivity::ALL
            .iter()
            .map(|a| ScoreEntry::new(a.id(), data.daily_frequency.get(*a)))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DailyFrequencyScore {
    pub total: u8,
    pub max: u8,
    /// Activities rated at the top of the scale.
    pub high_activities: Vec<DailyActivity>,
    /// Canned description embedded verbatim in the narrative report.
    pub description: String,
}

pub fn score(data: &EvaluationData) -> DailyFrequencyScore {
    let values = data.daily_frequency.values();
    let total = values.iter().fold(0u8, |acc, v| acc.saturating_add(*v));
    let high_activities: Vec<DailyActivity> = DailyActivity::ALL
        .iter()
        .zip(values)
        .filter(|(_, v)| *v == DAILY_FREQUENCY.max)
        .map(|(a, _)| *a)
        .collect();

    DailyFrequencyScore {
        total,
        max: MAX_TOTAL,
        description: describe(total, &high_activities),
        high_activities,
    }
}

/// Priority ladder from the maximal total down to zero.
fn describe(total: u8, high_activities: &[DailyActivity]) -> String {
    if total >= MAX_TOTAL {
        MAXIMAL_DESCRIPTION.to_string()
    } else if total >= 10 {
        let mut text = "frequent drooling in multiple activities".to_string();
        if !high_activities.is_empty() {
            let names: Vec<&str> = high_activities.iter().map(|a| a.phrase()).collect();
            text.push_str(", especially ");
            text.push_str(&names.join(", "));
        }
        text
    } else if total >= 5 {
        "moderate drooling in some activities of daily living".to_string()
    } else if total > 0 {
        "occasional or mild drooling".to_string()
    } else {
        "no evidence of significant drooling".to_string()
    }
}
