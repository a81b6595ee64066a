use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreError;

/// The official Drooling Impact Scale items, in their fixed order.
pub const DEFAULT_IMPACT_ITEMS: [&str; 10] = [
    "Impact on personal hygiene",
    "Need to change clothing or bib",
    "Skin irritation or perioral dermatitis",
    "Interference with eating",
    "Interference with speech and communication",
    "Impact on social interaction",
    "Discomfort for the patient",
    "Burden on caregivers and family",
    "Limited participation at school or in the community",
    "Difficulty with daily management (towels, cleaning, etc.)",
];

/// Label given to an impact item appended from the configuration screen.
pub const NEW_IMPACT_ITEM: &str = "New DIS item";

/// Tunable thresholds and impact-scale items.
///
/// Missing keys in a persisted configuration fall back to the defaults
/// field by field, so older stores keep loading after new fields appear.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(export)]
pub struct Config {
    pub impact_items: Vec<String>,
    pub frequency_bands: FrequencyBands,
    pub impact_bands: ImpactBands,
    pub impact_scale: ItemScale,
}

/// Percentage cut-points (0–100) for the DQ5 frequency instrument.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(export)]
pub struct FrequencyBands {
    pub low: f64,
    pub mild: f64,
    pub moderate: f64,
}

/// Percentage cut-points (0–100) for the impact instrument.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(export)]
pub struct ImpactBands {
    pub low: f64,
    pub moderate: f64,
}

/// Accepted entry range for a single impact item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(export)]
pub struct ItemScale {
    pub min: u8,
    pub max: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            impact_items: DEFAULT_IMPACT_ITEMS.iter().map(|s| s.to_string()).collect(),
            frequency_bands: FrequencyBands::default(),
            impact_bands: ImpactBands::default(),
            impact_scale: ItemScale::default(),
        }
    }
}

impl Default for FrequencyBands {
    fn default() -> Self {
        Self {
            low: 10.0,
            mild: 30.0,
            moderate: 60.0,
        }
    }
}

impl Default for ImpactBands {
    fn default() -> Self {
        Self {
            low: 20.0,
            moderate: 50.0,
        }
    }
}

impl Default for ItemScale {
    fn default() -> Self {
        Self { min: 1, max: 10 }
    }
}

impl Config {
    /// Build a configuration from a persisted JSON value.
    ///
    /// Known keys override the defaults; unknown keys are ignored. An
    /// unreadable value yields the defaults.
    pub fn from_stored(value: serde_json::Value) -> Self {
        match serde_json::from_value::<Config>(value) {
            Ok(mut config) => {
                config.clamp_bands();
                config.impact_scale = config.impact_scale.normalized();
                config
            }
            Err(e) => {
                tracing::warn!(error = %e, "stored configuration unreadable, using defaults");
                Self::default()
            }
        }
    }

    pub fn item_count(&self) -> usize {
        self.impact_items.len()
    }

    /// Clamp every band into 0–100. NaN becomes 0.
    pub fn clamp_bands(&mut self) {
        let b = &mut self.frequency_bands;
        b.low = clamp_percent(b.low);
        b.mild = clamp_percent(b.mild);
        b.moderate = clamp_percent(b.moderate);
        let b = &mut self.impact_bands;
        b.low = clamp_percent(b.low);
        b.moderate = clamp_percent(b.moderate);
    }

    /// Check the ascending-band invariants.
    pub fn validate(&self) -> Result<(), CoreError> {
        let f = &self.frequency_bands;
        if !(f.low <= f.mild && f.mild <= f.moderate) {
            return Err(CoreError::BandsNotAscending("DQ5 frequency"));
        }
        let i = &self.impact_bands;
        if i.low > i.moderate {
            return Err(CoreError::BandsNotAscending("DIS impact"));
        }
        Ok(())
    }

    pub fn add_impact_item(&mut self) {
        self.impact_items.push(NEW_IMPACT_ITEM.to_string());
    }
}

impl ItemScale {
    /// Swap inverted bounds and cap `max` at 10.
    pub fn normalized(self) -> Self {
        let (min, max) = if self.min <= self.max {
            (self.min, self.max)
        } else {
            (self.max, self.min)
        };
        Self {
            min: min.min(10),
            max: max.min(10),
        }
    }
}

pub fn clamp_percent(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 100.0)
}
