//! sialo-instruments
//!
//! Instrument definitions and the pure scoring engine. Every result here is
//! derived from `(Config, EvaluationData)` and nothing is cached, so callers
//! re-derive after each edit.

pub mod assessment;
pub mod error;
pub mod instruments;
pub mod scoring;
pub mod synthesis;
pub mod wizard;

use scoring::{Domain, ScoreEntry, ValidationError};
use sialo_core::models::config::Config;
use sialo_core::models::evaluation::EvaluationData;

/// Trait implemented by each clinical assessment instrument.
pub trait Instrument: Send + Sync {
    /// Unique identifier for this instrument (e.g., "dq5", "dis").
    fn id(&self) -> &str;

    /// Human-readable name (e.g., "DQ5", "Thomas-Stonell").
    fn name(&self) -> &str;

    /// The domains and subscales this instrument measures.
    fn domains(&self) -> &[Domain];

    /// Read this instrument's raw scores out of an evaluation.
    fn score_entries(&self, data: &EvaluationData) -> Vec<ScoreEntry>;

    /// Validate a set of score entries against this instrument's rules.
    fn validate_scores(&self, scores: &[ScoreEntry]) -> Vec<ValidationError> {
        let all_subscales: Vec<_> = self
            .domains()
            .iter()
            .flat_map(|d| &d.subscales)
            .collect();

        let mut errors = Vec::new();
        for entry in scores {
            if let Some(subscale) = all_subscales.iter().find(|s| s.id == entry.subscale_id)
                && !subscale.range.contains(entry.value)
            {
                errors.push(ValidationError {
                    subscale_id: entry.subscale_id.clone(),
                    value: entry.value,
                    expected_range: subscale.range,
                    score_type: subscale.score_type,
                    message: format!(
                        "{}: {} score {} is outside range [{}, {}]",
                        self.name(),
                        subscale.name,
                        entry.value,
                        subscale.range.min,
                        subscale.range.max,
                    ),
                });
            }
        }
        errors
    }
}

/// Every instrument, in report order. The impact scale's items come from
/// the configuration, so the registry is built per config.
pub fn all_instruments(config: &Config) -> Vec<Box<dyn Instrument>> {
    vec![
        Box::new(instruments::dq5::Dq5),
        Box::new(instruments::daily_frequency::DailyFrequency),
        Box::new(instruments::thomas_stonell::ThomasStonell),
        Box::new(instruments::dis::Dis::new(config)),
    ]
}

