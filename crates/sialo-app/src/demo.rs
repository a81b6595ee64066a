use sialo_core::models::config::Config;
use sialo_core::models::evaluation::{EvaluationContext, Etiology};
use sialo_core::models::record::EvaluationRecord;

/// DQ5 slots marked in the demo sessions: 6 escapes out of 20.
pub const DEMO_INTERVALS: [u8; 20] = [0, 1, 0, 0, 1, 0, 0, 1, 0, 0, 0, 1, 0, 0, 1, 0, 0, 1, 0, 0];

pub const DEMO_RECORD_NUMBER: &str = "DEMO-001";

/// A filled-in sample evaluation for trying the flow end to end.
pub fn demo_record(config: &Config) -> EvaluationRecord {
    let mut record = EvaluationRecord::new(config);
    let data = &mut record.data;

    data.patient_name = "NN".to_string();
    data.record_number = DEMO_RECORD_NUMBER.to_string();
    data.age_years = "7".to_string();
    data.age_months = Some(2);
    data.base_diagnosis = "Cerebral palsy (example)".to_string();
    data.context = EvaluationContext::Clinical;
    data.evaluator = "Speech-language therapist".to_string();
    data.general_observations = "Demo: sample record for internal testing.".to_string();

    data.activity.intervals = DEMO_INTERVALS;
    data.rest.intervals = DEMO_INTERVALS;

    data.severity = 4;
    data.frequency = 3;

    data.impact_scores = (0..config.item_count())
        .map(|i| match i % 3 {
            0 => 6,
            1 => 4,
            _ => 2,
        })
        .collect();
    data.reconcile(config);

    data.integration_comment =
        "Demo: moderate impact with moderate objective frequency.".to_string();
    data.etiology = Etiology::Neuromotor;
    data.plan.reevaluation_weeks = 10;

    record
}
