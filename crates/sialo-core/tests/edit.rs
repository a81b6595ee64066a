use sialo_core::edit::FieldEdit;
use sialo_core::error::CoreError;
use sialo_core::models::config::Config;
use sialo_core::models::evaluation::{DailyActivity, EvaluationData, Objective, SessionKind};

fn fresh() -> (EvaluationData, Config) {
    let config = Config::default();
    (EvaluationData::new(&config, "2024-05-02"), config)
}

#[test]
fn new_data_has_one_impact_score_per_item_at_scale_minimum() {
    let (data, config) = fresh();
    assert_eq!(data.impact_scores.len(), config.item_count());
    assert!(data.impact_scores.iter().all(|&s| s == 1));
    assert_eq!(data.severity, 1);
    assert_eq!(data.frequency, 1);
    assert_eq!(data.evaluation_date, "2024-05-02");
}

#[test]
fn numeric_edits_are_clamped_not_rejected() {
    let (mut data, config) = fresh();

    data.apply(FieldEdit::Severity(12.0), &config).unwrap();
    data.apply(FieldEdit::Frequency(0.0), &config).unwrap();
    data.apply(
        FieldEdit::DailyFrequency {
            activity: DailyActivity::Speaking,
            score: 5.0,
        },
        &config,
    )
    .unwrap();
    data.apply(FieldEdit::ImpactScore { index: 3, score: -4.0 }, &config)
        .unwrap();
    data.apply(FieldEdit::AgeMonths(Some(f64::NAN)), &config).unwrap();
    data.apply(FieldEdit::ReevaluationWeeks(400.0), &config).unwrap();

    assert_eq!(data.severity, 5);
    assert_eq!(data.frequency, 1);
    assert_eq!(data.daily_frequency.speaking, 3);
    assert_eq!(data.impact_scores[3], 1);
    assert_eq!(data.age_months, Some(0));
    assert_eq!(data.plan.reevaluation_weeks, 52);
}

#[test]
fn interval_edit_and_toggle() {
    let (mut data, config) = fresh();
    data.apply(
        FieldEdit::Interval {
            session: SessionKind::Rest,
            index: 19,
            escaped: true,
        },
        &config,
    )
    .unwrap();
    assert_eq!(data.rest.intervals[19], 1);

    data.toggle_interval(SessionKind::Rest, 19).unwrap();
    data.toggle_interval(SessionKind::Activity, 0).unwrap();
    assert_eq!(data.rest.escape_count(), 0);
    assert_eq!(data.activity.escape_count(), 1);
}

#[test]
fn out_of_range_indices_fail() {
    let (mut data, config) = fresh();
    let err = data
        .apply(
            FieldEdit::Interval {
                session: SessionKind::Activity,
                index: 20,
                escaped: true,
            },
            &config,
        )
        .unwrap_err();
    assert!(matches!(err, CoreError::IndexOutOfRange { index: 20, .. }));

    let err = data
        .apply(FieldEdit::ImpactScore { index: 10, score: 3.0 }, &config)
        .unwrap_err();
    assert!(matches!(err, CoreError::IndexOutOfRange { len: 10, .. }));
}

#[test]
fn plan_objectives_toggle_in_fixed_order() {
    let (mut data, config) = fresh();
    data.apply(
        FieldEdit::Objective {
            objective: Objective::LipSeal,
            on: false,
        },
        &config,
    )
    .unwrap();
    assert_eq!(
        data.plan.objectives.selected_labels(),
        vec![
            Objective::SwallowFrequency.label(),
            Objective::CaregiverTraining.label()
        ]
    );
}

#[test]
fn reconcile_follows_item_count() {
    let (mut data, mut config) = fresh();
    config.add_impact_item();
    data.reconcile(&config);
    assert_eq!(data.impact_scores.len(), 11);

    config.impact_items.truncate(4);
    data.reconcile(&config);
    assert_eq!(data.impact_scores.len(), 4);
}
