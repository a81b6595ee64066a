use sialo_app::review::{Tone, build_review};
use sialo_core::models::config::Config;
use sialo_core::models::evaluation::{DailyActivity, EvaluationData, INTERVAL_COUNT};
use sialo_export::render::render_report;
use sialo_instruments::assessment::Assessment;
use sialo_instruments::synthesis::ImpactLevel;
use sialo_instruments::wizard::{MISSING_AGE, Step, WizardFlow};

#[test]
fn fresh_record_lists_the_missing_age() {
    let config = Config::default();
    let data = EvaluationData::new(&config, "2024-05-02");
    let review = build_review(&config, &data, WizardFlow::Current).unwrap();

    assert_eq!(review.checklist.len(), Step::ALL.len());
    assert!(!review.checklist[0].valid);
    assert_eq!(review.checklist[0].note, MISSING_AGE);
    assert!(review.checklist[1..].iter().all(|e| e.valid && e.note == "OK"));
    assert_eq!(review.headline.level, ImpactLevel::Low);
    assert!(!review.high_impact);

    let assessment = Assessment::derive(&config, &data);
    assert_eq!(review.report_preview, render_report(&data, &assessment).unwrap());
}

#[test]
fn high_impact_and_worsening_are_flagged() {
    let config = Config::default();
    let mut data = EvaluationData::new(&config, "2024-05-02");
    data.age_years = "9".to_string();
    for activity in DailyActivity::ALL {
        data.daily_frequency.set(activity, 3);
    }
    data.impact_scores = vec![9; 10];
    data.activity.intervals = [1; INTERVAL_COUNT];
    data.rest.intervals = [1; INTERVAL_COUNT];
    data.previous.results = "Better at school, worse at home".to_string();

    let review = build_review(&config, &data, WizardFlow::Current).unwrap();
    assert!(review.high_impact);
    assert!(review.worsened);
    assert_eq!(review.headline.level_tone, Tone::Bad);
    assert_eq!(review.headline.impact_tone, Tone::Bad);
    assert_eq!(review.headline.daily_total, 15);

    let text = review.to_text();
    assert!(text.contains("Classification: HIGH IMPACT"));
    assert!(text.contains("! HIGH IMPACT"));
    assert!(text.contains("! WORSENING"));
    assert!(text.contains("Step 0: Identification - OK"));
}

#[test]
fn stored_report_is_previewed() {
    let config = Config::default();
    let mut data = EvaluationData::new(&config, "2024-05-02");
    data.report = "Hand-written.".to_string();
    let review = build_review(&config, &data, WizardFlow::Current).unwrap();
    assert_eq!(review.report_preview, "Hand-written.");
}
