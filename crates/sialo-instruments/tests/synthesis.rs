use sialo_core::models::config::Config;
use sialo_core::models::evaluation::{DailyActivity, EvaluationData, INTERVAL_COUNT};
use sialo_instruments::assessment::Assessment;
use sialo_instruments::synthesis::{ClinicalProfile, Concordance, Evolution, HighFlags, ImpactLevel};

fn fresh() -> (Config, EvaluationData) {
    let config = Config::default();
    let data = EvaluationData::new(&config, "2024-05-02");
    (config, data)
}

fn set_escapes(intervals: &mut [u8; INTERVAL_COUNT], ones: usize) {
    *intervals = [0; INTERVAL_COUNT];
    for slot in intervals.iter_mut().take(ones) {
        *slot = 1;
    }
}

fn max_daily(data: &mut EvaluationData) {
    for activity in DailyActivity::ALL {
        data.daily_frequency.set(activity, 3);
    }
}

#[test]
fn all_three_gates_give_high_impact() {
    let (config, mut data) = fresh();
    max_daily(&mut data);
    data.impact_scores = vec![8; 10];
    set_escapes(&mut data.activity.intervals, 16);
    set_escapes(&mut data.rest.intervals, 12);

    let a = Assessment::derive(&config, &data);
    assert_eq!(a.impact.pct, 80.0);
    assert_eq!(a.dual.average, 70.0);
    assert_eq!(a.classification.level, ImpactLevel::High);
    assert!(a.classification.is_high_impact);
}

#[test]
fn missing_any_gate_is_not_high() {
    let (config, mut data) = fresh();
    max_daily(&mut data);
    data.impact_scores = vec![8; 10];
    set_escapes(&mut data.activity.intervals, 16);
    set_escapes(&mut data.rest.intervals, 12);

    let mut short_daily = data.clone();
    short_daily.daily_frequency.seated = 2;
    let a = Assessment::derive(&config, &short_daily);
    assert!(!a.classification.is_high_impact);
    assert_eq!(a.classification.level, ImpactLevel::Moderate);

    let mut low_impact = data.clone();
    low_impact.impact_scores = vec![6; 10];
    assert!(!Assessment::derive(&config, &low_impact).classification.is_high_impact);

    let mut low_frequency = data;
    set_escapes(&mut low_frequency.rest.intervals, 7);
    let a = Assessment::derive(&config, &low_frequency);
    assert_eq!(a.dual.average, 57.5);
    assert!(!a.classification.is_high_impact);
}

#[test]
fn low_level_when_nothing_reaches_moderate() {
    let (config, mut data) = fresh();
    data.impact_scores = vec![3; 10];
    set_escapes(&mut data.activity.intervals, 4);
    let a = Assessment::derive(&config, &data);
    assert_eq!(a.classification.level, ImpactLevel::Low);
}

#[test]
fn previous_results_mentioning_better_flag_worsened() {
    let (config, mut data) = fresh();
    data.previous.results = "Slightly BETTER than at intake".to_string();
    let a = Assessment::derive(&config, &data);
    assert!(a.classification.worsened);
    assert_eq!(a.evolution, Evolution::Favorable);

    data.previous.results = "Got worse over winter".to_string();
    let a = Assessment::derive(&config, &data);
    assert!(!a.classification.worsened);
    assert_eq!(a.evolution, Evolution::Unfavorable);

    data.previous.results.clear();
    assert_eq!(Assessment::derive(&config, &data).evolution, Evolution::Stable);
}

#[test]
fn concordance_outcomes() {
    let flags = |frequency, backup, impact| HighFlags {
        frequency,
        backup,
        impact,
    };

    assert_eq!(
        Concordance::from_flags(&flags(true, true, false)),
        Concordance::ConcordantHigh
    );
    assert_eq!(
        Concordance::from_flags(&flags(false, false, true)),
        Concordance::DiscordantContextualBias
    );
    assert_eq!(
        Concordance::from_flags(&flags(true, false, false)),
        Concordance::DiscordantFamilyAdaptation
    );
    assert_eq!(
        Concordance::from_flags(&flags(false, true, false)),
        Concordance::Concordant
    );
    assert_eq!(
        Concordance::from_flags(&flags(false, false, false)),
        Concordance::Concordant
    );

    assert!(Concordance::DiscordantContextualBias.requires_comment());
    assert!(!Concordance::ConcordantHigh.requires_comment());
    assert_eq!(
        Concordance::DiscordantFamilyAdaptation.code(),
        "discordant_high_dq5_low_dis"
    );
}

#[test]
fn frequency_flag_is_strictly_above_moderate_band() {
    let (config, mut data) = fresh();
    set_escapes(&mut data.activity.intervals, 12);
    set_escapes(&mut data.rest.intervals, 12);
    let a = Assessment::derive(&config, &data);
    assert_eq!(a.representative.pct, 60.0);
    assert!(!a.high_flags.frequency);

    set_escapes(&mut data.rest.intervals, 13);
    assert!(Assessment::derive(&config, &data).high_flags.frequency);
}

#[test]
fn profile_follows_high_flag_count() {
    let (config, mut data) = fresh();
    let a = Assessment::derive(&config, &data);
    assert_eq!(a.profile.profile, ClinicalProfile::LowFrequencyLowImpact);
    assert!(a.profile.justification.starts_with("Predominantly low indicators"));

    data.severity = 5;
    let a = Assessment::derive(&config, &data);
    assert_eq!(a.profile.profile, ClinicalProfile::ModerateFunctional);

    data.impact_scores = vec![9; 10];
    let a = Assessment::derive(&config, &data);
    assert_eq!(a.high_flags.count(), 2);
    assert_eq!(a.profile.profile, ClinicalProfile::PersistentHighImpact);
    assert!(a.profile.justification.contains("DIS Severe impact (90.0%)"));
}

#[test]
fn derive_is_pure() {
    let (config, mut data) = fresh();
    set_escapes(&mut data.activity.intervals, 9);
    data.impact_scores[2] = 7;
    assert_eq!(
        Assessment::derive(&config, &data),
        Assessment::derive(&config, &data)
    );
}
