use sialo_app::demo::DEMO_RECORD_NUMBER;
use sialo_app::error::AppError;
use sialo_app::session::Session;
use sialo_core::edit::FieldEdit;
use sialo_core::keys;
use sialo_core::models::config::{Config, NEW_IMPACT_ITEM};
use sialo_core::models::evaluation::SessionKind;
use sialo_core::models::record::Mode;
use sialo_export::ExportFormat;
use sialo_instruments::error::InstrumentError;
use sialo_instruments::instruments::dis::ImpactCategory;
use sialo_instruments::synthesis::ImpactLevel;
use sialo_instruments::wizard::{Advance, MISSING_AGE, Step};
use sialo_storage::state::{load_active_id, load_config, load_evaluations, load_step};
use sialo_storage::store::{FileStore, KeyValueStore, MemoryStore};

fn open() -> Session<MemoryStore> {
    Session::open(MemoryStore::new()).unwrap()
}

#[test]
fn empty_store_gets_one_persisted_evaluation() {
    let session = open();
    assert_eq!(session.records().len(), 1);
    assert_eq!(session.wizard().step, Step::FIRST);
    assert!(!session.is_dirty());

    let store = session.store();
    assert!(store.get(keys::EVALUATIONS).unwrap().is_some());
    assert_eq!(load_active_id(store).unwrap(), Some(session.active().id));
    assert_eq!(session.active().data.impact_scores.len(), 10);
}

#[test]
fn new_evaluation_is_inserted_first_and_focused() {
    let mut session = open();
    let first = session.active().id;
    let id = session.new_evaluation().unwrap().id;

    assert_ne!(id, first);
    assert_eq!(session.records()[0].id, id);
    assert_eq!(session.records()[1].id, first);
    assert_eq!(session.active().id, id);
    assert_eq!(load_active_id(session.store()).unwrap(), Some(id));
    assert_eq!(load_evaluations(session.store(), session.config()).unwrap().len(), 2);
}

#[test]
fn duplicate_copies_data_under_new_identity() {
    let mut session = open();
    session
        .apply_edit(FieldEdit::PatientName("Ana".to_string()))
        .unwrap();
    let original = session.active().clone();

    let copy = session.duplicate().unwrap().clone();
    assert_ne!(copy.id, original.id);
    assert!(copy.title.starts_with("Copy · "));
    assert_eq!(copy.data, original.data);
    assert_eq!(session.records().len(), 2);

    // pending edit on the original was flushed before the copy was made
    let stored = load_evaluations(session.store(), session.config()).unwrap();
    assert_eq!(stored[1].data.patient_name, "Ana");
}

#[test]
fn select_refocuses_and_restarts_the_wizard() {
    let mut session = open();
    let first = session.active().id;
    session.new_evaluation().unwrap();
    session.set_mode(Mode::Quick);
    session.goto(Step::Dis).unwrap();
    assert_eq!(load_step(session.store()).unwrap(), Step::Dis.index());

    session.select(first).unwrap();
    assert_eq!(session.active().id, first);
    assert_eq!(session.wizard().step, Step::FIRST);
    assert_eq!(session.wizard().mode, Mode::Guided);
    assert_eq!(load_step(session.store()).unwrap(), 0);
    assert_eq!(load_active_id(session.store()).unwrap(), Some(first));

    let missing = uuid::Uuid::new_v4();
    assert!(matches!(
        session.select(missing),
        Err(AppError::UnknownEvaluation(id)) if id == missing
    ));
}

#[test]
fn guided_next_waits_for_valid_identification() {
    let mut session = open();
    let err = session.next().unwrap_err();
    assert!(matches!(
        err,
        AppError::Instrument(InstrumentError::StepIncomplete(ref m)) if m == MISSING_AGE
    ));
    assert_eq!(session.wizard().step, Step::Identification);
    assert!(!session.wizard().can_advance(session.config(), &session.active().data));

    session
        .apply_edit(FieldEdit::AgeYears("NN".to_string()))
        .unwrap();
    assert_eq!(session.next().unwrap(), Advance::Moved(Step::ContextHistory));
    assert_eq!(load_step(session.store()).unwrap(), 1);

    assert!(matches!(
        session.goto(Step::Synthesis),
        Err(AppError::Instrument(InstrumentError::ForwardJump { .. }))
    ));
    assert_eq!(session.prev().unwrap(), Step::Identification);
}

#[test]
fn quick_mode_moves_freely_and_reviews_at_the_end() {
    let mut session = open();
    session.set_mode(Mode::Quick);
    assert_eq!(session.active().mode, Mode::Quick);
    assert_eq!(session.goto(Step::LAST).unwrap(), Step::LAST);
    assert_eq!(session.next().unwrap(), Advance::Review);
    assert_eq!(session.wizard().step, Step::LAST);
}

#[test]
fn edits_clamp_and_mark_dirty() {
    let mut session = open();
    session.apply_edit(FieldEdit::Severity(9.0)).unwrap();
    session
        .apply_edit(FieldEdit::ImpactScore { index: 2, score: 0.0 })
        .unwrap();
    assert!(session.is_dirty());
    assert_eq!(session.active().data.severity, 5);
    assert_eq!(session.active().data.impact_scores[2], 1);

    assert!(session
        .apply_edit(FieldEdit::ImpactScore { index: 10, score: 5.0 })
        .is_err());

    session.save().unwrap();
    assert!(!session.is_dirty());
    let stored = load_evaluations(session.store(), session.config()).unwrap();
    assert_eq!(stored[0].data.severity, 5);
}

#[test]
fn close_flushes_pending_edits_to_disk() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = Session::open(FileStore::new(dir.path())).unwrap();
    let id = session.active().id;
    let before = session.active().updated_at;
    session
        .apply_edit(FieldEdit::PatientName("Luis".to_string()))
        .unwrap();
    session.set_mode(Mode::Quick);
    session.goto(Step::DroolingFrequency).unwrap();
    session.close().unwrap();

    let session = Session::open(FileStore::new(dir.path())).unwrap();
    assert_eq!(session.active().id, id);
    assert_eq!(session.active().data.patient_name, "Luis");
    assert!(session.active().updated_at >= before);
    assert_eq!(session.wizard().step, Step::DroolingFrequency);
    assert_eq!(session.wizard().mode, Mode::Quick);
}

#[test]
fn descending_bands_are_rejected_without_side_effects() {
    let mut session = open();
    let mut config = Config::default();
    config.frequency_bands.low = 50.0;
    config.frequency_bands.mild = 30.0;
    assert!(matches!(session.save_config(config), Err(AppError::Core(_))));
    assert_eq!(session.config(), &Config::default());
    assert!(session.store().get(keys::CONFIG).unwrap().is_none());
}

#[test]
fn saved_bands_are_clamped() {
    let mut session = open();
    let mut config = Config::default();
    config.impact_bands.moderate = 140.0;
    session.save_config(config).unwrap();
    assert_eq!(session.config().impact_bands.moderate, 100.0);
    assert_eq!(load_config(session.store()).unwrap().impact_bands.moderate, 100.0);
}

#[test]
fn impact_items_reconcile_the_active_record() {
    let mut session = open();
    session.add_impact_item().unwrap();
    assert_eq!(session.config().item_count(), 11);
    assert_eq!(session.config().impact_items[10], NEW_IMPACT_ITEM);
    assert_eq!(session.active().data.impact_scores.len(), 11);
    assert_eq!(session.active().data.impact_scores[10], 1);
    assert!(session.is_dirty());
    assert_eq!(load_config(session.store()).unwrap().item_count(), 11);

    session.reset_config().unwrap();
    assert_eq!(session.config(), &Config::default());
    assert_eq!(session.active().data.impact_scores.len(), 10);
}

#[test]
fn report_is_generated_once_then_kept() {
    let mut session = open();
    let generated = session.ensure_report().unwrap();
    assert!(generated.starts_with("SIALORRHEA ASSESSMENT"));
    assert_eq!(session.active().data.report, generated);

    session
        .apply_edit(FieldEdit::Report("Edited.".to_string()))
        .unwrap();
    session
        .apply_edit(FieldEdit::PatientName("Ana".to_string()))
        .unwrap();
    assert_eq!(session.ensure_report().unwrap(), "Edited.");

    let fresh = session.regenerate_report().unwrap();
    assert!(fresh.contains("Patient: Ana."));
    assert_eq!(session.active().data.report, fresh);
}

#[test]
fn diagnosis_is_generated_once_then_kept() {
    let mut session = open();
    let generated = session.ensure_diagnosis().unwrap();
    assert!(generated.starts_with("ORIENTING SPEECH-LANGUAGE DIAGNOSIS"));

    session
        .apply_edit(FieldEdit::Diagnosis("Custom".to_string()))
        .unwrap();
    assert_eq!(session.ensure_diagnosis().unwrap(), "Custom");
    assert_eq!(session.regenerate_diagnosis().unwrap(), generated);
}

#[test]
fn demo_record_scores_as_expected() {
    let mut session = open();
    let record = session.load_demo().unwrap();
    assert_eq!(record.data.record_number, DEMO_RECORD_NUMBER);
    assert_eq!(session.records().len(), 2);

    let assessment = session.assessment();
    assert_eq!(assessment.dual.activity.escape_count, 6);
    assert_eq!(assessment.dual.average, 30.0);
    assert_eq!(assessment.impact.total, 42);
    assert_eq!(assessment.impact.pct, 42.0);
    assert_eq!(assessment.impact.category, ImpactCategory::Moderate);
    assert_eq!(assessment.classification.level, ImpactLevel::Low);
    assert!(session.step_check().valid);
}

#[test]
fn observation_marks_the_current_slot() {
    let mut session = open();
    session.timer_mut().start(SessionKind::Rest);
    for _ in 0..15 {
        session.timer_mut().tick();
    }
    assert_eq!(session.mark_current_slot().unwrap(), 1);
    assert_eq!(session.active().data.rest.intervals[1], 1);
    assert_eq!(session.active().data.activity.escape_count(), 0);
}

#[test]
fn timer_reset_can_clear_its_session() {
    let mut session = open();
    session.toggle_interval(SessionKind::Activity, 4).unwrap();
    session.toggle_interval(SessionKind::Rest, 4).unwrap();
    session.timer_mut().start(SessionKind::Activity);

    session.reset_timer(false);
    assert_eq!(session.active().data.activity.escape_count(), 1);

    session.reset_timer(true);
    assert!(!session.timer().is_running());
    assert_eq!(session.active().data.activity.escape_count(), 0);
    assert_eq!(session.active().data.rest.escape_count(), 1);
}

#[test]
fn wipe_starts_over() {
    let mut session = open();
    session.load_demo().unwrap();
    session.add_impact_item().unwrap();
    session.wipe().unwrap();

    assert_eq!(session.records().len(), 1);
    assert_eq!(session.config(), &Config::default());
    assert_eq!(session.active().data.record_number, "");
    assert!(session.store().get(keys::CONFIG).unwrap().is_none());
    assert_eq!(load_active_id(session.store()).unwrap(), Some(session.active().id));
}

#[test]
fn stale_active_id_falls_back_to_first_record() {
    let mut store = MemoryStore::new();
    store
        .set(keys::ACTIVE_ID, &format!("\"{}\"", uuid::Uuid::new_v4()))
        .unwrap();
    store.set(keys::WIZARD_STEP, "42").unwrap();
    let session = Session::open(store).unwrap();
    assert_eq!(
        load_active_id(session.store()).unwrap(),
        Some(session.active().id)
    );
    assert_eq!(session.wizard().step, Step::FIRST);
}

#[test]
fn export_uses_the_active_record() {
    let mut session = open();
    session
        .apply_edit(FieldEdit::PatientName("Ana".to_string()))
        .unwrap();
    let csv = String::from_utf8(session.export(ExportFormat::Csv).unwrap()).unwrap();
    assert!(csv.contains("\"patient_name\",\"Ana\""));
}
