//! The record in focus and every action taken on it.
//!
//! A [`Session`] owns the configuration, the evaluation list, the wizard
//! position and the observation timer. Field edits only mark the session
//! dirty; list-level actions write through to the store immediately.
//! Always holds at least one evaluation.

use uuid::Uuid;

use sialo_core::edit::FieldEdit;
use sialo_core::models::config::Config;
use sialo_core::models::evaluation::SessionKind;
use sialo_core::models::record::{EvaluationRecord, Mode};
use sialo_export::render::{diagnosis_text, render_diagnosis, render_report, report_text};
use sialo_export::{ExportFormat, export};
use sialo_instruments::assessment::Assessment;
use sialo_instruments::wizard::{Advance, Step, StepCheck, StepStatus, Wizard, WizardFlow, validate_step};
use sialo_storage::state::{
    load_active_id, load_config, load_evaluations, load_step, save_active_id, save_config,
    save_evaluations, save_step, wipe_all,
};
use sialo_storage::store::KeyValueStore;

use crate::demo::demo_record;
use crate::error::AppError;
use crate::review::{Review, build_review};
use crate::timer::ObservationTimer;

pub struct Session<S: KeyValueStore> {
    store: S,
    config: Config,
    records: Vec<EvaluationRecord>,
    active: usize,
    wizard: Wizard,
    timer: ObservationTimer,
    dirty: bool,
}

impl<S: KeyValueStore> Session<S> {
    /// Load everything from `store`. An empty store gets one fresh
    /// evaluation; a missing or stale active id falls back to the first
    /// record.
    pub fn open(store: S) -> Result<Self, AppError> {
        let config = load_config(&store)?;
        let mut records = load_evaluations(&store, &config)?;
        let stored_id = load_active_id(&store)?;
        let stored_step = load_step(&store)?;

        let created = records.is_empty();
        if created {
            records.push(EvaluationRecord::new(&config));
        }
        let active = stored_id
            .and_then(|id| records.iter().position(|r| r.id == id))
            .unwrap_or(0);

        let mut wizard = Wizard::new(records[active].mode);
        wizard.step = Step::from_index(stored_step).unwrap_or(Step::FIRST);

        let mut session = Self {
            store,
            config,
            records,
            active,
            wizard,
            timer: ObservationTimer::new(),
            dirty: false,
        };

        if created || stored_id != Some(session.active().id) {
            session.persist()?;
        }
        tracing::debug!(
            records = session.records.len(),
            active = %session.active().id,
            step = session.wizard.step.index(),
            "session opened"
        );
        Ok(session)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Most recently created first.
    pub fn records(&self) -> &[EvaluationRecord] {
        &self.records
    }

    pub fn active(&self) -> &EvaluationRecord {
        &self.records[self.active]
    }

    pub fn wizard(&self) -> &Wizard {
        &self.wizard
    }

    pub fn timer(&self) -> &ObservationTimer {
        &self.timer
    }

    pub fn timer_mut(&mut self) -> &mut ObservationTimer {
        &mut self.timer
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn assessment(&self) -> Assessment {
        Assessment::derive(&self.config, &self.active().data)
    }

    // Evaluation list

    /// Add a blank evaluation at the front and focus it.
    pub fn new_evaluation(&mut self) -> Result<&EvaluationRecord, AppError> {
        let record = EvaluationRecord::new(&self.config);
        self.focus_new(record)
    }

    /// Copy the active evaluation under a new id and focus the copy.
    pub fn duplicate(&mut self) -> Result<&EvaluationRecord, AppError> {
        let copy = self.active().duplicate();
        self.focus_new(copy)
    }

    /// Insert the demo evaluation at the front and focus it.
    pub fn load_demo(&mut self) -> Result<&EvaluationRecord, AppError> {
        let record = demo_record(&self.config);
        self.focus_new(record)
    }

    /// Focus an existing evaluation. Pending edits to the previous one are
    /// kept.
    pub fn select(&mut self, id: Uuid) -> Result<&EvaluationRecord, AppError> {
        let index = self
            .records
            .iter()
            .position(|r| r.id == id)
            .ok_or(AppError::UnknownEvaluation(id))?;
        self.flush()?;
        self.active = index;
        self.restart_navigation()?;
        save_active_id(&mut self.store, Some(id))?;
        tracing::info!(id = %id, "evaluation selected");
        Ok(self.active())
    }

    /// Stamp and persist the active evaluation.
    pub fn save(&mut self) -> Result<(), AppError> {
        let record = &mut self.records[self.active];
        record.touch();
        let id = record.id;
        self.persist()?;
        self.dirty = false;
        tracing::info!(id = %id, "evaluation saved");
        Ok(())
    }

    /// Erase every stored key and start over with defaults and one blank
    /// evaluation.
    pub fn wipe(&mut self) -> Result<(), AppError> {
        wipe_all(&mut self.store)?;
        self.config = Config::default();
        self.records = vec![EvaluationRecord::new(&self.config)];
        self.active = 0;
        self.wizard = Wizard {
            flow: self.wizard.flow,
            ..Wizard::new(self.records[0].mode)
        };
        self.timer.reset();
        self.dirty = false;
        self.persist()?;
        Ok(())
    }

    /// Persist pending edits, if any. Call before dropping the session.
    pub fn close(mut self) -> Result<(), AppError> {
        self.flush()
    }

    // Editing

    pub fn apply_edit(&mut self, edit: FieldEdit) -> Result<(), AppError> {
        let record = &mut self.records[self.active];
        record.data.apply(edit, &self.config)?;
        self.dirty = true;
        Ok(())
    }

    pub fn toggle_interval(&mut self, session: SessionKind, index: usize) -> Result<(), AppError> {
        self.records[self.active]
            .data
            .toggle_interval(session, index)?;
        self.dirty = true;
        Ok(())
    }

    /// Mark the slot the timer is on as an escape.
    pub fn mark_current_slot(&mut self) -> Result<usize, AppError> {
        let slot = self.timer.slot();
        self.apply_edit(FieldEdit::Interval {
            session: self.timer.session(),
            index: slot,
            escaped: true,
        })?;
        Ok(slot)
    }

    /// Stop the timer and rewind it. With `clear`, the session it was
    /// counting also loses its marks.
    pub fn reset_timer(&mut self, clear: bool) {
        self.timer.reset();
        if clear {
            self.records[self.active]
                .data
                .session_mut(self.timer.session())
                .clear();
            self.dirty = true;
        }
    }

    // Wizard

    pub fn set_mode(&mut self, mode: Mode) {
        self.wizard.mode = mode;
        self.records[self.active].mode = mode;
        self.dirty = true;
    }

    pub fn set_flow(&mut self, flow: WizardFlow) {
        self.wizard.flow = flow;
    }

    pub fn step_check(&self) -> StepCheck {
        validate_step(
            self.wizard.step,
            self.wizard.flow,
            &self.config,
            &self.active().data,
        )
    }

    pub fn step_statuses(&self) -> Vec<(Step, StepStatus)> {
        self.wizard.statuses(&self.config, &self.active().data)
    }

    pub fn next(&mut self) -> Result<Advance, AppError> {
        let advance = self.wizard.next(&self.config, &self.records[self.active].data)?;
        self.save_step()?;
        Ok(advance)
    }

    pub fn prev(&mut self) -> Result<Step, AppError> {
        let step = self.wizard.prev();
        self.save_step()?;
        Ok(step)
    }

    pub fn goto(&mut self, step: Step) -> Result<Step, AppError> {
        let step = self.wizard.jump(step)?;
        self.save_step()?;
        Ok(step)
    }

    pub fn review(&self) -> Result<Review, AppError> {
        Ok(build_review(&self.config, &self.active().data, self.wizard.flow)?)
    }

    // Report and diagnosis

    /// Stored report text, generated and stored first if blank.
    pub fn ensure_report(&mut self) -> Result<String, AppError> {
        let assessment = self.assessment();
        let record = &mut self.records[self.active];
        if record.data.report.trim().is_empty() {
            record.data.report = render_report(&record.data, &assessment)?;
            self.dirty = true;
        }
        Ok(report_text(&record.data, &assessment)?)
    }

    /// Overwrite the stored report with a freshly generated one.
    pub fn regenerate_report(&mut self) -> Result<String, AppError> {
        let assessment = self.assessment();
        let record = &mut self.records[self.active];
        let text = render_report(&record.data, &assessment)?;
        record.data.report = text.clone();
        self.dirty = true;
        tracing::info!(id = %record.id, "report regenerated");
        Ok(text)
    }

    pub fn ensure_diagnosis(&mut self) -> Result<String, AppError> {
        let assessment = self.assessment();
        let record = &mut self.records[self.active];
        if record.data.diagnosis.trim().is_empty() {
            record.data.diagnosis = render_diagnosis(&record.data, &assessment)?;
            self.dirty = true;
        }
        Ok(diagnosis_text(&record.data, &assessment)?)
    }

    pub fn regenerate_diagnosis(&mut self) -> Result<String, AppError> {
        let assessment = self.assessment();
        let record = &mut self.records[self.active];
        let text = render_diagnosis(&record.data, &assessment)?;
        record.data.diagnosis = text.clone();
        self.dirty = true;
        tracing::info!(id = %record.id, "diagnosis regenerated");
        Ok(text)
    }

    pub fn export(&self, format: ExportFormat) -> Result<Vec<u8>, AppError> {
        Ok(export(format, &self.config, self.active())?)
    }

    // Configuration

    /// Replace the configuration. Bands are clamped into 0-100 and must be
    /// ascending; nothing is stored otherwise.
    pub fn save_config(&mut self, mut config: Config) -> Result<(), AppError> {
        config.clamp_bands();
        config.impact_scale = config.impact_scale.normalized();
        config.validate()?;
        self.config = config;
        self.store_config()
    }

    pub fn reset_config(&mut self) -> Result<(), AppError> {
        self.config = Config::default();
        self.store_config()
    }

    /// Append an impact item with the placeholder label.
    pub fn add_impact_item(&mut self) -> Result<(), AppError> {
        self.config.add_impact_item();
        self.store_config()
    }

    fn store_config(&mut self) -> Result<(), AppError> {
        save_config(&mut self.store, &self.config)?;
        let record = &mut self.records[self.active];
        let before = record.data.impact_scores.clone();
        record.data.reconcile(&self.config);
        if record.data.impact_scores != before {
            self.dirty = true;
        }
        Ok(())
    }

    // Internals

    fn focus_new(&mut self, record: EvaluationRecord) -> Result<&EvaluationRecord, AppError> {
        self.flush()?;
        let id = record.id;
        self.records.insert(0, record);
        self.active = 0;
        self.restart_navigation()?;
        self.persist()?;
        tracing::info!(id = %id, "evaluation created");
        Ok(self.active())
    }

    /// First step, stopped timer, mode taken from the focused record.
    fn restart_navigation(&mut self) -> Result<(), AppError> {
        self.wizard.step = Step::FIRST;
        self.wizard.mode = self.records[self.active].mode;
        self.timer.reset();
        self.save_step()
    }

    fn flush(&mut self) -> Result<(), AppError> {
        if self.dirty {
            self.save()?;
        }
        Ok(())
    }

    fn persist(&mut self) -> Result<(), AppError> {
        save_evaluations(&mut self.store, &self.records)?;
        save_active_id(&mut self.store, Some(self.records[self.active].id))?;
        Ok(())
    }

    fn save_step(&mut self) -> Result<(), AppError> {
        save_step(&mut self.store, self.wizard.step.index())?;
        Ok(())
    }
}
