use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::config::Config;

/// Number of 15-second slots in one DQ5 observation session.
pub const INTERVAL_COUNT: usize = 20;

/// Length of a single DQ5 slot.
pub const SLOT_SECONDS: u32 = 15;

/// Literal accepted in place of an age when it is unknown.
pub const UNKNOWN_AGE: &str = "NN";

/// Stand-in for a blank patient name.
pub const UNNAMED_PATIENT: &str = "NN";

/// Inclusive bounds of a clamped integer field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub min: u8,
    pub max: u8,
}

impl Bounds {
    pub const fn new(min: u8, max: u8) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: u8) -> bool {
        (self.min..=self.max).contains(&value)
    }

    /// Round and clamp a raw entry. NaN falls to the lower bound.
    pub fn clamp(&self, raw: f64) -> u8 {
        if raw.is_nan() {
            return self.min;
        }
        raw.round().clamp(f64::from(self.min), f64::from(self.max)) as u8
    }
}

pub const AGE_MONTHS: Bounds = Bounds::new(0, 11);
pub const DAILY_FREQUENCY: Bounds = Bounds::new(0, 3);
pub const SEVERITY: Bounds = Bounds::new(1, 5);
pub const FREQUENCY: Bounds = Bounds::new(1, 4);
pub const REEVALUATION_WEEKS: Bounds = Bounds::new(1, 52);

/// Highest score a single impact item can take. The impact percentage is
/// always computed against this, whatever the configured entry range.
pub const IMPACT_ITEM_MAX: u8 = 10;

/// Raw data captured across the wizard steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(export)]
pub struct EvaluationData {
    // Identification
    pub patient_name: String,
    pub record_number: String,
    pub evaluation_date: String,
    pub age_years: String,
    pub age_months: Option<u8>,
    pub base_diagnosis: String,
    pub context: EvaluationContext,
    pub evaluator: String,
    pub general_observations: String,

    // Context and history
    pub evaluation_reason: String,
    pub previous: PreviousEvaluation,

    // DQ5 observation sessions
    pub activity: ObservationSession,
    pub rest: ObservationSession,

    // Drooling frequency scale (0–3 per activity)
    pub daily_frequency: DailyFrequencyScores,

    // Thomas-Stonell & Greenberg backup rating
    pub severity: u8,
    pub frequency: u8,

    // Drooling Impact Scale, one score per configured item
    pub impact_scores: Vec<u8>,

    // Synthesis
    pub integration_comment: String,
    pub etiology: Etiology,

    pub plan: TreatmentPlan,

    // Editable outputs
    pub report: String,
    pub diagnosis: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum EvaluationContext {
    #[default]
    Clinical,
    Educational,
    Home,
    Other,
}

impl EvaluationContext {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Clinical => "Clinical",
            Self::Educational => "Educational",
            Self::Home => "Home",
            Self::Other => "Other",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(export)]
pub struct PreviousEvaluation {
    pub date: String,
    pub elapsed: String,
    pub results: String,
}

/// Which of the two DQ5 sessions an edit or result refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum SessionKind {
    Activity,
    Rest,
}

impl SessionKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Activity => "activity",
            Self::Rest => "rest",
        }
    }
}

/// One 5-minute DQ5 observation: 20 binary slots plus free-text context.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(export)]
pub struct ObservationSession {
    pub intervals: [u8; INTERVAL_COUNT],
    pub context: String,
    pub conditions: ObservationConditions,
    pub pattern: ObservedPattern,
}

impl ObservationSession {
    pub fn escape_count(&self) -> usize {
        self.intervals.iter().filter(|&&slot| slot == 1).count()
    }

    pub fn clear(&mut self) {
        self.intervals = [0; INTERVAL_COUNT];
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(export)]
pub struct ObservationConditions {
    pub awake: bool,
    pub seated: bool,
    pub no_intake: bool,
    pub baseline_activity: bool,
    pub other: bool,
    pub other_text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Condition {
    Awake,
    Seated,
    NoIntake,
    BaselineActivity,
    Other,
}

impl ObservationConditions {
    pub fn flag_mut(&mut self, condition: Condition) -> &mut bool {
        match condition {
            Condition::Awake => &mut self.awake,
            Condition::Seated => &mut self.seated,
            Condition::NoIntake => &mut self.no_intake,
            Condition::BaselineActivity => &mut self.baseline_activity,
            Condition::Other => &mut self.other,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(export)]
pub struct ObservedPattern {
    pub anterior_spill: bool,
    pub open_mouth_posture: bool,
    pub reduced_swallowing: bool,
    pub hypotonia: bool,
    pub other: bool,
    pub other_text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Pattern {
    AnteriorSpill,
    OpenMouthPosture,
    ReducedSwallowing,
    Hypotonia,
    Other,
}

impl ObservedPattern {
    pub fn flag_mut(&mut self, pattern: Pattern) -> &mut bool {
        match pattern {
            Pattern::AnteriorSpill => &mut self.anterior_spill,
            Pattern::OpenMouthPosture => &mut self.open_mouth_posture,
            Pattern::ReducedSwallowing => &mut self.reduced_swallowing,
            Pattern::Hypotonia => &mut self.hypotonia,
            Pattern::Other => &mut self.other,
        }
    }
}

/// Routine activities rated on the drooling frequency scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum DailyActivity {
    Seated,
    Standing,
    InBed,
    Speaking,
    EatingDrinking,
}

impl DailyActivity {
    pub const ALL: [DailyActivity; 5] = [
        Self::Seated,
        Self::Standing,
        Self::InBed,
        Self::Speaking,
        Self::EatingDrinking,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Self::Seated => "seated",
            Self::Standing => "standing",
            Self::InBed => "in_bed",
            Self::Speaking => "speaking",
            Self::EatingDrinking => "eating_drinking",
        }
    }

    /// Phrase used inside report sentences.
    pub fn phrase(&self) -> &'static str {
        match self {
            Self::Seated => "seated",
            Self::Standing => "standing",
            Self::InBed => "in bed",
            Self::Speaking => "speaking",
            Self::EatingDrinking => "eating and drinking",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(export)]
pub struct DailyFrequencyScores {
    pub seated: u8,
    pub standing: u8,
    pub in_bed: u8,
    pub speaking: u8,
    pub eating_drinking: u8,
}

impl DailyFrequencyScores {
    pub fn get(&self, activity: DailyActivity) -> u8 {
        match activity {
            DailyActivity::Seated => self.seated,
            DailyActivity::Standing => self.standing,
            DailyActivity::InBed => self.in_bed,
            DailyActivity::Speaking => self.speaking,
            DailyActivity::EatingDrinking => self.eating_drinking,
        }
    }

    pub fn set(&mut self, activity: DailyActivity, score: u8) {
        let slot = match activity {
            DailyActivity::Seated => &mut self.seated,
            DailyActivity::Standing => &mut self.standing,
            DailyActivity::InBed => &mut self.in_bed,
            DailyActivity::Speaking => &mut self.speaking,
            DailyActivity::EatingDrinking => &mut self.eating_drinking,
        };
        *slot = score;
    }

    /// Scores in `DailyActivity::ALL` order.
    pub fn values(&self) -> [u8; 5] {
        DailyActivity::ALL.map(|a| self.get(a))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Etiology {
    #[default]
    Neuromotor,
    Sensory,
    Mixed,
    UnderEvaluation,
}

impl Etiology {
    /// Qualifier used in the orienting diagnosis sentence.
    pub fn qualifier(&self) -> &'static str {
        match self {
            Self::Neuromotor => "of neuromotor origin",
            Self::Sensory => "with a predominant sensory component",
            Self::Mixed => "of mixed etiology (neuromotor and sensory)",
            Self::UnderEvaluation => "under etiological evaluation",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(export)]
pub struct TreatmentPlan {
    pub objectives: Objectives,
    pub reevaluation_weeks: u8,
    pub referrals: Referrals,
    pub notes: String,
}

impl Default for TreatmentPlan {
    fn default() -> Self {
        Self {
            objectives: Objectives::default(),
            reevaluation_weeks: 10,
            referrals: Referrals::default(),
            notes: String::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(export)]
pub struct Objectives {
    pub lip_seal: bool,
    pub swallow_frequency: bool,
    pub sensory_awareness: bool,
    pub postural_management: bool,
    pub caregiver_training: bool,
}

impl Default for Objectives {
    fn default() -> Self {
        Self {
            lip_seal: true,
            swallow_frequency: true,
            sensory_awareness: false,
            postural_management: false,
            caregiver_training: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Objective {
    LipSeal,
    SwallowFrequency,
    SensoryAwareness,
    PosturalManagement,
    CaregiverTraining,
}

impl Objective {
    pub const ALL: [Objective; 5] = [
        Self::LipSeal,
        Self::SwallowFrequency,
        Self::SensoryAwareness,
        Self::PosturalManagement,
        Self::CaregiverTraining,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::LipSeal => "Improve lip seal competence",
            Self::SwallowFrequency => "Increase spontaneous swallowing frequency",
            Self::SensoryAwareness => "Develop oral sensory awareness",
            Self::PosturalManagement => "Optimise postural management and proximal stability",
            Self::CaregiverTraining => "Train caregivers in management strategies",
        }
    }
}

impl Objectives {
    pub fn flag_mut(&mut self, objective: Objective) -> &mut bool {
        match objective {
            Objective::LipSeal => &mut self.lip_seal,
            Objective::SwallowFrequency => &mut self.swallow_frequency,
            Objective::SensoryAwareness => &mut self.sensory_awareness,
            Objective::PosturalManagement => &mut self.postural_management,
            Objective::CaregiverTraining => &mut self.caregiver_training,
        }
    }

    pub fn is_selected(&self, objective: Objective) -> bool {
        match objective {
            Objective::LipSeal => self.lip_seal,
            Objective::SwallowFrequency => self.swallow_frequency,
            Objective::SensoryAwareness => self.sensory_awareness,
            Objective::PosturalManagement => self.postural_management,
            Objective::CaregiverTraining => self.caregiver_training,
        }
    }

    /// Labels of the selected objectives, in fixed order.
    pub fn selected_labels(&self) -> Vec<&'static str> {
        Objective::ALL
            .iter()
            .filter(|o| self.is_selected(**o))
            .map(|o| o.label())
            .collect()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(export)]
pub struct Referrals {
    pub medical: bool,
    pub dermatology: bool,
    pub dentistry: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Referral {
    Medical,
    Dermatology,
    Dentistry,
}

impl Referrals {
    pub fn flag_mut(&mut self, referral: Referral) -> &mut bool {
        match referral {
            Referral::Medical => &mut self.medical,
            Referral::Dermatology => &mut self.dermatology,
            Referral::Dentistry => &mut self.dentistry,
        }
    }
}

impl Default for EvaluationData {
    fn default() -> Self {
        Self {
            patient_name: String::new(),
            record_number: String::new(),
            evaluation_date: String::new(),
            age_years: String::new(),
            age_months: None,
            base_diagnosis: String::new(),
            context: EvaluationContext::default(),
            evaluator: String::new(),
            general_observations: String::new(),
            evaluation_reason: String::new(),
            previous: PreviousEvaluation::default(),
            activity: ObservationSession::default(),
            rest: ObservationSession::default(),
            daily_frequency: DailyFrequencyScores::default(),
            severity: SEVERITY.min,
            frequency: FREQUENCY.min,
            impact_scores: Vec::new(),
            integration_comment: String::new(),
            etiology: Etiology::default(),
            plan: TreatmentPlan::default(),
            report: String::new(),
            diagnosis: String::new(),
        }
    }
}

impl EvaluationData {
    /// Fresh data for a new evaluation dated `evaluation_date`, with one
    /// impact score per configured item.
    pub fn new(config: &Config, evaluation_date: impl Into<String>) -> Self {
        let mut data = Self {
            evaluation_date: evaluation_date.into(),
            ..Self::default()
        };
        data.reconcile(config);
        data
    }

    pub fn session(&self, kind: SessionKind) -> &ObservationSession {
        match kind {
            SessionKind::Activity => &self.activity,
            SessionKind::Rest => &self.rest,
        }
    }

    pub fn session_mut(&mut self, kind: SessionKind) -> &mut ObservationSession {
        match kind {
            SessionKind::Activity => &mut self.activity,
            SessionKind::Rest => &mut self.rest,
        }
    }

    /// Bring the record in line with the configuration: one impact score
    /// per item (new slots start at the scale minimum) and every score
    /// inside the configured scale.
    pub fn reconcile(&mut self, config: &Config) {
        let scale = config.impact_scale.normalized();
        let bounds = Bounds::new(scale.min, scale.max);
        self.impact_scores.resize(config.item_count(), scale.min);
        for score in &mut self.impact_scores {
            *score = bounds.clamp(f64::from(*score));
        }
    }

    /// Patient name for lists and file names; "NN" when blank.
    pub fn display_name(&self) -> &str {
        let name = self.patient_name.trim();
        if name.is_empty() { UNNAMED_PATIENT } else { name }
    }
}
