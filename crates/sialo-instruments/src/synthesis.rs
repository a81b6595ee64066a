//! Cross-instrument synthesis: overall impact level, concordance between
//! instruments and the resulting clinical profile.

use serde::{Deserialize, Serialize};
use sialo_core::models::config::FrequencyBands;
use ts_rs::TS;

use crate::instruments::daily_frequency::{DailyFrequencyScore, MAX_TOTAL};
use crate::instruments::dis::{ImpactCategory, ImpactScore};
use crate::instruments::dq5::{DualScore, RepresentativeScore};
use crate::instruments::thomas_stonell::BackupScore;
use crate::scoring::format_pct;

/// Impact percentage at or above which the high-impact gate trips.
pub const HIGH_IMPACT_PCT: f64 = 70.0;
/// DQ5 average at or above which the high-impact gate trips.
pub const HIGH_IMPACT_DQ5_PCT: f64 = 60.0;
pub const MODERATE_IMPACT_PCT: f64 = 50.0;
pub const MODERATE_IMPACT_DQ5_PCT: f64 = 40.0;

/// Word in the previous-results summary that raises the `worsened` flag.
pub const WORSENED_MARKER: &str = "better";
const UNFAVORABLE_MARKER: &str = "worse";

/// Shortest integration comment accepted for a discordant result.
pub const MIN_COMMENT_CHARS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum ImpactLevel {
    Low,
    Moderate,
    High,
}

impl ImpactLevel {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Moderate => "MODERATE",
            Self::High => "HIGH",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ImpactClassification {
    pub level: ImpactLevel,
    pub is_high_impact: bool,
    pub worsened: bool,
}

/// Combine the three headline instruments into one ordinal level.
///
/// High impact is conjunctive: maximal daily frequency, impact at or above
/// 70% and a DQ5 average at or above 60% must all hold.
pub fn classify_impact(
    daily: &DailyFrequencyScore,
    impact: &ImpactScore,
    dual: &DualScore,
    previous_results: &str,
) -> ImpactClassification {
    let is_high_impact = daily.total == MAX_TOTAL
        && impact.pct >= HIGH_IMPACT_PCT
        && dual.average >= HIGH_IMPACT_DQ5_PCT;

    let level = if is_high_impact {
        ImpactLevel::High
    } else if impact.pct >= MODERATE_IMPACT_PCT || dual.average >= MODERATE_IMPACT_DQ5_PCT {
        ImpactLevel::Moderate
    } else {
        ImpactLevel::Low
    };

    ImpactClassification {
        level,
        is_high_impact,
        worsened: contains_ignore_case(previous_results, WORSENED_MARKER),
    }
}

/// Course since the previous evaluation, read from its free-text summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Evolution {
    Favorable,
    Unfavorable,
    Stable,
}

impl Evolution {
    pub fn from_previous_results(text: &str) -> Self {
        if contains_ignore_case(text, WORSENED_MARKER) {
            Self::Favorable
        } else if contains_ignore_case(text, UNFAVORABLE_MARKER) {
            Self::Unfavorable
        } else {
            Self::Stable
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Favorable => "favorable",
            Self::Unfavorable => "unfavorable",
            Self::Stable => "stable",
        }
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

/// Which instruments independently land in their high range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct HighFlags {
    pub frequency: bool,
    pub backup: bool,
    pub impact: bool,
}

impl HighFlags {
    pub fn new(
        frequency: &RepresentativeScore,
        backup: &BackupScore,
        impact: &ImpactScore,
        bands: &FrequencyBands,
    ) -> Self {
        Self {
            frequency: frequency.pct > bands.moderate,
            backup: backup.is_high(),
            impact: impact.category == ImpactCategory::Severe,
        }
    }

    pub fn count(&self) -> usize {
        [self.frequency, self.backup, self.impact]
            .iter()
            .filter(|&&f| f)
            .count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Concordance {
    ConcordantHigh,
    /// Low observed frequency but high reported impact.
    DiscordantContextualBias,
    /// High observed frequency but low reported impact.
    DiscordantFamilyAdaptation,
    Concordant,
}

impl Concordance {
    pub fn from_flags(flags: &HighFlags) -> Self {
        if flags.count() >= 2 {
            Self::ConcordantHigh
        } else if !flags.frequency && flags.impact {
            Self::DiscordantContextualBias
        } else if flags.frequency && !flags.impact {
            Self::DiscordantFamilyAdaptation
        } else {
            Self::Concordant
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::ConcordantHigh => "concordant_high",
            Self::DiscordantContextualBias => "discordant_low_dq5_high_dis",
            Self::DiscordantFamilyAdaptation => "discordant_high_dq5_low_dis",
            Self::Concordant => "concordant",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::ConcordantHigh => "Concordant high",
            Self::DiscordantContextualBias => {
                "Discordant (low DQ5 but high DIS: possible contextual bias)"
            }
            Self::DiscordantFamilyAdaptation => {
                "Discordant (high DQ5 but low DIS: possible family adaptation)"
            }
            Self::Concordant => "Concordant",
        }
    }

    /// Discordant results need a clinical comment before synthesis is done.
    pub fn requires_comment(&self) -> bool {
        matches!(
            self,
            Self::DiscordantContextualBias | Self::DiscordantFamilyAdaptation
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum ClinicalProfile {
    LowFrequencyLowImpact,
    ModerateFunctional,
    PersistentHighImpact,
}

impl ClinicalProfile {
    pub fn from_flags(flags: &HighFlags) -> Self {
        match flags.count() {
            0 => Self::LowFrequencyLowImpact,
            1 => Self::ModerateFunctional,
            _ => Self::PersistentHighImpact,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::LowFrequencyLowImpact => "Low-frequency, low-impact sialorrhea",
            Self::ModerateFunctional => "Moderate functional sialorrhea",
            Self::PersistentHighImpact => "Persistent sialorrhea with high functional impact",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProfileResult {
    pub profile: ClinicalProfile,
    pub label: String,
    pub justification: String,
}

pub fn profile(
    flags: &HighFlags,
    frequency: &RepresentativeScore,
    backup: &BackupScore,
    impact: &ImpactScore,
) -> ProfileResult {
    let profile = ClinicalProfile::from_flags(flags);
    let values = format!(
        "DQ5 {}% ({}); Thomas-Stonell {}/{}; DIS {} ({}%)",
        format_pct(frequency.pct),
        frequency.category.label(),
        backup.severity.label(),
        backup.frequency.label(),
        impact.category.label(),
        format_pct(impact.pct),
    );
    let justification = match profile {
        ClinicalProfile::PersistentHighImpact => {
            format!("{values}. Two or more indicators in the high range.")
        }
        ClinicalProfile::ModerateFunctional => format!("Intermediate profile: {values}."),
        ClinicalProfile::LowFrequencyLowImpact => {
            format!("Predominantly low indicators: {values}.")
        }
    };
    ProfileResult {
        profile,
        label: profile.label().to_string(),
        justification,
    }
}
