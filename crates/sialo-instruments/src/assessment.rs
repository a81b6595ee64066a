use serde::{Deserialize, Serialize};
use sialo_core::models::config::Config;
use sialo_core::models::evaluation::EvaluationData;
use ts_rs::TS;

use crate::instruments::daily_frequency::{self, DailyFrequencyScore};
use crate::instruments::dis::{self, ImpactScore};
use crate::instruments::dq5::{self, DualScore, RepresentativeScore};
use crate::instruments::thomas_stonell::{self, BackupScore};
use crate::synthesis::{
    self, Concordance, Evolution, HighFlags, ImpactClassification, ProfileResult,
};

/// Every derived result for one evaluation.
///
/// Built fresh from the raw data each time a view needs it; there is no
/// incremental update path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Assessment {
    pub dual: DualScore,
    pub representative: RepresentativeScore,
    pub backup: BackupScore,
    pub impact: ImpactScore,
    pub daily: DailyFrequencyScore,
    pub classification: ImpactClassification,
    pub high_flags: HighFlags,
    pub concordance: Concordance,
    pub profile: ProfileResult,
    pub evolution: Evolution,
}

impl Assessment {
    pub fn derive(config: &Config, data: &EvaluationData) -> Self {
        let dual = dq5::score_dual(config, data);
        let representative = dual.representative();
        let backup = thomas_stonell::score(data);
        let impact = dis::score(config, data);
        let daily = daily_frequency::score(data);

        let classification =
            synthesis::classify_impact(&daily, &impact, &dual, &data.previous.results);
        let high_flags = HighFlags::new(
            &representative,
            &backup,
            &impact,
            &config.frequency_bands,
        );
        let concordance = Concordance::from_flags(&high_flags);
        let profile = synthesis::profile(&high_flags, &representative, &backup, &impact);

        Self {
            dual,
            representative,
            backup,
            impact,
            daily,
            classification,
            high_flags,
            concordance,
            profile,
            evolution: Evolution::from_previous_results(&data.previous.results),
        }
    }
}
