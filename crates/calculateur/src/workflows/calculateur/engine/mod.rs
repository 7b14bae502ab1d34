mod litigation;
pub(crate) mod outcome;
mod permit;
mod visa;

pub use visa::{
    COMMISSION_REPLY_MONTHS, IMPLICIT_REFUSAL_MONTHS, MOTIVES_PRESUMED_REFUSAL_DAYS,
    MOTIVES_REPLY_MONTHS, RAPO_DELAY_DAYS, TRIBUNAL_DELAY_MONTHS,
};

use super::domain::{CaseSituation, ComputationResult};
use super::statutory::StatutoryTable;
use super::taxonomy::PermitTaxonomy;
use chrono::NaiveDate;
use tracing::debug;

/// Stateless deadline engine. Holds only the static tables it consults, so one
/// instance can serve any number of concurrent computations.
#[derive(Debug, Default)]
pub struct DeadlineEngine {
    statutes: StatutoryTable,
    taxonomy: PermitTaxonomy,
}

impl DeadlineEngine {
    pub fn new(statutes: StatutoryTable, taxonomy: PermitTaxonomy) -> Self {
        Self { statutes, taxonomy }
    }

    pub fn standard() -> Self {
        Self::new(StatutoryTable::standard(), PermitTaxonomy::standard())
    }

    pub fn statutes(&self) -> &StatutoryTable {
        &self.statutes
    }

    pub fn taxonomy(&self) -> &PermitTaxonomy {
        &self.taxonomy
    }

    /// Derives deadlines, timeline and urgency for `situation` as of `now`.
    ///
    /// Incomplete facts never fail: the result carries `urgency = none`, the
    /// issue list, and a headline asking for the next fact.
    pub fn compute(&self, situation: &CaseSituation, now: NaiveDate) -> ComputationResult {
        let result = match situation {
            CaseSituation::NewOrRenewalApplication(application) => {
                permit::assess(application, &self.taxonomy, now)
            }
            CaseSituation::DecisionLitigation(decision) => {
                litigation::assess(decision, &self.statutes, now)
            }
            CaseSituation::VisaRefusalAppeal(case) => visa::assess(case, now),
        };

        debug!(
            situation = ?situation.kind(),
            stage = ?result.stage,
            urgency = result.urgency.label(),
            days_remaining = ?result.days_remaining,
            issues = result.validation_errors.len(),
            %now,
            "deadline computation finished"
        );

        result
    }
}
