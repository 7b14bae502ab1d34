//! Legal-deadline calculator for residence permits, administrative decisions
//! and visa refusals.
//!
//! Everything here is pure: callers pass the evaluation date explicitly and
//! receive a fresh [`ComputationResult`] per call.

pub mod calendar;
pub mod casefile;
pub mod clock;
pub mod domain;
pub mod engine;
pub mod prefill;
pub mod router;
pub mod service;
pub mod statutory;
pub mod taxonomy;
pub mod timeline;
pub mod urgency;

#[cfg(test)]
mod tests;

pub use calendar::DateWindow;
pub use casefile::{parse_case, read_case_file, read_profile_file, CaseFileError};
pub use clock::Clock;
pub use domain::{
    AdministrativeDecision, ApplicationKind, CaseSituation, ComputationResult, FieldIssue,
    IssueKind, PermitApplication, RefusalType, SilenceAction, SituationKind, TimelineEvent,
    Urgency, VisaRefusalCase, VisaStage,
};
pub use engine::DeadlineEngine;
pub use prefill::ProfilePrefill;
pub use router::{calculator_router, ComputeRequest};
pub use service::DeadlineService;
pub use statutory::{DecisionKind, RecourseType, StatutoryDelay, StatutoryTable};
pub use taxonomy::{LeadTime, PermitSelection, PermitTaxonomy, TaxonomyLevel, TaxonomyOption};
pub use urgency::ThresholdSet;
