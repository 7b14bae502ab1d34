use chrono::NaiveDate;

use crate::workflows::calculateur::domain::{
    AdministrativeDecision, ApplicationKind, CaseSituation, ComputationResult, PermitApplication,
    RefusalType, VisaRefusalCase,
};
use crate::workflows::calculateur::engine::DeadlineEngine;
use crate::workflows::calculateur::taxonomy::PermitSelection;

pub(super) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub(super) fn engine() -> DeadlineEngine {
    DeadlineEngine::standard()
}

pub(super) fn compute(situation: &CaseSituation, now: NaiveDate) -> ComputationResult {
    engine().compute(situation, now)
}

/// Multi-year salaried permit: two to four months of lead time.
pub(super) fn salaried_selection() -> PermitSelection {
    let mut selection = PermitSelection::default();
    selection.select_motif("activite_professionnelle");
    selection.select_subcategory("salarie");
    selection.select_permit_type("csp_salarie");
    selection
}

pub(super) fn renewal(expiration: NaiveDate) -> CaseSituation {
    let mut application = PermitApplication::new(ApplicationKind::Renewal);
    application.permit_category = salaried_selection();
    application.current_delivery_date = Some(date(2021, 1, 2));
    application.current_expiration_date = Some(expiration);
    CaseSituation::NewOrRenewalApplication(application)
}

pub(super) fn decision(kind: &str, decided: NaiveDate) -> CaseSituation {
    CaseSituation::DecisionLitigation(AdministrativeDecision {
        decision_kind: kind.to_string(),
        decision_date: Some(decided),
    })
}

pub(super) fn visa(deposit: NaiveDate) -> VisaRefusalCase {
    VisaRefusalCase::new(deposit)
}

/// Deposit 2023-12-01, explicit refusal notified 2024-01-15, RAPO filed 2024-02-01.
pub(super) fn rapo_filed_case() -> VisaRefusalCase {
    let mut case = visa(date(2023, 12, 1));
    case.refusal_type = Some(RefusalType::Explicit);
    case.explicit_notification_date = Some(date(2024, 1, 15));
    case.rapo_filing_date = Some(date(2024, 2, 1));
    case
}

pub(super) fn visa_result(case: VisaRefusalCase, now: NaiveDate) -> ComputationResult {
    compute(&CaseSituation::VisaRefusalAppeal(case), now)
}
