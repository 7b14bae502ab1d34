use super::common::*;
use crate::workflows::calculateur::domain::{
    AdministrativeDecision, CaseSituation, IssueKind, Urgency,
};

#[test]
fn cnda_rejection_gets_one_calendar_month_for_cassation() {
    let result = compute(&decision("refus_cnda", date(2024, 3, 1)), date(2024, 3, 29));

    let deadline = result.event("appeal_deadline").expect("deadline on timeline");
    assert_eq!(deadline.date, date(2024, 4, 1));
    assert!(deadline.is_deadline);
    assert!(deadline.is_urgent);
    assert_eq!(result.days_remaining, Some(3));
    assert_eq!(result.urgency, Urgency::Urgent);
    assert!(result.headline.contains("2024-04-01"));
    assert!(result.headline.contains("cassation before the Council of State"));
    assert!(!result.default_applied);
}

#[test]
fn refusal_to_register_points_to_contentious_appeal() {
    let result = compute(
        &decision("refus_enregistrement", date(2024, 1, 10)),
        date(2024, 1, 20),
    );

    assert!(result.headline.contains("contentious appeal"));
    assert_eq!(
        result.event("appeal_deadline").expect("deadline").date,
        date(2024, 3, 10)
    );
}

#[test]
fn appeal_thresholds_include_a_warning_tier() {
    let result = compute(
        &decision("refus_titre_sejour", date(2024, 1, 15)),
        date(2024, 2, 20),
    );

    assert_eq!(result.days_remaining, Some(24));
    assert_eq!(result.urgency, Urgency::Warning);

    let relaxed = compute(
        &decision("refus_titre_sejour", date(2024, 1, 15)),
        date(2024, 1, 20),
    );
    assert_eq!(relaxed.urgency, Urgency::Nominal);
}

#[test]
fn unknown_kind_uses_flagged_default() {
    let result = compute(
        &decision("arrete_prefectoral_inedit", date(2024, 3, 1)),
        date(2024, 3, 10),
    );

    assert!(result.default_applied);
    assert_eq!(
        result.event("appeal_deadline").expect("deadline").date,
        date(2024, 3, 31)
    );
    assert!(result.notes.iter().any(|note| note.contains("default applied")));
    assert!(result.headline.contains("Default delay applied"));
    assert!(result.headline.contains("recourse to be confirmed"));
}

#[test]
fn deadline_flips_to_overdue_the_day_after() {
    let on_deadline = compute(&decision("refus_cnda", date(2024, 3, 1)), date(2024, 4, 1));
    assert_eq!(on_deadline.days_remaining, Some(0));
    assert_eq!(on_deadline.urgency, Urgency::Urgent);

    let after = compute(&decision("refus_cnda", date(2024, 3, 1)), date(2024, 4, 2));
    assert_eq!(after.days_remaining, Some(-1));
    assert_eq!(after.urgency, Urgency::Overdue);
    assert!(after.headline.contains("expired on 2024-04-01, 1 day ago"));
}

#[test]
fn missing_decision_date_is_not_fatal() {
    let situation = CaseSituation::DecisionLitigation(AdministrativeDecision {
        decision_kind: "oqtf_avec_delai".to_string(),
        decision_date: None,
    });

    let result = compute(&situation, date(2024, 3, 10));
    assert_eq!(result.urgency, Urgency::Indeterminate);
    assert_eq!(result.days_remaining, None);
    assert!(result.timeline.is_empty());
    match result.validation_errors.as_slice() {
        [issue] => {
            assert_eq!(issue.field, "decision_date");
            assert_eq!(issue.kind, IssueKind::Missing);
        }
        other => panic!("expected missing decision date, got {other:?}"),
    }
}

#[test]
fn result_reports_the_situation_it_was_computed_for() {
    let situations = [
        renewal(date(2025, 1, 1)),
        decision("refus_cnda", date(2024, 3, 1)),
        CaseSituation::VisaRefusalAppeal(visa(date(2024, 1, 10))),
    ];
    for situation in &situations {
        assert_eq!(compute(situation, date(2024, 3, 29)).situation, situation.kind());
    }
}
