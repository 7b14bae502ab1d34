use super::super::calendar::{add_days, days_between, DateWindow};
use super::super::domain::{AdministrativeDecision, ComputationResult, FieldIssue, SituationKind};
use super::super::statutory::{StatutoryTable, DEFAULT_DELAY_DAYS};
use super::super::urgency::{classify, ThresholdSet};
use super::outcome::{day_count, Assessment, Verdict};
use chrono::NaiveDate;

pub(super) fn assess(
    decision: &AdministrativeDecision,
    statutes: &StatutoryTable,
    now: NaiveDate,
) -> ComputationResult {
    let mut assessment = Assessment::new(SituationKind::DecisionLitigation);
    let code = decision.decision_kind.trim();

    if code.is_empty() {
        assessment.issue(FieldIssue::missing(
            "decision_kind",
            "select the kind of decision being challenged",
        ));
    }

    let Some(decided) = decision.decision_date else {
        assessment.issue(FieldIssue::missing(
            "decision_date",
            "enter the date the decision was notified",
        ));
        return assessment.reject(now);
    };

    assessment.milestone("decision_notified", "Decision notified", decided);

    if assessment.has_issues() {
        return assessment.reject(now);
    }

    let lookup = statutes.lookup(code);
    let delay = lookup.entry.delay;
    let recourse = lookup.entry.recourse.label();

    if lookup.default_applied {
        assessment.flag_default(format!(
            "Decision kind '{code}' is not recognized: default applied, statutory delay of \
             {DEFAULT_DELAY_DAYS} days"
        ));
    }

    let deadline = delay.apply(decided);
    assessment.deadline("appeal_deadline", format!("Deadline for {recourse}"), deadline);

    let days = days_between(now, deadline);
    let urgency = classify(days, ThresholdSet::AppealDeadline);

    let mut headline = if days < 0 {
        format!(
            "The deadline for {recourse} expired on {deadline}, {} ago ({} from the decision of {decided}).",
            day_count(days),
            delay.describe()
        )
    } else {
        format!(
            "Deadline for {recourse}: {deadline}, {} remaining ({} from the decision of {decided}).",
            day_count(days),
            delay.describe()
        )
    };
    if lookup.default_applied {
        headline.push_str(" Default delay applied: confirm the decision kind.");
    }

    let window = DateWindow::new(add_days(decided, 1), deadline);
    assessment.finish(now, Verdict::scored(days, urgency, headline, Some(window)))
}
