use super::super::calendar::days_between;
use super::super::domain::{
    ApplicationKind, ComputationResult, FieldIssue, PermitApplication, SituationKind, Urgency,
};
use super::super::taxonomy::{LeadTime, PermitTaxonomy};
use super::super::urgency::{classify, ThresholdSet};
use super::outcome::{day_count, month_count, Assessment, Verdict};
use chrono::NaiveDate;

pub(super) fn assess(
    application: &PermitApplication,
    taxonomy: &PermitTaxonomy,
    now: NaiveDate,
) -> ComputationResult {
    let mut assessment = Assessment::new(SituationKind::NewOrRenewalApplication);

    if let Some(delivered) = application.current_delivery_date {
        assessment.milestone("current_delivery", "Current permit delivered", delivered);
    }

    if let (Some(expiration), Some(delivered)) = (
        application.current_expiration_date,
        application.current_delivery_date,
    ) {
        if expiration < delivered {
            assessment.issue(FieldIssue::contradiction(
                "current_expiration_date",
                format!("the expiration date {expiration} precedes the delivery date {delivered}"),
            ));
        }
    }

    let (lead, permit_label) = match taxonomy.resolve(&application.permit_category) {
        Ok(Some(permit)) => (permit.lead, Some(permit.label)),
        Ok(None) => {
            assessment.note(format!(
                "No precise permit type selected: the default lead time of {} to {} applies",
                LeadTime::DEFAULT.min_months,
                month_count(LeadTime::DEFAULT.max_months)
            ));
            (LeadTime::DEFAULT, None)
        }
        Err(issue) => {
            assessment.issue(issue);
            (LeadTime::DEFAULT, None)
        }
    };

    match application.application_kind {
        ApplicationKind::First => {
            let permit = permit_label.unwrap_or("the permit");
            let headline = format!(
                "No filing deadline applies to a first application: you can file at any time. \
                 Plan to file at least {} before you need {permit}.",
                month_count(lead.min_months)
            );
            assessment.finish(now, Verdict::pending(headline))
        }
        ApplicationKind::Renewal => {
            let Some(expiration) = application.current_expiration_date else {
                assessment.issue(FieldIssue::missing(
                    "current_expiration_date",
                    "enter the expiration date of the current permit to plan its renewal",
                ));
                return assessment.reject(now);
            };

            let window = lead.window_before(expiration);
            assessment.milestone(
                "renewal_window_opens",
                "Recommended renewal window opens",
                window.start,
            );
            assessment.deadline(
                "renewal_window_closes",
                "Recommended renewal window closes",
                window.end,
            );
            assessment.deadline("current_expiration", "Current permit expires", expiration);

            if assessment.has_issues() {
                return assessment.reject(now);
            }

            let days = days_between(now, expiration);
            let urgency = classify(days, ThresholdSet::PermitRenewal);
            let headline = renewal_headline(urgency, days, expiration, window.start, window.end, now);
            assessment.finish(now, Verdict::scored(days, urgency, headline, Some(window)))
        }
    }
}

fn renewal_headline(
    urgency: Urgency,
    days: i64,
    expiration: NaiveDate,
    opens: NaiveDate,
    closes: NaiveDate,
    now: NaiveDate,
) -> String {
    let window_note = if now < opens {
        format!("The recommended filing window runs from {opens} to {closes}.")
    } else if now <= closes {
        format!("You are inside the recommended filing window ({opens} to {closes}).")
    } else {
        format!("The recommended filing window closed on {closes}.")
    };

    match urgency {
        Urgency::Overdue => format!(
            "Your permit expired {} ago, on {expiration}. File the renewal immediately: \
             the stay is no longer covered by a valid permit.",
            day_count(days)
        ),
        Urgency::Urgent => format!(
            "Your permit expires in {}, on {expiration}. {window_note} File the renewal now.",
            day_count(days)
        ),
        _ => format!(
            "Your permit expires in {}, on {expiration}. {window_note}",
            day_count(days)
        ),
    }
}
