use super::super::calendar::DateWindow;
use super::super::domain::{
    ComputationResult, FieldIssue, IssueKind, SituationKind, Urgency, VisaStage,
};
use super::super::timeline::{self, TimelineEntry};
use chrono::NaiveDate;

/// Running state of one computation: the dates resolved so far plus any
/// issues or notes raised while walking the branch.
pub(crate) struct Assessment {
    situation: SituationKind,
    stage: Option<VisaStage>,
    entries: Vec<TimelineEntry>,
    issues: Vec<FieldIssue>,
    notes: Vec<String>,
    default_applied: bool,
}

/// What the branch concluded about the running deadline.
pub(crate) struct Verdict {
    days_remaining: Option<i64>,
    urgency: Urgency,
    headline: String,
    active_window: Option<DateWindow>,
}

impl Verdict {
    /// Nothing to classify yet; the headline asks for the next fact.
    pub(crate) fn pending(headline: impl Into<String>) -> Self {
        Self {
            days_remaining: None,
            urgency: Urgency::Indeterminate,
            headline: headline.into(),
            active_window: None,
        }
    }

    pub(crate) fn scored(
        days_remaining: i64,
        urgency: Urgency,
        headline: impl Into<String>,
        active_window: Option<DateWindow>,
    ) -> Self {
        Self {
            days_remaining: Some(days_remaining),
            urgency,
            headline: headline.into(),
            active_window,
        }
    }

    /// Day count is reported but the clock runs against the administration,
    /// not the user.
    pub(crate) fn informational(days_remaining: i64, headline: impl Into<String>) -> Self {
        Self {
            days_remaining: Some(days_remaining),
            urgency: Urgency::Indeterminate,
            headline: headline.into(),
            active_window: None,
        }
    }
}

impl Assessment {
    pub(crate) fn new(situation: SituationKind) -> Self {
        Self {
            situation,
            stage: None,
            entries: Vec::new(),
            issues: Vec::new(),
            notes: Vec::new(),
            default_applied: false,
        }
    }

    pub(crate) fn milestone(&mut self, key: &'static str, label: impl Into<String>, date: NaiveDate) {
        self.entries.push(TimelineEntry::milestone(key, label, date));
    }

    pub(crate) fn deadline(&mut self, key: &'static str, label: impl Into<String>, date: NaiveDate) {
        self.entries.push(TimelineEntry::deadline(key, label, date));
    }

    pub(crate) fn issue(&mut self, issue: FieldIssue) {
        self.issues.push(issue);
    }

    pub(crate) fn has_issues(&self) -> bool {
        !self.issues.is_empty()
    }

    pub(crate) fn note(&mut self, note: impl Into<String>) {
        self.notes.push(note.into());
    }

    pub(crate) fn flag_default(&mut self, note: impl Into<String>) {
        self.default_applied = true;
        self.note(note);
    }

    pub(crate) fn set_stage(&mut self, stage: VisaStage) {
        self.stage = Some(stage);
    }

    pub(crate) fn finish(self, now: NaiveDate, verdict: Verdict) -> ComputationResult {
        if self.has_issues() {
            return self.reject(now);
        }

        ComputationResult {
            situation: self.situation,
            stage: self.stage,
            timeline: timeline::build(now, self.entries),
            days_remaining: verdict.days_remaining,
            urgency: verdict.urgency,
            headline: verdict.headline,
            validation_errors: self.issues,
            notes: self.notes,
            default_applied: self.default_applied,
            active_window: verdict.active_window,
        }
    }

    /// Result for a branch blocked by issues: no day count, no urgency, and a
    /// headline pointing at the first problem.
    pub(crate) fn reject(self, now: NaiveDate) -> ComputationResult {
        let headline = match self.issues.iter().find(|issue| issue.kind == IssueKind::Contradiction) {
            Some(issue) => format!("Check the dates entered: {}.", issue.message),
            None => match self.issues.first() {
                Some(issue) => format!("More information needed: {}.", issue.message),
                None => "More information needed.".to_string(),
            },
        };

        ComputationResult {
            situation: self.situation,
            stage: self.stage,
            timeline: timeline::build(now, self.entries),
            days_remaining: None,
            urgency: Urgency::Indeterminate,
            headline,
            validation_errors: self.issues,
            notes: self.notes,
            default_applied: self.default_applied,
            active_window: None,
        }
    }
}

pub(crate) fn day_count(days: i64) -> String {
    let days = days.abs();
    if days == 1 {
        "1 day".to_string()
    } else {
        format!("{days} days")
    }
}

pub(crate) fn month_count(months: u32) -> String {
    if months == 1 {
        "1 month".to_string()
    } else {
        format!("{months} months")
    }
}
