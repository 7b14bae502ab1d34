use super::calendar::DateWindow;
use super::taxonomy::PermitSelection;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Facts describing one case. Exactly one situation is active per computation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "situation", rename_all = "snake_case")]
pub enum CaseSituation {
    NewOrRenewalApplication(PermitApplication),
    DecisionLitigation(AdministrativeDecision),
    VisaRefusalAppeal(VisaRefusalCase),
}

impl CaseSituation {
    pub fn kind(&self) -> SituationKind {
        match self {
            Self::NewOrRenewalApplication(_) => SituationKind::NewOrRenewalApplication,
            Self::DecisionLitigation(_) => SituationKind::DecisionLitigation,
            Self::VisaRefusalAppeal(_) => SituationKind::VisaRefusalAppeal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SituationKind {
    NewOrRenewalApplication,
    DecisionLitigation,
    VisaRefusalAppeal,
}

impl SituationKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::NewOrRenewalApplication => "Residence permit application",
            Self::DecisionLitigation => "Litigation against an administrative decision",
            Self::VisaRefusalAppeal => "Visa refusal appeal",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationKind {
    First,
    Renewal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermitApplication {
    #[serde(default)]
    pub permit_category: PermitSelection,
    pub application_kind: ApplicationKind,
    #[serde(default)]
    pub current_expiration_date: Option<NaiveDate>,
    #[serde(default)]
    pub current_delivery_date: Option<NaiveDate>,
}

impl PermitApplication {
    pub fn new(application_kind: ApplicationKind) -> Self {
        Self {
            permit_category: PermitSelection::default(),
            application_kind,
            current_expiration_date: None,
            current_delivery_date: None,
        }
    }
}

/// Decision under challenge. `decision_kind` is the statutory table code
/// (e.g. `refus_cnda`); unknown codes fall back to the default delay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdministrativeDecision {
    pub decision_kind: String,
    #[serde(default)]
    pub decision_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefusalType {
    Explicit,
    Implicit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SilenceAction {
    GoToTribunal,
    RequestMotives,
}

/// Visa refusal facts, filled in as the procedure unfolds. Everything past the
/// deposit date stays `None` until the corresponding event has happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisaRefusalCase {
    #[serde(default)]
    pub visa_nature: Option<String>,
    pub deposit_confirmation_date: NaiveDate,
    #[serde(default)]
    pub refusal_type: Option<RefusalType>,
    #[serde(default)]
    pub explicit_notification_date: Option<NaiveDate>,
    #[serde(default)]
    pub rapo_filing_date: Option<NaiveDate>,
    #[serde(default)]
    pub rapo_response_received: bool,
    #[serde(default)]
    pub rapo_response_date: Option<NaiveDate>,
    #[serde(default)]
    pub chosen_action_on_silence: Option<SilenceAction>,
    #[serde(default)]
    pub motives_request_date: Option<NaiveDate>,
    #[serde(default)]
    pub motives_received_date: Option<NaiveDate>,
}

impl VisaRefusalCase {
    pub fn new(deposit_confirmation_date: NaiveDate) -> Self {
        Self {
            visa_nature: None,
            deposit_confirmation_date,
            refusal_type: None,
            explicit_notification_date: None,
            rapo_filing_date: None,
            rapo_response_received: false,
            rapo_response_date: None,
            chosen_action_on_silence: None,
            motives_request_date: None,
            motives_received_date: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    Overdue,
    Urgent,
    Warning,
    Nominal,
    /// No running deadline could be classified (missing or contradictory facts,
    /// or nothing for the user to do yet).
    #[serde(rename = "none")]
    Indeterminate,
}

impl Urgency {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Overdue => "Overdue",
            Self::Urgent => "Urgent",
            Self::Warning => "Warning",
            Self::Nominal => "Nominal",
            Self::Indeterminate => "None",
        }
    }
}

/// Position reached in the visa refusal procedure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisaStage {
    AwaitingRefusalType,
    AwaitingRapoFiling,
    AwaitingCommissionReply,
    AwaitingTribunalAction,
    MotivesRequested,
    TribunalDeadlineSet,
    NoRecourse,
}

impl VisaStage {
    pub const fn label(self) -> &'static str {
        match self {
            Self::AwaitingRefusalType => "Awaiting refusal type",
            Self::AwaitingRapoFiling => "RAPO window open",
            Self::AwaitingCommissionReply => "Awaiting commission reply",
            Self::AwaitingTribunalAction => "Choice required after commission silence",
            Self::MotivesRequested => "Motives requested",
            Self::TribunalDeadlineSet => "Tribunal deadline set",
            Self::NoRecourse => "No recourse",
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::TribunalDeadlineSet | Self::NoRecourse)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    Missing,
    Contradiction,
}

/// Field-level problem with the facts supplied. Missing facts are the normal
/// state of a half-filled form; contradictions block the branch until fixed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldIssue {
    pub field: &'static str,
    pub kind: IssueKind,
    pub message: String,
}

impl FieldIssue {
    pub fn missing(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            kind: IssueKind::Missing,
            message: message.into(),
        }
    }

    pub fn contradiction(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            kind: IssueKind::Contradiction,
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelineEvent {
    pub key: &'static str,
    pub label: String,
    pub date: NaiveDate,
    pub is_deadline: bool,
    pub is_urgent: bool,
    pub is_past: bool,
}

/// Output of one engine run. Recomputed from scratch on every input change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComputationResult {
    pub situation: SituationKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<VisaStage>,
    pub timeline: Vec<TimelineEvent>,
    pub days_remaining: Option<i64>,
    pub urgency: Urgency,
    pub headline: String,
    pub validation_errors: Vec<FieldIssue>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
    pub default_applied: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_window: Option<DateWindow>,
}

impl ComputationResult {
    pub fn event(&self, key: &str) -> Option<&TimelineEvent> {
        self.timeline.iter().find(|event| event.key == key)
    }

    pub fn is_blocked(&self) -> bool {
        !self.validation_errors.is_empty()
    }
}
