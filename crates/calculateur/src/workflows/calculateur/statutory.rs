use super::calendar::{add_days, add_months};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const DEFAULT_DELAY_DAYS: u32 = 30;

/// Statutory delay. Month delays run on the calendar (a one-month delay from
/// 1 March ends on 1 April), day delays count calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "unit", content = "amount", rename_all = "snake_case")]
pub enum StatutoryDelay {
    Days(u32),
    Months(u32),
}

impl StatutoryDelay {
    pub fn apply(self, from: NaiveDate) -> NaiveDate {
        match self {
            Self::Days(days) => add_days(from, i64::from(days)),
            Self::Months(months) => add_months(from, months),
        }
    }

    pub fn describe(self) -> String {
        match self {
            Self::Days(1) => "1 day".to_string(),
            Self::Days(days) => format!("{days} days"),
            Self::Months(1) => "1 month".to_string(),
            Self::Months(months) => format!("{months} months"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionKind {
    RefusCnda,
    RejetOfpra,
    RefusTitreSejour,
    RetraitTitreSejour,
    RefusEnregistrement,
    OqtfAvecDelai,
    OqtfSansDelai,
    TransfertDublin,
    RejetCrv,
}

impl DecisionKind {
    pub const fn ordered() -> [Self; 9] {
        [
            Self::RefusCnda,
            Self::RejetOfpra,
            Self::RefusTitreSejour,
            Self::RetraitTitreSejour,
            Self::RefusEnregistrement,
            Self::OqtfAvecDelai,
            Self::OqtfSansDelai,
            Self::TransfertDublin,
            Self::RejetCrv,
        ]
    }

    pub const fn code(self) -> &'static str {
        match self {
            Self::RefusCnda => "refus_cnda",
            Self::RejetOfpra => "rejet_ofpra",
            Self::RefusTitreSejour => "refus_titre_sejour",
            Self::RetraitTitreSejour => "retrait_titre_sejour",
            Self::RefusEnregistrement => "refus_enregistrement",
            Self::OqtfAvecDelai => "oqtf_avec_delai",
            Self::OqtfSansDelai => "oqtf_sans_delai",
            Self::TransfertDublin => "transfert_dublin",
            Self::RejetCrv => "rejet_crv",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::RefusCnda => "Rejection by the National Court of Asylum (CNDA)",
            Self::RejetOfpra => "Asylum rejection by OFPRA",
            Self::RefusTitreSejour => "Residence permit refusal",
            Self::RetraitTitreSejour => "Residence permit withdrawal",
            Self::RefusEnregistrement => "Refusal to register an application",
            Self::OqtfAvecDelai => "Removal order with a departure period",
            Self::OqtfSansDelai => "Removal order without a departure period",
            Self::TransfertDublin => "Dublin transfer decision",
            Self::RejetCrv => "Rejection by the visa refusal commission",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        let normalized = code.trim().to_ascii_lowercase();
        Self::ordered()
            .into_iter()
            .find(|kind| kind.code() == normalized)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecourseType {
    CassationBeforeCouncilOfState,
    AppealBeforeCnda,
    ContentiousAppeal,
    ExpeditedContentiousAppeal,
    AppealBeforeNantesCourt,
    /// Used with the default delay when the decision kind is unknown.
    ToBeConfirmed,
}

impl RecourseType {
    pub const fn label(self) -> &'static str {
        match self {
            Self::CassationBeforeCouncilOfState => "appeal in cassation before the Council of State",
            Self::AppealBeforeCnda => "appeal before the CNDA",
            Self::ContentiousAppeal => "contentious appeal before the administrative court",
            Self::ExpeditedContentiousAppeal => {
                "expedited contentious appeal before the administrative court"
            }
            Self::AppealBeforeNantesCourt => "contentious appeal before the Nantes administrative court",
            Self::ToBeConfirmed => "recourse to be confirmed",
        }
    }
}

#[derive(Debug, Clone)]
pub struct StatutoryEntry {
    /// `None` only for the fallback entry.
    pub kind: Option<DecisionKind>,
    pub delay: StatutoryDelay,
    pub recourse: RecourseType,
}

#[derive(Debug, Clone, Copy)]
pub struct StatutoryLookup<'a> {
    pub entry: &'a StatutoryEntry,
    pub default_applied: bool,
}

/// Serializable row for decision-kind pickers.
#[derive(Debug, Clone, Serialize)]
pub struct StatutoryEntryView {
    pub code: &'static str,
    pub label: &'static str,
    pub delay: StatutoryDelay,
    pub delay_label: String,
    pub recourse: RecourseType,
    pub recourse_label: &'static str,
}

#[derive(Debug)]
pub struct StatutoryTable {
    entries: Vec<StatutoryEntry>,
    fallback: StatutoryEntry,
}

impl Default for StatutoryTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl StatutoryTable {
    pub fn standard() -> Self {
        Self {
            entries: standard_entries(),
            fallback: StatutoryEntry {
                kind: None,
                delay: StatutoryDelay::Days(DEFAULT_DELAY_DAYS),
                recourse: RecourseType::ToBeConfirmed,
            },
        }
    }

    pub fn entries(&self) -> &[StatutoryEntry] {
        &self.entries
    }

    pub fn get(&self, kind: DecisionKind) -> Option<&StatutoryEntry> {
        self.entries.iter().find(|entry| entry.kind == Some(kind))
    }

    /// Resolves a decision code. Unknown codes return the fallback entry with
    /// `default_applied` set, never a silent match.
    pub fn lookup(&self, code: &str) -> StatutoryLookup<'_> {
        match DecisionKind::from_code(code).and_then(|kind| self.get(kind)) {
            Some(entry) => StatutoryLookup {
                entry,
                default_applied: false,
            },
            None => StatutoryLookup {
                entry: &self.fallback,
                default_applied: true,
            },
        }
    }

    pub fn views(&self) -> Vec<StatutoryEntryView> {
        self.entries
            .iter()
            .filter_map(|entry| {
                entry.kind.map(|kind| StatutoryEntryView {
                    code: kind.code(),
                    label: kind.label(),
                    delay: entry.delay,
                    delay_label: entry.delay.describe(),
                    recourse: entry.recourse,
                    recourse_label: entry.recourse.label(),
                })
            })
            .collect()
    }
}

fn entry(kind: DecisionKind, delay: StatutoryDelay, recourse: RecourseType) -> StatutoryEntry {
    StatutoryEntry {
        kind: Some(kind),
        delay,
        recourse,
    }
}

fn standard_entries() -> Vec<StatutoryEntry> {
    use DecisionKind::*;
    use RecourseType::*;

    vec![
        entry(RefusCnda, StatutoryDelay::Months(1), CassationBeforeCouncilOfState),
        entry(RejetOfpra, StatutoryDelay::Months(1), AppealBeforeCnda),
        entry(RefusTitreSejour, StatutoryDelay::Months(2), ContentiousAppeal),
        entry(RetraitTitreSejour, StatutoryDelay::Months(2), ContentiousAppeal),
        entry(RefusEnregistrement, StatutoryDelay::Months(2), ContentiousAppeal),
        entry(OqtfAvecDelai, StatutoryDelay::Days(30), ContentiousAppeal),
        entry(OqtfSansDelai, StatutoryDelay::Days(2), ExpeditedContentiousAppeal),
        entry(TransfertDublin, StatutoryDelay::Days(15), ExpeditedContentiousAppeal),
        entry(RejetCrv, StatutoryDelay::Months(2), AppealBeforeNantesCourt),
    ]
}
