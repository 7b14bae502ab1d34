//! Visa refusal procedure as a state machine over the facts revealed so far.
//!
//! `advance` walks the facts in procedural order and stops at the first state
//! whose exit condition is not yet known; `conclude` turns that state into a
//! verdict. Every date resolved on the way lands on the timeline.

use super::super::calendar::{add_days, add_months, days_between, DateWindow};
use super::super::domain::{
    ComputationResult, FieldIssue, RefusalType, SilenceAction, SituationKind, VisaRefusalCase,
    VisaStage,
};
use super::super::urgency::{classify, ThresholdSet};
use super::outcome::{day_count, Assessment, Verdict};
use chrono::NaiveDate;

/// Silence of the consulate for this long counts as a refusal.
pub const IMPLICIT_REFUSAL_MONTHS: u32 = 4;
pub const RAPO_DELAY_DAYS: i64 = 30;
pub const COMMISSION_REPLY_MONTHS: u32 = 2;
pub const MOTIVES_REPLY_MONTHS: u32 = 1;
pub const MOTIVES_PRESUMED_REFUSAL_DAYS: i64 = 30;
pub const TRIBUNAL_DELAY_MONTHS: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TribunalBasis {
    CommissionReply,
    CommissionSilence,
    MotivesReceived,
}

impl TribunalBasis {
    const fn describe(self) -> &'static str {
        match self {
            Self::CommissionReply => "the commission's reply",
            Self::CommissionSilence => "the commission's implicit rejection",
            Self::MotivesReceived => "the refusal whose motives were communicated",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VisaState {
    NoRecourse {
        implicit_refusal: NaiveDate,
    },
    AwaitingRefusalType {
        implicit_refusal: NaiveDate,
    },
    AwaitingRapoFiling {
        refusal_type: RefusalType,
        window: DateWindow,
    },
    AwaitingCommissionReply {
        commission_deadline: NaiveDate,
    },
    AwaitingTribunalAction {
        commission_deadline: NaiveDate,
    },
    MotivesRequested {
        motives_deadline: NaiveDate,
        window: DateWindow,
    },
    TribunalDeadlineSet {
        basis: TribunalBasis,
        window: DateWindow,
    },
}

impl VisaState {
    const fn stage(self) -> VisaStage {
        match self {
            Self::NoRecourse { .. } => VisaStage::NoRecourse,
            Self::AwaitingRefusalType { .. } => VisaStage::AwaitingRefusalType,
            Self::AwaitingRapoFiling { .. } => VisaStage::AwaitingRapoFiling,
            Self::AwaitingCommissionReply { .. } => VisaStage::AwaitingCommissionReply,
            Self::AwaitingTribunalAction { .. } => VisaStage::AwaitingTribunalAction,
            Self::MotivesRequested { .. } => VisaStage::MotivesRequested,
            Self::TribunalDeadlineSet { .. } => VisaStage::TribunalDeadlineSet,
        }
    }
}

pub(super) fn assess(case: &VisaRefusalCase, now: NaiveDate) -> ComputationResult {
    let mut assessment = Assessment::new(SituationKind::VisaRefusalAppeal);

    match advance(case, now, &mut assessment) {
        Some(state) => {
            assessment.set_stage(state.stage());
            let verdict = conclude(state, case, now);
            assessment.finish(now, verdict)
        }
        None => assessment.reject(now),
    }
}

fn tribunal_window(from: NaiveDate) -> DateWindow {
    DateWindow::new(add_days(from, 1), add_months(from, TRIBUNAL_DELAY_MONTHS))
}

fn open_tribunal_window(assessment: &mut Assessment, window: DateWindow) {
    assessment.milestone("tribunal_window_opens", "Tribunal appeal window opens", window.start);
    assessment.deadline(
        "tribunal_window_end",
        "Tribunal appeal deadline (administrative court of Nantes)",
        window.end,
    );
}

/// Returns `None` once a blocking issue has been recorded.
fn advance(case: &VisaRefusalCase, now: NaiveDate, assessment: &mut Assessment) -> Option<VisaState> {
    let deposit = case.deposit_confirmation_date;
    assessment.milestone("deposit_confirmed", "Visa application deposit confirmed", deposit);

    let implicit_refusal = add_months(deposit, IMPLICIT_REFUSAL_MONTHS);

    if now > implicit_refusal && case.refusal_type.is_none() && case.rapo_filing_date.is_none() {
        assessment.milestone(
            "implicit_refusal",
            "Implicit refusal (four months without an answer)",
            implicit_refusal,
        );
        return Some(VisaState::NoRecourse { implicit_refusal });
    }

    let refusal_type = match case.refusal_type {
        Some(refusal_type) => refusal_type,
        None if case.rapo_filing_date.is_some() && now > implicit_refusal => {
            if let Some(rapo_filed) = case
                .rapo_filing_date
                .filter(|filed| *filed < implicit_refusal)
            {
                // An explicit refusal may have preceded the RAPO; only the user can tell.
                assessment.issue(FieldIssue::missing(
                    "refusal_type",
                    format!(
                        "indicate whether the visa was refused explicitly or implicitly: the RAPO \
                         filed on {rapo_filed} predates the implicit refusal date {implicit_refusal}"
                    ),
                ));
                return None;
            }
            assessment.note(
                "No refusal type given: treated as an implicit refusal because a RAPO is \
                 recorded after four months without an answer",
            );
            RefusalType::Implicit
        }
        None => return Some(VisaState::AwaitingRefusalType { implicit_refusal }),
    };

    let refusal = match refusal_type {
        RefusalType::Explicit => {
            let Some(notified) = case.explicit_notification_date else {
                assessment.issue(FieldIssue::missing(
                    "explicit_notification_date",
                    "enter the date the explicit refusal was notified",
                ));
                return None;
            };
            if notified < deposit {
                assessment.issue(FieldIssue::contradiction(
                    "explicit_notification_date",
                    format!("the refusal notification {notified} precedes the deposit {deposit}"),
                ));
                return None;
            }
            assessment.milestone("refusal", "Explicit refusal notified", notified);
            notified
        }
        RefusalType::Implicit => {
            assessment.milestone(
                "refusal",
                "Implicit refusal (four months without an answer)",
                implicit_refusal,
            );
            implicit_refusal
        }
    };

    let rapo_window = DateWindow::new(add_days(refusal, 1), add_days(refusal, RAPO_DELAY_DAYS));

    let Some(rapo_filed) = case.rapo_filing_date else {
        assessment.deadline(
            "rapo_window_end",
            "RAPO deadline (visa refusal commission)",
            rapo_window.end,
        );
        return Some(VisaState::AwaitingRapoFiling {
            refusal_type,
            window: rapo_window,
        });
    };

    if rapo_filed < refusal {
        assessment.issue(FieldIssue::contradiction(
            "rapo_filing_date",
            format!("the RAPO filing date {rapo_filed} precedes the refusal it challenges ({refusal})"),
        ));
        return None;
    }
    if rapo_filed > rapo_window.end {
        assessment.note(format!(
            "The RAPO was filed on {rapo_filed}, after the window that closed on {}: confirm \
             its admissibility before relying on the dates below",
            rapo_window.end
        ));
    }
    assessment.milestone("rapo_filed", "RAPO filed with the commission", rapo_filed);

    let commission_deadline = add_months(rapo_filed, COMMISSION_REPLY_MONTHS);

    if case.rapo_response_received {
        let Some(replied) = case.rapo_response_date else {
            assessment.deadline(
                "commission_deadline",
                "Commission reply deadline",
                commission_deadline,
            );
            assessment.issue(FieldIssue::missing(
                "rapo_response_date",
                "enter the date the commission's reply was received",
            ));
            return None;
        };
        if replied < rapo_filed {
            assessment.issue(FieldIssue::contradiction(
                "rapo_response_date",
                format!("the commission reply {replied} precedes the RAPO filing {rapo_filed}"),
            ));
            return None;
        }

        assessment.milestone(
            "commission_deadline",
            "Commission reply deadline (reference)",
            commission_deadline,
        );
        assessment.milestone("rapo_response", "Commission reply received", replied);
        let window = tribunal_window(replied);
        open_tribunal_window(assessment, window);
        return Some(VisaState::TribunalDeadlineSet {
            basis: TribunalBasis::CommissionReply,
            window,
        });
    }

    let motives_requested = matches!(
        case.chosen_action_on_silence,
        Some(SilenceAction::RequestMotives)
    ) || (case.chosen_action_on_silence.is_none()
        && (case.motives_request_date.is_some() || case.motives_received_date.is_some()));

    let commission_label = "Commission reply deadline (silence is an implicit rejection)";

    match case.chosen_action_on_silence {
        Some(SilenceAction::GoToTribunal) => {
            assessment.deadline("commission_deadline", commission_label, commission_deadline);
            let window = tribunal_window(commission_deadline);
            open_tribunal_window(assessment, window);
            Some(VisaState::TribunalDeadlineSet {
                basis: TribunalBasis::CommissionSilence,
                window,
            })
        }
        _ if motives_requested => {
            assessment.deadline("commission_deadline", commission_label, commission_deadline);

            let Some(requested) = case.motives_request_date else {
                assessment.issue(FieldIssue::missing(
                    "motives_request_date",
                    "enter the date the motives of the refusal were requested",
                ));
                return None;
            };
            if requested < rapo_filed {
                assessment.issue(FieldIssue::contradiction(
                    "motives_request_date",
                    format!("the motives request {requested} precedes the RAPO filing {rapo_filed}"),
                ));
                return None;
            }

            assessment.milestone("motives_requested", "Motives of the refusal requested", requested);
            let motives_deadline = add_months(requested, MOTIVES_REPLY_MONTHS);

            match case.motives_received_date {
                Some(received) => {
                    if received < requested {
                        assessment.issue(FieldIssue::contradiction(
                            "motives_received_date",
                            format!("the motives were received on {received}, before being requested on {requested}"),
                        ));
                        return None;
                    }
                    assessment.milestone(
                        "motives_deadline",
                        "Motives communication deadline (reference)",
                        motives_deadline,
                    );
                    assessment.milestone("motives_received", "Motives received", received);
                    let window = tribunal_window(received);
                    open_tribunal_window(assessment, window);
                    Some(VisaState::TribunalDeadlineSet {
                        basis: TribunalBasis::MotivesReceived,
                        window,
                    })
                }
                None => {
                    assessment.deadline(
                        "motives_deadline",
                        "Motives communication deadline",
                        motives_deadline,
                    );
                    let window = DateWindow::new(
                        add_days(requested, MOTIVES_PRESUMED_REFUSAL_DAYS),
                        add_months(requested, TRIBUNAL_DELAY_MONTHS),
                    );
                    open_tribunal_window(assessment, window);
                    Some(VisaState::MotivesRequested {
                        motives_deadline,
                        window,
                    })
                }
            }
        }
        _ => {
            assessment.deadline("commission_deadline", commission_label, commission_deadline);
            if now <= commission_deadline {
                Some(VisaState::AwaitingCommissionReply {
                    commission_deadline,
                })
            } else {
                Some(VisaState::AwaitingTribunalAction {
                    commission_deadline,
                })
            }
        }
    }
}

fn conclude(state: VisaState, case: &VisaRefusalCase, now: NaiveDate) -> Verdict {
    match state {
        VisaState::NoRecourse { implicit_refusal } => {
            let days = days_between(now, implicit_refusal);
            Verdict::scored(
                days,
                classify(days, ThresholdSet::AppealDeadline),
                format!(
                    "The statutory window has closed: the application deposited on {} was \
                     implicitly refused on {implicit_refusal}, {} ago, and no RAPO is recorded. \
                     If a RAPO was filed before the window closed, enter its filing date to \
                     reopen the appeal chain.",
                    case.deposit_confirmation_date,
                    day_count(days)
                ),
                None,
            )
        }
        VisaState::AwaitingRefusalType { implicit_refusal } => Verdict::pending(format!(
            "Indicate whether the visa was refused explicitly or implicitly. Without an answer, \
             the application will be implicitly refused on {implicit_refusal}, in {}.",
            day_count(days_between(now, implicit_refusal))
        )),
        VisaState::AwaitingRapoFiling {
            refusal_type,
            window,
        } => {
            let days = days_between(now, window.end);
            let refusal = match refusal_type {
                RefusalType::Explicit => "explicit refusal",
                RefusalType::Implicit => "implicit refusal",
            };
            let headline = if days < 0 {
                format!(
                    "The RAPO window against the {refusal} closed on {}, {} ago. If a RAPO was \
                     filed in time, enter its filing date.",
                    window.end,
                    day_count(days)
                )
            } else {
                format!(
                    "File the RAPO against the {refusal} with the visa refusal commission \
                     between {} and {}: {} remaining.",
                    window.start,
                    window.end,
                    day_count(days)
                )
            };
            Verdict::scored(
                days,
                classify(days, ThresholdSet::AppealDeadline),
                headline,
                Some(window),
            )
        }
        VisaState::AwaitingCommissionReply {
            commission_deadline,
        } => Verdict::informational(
            days_between(now, commission_deadline),
            format!(
                "RAPO filed: the commission has until {commission_deadline} to reply, {} \
                 remaining. If it stays silent, a choice is required: go to the tribunal or \
                 request the motives of the refusal.",
                day_count(days_between(now, commission_deadline))
            ),
        ),
        VisaState::AwaitingTribunalAction {
            commission_deadline,
        } => {
            let days = days_between(now, commission_deadline);
            Verdict::informational(
                days,
                format!(
                    "The commission did not reply by {commission_deadline}, {} ago: the RAPO is \
                     implicitly rejected. A choice is required: go to the tribunal (deadline {}) \
                     or request the motives of the refusal.",
                    day_count(days),
                    add_months(commission_deadline, TRIBUNAL_DELAY_MONTHS)
                ),
            )
        }
        VisaState::MotivesRequested {
            motives_deadline,
            window,
        } => {
            let days = days_between(now, window.end);
            let headline = if days < 0 {
                format!(
                    "Motives were never communicated and the tribunal deadline of {} passed {} ago.",
                    window.end,
                    day_count(days)
                )
            } else {
                format!(
                    "Motives requested: the administration has until {motives_deadline} to \
                     communicate them. Without an answer, refer the case to the tribunal between \
                     {} and {}: {} remaining.",
                    window.start,
                    window.end,
                    day_count(days)
                )
            };
            Verdict::scored(
                days,
                classify(days, ThresholdSet::AppealDeadline),
                headline,
                Some(window),
            )
        }
        VisaState::TribunalDeadlineSet { basis, window } => {
            let days = days_between(now, window.end);
            let headline = if days < 0 {
                format!(
                    "The tribunal deadline against {} was {}, {} ago.",
                    basis.describe(),
                    window.end,
                    day_count(days)
                )
            } else {
                format!(
                    "Tribunal appeal against {}: file between {} and {}, {} remaining.",
                    basis.describe(),
                    window.start,
                    window.end,
                    day_count(days)
                )
            };
            Verdict::scored(
                days,
                classify(days, ThresholdSet::AppealDeadline),
                headline,
                Some(window),
            )
        }
    }
}
