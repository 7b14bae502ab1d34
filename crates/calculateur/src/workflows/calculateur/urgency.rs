use super::domain::Urgency;

pub const RENEWAL_URGENT_BELOW_DAYS: i64 = 60;
pub const APPEAL_URGENT_WITHIN_DAYS: i64 = 7;
pub const APPEAL_WARNING_WITHIN_DAYS: i64 = 30;

/// Threshold family used to bucket a day count. Permit renewals and appeal
/// deadlines run on different scales and must not be mixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThresholdSet {
    /// overdue < 0, urgent < 60, nominal otherwise. No warning tier.
    PermitRenewal,
    /// overdue < 0, urgent <= 7, warning <= 30, nominal otherwise.
    AppealDeadline,
}

struct Bands {
    urgent_max: i64,
    warning_max: Option<i64>,
}

impl ThresholdSet {
    const fn bands(self) -> Bands {
        match self {
            Self::PermitRenewal => Bands {
                urgent_max: RENEWAL_URGENT_BELOW_DAYS - 1,
                warning_max: None,
            },
            Self::AppealDeadline => Bands {
                urgent_max: APPEAL_URGENT_WITHIN_DAYS,
                warning_max: Some(APPEAL_WARNING_WITHIN_DAYS),
            },
        }
    }
}

pub fn classify(days_remaining: i64, thresholds: ThresholdSet) -> Urgency {
    let bands = thresholds.bands();

    if days_remaining < 0 {
        Urgency::Overdue
    } else if days_remaining <= bands.urgent_max {
        Urgency::Urgent
    } else if bands
        .warning_max
        .is_some_and(|warning_max| days_remaining <= warning_max)
    {
        Urgency::Warning
    } else {
        Urgency::Nominal
    }
}
