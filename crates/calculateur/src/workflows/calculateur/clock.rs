use chrono::{Local, NaiveDate};

/// Source of the evaluation date. Read once per computation so every derived
/// deadline is measured against the same day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Clock {
    /// Local calendar date of the host.
    #[default]
    System,
    /// Pinned date, used for demos and reproducible runs.
    Fixed(NaiveDate),
}

impl Clock {
    pub fn today(&self) -> NaiveDate {
        match self {
            Clock::System => Local::now().date_naive(),
            Clock::Fixed(date) => *date,
        }
    }

    /// Caller-supplied date wins over the clock.
    pub fn resolve(&self, requested: Option<NaiveDate>) -> NaiveDate {
        requested.unwrap_or_else(|| self.today())
    }
}
