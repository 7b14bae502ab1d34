use super::domain::{ApplicationKind, PermitApplication};
use super::taxonomy::PermitSelection;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Permit facts already held on the client's profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfilePrefill {
    #[serde(default)]
    pub permit_category: Option<PermitSelection>,
    #[serde(default)]
    pub delivery_date: Option<NaiveDate>,
    #[serde(default)]
    pub expiration_date: Option<NaiveDate>,
}

impl PermitApplication {
    pub fn from_profile(profile: &ProfilePrefill, application_kind: ApplicationKind) -> Self {
        let mut application = Self::new(application_kind);
        application.apply_prefill(profile);
        application
    }

    /// Copies profile values into fields the user has not filled yet. Values
    /// already entered are never overwritten, and the profile is only read.
    pub fn apply_prefill(&mut self, profile: &ProfilePrefill) {
        if self.permit_category.is_empty() {
            if let Some(selection) = &profile.permit_category {
                self.permit_category = selection.clone();
            }
        }
        if self.current_delivery_date.is_none() {
            self.current_delivery_date = profile.delivery_date;
        }
        if self.current_expiration_date.is_none() {
            self.current_expiration_date = profile.expiration_date;
        }
    }
}
