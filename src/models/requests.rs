use serde::{Deserialize, Serialize};
use validator::Validate;
use crate::models::domain::{DonorId, Engagement, UnknownEngagement};

/// Query string for suggest-donors
///
/// Empty values count as unset so the event's own attributes apply.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SuggestQuery {
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub medical_focus: Option<String>,
    #[serde(default)]
    pub engagement: Option<String>,
}

/// Caller-supplied replacements for the event's match criteria
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchOverrides {
    pub city: Option<String>,
    pub medical_focus: Option<String>,
    pub engagement: Option<Engagement>,
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

impl SuggestQuery {
    pub fn overrides(&self) -> Result<MatchOverrides, UnknownEngagement> {
        let engagement = match non_empty(&self.engagement) {
            Some(raw) => Some(raw.parse::<Engagement>()?),
            None => None,
        };

        Ok(MatchOverrides {
            city: non_empty(&self.city),
            medical_focus: non_empty(&self.medical_focus),
            engagement,
        })
    }
}

/// Body of the add/remove staging calls
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DonorEditRequest {
    #[validate(range(min = 1))]
    #[serde(alias = "donor_id", rename = "donorId")]
    pub donor_id: DonorId,
}

/// Query string for donor name search
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DonorSearchQuery {
    #[validate(length(min = 1, max = 100))]
    #[serde(default)]
    pub name: String,
}
