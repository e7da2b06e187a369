use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub type DonorId = i64;
pub type EventId = i64;

/// How actively a donor takes part in events
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Engagement {
    #[default]
    #[serde(rename = "Highly Engaged")]
    High,
    #[serde(rename = "Moderately Engaged")]
    Moderate,
    #[serde(rename = "Rarely Engaged")]
    Rare,
}

impl Engagement {
    pub fn as_str(&self) -> &'static str {
        match self {
            Engagement::High => "Highly Engaged",
            Engagement::Moderate => "Moderately Engaged",
            Engagement::Rare => "Rarely Engaged",
        }
    }
}

impl fmt::Display for Engagement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown engagement '{0}', expected one of: Highly Engaged, Moderately Engaged, Rarely Engaged")]
pub struct UnknownEngagement(pub String);

impl FromStr for Engagement {
    type Err = UnknownEngagement;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Highly Engaged" => Ok(Engagement::High),
            "Moderately Engaged" => Ok(Engagement::Moderate),
            "Rarely Engaged" => Ok(Engagement::Rare),
            other => Err(UnknownEngagement(other.to_string())),
        }
    }
}

/// Donor record as read from the donor store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Donor {
    pub id: DonorId,
    pub name: String,
    pub city: String,
    pub email: String,
    pub total_donation: f64,
    pub engagement: Engagement,
    pub medical_focus: Vec<String>,
    #[serde(default)]
    pub pmm: Option<String>,
}

impl Donor {
    /// True when the donor carries the given medical focus tag
    #[inline]
    pub fn has_focus(&self, focus: &str) -> bool {
        self.medical_focus.iter().any(|tag| tag == focus)
    }
}

/// Fundraising event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub name: String,
    pub date: chrono::NaiveDate,
    pub location: String,
    pub city: String,
    pub medical_focus: String,
    pub capacity: i32,
    pub coordinator: String,
    pub fundraiser: String,
    #[serde(default)]
    pub details: Option<String>,
}

/// Invitation progress of an event, derived from its committed donor count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventStatus {
    #[serde(rename = "Not Started")]
    NotStarted,
    #[serde(rename = "In Process")]
    InProcess,
    #[serde(rename = "Fully Invited")]
    FullyInvited,
}

impl EventStatus {
    pub fn from_counts(donor_count: i64, capacity: i32) -> Self {
        if donor_count == 0 {
            EventStatus::NotStarted
        } else if donor_count < i64::from(capacity) {
            EventStatus::InProcess
        } else {
            EventStatus::FullyInvited
        }
    }
}

/// Event row for listings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventSummary {
    pub id: EventId,
    pub name: String,
    pub date: chrono::NaiveDate,
    pub city: String,
    pub medical_focus: String,
    pub capacity: i32,
    pub coordinator: String,
    pub fundraiser: String,
    pub donor_count: i64,
    pub status: EventStatus,
}
