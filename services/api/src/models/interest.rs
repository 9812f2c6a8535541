//! Interest model and its status state machine

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::models::house::{House, HouseSummary};

/// Interest lifecycle status
///
/// `Pending` can move to `Approved` or `Rejected`; both are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InterestStatus {
    Pending,
    Approved,
    Rejected,
}

impl InterestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InterestStatus::Pending => "Pending",
            InterestStatus::Approved => "Approved",
            InterestStatus::Rejected => "Rejected",
        }
    }

    /// Validate a transition out of the current status.
    pub fn transition(self, to: InterestStatus) -> Result<InterestStatus, InterestStatus> {
        match (self, to) {
            (InterestStatus::Pending, InterestStatus::Approved)
            | (InterestStatus::Pending, InterestStatus::Rejected) => Ok(to),
            _ => Err(self),
        }
    }
}

impl fmt::Display for InterestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InterestStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(InterestStatus::Pending),
            "approved" => Ok(InterestStatus::Approved),
            "rejected" => Ok(InterestStatus::Rejected),
            other => Err(format!("Unknown interest status: {}", other)),
        }
    }
}

/// Interest entity
#[derive(Debug, Clone, Serialize)]
pub struct Interest {
    pub id: Uuid,
    pub house_id: Uuid,
    pub tenant_id: Uuid,
    pub message: Option<String>,
    pub status: InterestStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Interest creation request body
#[derive(Debug, Clone, Deserialize)]
pub struct CreateInterestRequest {
    pub house_id: Option<Uuid>,
    pub message: Option<String>,
}

/// Counterpart identity embedded in interest views
///
/// The email is present only while the interest is approved.
#[derive(Debug, Clone, Serialize)]
pub struct ContactSummary {
    pub id: Uuid,
    pub name: String,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// House plus owner contact, embedded in the tenant's interest list
#[derive(Debug, Clone, Serialize)]
pub struct InterestHouseView {
    #[serde(flatten)]
    pub house: House,
    pub owner: ContactSummary,
}

/// One row of `GET /api/interests/my-interests`
#[derive(Debug, Clone, Serialize)]
pub struct TenantInterestView {
    #[serde(flatten)]
    pub interest: Interest,
    pub house: InterestHouseView,
}

/// One row of `GET /api/interests/owner`
#[derive(Debug, Clone, Serialize)]
pub struct OwnerInterestView {
    #[serde(flatten)]
    pub interest: Interest,
    pub tenant: ContactSummary,
    pub house: HouseSummary,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_resolves_both_ways() {
        assert_eq!(
            InterestStatus::Pending.transition(InterestStatus::Approved),
            Ok(InterestStatus::Approved)
        );
        assert_eq!(
            InterestStatus::Pending.transition(InterestStatus::Rejected),
            Ok(InterestStatus::Rejected)
        );
    }

    #[test]
    fn resolved_states_are_terminal() {
        assert!(
            InterestStatus::Approved
                .transition(InterestStatus::Rejected)
                .is_err()
        );
        assert!(
            InterestStatus::Rejected
                .transition(InterestStatus::Approved)
                .is_err()
        );
        // no restart transition exists
        assert!(
            InterestStatus::Approved
                .transition(InterestStatus::Pending)
                .is_err()
        );
        assert!(
            InterestStatus::Rejected
                .transition(InterestStatus::Pending)
                .is_err()
        );
    }

    #[test]
    fn status_parses_case_insensitively() {
        assert_eq!(
            "pending".parse::<InterestStatus>().unwrap(),
            InterestStatus::Pending
        );
        assert_eq!(
            "APPROVED".parse::<InterestStatus>().unwrap(),
            InterestStatus::Approved
        );
        assert!("stalled".parse::<InterestStatus>().is_err());
    }
}
