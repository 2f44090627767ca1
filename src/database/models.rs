use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Member,
    Guest,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Member => "member",
            Role::Guest => "guest",
        }
    }

    pub fn from_str(role: &str) -> Option<Self> {
        match role {
            "admin" => Some(Role::Admin),
            "member" => Some(Role::Member),
            "guest" => Some(Role::Guest),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Pending,
    Active,
    Resolved,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Pending => "pending",
            Status::Active => "active",
            Status::Resolved => "resolved",
        }
    }

    pub fn from_str(status: &str) -> Option<Self> {
        match status {
            "pending" => Some(Status::Pending),
            "active" => Some(Status::Active),
            "resolved" => Some(Status::Resolved),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Critical,
    Normal,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Critical => "critical",
            Priority::Normal => "normal",
        }
    }

    pub fn from_str(priority: &str) -> Option<Self> {
        match priority {
            "critical" => Some(Priority::Critical),
            "normal" => Some(Priority::Normal),
            _ => None,
        }
    }
}

/// One tracked ticket. The downtime columns mirror storage; domain code reads
/// them through `tracker::downtime::Downtime` rather than as a raw pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub issue_type: String,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub status: Status,
    pub due_date: Option<NaiveDate>,
    pub attachment_url: Option<String>,
    pub downtime_start_time: Option<DateTime<Utc>>,
    pub downtime_end_time: Option<DateTime<Utc>>,
    pub created_by: Uuid,
    pub owner_id: Uuid,
    pub assigned_to: Option<Uuid>,
    pub updated_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A named classification; each category designates one default-owner user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueCategory {
    pub id: Uuid,
    pub name: String,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for status in [Status::Pending, Status::Active, Status::Resolved] {
            assert_eq!(Status::from_str(status.as_str()), Some(status));
        }
        assert_eq!(Status::from_str("closed"), None);
    }

    #[test]
    fn test_priority_round_trip() {
        for priority in [Priority::Critical, Priority::Normal] {
            assert_eq!(Priority::from_str(priority.as_str()), Some(priority));
        }
        assert_eq!(Priority::from_str("urgent"), None);
    }

    #[test]
    fn test_role_rejects_unknown() {
        assert_eq!(Role::from_str("superuser"), None);
        assert_eq!(Role::from_str("guest"), Some(Role::Guest));
    }
}
