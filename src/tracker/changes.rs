//! Partial updates to an issue: validation of the wire payload, application
//! onto the record, and the reassignment-notification decision.

use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use crate::database::models::{Issue, Priority, Status};
use crate::tracker::error::TrackerError;

/// Raw payload of `PUT /issues/{id}/status`. Every field is optional; absent
/// fields leave the record untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateIssueRequest {
    pub status: Option<String>,
    pub assigned_to: Option<String>,
    pub priority: Option<String>,
    pub title: Option<String>,
    pub due_date: Option<String>,
    /// Actor stamp supplied by the (external) auth layer.
    pub updated_by: Option<String>,
}

/// Validated counterpart of [`UpdateIssueRequest`]. Only ever built through
/// [`IssueChanges::parse`], so an instance implies every provided field
/// already passed validation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IssueChanges {
    pub status: Option<Status>,
    pub assigned_to: Option<Uuid>,
    pub priority: Option<Priority>,
    pub title: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub updated_by: Option<Uuid>,
}

impl IssueChanges {
    pub fn parse(request: UpdateIssueRequest) -> Result<Self, TrackerError> {
        let status = request
            .status
            .map(|s| {
                Status::from_str(&s)
                    .ok_or_else(|| TrackerError::validation(format!("unknown status '{s}'")))
            })
            .transpose()?;

        let priority = request
            .priority
            .map(|p| {
                Priority::from_str(&p)
                    .ok_or_else(|| TrackerError::validation(format!("unknown priority '{p}'")))
            })
            .transpose()?;

        let assigned_to = request
            .assigned_to
            .map(|u| {
                Uuid::parse_str(&u)
                    .map_err(|_| TrackerError::validation("assigned_to must be a user id"))
            })
            .transpose()?;

        let updated_by = request
            .updated_by
            .map(|u| {
                Uuid::parse_str(&u)
                    .map_err(|_| TrackerError::validation("updated_by must be a user id"))
            })
            .transpose()?;

        let due_date = request.due_date.as_deref().map(parse_due_date).transpose()?;

        Ok(IssueChanges {
            status,
            assigned_to,
            priority,
            title: request.title,
            due_date,
            updated_by,
        })
    }

    /// Copies the provided fields onto the record. Fields absent from the
    /// payload keep their previous value; timestamps are stamped by the
    /// caller.
    pub fn apply(&self, issue: &mut Issue) {
        if let Some(status) = self.status {
            issue.status = status;
        }
        if let Some(assigned_to) = self.assigned_to {
            issue.assigned_to = Some(assigned_to);
        }
        if let Some(priority) = self.priority {
            issue.priority = priority;
        }
        if let Some(ref title) = self.title {
            issue.title = title.clone();
        }
        if let Some(due_date) = self.due_date {
            issue.due_date = Some(due_date);
        }
        if let Some(updated_by) = self.updated_by {
            issue.updated_by = updated_by;
        }
    }
}

pub(crate) fn parse_due_date(value: &str) -> Result<NaiveDate, TrackerError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| TrackerError::validation("due_date must be a YYYY-MM-DD date"))
}

/// Returns the user to notify after an update: the requested assignee, when
/// one was provided and it differs from who held the issue before.
pub fn notification_target(previous: Option<Uuid>, requested: Option<Uuid>) -> Option<Uuid> {
    match requested {
        Some(user) if previous != Some(user) => Some(user),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn request_with(field: &str, value: &str) -> UpdateIssueRequest {
        let mut request = UpdateIssueRequest::default();
        match field {
            "status" => request.status = Some(value.into()),
            "priority" => request.priority = Some(value.into()),
            "assigned_to" => request.assigned_to = Some(value.into()),
            "due_date" => request.due_date = Some(value.into()),
            _ => unreachable!(),
        }
        request
    }

    fn sample_issue() -> Issue {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        Issue {
            id: Uuid::new_v4(),
            issue_type: "it_hardware".into(),
            title: "Scanner offline".into(),
            description: "Dock 2 scanner does not power on.".into(),
            priority: Priority::Normal,
            status: Status::Pending,
            due_date: None,
            attachment_url: Some("https://files.example/scan.jpg".into()),
            downtime_start_time: None,
            downtime_end_time: None,
            created_by: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            assigned_to: Some(Uuid::new_v4()),
            updated_by: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_status_only_update_touches_nothing_else() {
        let before = sample_issue();
        let mut after = before.clone();

        let changes = IssueChanges::parse(request_with("status", "resolved")).unwrap();
        changes.apply(&mut after);

        assert_eq!(after.status, Status::Resolved);

        let mut reverted = after.clone();
        reverted.status = before.status;
        assert_eq!(reverted, before);
    }

    #[test]
    fn test_empty_request_parses_to_no_changes() {
        let changes = IssueChanges::parse(UpdateIssueRequest::default()).unwrap();
        assert_eq!(changes, IssueChanges::default());

        let before = sample_issue();
        let mut after = before.clone();
        changes.apply(&mut after);
        assert_eq!(after, before);
    }

    #[test]
    fn test_unknown_priority_is_rejected() {
        let err = IssueChanges::parse(request_with("priority", "urgent")).unwrap_err();
        assert!(matches!(err, TrackerError::Validation(_)));
        assert_eq!(err.to_string(), "unknown priority 'urgent'");
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        let err = IssueChanges::parse(request_with("status", "reopened")).unwrap_err();
        assert!(matches!(err, TrackerError::Validation(_)));
    }

    #[test]
    fn test_malformed_assignee_is_rejected() {
        let err = IssueChanges::parse(request_with("assigned_to", "not-a-uuid")).unwrap_err();
        assert!(matches!(err, TrackerError::Validation(_)));

        let err = IssueChanges::parse(request_with("assigned_to", "")).unwrap_err();
        assert!(matches!(err, TrackerError::Validation(_)));
    }

    #[test]
    fn test_malformed_due_date_is_rejected() {
        let err = IssueChanges::parse(request_with("due_date", "next tuesday")).unwrap_err();
        assert!(matches!(err, TrackerError::Validation(_)));

        let changes = IssueChanges::parse(request_with("due_date", "2024-06-30")).unwrap();
        assert_eq!(
            changes.due_date,
            Some(NaiveDate::from_ymd_opt(2024, 6, 30).unwrap())
        );
    }

    #[test]
    fn test_notification_target_on_reassignment() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();

        // A -> B notifies B, exactly once per update.
        assert_eq!(notification_target(Some(a), Some(b)), Some(b));
        // A -> A is a no-op.
        assert_eq!(notification_target(Some(a), Some(a)), None);
        // First assignment notifies the new assignee.
        assert_eq!(notification_target(None, Some(b)), Some(b));
        // No assignee in the payload never notifies.
        assert_eq!(notification_target(Some(a), None), None);
        assert_eq!(notification_target(None, None), None);
    }
}
