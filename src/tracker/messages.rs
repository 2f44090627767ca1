//! User-facing strings returned by the action endpoints and sent to the
//! notification sink.

use crate::database::models::Issue;

pub const DOWNTIME_STARTED: &str = "Downtime started.";
pub const DOWNTIME_STOPPED: &str = "Downtime stopped.";
pub const DOWNTIME_ALREADY_ENDED: &str = "Downtime already ended.";

pub fn assignment_subject(issue: &Issue) -> String {
    format!("You have been assigned an issue: {}", issue.title)
}

pub fn assignment_body(assignee_name: &str, issue: &Issue) -> String {
    let due = issue
        .due_date
        .map(|d| format!("\nDue date: {d}"))
        .unwrap_or_default();

    format!(
        "Hi {assignee_name},\n\n\
        The issue \"{}\" ({} priority, currently {}) has been assigned to you.{due}\n\n\
        Description:\n{}",
        issue.title,
        issue.priority.as_str(),
        issue.status.as_str(),
        issue.description,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::{Priority, Status};
    use chrono::{NaiveDate, TimeZone, Utc};
    use uuid::Uuid;

    fn sample_issue() -> Issue {
        let now = Utc.with_ymd_and_hms(2024, 5, 2, 8, 30, 0).unwrap();
        Issue {
            id: Uuid::new_v4(),
            issue_type: "safety".into(),
            title: "Conveyor belt misaligned".into(),
            description: "Belt 3 drifts left under load.".into(),
            priority: Priority::Critical,
            status: Status::Pending,
            due_date: Some(NaiveDate::from_ymd_opt(2024, 5, 10).unwrap()),
            attachment_url: None,
            downtime_start_time: None,
            downtime_end_time: None,
            created_by: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            assigned_to: None,
            updated_by: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_assignment_subject_names_the_issue() {
        let msg = assignment_subject(&sample_issue());
        assert!(msg.contains("Conveyor belt misaligned"));
    }

    #[test]
    fn test_assignment_body_carries_the_details() {
        let msg = assignment_body("Dana", &sample_issue());
        assert!(msg.contains("Hi Dana"));
        assert!(msg.contains("critical priority"));
        assert!(msg.contains("currently pending"));
        assert!(msg.contains("Due date: 2024-05-10"));
        assert!(msg.contains("Belt 3 drifts left under load."));
    }

    #[test]
    fn test_assignment_body_without_due_date() {
        let mut issue = sample_issue();
        issue.due_date = None;
        let msg = assignment_body("Dana", &issue);
        assert!(!msg.contains("Due date"));
    }
}
