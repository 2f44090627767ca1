use std::sync::Arc;

use chrono::Utc;
use serde::Deserialize;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::database::models::{Issue, IssueCategory, Priority, Status, User};
use crate::database::Database;
use crate::notify::Notifier;
use crate::tracker::changes::{
    notification_target, parse_due_date, IssueChanges, UpdateIssueRequest,
};
use crate::tracker::downtime::{format_elapsed, Downtime, DowntimePhase};
use crate::tracker::error::TrackerError;

/// Payload of `POST /issues`. The intake form has always called the title
/// field `name`, so the wire keeps that spelling.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateIssueRequest {
    #[serde(rename = "type")]
    pub issue_type: String,
    pub name: String,
    pub priority: String,
    pub description: String,
    pub due_date: Option<String>,
    pub attachment_url: Option<String>,
    /// Id of the authenticated submitter; absent for guest submissions.
    pub created_by: Option<String>,
    pub full_name: Option<String>,
    pub email: Option<String>,
}

/// Orchestrates issue intake, triage updates, the downtime timer, and the
/// category/user directories on top of the shared pool.
pub struct IssueManager {
    db: Arc<Database>,
    notifier: Arc<dyn Notifier>,
    default_owner_id: Uuid,
}

impl IssueManager {
    pub fn new(db: Arc<Database>, notifier: Arc<dyn Notifier>, default_owner_id: Uuid) -> Self {
        IssueManager {
            db,
            notifier,
            default_owner_id,
        }
    }

    pub async fn create_issue(&self, request: CreateIssueRequest) -> Result<Issue, TrackerError> {
        let pool = self.db.pool();
        let now = Utc::now();

        for (field, value) in [
            ("type", &request.issue_type),
            ("name", &request.name),
            ("description", &request.description),
        ] {
            if value.trim().is_empty() {
                return Err(TrackerError::validation(format!("{field} is required")));
            }
        }

        let priority = Priority::from_str(&request.priority).ok_or_else(|| {
            TrackerError::validation(format!("unknown priority '{}'", request.priority))
        })?;
        let due_date = request.due_date.as_deref().map(parse_due_date).transpose()?;

        let reporter = self.resolve_reporter(&request).await?;
        let category = IssueCategory::find_by_name(pool, &request.issue_type).await?;
        let owner = default_owner(category.as_ref(), self.default_owner_id);

        let issue = Issue {
            id: Uuid::new_v4(),
            issue_type: request.issue_type,
            title: request.name,
            description: request.description,
            priority,
            status: Status::Pending,
            due_date,
            attachment_url: request.attachment_url,
            downtime_start_time: None,
            downtime_end_time: None,
            created_by: reporter.id,
            owner_id: owner,
            assigned_to: Some(owner),
            updated_by: reporter.id,
            created_at: now,
            updated_at: now,
        };

        Issue::create(pool, &issue).await?;
        info!("Issue {} created by {}", issue.id, reporter.id);

        Ok(issue)
    }

    /// Authenticated submitters arrive with a `created_by` id; guests are
    /// provisioned by email on first contact.
    async fn resolve_reporter(&self, request: &CreateIssueRequest) -> Result<User, TrackerError> {
        let pool = self.db.pool();

        if let Some(ref id) = request.created_by {
            let id = Uuid::parse_str(id)
                .map_err(|_| TrackerError::validation("created_by must be a user id"))?;
            return User::get(pool, id).await?.ok_or(TrackerError::NotFound(id));
        }

        let email = request
            .email
            .as_deref()
            .filter(|e| !e.trim().is_empty())
            .ok_or_else(|| TrackerError::validation("guest submissions require an email"))?;
        if !email.contains('@') {
            return Err(TrackerError::validation("email must be a valid address"));
        }

        let name = request.full_name.as_deref().unwrap_or("Guest");
        Ok(User::find_or_create_by_email(pool, name, email, Utc::now()).await?)
    }

    pub async fn update_issue(
        &self,
        id: Uuid,
        request: UpdateIssueRequest,
    ) -> Result<(), TrackerError> {
        let changes = IssueChanges::parse(request)?;
        let pool = self.db.pool();

        let mut issue = Issue::get(pool, id)
            .await?
            .ok_or(TrackerError::NotFound(id))?;
        let previous_assignee = issue.assigned_to;

        changes.apply(&mut issue);
        issue.updated_at = Utc::now();
        // The row can vanish between the lookup and the write; a zero-row
        // update must not be reported as a persisted change.
        if !Issue::update(pool, &issue).await? {
            return Err(TrackerError::NotFound(id));
        }

        if let Some(target) = notification_target(previous_assignee, changes.assigned_to) {
            self.dispatch_assignment(target, issue).await;
        }

        Ok(())
    }

    /// Best-effort hand-off to the notification sink. A notification that
    /// cannot be delivered never rolls back the persisted update.
    async fn dispatch_assignment(&self, target: Uuid, issue: Issue) {
        let user = match User::get(self.db.pool(), target).await {
            Ok(Some(user)) => user,
            Ok(None) => {
                warn!("Assignment notification skipped: user {target} does not exist");
                return;
            }
            Err(e) => {
                error!("Assignment notification skipped: failed to load user {target}: {e}");
                return;
            }
        };

        let notifier = self.notifier.clone();
        tokio::spawn(async move {
            if let Err(e) = notifier.notify_assignment(&user, &issue).await {
                error!(
                    "Unable to deliver assignment notification for issue {}: {e:?}",
                    issue.id
                );
            }
        });
    }

    pub async fn toggle_downtime(&self, id: Uuid) -> Result<(Issue, DowntimePhase), TrackerError> {
        let pool = self.db.pool();

        let mut issue = Issue::get(pool, id)
            .await?
            .ok_or(TrackerError::NotFound(id))?;
        let state = Downtime::from_columns(issue.downtime_start_time, issue.downtime_end_time)?;

        let now = Utc::now();
        let (next, phase) = state.toggle(now)?;
        (issue.downtime_start_time, issue.downtime_end_time) = next.columns();
        issue.updated_at = now;
        if !Issue::update(pool, &issue).await? {
            return Err(TrackerError::NotFound(id));
        }

        match phase {
            DowntimePhase::Started => info!("Downtime started for issue {}", issue.id),
            DowntimePhase::Stopped => {
                if let Some(elapsed) = next.elapsed() {
                    info!(
                        "Downtime stopped for issue {} after {}",
                        issue.id,
                        format_elapsed(elapsed)
                    );
                }
            }
        }

        Ok((issue, phase))
    }

    pub async fn get_issue(&self, id: Uuid) -> Result<Issue, TrackerError> {
        Issue::get(self.db.pool(), id)
            .await?
            .ok_or(TrackerError::NotFound(id))
    }

    pub async fn list_issues(&self, created_by: Option<Uuid>) -> Result<Vec<Issue>, TrackerError> {
        Ok(Issue::list(self.db.pool(), created_by).await?)
    }

    pub async fn delete_issue(&self, id: Uuid) -> Result<(), TrackerError> {
        if !Issue::delete(self.db.pool(), id).await? {
            return Err(TrackerError::NotFound(id));
        }
        info!("Issue {id} deleted");
        Ok(())
    }

    pub async fn list_categories(&self) -> Result<Vec<IssueCategory>, TrackerError> {
        Ok(IssueCategory::list(self.db.pool()).await?)
    }

    pub async fn create_category(
        &self,
        name: &str,
        user_id: Uuid,
    ) -> Result<IssueCategory, TrackerError> {
        validate_category_name(name)?;
        let pool = self.db.pool();
        self.ensure_user_exists(user_id).await?;

        if IssueCategory::find_by_name(pool, name).await?.is_some() {
            return Err(TrackerError::validation(format!(
                "a category named '{name}' already exists"
            )));
        }

        let category = IssueCategory::new(name, user_id, Utc::now());
        IssueCategory::create(pool, &category).await?;
        Ok(category)
    }

    pub async fn update_category(
        &self,
        id: Uuid,
        name: &str,
        user_id: Uuid,
    ) -> Result<IssueCategory, TrackerError> {
        validate_category_name(name)?;
        self.ensure_user_exists(user_id).await?;

        // Renaming onto another category's name would trip the unique index;
        // keeping the current name is allowed.
        if let Some(existing) = IssueCategory::find_by_name(self.db.pool(), name).await? {
            if existing.id != id {
                return Err(TrackerError::validation(format!(
                    "a category named '{name}' already exists"
                )));
            }
        }

        IssueCategory::update(self.db.pool(), id, name, user_id)
            .await?
            .ok_or(TrackerError::NotFound(id))
    }

    pub async fn delete_category(&self, id: Uuid) -> Result<(), TrackerError> {
        if !IssueCategory::delete(self.db.pool(), id).await? {
            return Err(TrackerError::NotFound(id));
        }
        Ok(())
    }

    pub async fn list_users(&self) -> Result<Vec<User>, TrackerError> {
        Ok(User::list(self.db.pool()).await?)
    }

    async fn ensure_user_exists(&self, user_id: Uuid) -> Result<(), TrackerError> {
        User::get(self.db.pool(), user_id)
            .await?
            .map(|_| ())
            .ok_or_else(|| TrackerError::validation("user does not exist"))
    }
}

/// Default-owner resolution: the matched category's user, else the configured
/// fallback.
fn default_owner(category: Option<&IssueCategory>, fallback: Uuid) -> Uuid {
    category.map(|c| c.user_id).unwrap_or(fallback)
}

fn validate_category_name(name: &str) -> Result<(), TrackerError> {
    if name.trim().is_empty() {
        return Err(TrackerError::validation("category name is required"));
    }
    if name.len() > 255 {
        return Err(TrackerError::validation(
            "category name must be at most 255 characters",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_owner_prefers_matched_category() {
        let fallback = Uuid::new_v4();
        let category = IssueCategory::new("safety", Uuid::new_v4(), Utc::now());

        assert_eq!(default_owner(Some(&category), fallback), category.user_id);
        assert_eq!(default_owner(None, fallback), fallback);
    }

    #[test]
    fn test_category_name_validation() {
        assert!(validate_category_name("Warehouse Operations").is_ok());
        assert!(validate_category_name("  ").is_err());
        assert!(validate_category_name(&"x".repeat(256)).is_err());
        assert!(validate_category_name(&"x".repeat(255)).is_ok());
    }
}
