use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::database::models::{Issue, Priority, Status};

fn issue_from_row(row: &PgRow) -> Result<Issue, sqlx::Error> {
    let status: String = row.try_get("status")?;
    let priority: String = row.try_get("priority")?;

    Ok(Issue {
        id: row.try_get("id")?,
        issue_type: row.try_get("issue_type")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        priority: Priority::from_str(&priority)
            .ok_or_else(|| sqlx::Error::Decode(format!("unknown priority '{priority}'").into()))?,
        status: Status::from_str(&status)
            .ok_or_else(|| sqlx::Error::Decode(format!("unknown status '{status}'").into()))?,
        due_date: row.try_get("due_date")?,
        attachment_url: row.try_get("attachment_url")?,
        downtime_start_time: row.try_get("downtime_start_time")?,
        downtime_end_time: row.try_get("downtime_end_time")?,
        created_by: row.try_get("created_by")?,
        owner_id: row.try_get("owner_id")?,
        assigned_to: row.try_get("assigned_to")?,
        updated_by: row.try_get("updated_by")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

impl Issue {
    pub async fn create(pool: &PgPool, issue: &Issue) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO issues
            (id, issue_type, title, description, priority, status, due_date, attachment_url,
             downtime_start_time, downtime_end_time, created_by, owner_id, assigned_to,
             updated_by, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            "#,
        )
        .bind(issue.id)
        .bind(&issue.issue_type)
        .bind(&issue.title)
        .bind(&issue.description)
        .bind(issue.priority.as_str())
        .bind(issue.status.as_str())
        .bind(issue.due_date)
        .bind(&issue.attachment_url)
        .bind(issue.downtime_start_time)
        .bind(issue.downtime_end_time)
        .bind(issue.created_by)
        .bind(issue.owner_id)
        .bind(issue.assigned_to)
        .bind(issue.updated_by)
        .bind(issue.created_at)
        .bind(issue.updated_at)
        .execute(pool)
        .await?;

        Ok(())
    }

    pub async fn get(pool: &PgPool, id: Uuid) -> Result<Option<Issue>, sqlx::Error> {
        let row = sqlx::query("SELECT * FROM issues WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;

        row.as_ref().map(issue_from_row).transpose()
    }

    /// Lists issues ordered the way the triage board consumes them: open work
    /// first, newest submissions on top. `created_by` narrows the listing to
    /// one reporter.
    pub async fn list(pool: &PgPool, created_by: Option<Uuid>) -> Result<Vec<Issue>, sqlx::Error> {
        let rows = match created_by {
            Some(user) => {
                sqlx::query(
                    "SELECT * FROM issues WHERE created_by = $1 \
                     ORDER BY status ASC, created_at DESC",
                )
                .bind(user)
                .fetch_all(pool)
                .await?
            }
            None => {
                sqlx::query("SELECT * FROM issues ORDER BY status ASC, created_at DESC")
                    .fetch_all(pool)
                    .await?
            }
        };

        rows.iter().map(issue_from_row).collect()
    }

    pub async fn update(pool: &PgPool, issue: &Issue) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE issues
            SET issue_type = $1, title = $2, description = $3, priority = $4, status = $5,
                due_date = $6, attachment_url = $7, downtime_start_time = $8,
                downtime_end_time = $9, owner_id = $10, assigned_to = $11, updated_by = $12,
                updated_at = $13
            WHERE id = $14
            "#,
        )
        .bind(&issue.issue_type)
        .bind(&issue.title)
        .bind(&issue.description)
        .bind(issue.priority.as_str())
        .bind(issue.status.as_str())
        .bind(issue.due_date)
        .bind(&issue.attachment_url)
        .bind(issue.downtime_start_time)
        .bind(issue.downtime_end_time)
        .bind(issue.owner_id)
        .bind(issue.assigned_to)
        .bind(issue.updated_by)
        .bind(issue.updated_at)
        .bind(issue.id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM issues WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
