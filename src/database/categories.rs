use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::database::models::IssueCategory;

fn category_from_row(row: &PgRow) -> Result<IssueCategory, sqlx::Error> {
    Ok(IssueCategory {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        user_id: row.try_get("user_id")?,
        created_at: row.try_get("created_at")?,
    })
}

impl IssueCategory {
    pub fn new(name: &str, user_id: Uuid, now: DateTime<Utc>) -> IssueCategory {
        IssueCategory {
            id: Uuid::new_v4(),
            name: name.into(),
            user_id,
            created_at: now,
        }
    }

    pub async fn create(pool: &PgPool, category: &IssueCategory) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO issue_categories (id, name, user_id, created_at) VALUES ($1, $2, $3, $4)",
        )
        .bind(category.id)
        .bind(&category.name)
        .bind(category.user_id)
        .bind(category.created_at)
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Exact-name lookup used for default-owner resolution at issue creation.
    pub async fn find_by_name(
        pool: &PgPool,
        name: &str,
    ) -> Result<Option<IssueCategory>, sqlx::Error> {
        let row = sqlx::query("SELECT * FROM issue_categories WHERE name = $1")
            .bind(name)
            .fetch_optional(pool)
            .await?;

        row.as_ref().map(category_from_row).transpose()
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<IssueCategory>, sqlx::Error> {
        let rows = sqlx::query("SELECT * FROM issue_categories ORDER BY name ASC")
            .fetch_all(pool)
            .await?;

        rows.iter().map(category_from_row).collect()
    }

    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        name: &str,
        user_id: Uuid,
    ) -> Result<Option<IssueCategory>, sqlx::Error> {
        let row = sqlx::query(
            "UPDATE issue_categories SET name = $1, user_id = $2 WHERE id = $3 RETURNING *",
        )
        .bind(name)
        .bind(user_id)
        .bind(id)
        .fetch_optional(pool)
        .await?;

        row.as_ref().map(category_from_row).transpose()
    }

    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM issue_categories WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
