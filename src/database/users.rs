use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::database::models::{Role, User};

fn user_from_row(row: &PgRow) -> Result<User, sqlx::Error> {
    let role: String = row.try_get("role")?;

    Ok(User {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        role: Role::from_str(&role)
            .ok_or_else(|| sqlx::Error::Decode(format!("unknown role '{role}'").into()))?,
        created_at: row.try_get("created_at")?,
    })
}

impl User {
    pub fn new(name: &str, email: &str, role: Role, now: DateTime<Utc>) -> User {
        User {
            id: Uuid::new_v4(),
            name: name.into(),
            email: email.into(),
            role,
            created_at: now,
        }
    }

    pub async fn get(pool: &PgPool, id: Uuid) -> Result<Option<User>, sqlx::Error> {
        let row = sqlx::query("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;

        row.as_ref().map(user_from_row).transpose()
    }

    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        let row = sqlx::query("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(pool)
            .await?;

        row.as_ref().map(user_from_row).transpose()
    }

    /// Guest provisioning: returns the existing user for `email`, or inserts a
    /// `guest` row. The insert tolerates a concurrent submission racing on the
    /// unique email and re-reads the winner.
    pub async fn find_or_create_by_email(
        pool: &PgPool,
        name: &str,
        email: &str,
        now: DateTime<Utc>,
    ) -> Result<User, sqlx::Error> {
        if let Some(user) = Self::find_by_email(pool, email).await? {
            return Ok(user);
        }

        let user = User::new(name, email, Role::Guest, now);
        sqlx::query(
            "INSERT INTO users (id, name, email, role, created_at) VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT (email) DO NOTHING",
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(user.role.as_str())
        .bind(user.created_at)
        .execute(pool)
        .await?;

        match Self::find_by_email(pool, email).await? {
            Some(user) => Ok(user),
            None => Err(sqlx::Error::RowNotFound),
        }
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<User>, sqlx::Error> {
        let rows = sqlx::query("SELECT * FROM users ORDER BY name ASC")
            .fetch_all(pool)
            .await?;

        rows.iter().map(user_from_row).collect()
    }
}
