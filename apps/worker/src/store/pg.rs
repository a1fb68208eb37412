use std::collections::HashMap;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::models::application::NewApplication;
use crate::models::user::{SearchCriterion, TokenPair, User};
use crate::store::{AppliedKey, ApplicationStore};

/// PostgreSQL-backed store.
///
/// The `applications` table is expected to carry unique indexes over
/// `(user_id, posting_id)` and `(user_id, lower(title), lower(employer))`;
/// inserts rely on `ON CONFLICT DO NOTHING` to make duplicate records a
/// skip rather than an error.
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct UserRow {
    id: Uuid,
    full_name: String,
    require_salary: bool,
    board_linked: bool,
    access_token: Option<String>,
    refresh_token: Option<String>,
    token_expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, FromRow)]
struct CriterionRow {
    id: Uuid,
    user_id: Uuid,
    text: String,
    status: String,
}

#[derive(Debug, FromRow)]
struct AppliedKeyRow {
    posting_id: String,
    title: String,
    employer: String,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        let credentials = match (row.access_token, row.refresh_token) {
            (Some(access_token), Some(refresh_token)) => Some(TokenPair {
                access_token,
                refresh_token,
                expires_at: row.token_expires_at,
            }),
            _ => None,
        };
        User {
            id: row.id,
            full_name: row.full_name,
            require_salary: row.require_salary,
            board_linked: row.board_linked,
            credentials,
            criteria: Vec::new(),
        }
    }
}

#[async_trait]
impl ApplicationStore for PgStore {
    async fn load_users(&self) -> Result<Vec<User>> {
        let user_rows: Vec<UserRow> = sqlx::query_as(
            r#"
            SELECT id, full_name, require_salary, board_linked,
                   access_token, refresh_token, token_expires_at
            FROM users
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("loading users")?;

        let criterion_rows: Vec<CriterionRow> = sqlx::query_as(
            r#"
            SELECT id, user_id, text, status
            FROM search_criteria
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("loading search criteria")?;

        let mut by_user: HashMap<Uuid, Vec<SearchCriterion>> = HashMap::new();
        for row in criterion_rows {
            by_user.entry(row.user_id).or_default().push(SearchCriterion {
                id: row.id,
                user_id: row.user_id,
                text: row.text,
                status: row.status,
            });
        }

        Ok(user_rows
            .into_iter()
            .map(|row| {
                let mut user: User = row.into();
                user.criteria = by_user.remove(&user.id).unwrap_or_default();
                user
            })
            .collect())
    }

    async fn update_credentials(&self, user_id: Uuid, tokens: &TokenPair) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET access_token = $2, refresh_token = $3, token_expires_at = $4
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .bind(&tokens.access_token)
        .bind(&tokens.refresh_token)
        .bind(tokens.expires_at)
        .execute(&self.pool)
        .await
        .context("updating credentials")?;
        Ok(())
    }

    async fn applied_keys(&self, user_id: Uuid) -> Result<Vec<AppliedKey>> {
        let rows: Vec<AppliedKeyRow> = sqlx::query_as(
            r#"
            SELECT posting_id, title, employer
            FROM applications
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .context("loading applied keys")?;

        Ok(rows
            .into_iter()
            .map(|row| AppliedKey {
                posting_id: row.posting_id,
                title: row.title,
                employer: row.employer,
            })
            .collect())
    }

    async fn insert_application(&self, record: &NewApplication) -> Result<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO applications
                (user_id, posting_id, title, employer, salary_from, salary_to,
                 currency, logo_url, description, address, url, cover_letter,
                 auto_submitted)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(record.user_id)
        .bind(&record.posting_id)
        .bind(&record.title)
        .bind(&record.employer)
        .bind(record.salary_from)
        .bind(record.salary_to)
        .bind(&record.currency)
        .bind(&record.logo_url)
        .bind(&record.description)
        .bind(&record.address)
        .bind(&record.url)
        .bind(&record.cover_letter)
        .bind(record.auto_submitted)
        .execute(&self.pool)
        .await
        .context("inserting application")?;

        Ok(result.rows_affected() == 1)
    }
}
