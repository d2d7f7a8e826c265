use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{FromRow, SqlitePool};

use crate::persistence::RepositoryErrorMapper;
use habitkeeper_domain::shared::{DomainError, UserId};
use habitkeeper_domain::user::{UserLedger, UserTotals};

#[derive(FromRow)]
struct UserTotalsRow {
    id: String,
    voucher_balance: i64,
    total_checkins: i64,
}

pub struct SqliteUserLedger {
    pool: Arc<SqlitePool>,
}

impl SqliteUserLedger {
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserLedger for SqliteUserLedger {
    async fn ensure_user(&self, user_id: &UserId) -> Result<(), DomainError> {
        let now = Utc::now().timestamp_millis();

        sqlx::query(
            r#"
            INSERT INTO users (id, voucher_balance, total_checkins, created_at, updated_at)
            VALUES (?1, 0, 0, ?2, ?2)
            ON CONFLICT(id) DO NOTHING
            "#,
        )
        .bind(user_id.as_str())
        .bind(now)
        .execute(&*self.pool)
        .await
        .map_err(|e| RepositoryErrorMapper::map_sqlx_error(e, "Ensure user"))?;

        Ok(())
    }

    async fn fetch_totals(&self, user_id: &UserId) -> Result<UserTotals, DomainError> {
        let row: Option<UserTotalsRow> =
            sqlx::query_as("SELECT id, voucher_balance, total_checkins FROM users WHERE id = ?1")
                .bind(user_id.as_str())
                .fetch_optional(&*self.pool)
                .await
                .map_err(|e| RepositoryErrorMapper::map_sqlx_error(e, "Fetch user totals"))?;

        row.map(|r| {
            UserTotals::restore(
                UserId::from_string(&r.id),
                r.voucher_balance as u32,
                r.total_checkins as u32,
            )
        })
        .ok_or_else(|| DomainError::DataIntegrity(format!("User row missing: {}", user_id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::Database;

    #[tokio::test]
    async fn test_ensure_user_is_idempotent() {
        let db = Database::in_memory().await.unwrap();
        db.init_schema().await.unwrap();
        let repo = SqliteUserLedger::new(Arc::new(db.pool().clone()));

        let user_id = UserId::new();
        repo.ensure_user(&user_id).await.unwrap();
        repo.ensure_user(&user_id).await.unwrap();

        let totals = repo.fetch_totals(&user_id).await.unwrap();
        assert_eq!(totals.total_checkins(), 0);
        assert_eq!(totals.voucher_balance(), 0);
    }

    #[tokio::test]
    async fn test_fetch_totals_for_unknown_user_fails() {
        let db = Database::in_memory().await.unwrap();
        db.init_schema().await.unwrap();
        let repo = SqliteUserLedger::new(Arc::new(db.pool().clone()));

        let err = repo.fetch_totals(&UserId::new()).await.unwrap_err();
        assert!(matches!(err, DomainError::DataIntegrity(_)));
    }
}
