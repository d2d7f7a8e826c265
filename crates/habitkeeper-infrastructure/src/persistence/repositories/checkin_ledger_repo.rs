use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, SqliteConnection, SqlitePool};
use tracing::{info, warn};

use crate::persistence::RepositoryErrorMapper;
use habitkeeper_domain::checkin::{Checkin, CheckinKind, CheckinLedger};
use habitkeeper_domain::shared::{CheckinId, DomainError, HabitId, UserId};
use habitkeeper_domain::user::{earns_voucher, UserTotals};

#[derive(FromRow)]
struct CheckinRow {
    id: String,
    user_id: String,
    habit_id: String,
    date: String,
    timestamp: i64,
    kind: String,
    note: Option<String>,
}

impl CheckinRow {
    fn into_checkin(self) -> Result<Checkin, DomainError> {
        let date = NaiveDate::parse_from_str(&self.date, "%Y-%m-%d").map_err(|e| {
            DomainError::DataIntegrity(format!("Invalid stored date: {} ({})", self.date, e))
        })?;
        let created_at = DateTime::<Utc>::from_timestamp_millis(self.timestamp).ok_or_else(|| {
            DomainError::DataIntegrity(format!("Invalid stored timestamp: {}", self.timestamp))
        })?;
        let kind = CheckinKind::parse(&self.kind)?;

        Ok(Checkin::restore(
            CheckinId::from_string(&self.id),
            UserId::from_string(&self.user_id),
            HabitId::from_string(&self.habit_id),
            date,
            created_at,
            kind,
            self.note,
        ))
    }
}

#[derive(FromRow)]
struct UserTotalsRow {
    id: String,
    voucher_balance: i64,
    total_checkins: i64,
}

impl UserTotalsRow {
    fn into_totals(self) -> UserTotals {
        UserTotals::restore(
            UserId::from_string(&self.id),
            self.voucher_balance as u32,
            self.total_checkins as u32,
        )
    }
}

pub struct SqliteCheckinLedger {
    pool: Arc<SqlitePool>,
}

impl SqliteCheckinLedger {
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self { pool }
    }
}

const SELECT_CHECKIN: &str = r#"
    SELECT id, user_id, habit_id, date, timestamp, kind, note
    FROM checkins
    WHERE user_id = ?1 AND habit_id = ?2 AND date = ?3 AND kind = ?4
"#;

const INSERT_CHECKIN: &str = r#"
    INSERT INTO checkins (id, user_id, habit_id, date, timestamp, kind, note)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
"#;

fn date_str(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Habit existence/ownership check, inside the caller's transaction.
async fn assert_habit_owned(
    conn: &mut SqliteConnection,
    user_id: &UserId,
    habit_id: &HabitId,
) -> Result<(), DomainError> {
    let found: Option<String> =
        sqlx::query_scalar("SELECT id FROM habits WHERE id = ?1 AND user_id = ?2")
            .bind(habit_id.as_str())
            .bind(user_id.as_str())
            .fetch_optional(conn)
            .await
            .map_err(|e| RepositoryErrorMapper::map_sqlx_error(e, "Check habit ownership"))?;

    match found {
        Some(_) => Ok(()),
        None => Err(DomainError::HabitNotFound(habit_id.to_string())),
    }
}

async fn fetch_existing(
    conn: &mut SqliteConnection,
    user_id: &UserId,
    habit_id: &HabitId,
    date: NaiveDate,
    kind: CheckinKind,
) -> Result<Option<CheckinRow>, DomainError> {
    sqlx::query_as::<_, CheckinRow>(SELECT_CHECKIN)
        .bind(user_id.as_str())
        .bind(habit_id.as_str())
        .bind(date_str(date))
        .bind(kind.as_str())
        .fetch_optional(conn)
        .await
        .map_err(|e| RepositoryErrorMapper::map_sqlx_error(e, "Fetch checkin"))
}

async fn fetch_totals(
    conn: &mut SqliteConnection,
    user_id: &UserId,
) -> Result<UserTotals, DomainError> {
    let row: Option<UserTotalsRow> =
        sqlx::query_as("SELECT id, voucher_balance, total_checkins FROM users WHERE id = ?1")
            .bind(user_id.as_str())
            .fetch_optional(conn)
            .await
            .map_err(|e| RepositoryErrorMapper::map_sqlx_error(e, "Fetch user totals"))?;

    row.map(UserTotalsRow::into_totals)
        .ok_or_else(|| DomainError::DataIntegrity(format!("User row missing: {}", user_id)))
}

async fn insert_checkin(
    conn: &mut SqliteConnection,
    checkin: &Checkin,
) -> Result<(), sqlx::Error> {
    sqlx::query(INSERT_CHECKIN)
        .bind(checkin.id().as_str())
        .bind(checkin.user_id().as_str())
        .bind(checkin.habit_id().as_str())
        .bind(date_str(checkin.date()))
        .bind(checkin.created_at().timestamp_millis())
        .bind(checkin.kind().as_str())
        .bind(checkin.note())
        .execute(conn)
        .await?;
    Ok(())
}

#[async_trait]
impl CheckinLedger for SqliteCheckinLedger {
    async fn list_checkins(
        &self,
        user_id: &UserId,
        habit_id: Option<&HabitId>,
    ) -> Result<Vec<Checkin>, DomainError> {
        let rows: Vec<CheckinRow> = match habit_id {
            Some(habit_id) => {
                let query = r#"
                    SELECT id, user_id, habit_id, date, timestamp, kind, note
                    FROM checkins
                    WHERE user_id = ?1 AND habit_id = ?2
                    ORDER BY timestamp ASC
                "#;
                sqlx::query_as(query)
                    .bind(user_id.as_str())
                    .bind(habit_id.as_str())
                    .fetch_all(&*self.pool)
                    .await
            }
            None => {
                let query = r#"
                    SELECT id, user_id, habit_id, date, timestamp, kind, note
                    FROM checkins
                    WHERE user_id = ?1
                    ORDER BY timestamp ASC
                "#;
                sqlx::query_as(query)
                    .bind(user_id.as_str())
                    .fetch_all(&*self.pool)
                    .await
            }
        }
        .map_err(|e| RepositoryErrorMapper::map_sqlx_error(e, "List checkins"))?;

        rows.into_iter().map(CheckinRow::into_checkin).collect()
    }

    async fn add_checkin(
        &self,
        user_id: &UserId,
        habit_id: &HabitId,
        date: NaiveDate,
        note: Option<String>,
    ) -> Result<(Checkin, UserTotals), DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepositoryErrorMapper::map_sqlx_error(e, "Begin transaction"))?;

        assert_habit_owned(&mut tx, user_id, habit_id).await?;

        // Idempotency pre-check. An optimization only: the unique index is
        // the source of truth, see the insert conflict handling below.
        if let Some(existing) =
            fetch_existing(&mut tx, user_id, habit_id, date, CheckinKind::Normal).await?
        {
            let totals = fetch_totals(&mut tx, user_id).await?;
            tx.commit()
                .await
                .map_err(|e| RepositoryErrorMapper::map_sqlx_error(e, "Commit transaction"))?;
            return Ok((existing.into_checkin()?, totals));
        }

        let checkin = Checkin::normal(user_id.clone(), habit_id.clone(), date, note);

        if let Err(e) = insert_checkin(&mut tx, &checkin).await {
            match RepositoryErrorMapper::map_sqlx_error(e, "Insert checkin") {
                DomainError::Conflict(_) => {
                    // A concurrent insert won the race. Resolve to the
                    // idempotent success path: return the existing record
                    // with current totals, no counter changes.
                    warn!(
                        user_id = %user_id,
                        habit_id = %habit_id,
                        date = %date,
                        "add_checkin raced a concurrent insert; returning existing record"
                    );
                    let existing =
                        fetch_existing(&mut tx, user_id, habit_id, date, CheckinKind::Normal)
                            .await?
                            .ok_or_else(|| {
                                DomainError::DataIntegrity(
                                    "Unique violation without a matching checkin row".to_string(),
                                )
                            })?;
                    let totals = fetch_totals(&mut tx, user_id).await?;
                    tx.commit().await.map_err(|e| {
                        RepositoryErrorMapper::map_sqlx_error(e, "Commit transaction")
                    })?;
                    return Ok((existing.into_checkin()?, totals));
                }
                other => return Err(other),
            }
        }

        // Relative increment so concurrent check-ins never lose updates.
        let updated = sqlx::query(
            "UPDATE users SET total_checkins = total_checkins + 1, updated_at = ?2 WHERE id = ?1",
        )
        .bind(user_id.as_str())
        .bind(Utc::now().timestamp_millis())
        .execute(&mut *tx)
        .await
        .map_err(|e| RepositoryErrorMapper::map_sqlx_error(e, "Increment total checkins"))?;

        if updated.rows_affected() == 0 {
            return Err(DomainError::DataIntegrity(format!(
                "User row missing: {}",
                user_id
            )));
        }

        let mut totals = fetch_totals(&mut tx, user_id).await?;

        // Reward cadence: 1 voucher per 4 cumulative normal check-ins,
        // evaluated strictly on the post-increment total.
        if earns_voucher(totals.total_checkins()) {
            sqlx::query("UPDATE users SET voucher_balance = voucher_balance + 1 WHERE id = ?1")
                .bind(user_id.as_str())
                .execute(&mut *tx)
                .await
                .map_err(|e| RepositoryErrorMapper::map_sqlx_error(e, "Award voucher"))?;
            totals = fetch_totals(&mut tx, user_id).await?;
        }

        tx.commit()
            .await
            .map_err(|e| RepositoryErrorMapper::map_sqlx_error(e, "Commit transaction"))?;

        info!(
            user_id = %user_id,
            habit_id = %habit_id,
            date = %date,
            total_checkins = totals.total_checkins(),
            voucher_balance = totals.voucher_balance(),
            "checkin recorded"
        );

        Ok((checkin, totals))
    }

    async fn remove_checkin(
        &self,
        user_id: &UserId,
        habit_id: &HabitId,
        date: NaiveDate,
    ) -> Result<(), DomainError> {
        // Counters are intentionally not rolled back: no take-backs on
        // rewards. Deleting a record that does not exist is a no-op.
        sqlx::query(
            "DELETE FROM checkins WHERE user_id = ?1 AND habit_id = ?2 AND date = ?3 AND kind = ?4",
        )
        .bind(user_id.as_str())
        .bind(habit_id.as_str())
        .bind(date_str(date))
        .bind(CheckinKind::Normal.as_str())
        .execute(&*self.pool)
        .await
        .map_err(|e| RepositoryErrorMapper::map_sqlx_error(e, "Delete checkin"))?;

        Ok(())
    }

    async fn spend_voucher(
        &self,
        user_id: &UserId,
        habit_id: &HabitId,
        date: NaiveDate,
    ) -> Result<(Checkin, UserTotals), DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepositoryErrorMapper::map_sqlx_error(e, "Begin transaction"))?;

        assert_habit_owned(&mut tx, user_id, habit_id).await?;

        let current = fetch_totals(&mut tx, user_id).await?;
        if !current.can_spend_voucher() {
            return Err(DomainError::InsufficientVoucher(format!(
                "balance is {}",
                current.voucher_balance()
            )));
        }

        // The >= 1 guard in the statement is what makes two concurrent
        // spends against a balance of 1 admit at most one winner.
        let decremented = sqlx::query(
            r#"
            UPDATE users
            SET voucher_balance = voucher_balance - 1, updated_at = ?2
            WHERE id = ?1 AND voucher_balance >= 1
            "#,
        )
        .bind(user_id.as_str())
        .bind(Utc::now().timestamp_millis())
        .execute(&mut *tx)
        .await
        .map_err(|e| RepositoryErrorMapper::map_sqlx_error(e, "Spend voucher"))?;

        if decremented.rows_affected() == 0 {
            return Err(DomainError::InsufficientVoucher("balance is 0".to_string()));
        }

        let checkin = Checkin::retroactive(user_id.clone(), habit_id.clone(), date);

        // No idempotency pre-check on this path. A duplicate retroactive
        // record for the same date hits the unique index; the error
        // propagates and the rollback restores the voucher.
        insert_checkin(&mut tx, &checkin)
            .await
            .map_err(|e| RepositoryErrorMapper::map_sqlx_error(e, "Insert retroactive checkin"))?;

        let totals = fetch_totals(&mut tx, user_id).await?;

        tx.commit()
            .await
            .map_err(|e| RepositoryErrorMapper::map_sqlx_error(e, "Commit transaction"))?;

        info!(
            user_id = %user_id,
            habit_id = %habit_id,
            date = %date,
            voucher_balance = totals.voucher_balance(),
            "voucher spent on retroactive checkin"
        );

        Ok((checkin, totals))
    }
}
