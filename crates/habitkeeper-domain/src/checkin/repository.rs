use async_trait::async_trait;
use chrono::NaiveDate;

use super::Checkin;
use crate::shared::{DomainError, HabitId, UserId};
use crate::user::UserTotals;

/// The check-in ledger: the four store-backed operations exposed to the
/// API collaborator. Every call takes the authenticated user id
/// explicitly; implementations must execute each mutation as a single
/// atomic transaction.
#[async_trait]
pub trait CheckinLedger: Send + Sync {
    /// List all check-ins for a user, optionally filtered to one habit,
    /// ordered by creation time ascending.
    async fn list_checkins(
        &self,
        user_id: &UserId,
        habit_id: Option<&HabitId>,
    ) -> Result<Vec<Checkin>, DomainError>;

    /// Record a normal check-in.
    ///
    /// Idempotent: if a NORMAL record already exists for (user, habit,
    /// date), the existing record and unchanged totals are returned.
    /// Otherwise the insert, the `total_checkins` increment, and any
    /// voucher award happen atomically; the returned totals reflect the
    /// post-increment values.
    async fn add_checkin(
        &self,
        user_id: &UserId,
        habit_id: &HabitId,
        date: NaiveDate,
        note: Option<String>,
    ) -> Result<(Checkin, UserTotals), DomainError>;

    /// Delete the NORMAL check-in for the exact (user, habit, date) if
    /// present; deleting a missing record is a no-op success. Counters
    /// are never rolled back.
    async fn remove_checkin(
        &self,
        user_id: &UserId,
        habit_id: &HabitId,
        date: NaiveDate,
    ) -> Result<(), DomainError>;

    /// Spend one voucher to backfill a RETROACTIVE check-in for a date.
    ///
    /// Fails with `InsufficientVoucher` when the balance is 0. The balance
    /// guard and decrement are atomic with the insert; `total_checkins` is
    /// untouched.
    async fn spend_voucher(
        &self,
        user_id: &UserId,
        habit_id: &HabitId,
        date: NaiveDate,
    ) -> Result<(Checkin, UserTotals), DomainError>;
}
