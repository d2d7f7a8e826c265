use chrono::{DateTime, NaiveDate, Utc};

use super::CheckinKind;
use crate::shared::{CheckinId, HabitId, UserId};

/// A record asserting a habit was completed on a specific calendar date.
///
/// The `date` is a day-granularity calendar value with no timezone; all
/// streak math runs on it. `created_at` is only used for time-of-day
/// derived facts, never for ordering identity. Records are immutable once
/// created: they are deleted individually (undo) or cascaded with their
/// habit, never updated in place.
#[derive(Debug, Clone)]
pub struct Checkin {
    id: CheckinId,
    user_id: UserId,
    habit_id: HabitId,
    date: NaiveDate,
    created_at: DateTime<Utc>,
    kind: CheckinKind,
    note: Option<String>,
}

impl Checkin {
    /// Create a normal check-in for a date (today, or caller-supplied).
    pub fn normal(
        user_id: UserId,
        habit_id: HabitId,
        date: NaiveDate,
        note: Option<String>,
    ) -> Self {
        Self {
            id: CheckinId::new(),
            user_id,
            habit_id,
            date,
            created_at: Utc::now(),
            kind: CheckinKind::Normal,
            note,
        }
    }

    /// Create a retroactive check-in, backfilled by spending a voucher.
    pub fn retroactive(user_id: UserId, habit_id: HabitId, date: NaiveDate) -> Self {
        Self {
            id: CheckinId::new(),
            user_id,
            habit_id,
            date,
            created_at: Utc::now(),
            kind: CheckinKind::Retroactive,
            note: None,
        }
    }

    /// Rehydrate a check-in from stored state.
    pub fn restore(
        id: CheckinId,
        user_id: UserId,
        habit_id: HabitId,
        date: NaiveDate,
        created_at: DateTime<Utc>,
        kind: CheckinKind,
        note: Option<String>,
    ) -> Self {
        Self {
            id,
            user_id,
            habit_id,
            date,
            created_at,
            kind,
            note,
        }
    }

    pub fn id(&self) -> &CheckinId {
        &self.id
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn habit_id(&self) -> &HabitId {
        &self.habit_id
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn kind(&self) -> CheckinKind {
        self.kind
    }

    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }

    /// Whether this record counts toward the voucher reward cadence.
    pub fn counts_toward_rewards(&self) -> bool {
        self.kind == CheckinKind::Normal
    }
}
