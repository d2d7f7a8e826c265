use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tracing::info;

use crate::application::dtos::{HabitStreakDto, UserStreakDto};
use habitkeeper_domain::checkin::{streak, CheckinLedger};
use habitkeeper_domain::habit::{Habit, HabitRepository};
use habitkeeper_domain::shared::{DomainError, HabitId, UserId};

/// Read-only streak reporting. Statistics are derived on demand from the
/// ledger history with the pure calculator, never persisted.
pub struct StreakQueries {
    ledger: Arc<dyn CheckinLedger>,
    habits: Arc<dyn HabitRepository>,
}

impl StreakQueries {
    pub fn new(ledger: Arc<dyn CheckinLedger>, habits: Arc<dyn HabitRepository>) -> Self {
        Self { ledger, habits }
    }

    /// Streak statistics for a single habit.
    pub async fn get_streak_stats(
        &self,
        user_id: &str,
        habit_id: &str,
    ) -> Result<HabitStreakDto, DomainError> {
        let user_id = UserId::from_string(user_id);
        let habit_id = HabitId::from_string(habit_id);

        let habit = self
            .habits
            .find_by_id(&user_id, &habit_id)
            .await?
            .ok_or_else(|| DomainError::HabitNotFound(habit_id.to_string()))?;

        let dto = self.stats_for_habit(&user_id, &habit, today()).await?;

        info!(
            habit_id = %dto.habit_id,
            current_streak = dto.current_streak,
            max_streak = dto.max_streak,
            total_days = dto.total_days,
            "streak stats computed"
        );

        Ok(dto)
    }

    /// Streak statistics for every habit the user owns, best live streak
    /// first.
    pub async fn get_all_streaks(&self, user_id: &str) -> Result<Vec<HabitStreakDto>, DomainError> {
        let user_id = UserId::from_string(user_id);
        let reference = today();

        let mut results = Vec::new();
        for habit in self.habits.list_by_user(&user_id).await? {
            results.push(self.stats_for_habit(&user_id, &habit, reference).await?);
        }

        results.sort_by(|a, b| b.current_streak.cmp(&a.current_streak));

        info!(user_id = %user_id, habits = results.len(), "all streaks computed");
        Ok(results)
    }

    /// Streak statistics across the user's whole ledger, no habit filter.
    pub async fn get_overall_streak(&self, user_id: &str) -> Result<UserStreakDto, DomainError> {
        let user_id = UserId::from_string(user_id);
        let dates = self.distinct_dates(&user_id, None).await?;

        Ok(UserStreakDto {
            current_streak: streak::current_streak(&dates, today()),
            max_streak: streak::max_streak(&dates),
            total_days: distinct_count(&dates),
        })
    }

    async fn stats_for_habit(
        &self,
        user_id: &UserId,
        habit: &Habit,
        reference: NaiveDate,
    ) -> Result<HabitStreakDto, DomainError> {
        let dates = self.distinct_dates(user_id, Some(habit.id())).await?;

        Ok(HabitStreakDto {
            habit_id: habit.id().to_string(),
            title: habit.title().to_string(),
            current_streak: streak::current_streak(&dates, reference),
            max_streak: streak::max_streak(&dates),
            total_days: distinct_count(&dates),
            last_date: dates
                .iter()
                .max()
                .map(|d| d.format("%Y-%m-%d").to_string()),
        })
    }

    async fn distinct_dates(
        &self,
        user_id: &UserId,
        habit_id: Option<&HabitId>,
    ) -> Result<Vec<NaiveDate>, DomainError> {
        let checkins = self.ledger.list_checkins(user_id, habit_id).await?;
        Ok(checkins.iter().map(|c| c.date()).collect())
    }
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

fn distinct_count(dates: &[NaiveDate]) -> u32 {
    let unique: std::collections::BTreeSet<NaiveDate> = dates.iter().copied().collect();
    unique.len() as u32
}
