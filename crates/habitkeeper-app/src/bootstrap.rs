use std::sync::Arc;
use std::time::Instant;

use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::application::queries::StreakQueries;
use crate::application::services::{CheckinLedgerService, HabitService};
use habitkeeper_domain::checkin::CheckinLedger;
use habitkeeper_domain::habit::HabitRepository;
use habitkeeper_domain::user::UserLedger;
use habitkeeper_infrastructure::persistence::repositories::{
    SqliteCheckinLedger, SqliteHabitRepository, SqliteUserLedger,
};
use habitkeeper_infrastructure::persistence::Database;

/// Everything the serving layer needs, wired pool → repositories →
/// services.
pub struct AppState {
    pub checkins: CheckinLedgerService,
    pub habits: HabitService,
    pub streaks: StreakQueries,
    pub users: Arc<dyn UserLedger>,
}

pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}

pub async fn build_app_state(db_path: &str) -> anyhow::Result<AppState> {
    let started_at = Instant::now();

    let db = Database::new(db_path).await?;
    db.init_schema().await?;
    info!(
        db_path,
        "database ready ({}ms)",
        started_at.elapsed().as_millis()
    );

    Ok(wire(db))
}

/// In-memory state for tests and local experiments.
pub async fn build_app_state_in_memory() -> anyhow::Result<AppState> {
    let db = Database::in_memory().await?;
    db.init_schema().await?;
    Ok(wire(db))
}

fn wire(db: Database) -> AppState {
    let pool = Arc::new(db.pool().clone());

    let ledger: Arc<dyn CheckinLedger> = Arc::new(SqliteCheckinLedger::new(Arc::clone(&pool)));
    let habits: Arc<dyn HabitRepository> = Arc::new(SqliteHabitRepository::new(Arc::clone(&pool)));
    let users: Arc<dyn UserLedger> = Arc::new(SqliteUserLedger::new(pool));

    AppState {
        checkins: CheckinLedgerService::new(Arc::clone(&ledger)),
        habits: HabitService::new(Arc::clone(&habits)),
        streaks: StreakQueries::new(ledger, habits),
        users,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use habitkeeper_domain::shared::{DomainError, UserId};

    fn iso(date: chrono::NaiveDate) -> String {
        date.format("%Y-%m-%d").to_string()
    }

    #[tokio::test]
    async fn test_full_checkin_flow() {
        let state = build_app_state_in_memory().await.unwrap();

        let user_id = UserId::new();
        state.users.ensure_user(&user_id).await.unwrap();
        let user = user_id.as_str();

        let habit = state
            .habits
            .create(user, "Stretch", None, "green")
            .await
            .unwrap();

        // Four sequential check-ins on distinct dates: total 0 → 4 earns
        // exactly one voucher.
        let today = Utc::now().date_naive();
        let mut outcome = None;
        for offset in (0..4).rev() {
            let date = iso(today - Duration::days(offset));
            outcome = Some(
                state
                    .checkins
                    .check_in(user, &habit.id, Some(&date), None)
                    .await
                    .unwrap(),
            );
        }
        let outcome = outcome.unwrap();
        assert_eq!(outcome.user.total_checkins, 4);
        assert_eq!(outcome.user.voucher_balance, 1);

        // Live streak covers the four consecutive days.
        let stats = state
            .streaks
            .get_streak_stats(user, &habit.id)
            .await
            .unwrap();
        assert_eq!(stats.current_streak, 4);
        assert_eq!(stats.max_streak, 4);
        assert_eq!(stats.total_days, 4);

        // Spend the voucher to backfill the day before the run.
        let backfill = iso(today - Duration::days(4));
        let spent = state
            .checkins
            .spend_voucher(user, &habit.id, &backfill)
            .await
            .unwrap();
        assert_eq!(spent.user.voucher_balance, 0);
        assert_eq!(spent.user.total_checkins, 4);
        assert_eq!(spent.checkin.kind, "RETROACTIVE");

        let stats = state
            .streaks
            .get_streak_stats(user, &habit.id)
            .await
            .unwrap();
        assert_eq!(stats.current_streak, 5);
    }

    #[tokio::test]
    async fn test_check_in_rejects_invalid_date() {
        let state = build_app_state_in_memory().await.unwrap();

        let user_id = UserId::new();
        state.users.ensure_user(&user_id).await.unwrap();
        let habit = state
            .habits
            .create(user_id.as_str(), "Read", None, "blue")
            .await
            .unwrap();

        let err = state
            .checkins
            .check_in(user_id.as_str(), &habit.id, Some("not-a-date"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidDate(_)));
    }

    #[tokio::test]
    async fn test_overall_streak_spans_habits() {
        let state = build_app_state_in_memory().await.unwrap();

        let user_id = UserId::new();
        state.users.ensure_user(&user_id).await.unwrap();
        let user = user_id.as_str();

        let reading = state.habits.create(user, "Read", None, "blue").await.unwrap();
        let running = state
            .habits
            .create(user, "Run", Some("🏃".to_string()), "red")
            .await
            .unwrap();

        let today = Utc::now().date_naive();
        state
            .checkins
            .check_in(user, &reading.id, Some(&iso(today - Duration::days(1))), None)
            .await
            .unwrap();
        state
            .checkins
            .check_in(user, &running.id, Some(&iso(today)), None)
            .await
            .unwrap();

        // Each habit alone has a 1-day run; together they chain.
        let overall = state.streaks.get_overall_streak(user).await.unwrap();
        assert_eq!(overall.current_streak, 2);
        assert_eq!(overall.total_days, 2);

        let per_habit = state.streaks.get_all_streaks(user).await.unwrap();
        assert_eq!(per_habit.len(), 2);
        assert!(per_habit[0].current_streak >= per_habit[1].current_streak);
    }

    #[tokio::test]
    async fn test_habit_delete_cascades_to_ledger() {
        let state = build_app_state_in_memory().await.unwrap();

        let user_id = UserId::new();
        state.users.ensure_user(&user_id).await.unwrap();
        let user = user_id.as_str();

        let habit = state.habits.create(user, "Read", None, "blue").await.unwrap();
        state
            .checkins
            .check_in(user, &habit.id, None, None)
            .await
            .unwrap();

        state.habits.delete(user, &habit.id).await.unwrap();

        let remaining = state.checkins.list(user, None).await.unwrap();
        assert!(remaining.is_empty());
        assert!(state.habits.list(user).await.unwrap().is_empty());
    }
}
