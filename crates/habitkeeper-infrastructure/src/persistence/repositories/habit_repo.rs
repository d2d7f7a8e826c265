use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};

use crate::persistence::RepositoryErrorMapper;
use habitkeeper_domain::habit::{Habit, HabitRepository, HabitStatus, HabitTheme};
use habitkeeper_domain::shared::{DomainError, HabitId, UserId};

#[derive(FromRow)]
struct HabitRow {
    id: String,
    user_id: String,
    title: String,
    icon: String,
    theme_color: String,
    status: String,
    created_at: i64,
}

impl HabitRow {
    fn into_habit(self) -> Result<Habit, DomainError> {
        let created_at = DateTime::<Utc>::from_timestamp_millis(self.created_at).ok_or_else(|| {
            DomainError::DataIntegrity(format!("Invalid stored timestamp: {}", self.created_at))
        })?;

        Ok(Habit::restore(
            HabitId::from_string(&self.id),
            UserId::from_string(&self.user_id),
            self.title,
            self.icon,
            HabitTheme::parse(&self.theme_color)?,
            HabitStatus::parse(&self.status)?,
            created_at,
        ))
    }
}

pub struct SqliteHabitRepository {
    pool: Arc<SqlitePool>,
}

impl SqliteHabitRepository {
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HabitRepository for SqliteHabitRepository {
    async fn save(&self, habit: &Habit) -> Result<(), DomainError> {
        let query = r#"
            INSERT INTO habits (id, user_id, title, icon, theme_color, status, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ON CONFLICT(id) DO UPDATE SET
                title = ?3,
                icon = ?4,
                theme_color = ?5,
                status = ?6
        "#;

        sqlx::query(query)
            .bind(habit.id().as_str())
            .bind(habit.user_id().as_str())
            .bind(habit.title())
            .bind(habit.icon())
            .bind(habit.theme().as_str())
            .bind(habit.status().as_str())
            .bind(habit.created_at().timestamp_millis())
            .execute(&*self.pool)
            .await
            .map_err(|e| RepositoryErrorMapper::map_sqlx_error(e, "Save habit"))?;

        Ok(())
    }

    async fn find_by_id(
        &self,
        user_id: &UserId,
        habit_id: &HabitId,
    ) -> Result<Option<Habit>, DomainError> {
        let query = r#"
            SELECT id, user_id, title, icon, theme_color, status, created_at
            FROM habits
            WHERE id = ?1 AND user_id = ?2
        "#;

        let row: Option<HabitRow> = sqlx::query_as(query)
            .bind(habit_id.as_str())
            .bind(user_id.as_str())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| RepositoryErrorMapper::map_sqlx_error(e, "Find habit"))?;

        row.map(HabitRow::into_habit).transpose()
    }

    async fn list_by_user(&self, user_id: &UserId) -> Result<Vec<Habit>, DomainError> {
        let query = r#"
            SELECT id, user_id, title, icon, theme_color, status, created_at
            FROM habits
            WHERE user_id = ?1
            ORDER BY created_at ASC
        "#;

        let rows: Vec<HabitRow> = sqlx::query_as(query)
            .bind(user_id.as_str())
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| RepositoryErrorMapper::map_sqlx_error(e, "List habits"))?;

        rows.into_iter().map(HabitRow::into_habit).collect()
    }

    async fn delete(&self, user_id: &UserId, habit_id: &HabitId) -> Result<(), DomainError> {
        // Check-ins go with the habit via the foreign key cascade.
        sqlx::query("DELETE FROM habits WHERE id = ?1 AND user_id = ?2")
            .bind(habit_id.as_str())
            .bind(user_id.as_str())
            .execute(&*self.pool)
            .await
            .map_err(|e| RepositoryErrorMapper::map_sqlx_error(e, "Delete habit"))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::repositories::SqliteUserLedger;
    use crate::persistence::Database;
    use habitkeeper_domain::user::UserLedger;

    async fn repo_with_user() -> (SqliteHabitRepository, UserId) {
        let db = Database::in_memory().await.unwrap();
        db.init_schema().await.unwrap();
        let pool = Arc::new(db.pool().clone());

        let user_id = UserId::new();
        SqliteUserLedger::new(Arc::clone(&pool))
            .ensure_user(&user_id)
            .await
            .unwrap();

        (SqliteHabitRepository::new(pool), user_id)
    }

    #[tokio::test]
    async fn test_save_and_find_round_trip() {
        let (repo, user_id) = repo_with_user().await;
        let habit = Habit::new(
            user_id.clone(),
            "Meditate".to_string(),
            Some("🧘".to_string()),
            HabitTheme::Purple,
        );

        repo.save(&habit).await.unwrap();

        let found = repo.find_by_id(&user_id, habit.id()).await.unwrap().unwrap();
        assert_eq!(found.title(), "Meditate");
        assert_eq!(found.icon(), "🧘");
        assert_eq!(found.theme(), HabitTheme::Purple);
        assert_eq!(found.status(), HabitStatus::Active);
    }

    #[tokio::test]
    async fn test_find_is_scoped_to_owner() {
        let (repo, user_id) = repo_with_user().await;
        let habit = Habit::new(user_id.clone(), "Read".to_string(), None, HabitTheme::Blue);
        repo.save(&habit).await.unwrap();

        let other_user = UserId::new();
        assert!(repo
            .find_by_id(&other_user, habit.id())
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_list_orders_by_creation() {
        let (repo, user_id) = repo_with_user().await;

        let first = Habit::new(user_id.clone(), "First".to_string(), None, HabitTheme::Red);
        repo.save(&first).await.unwrap();
        let second = Habit::new(user_id.clone(), "Second".to_string(), None, HabitTheme::Green);
        repo.save(&second).await.unwrap();

        let listed = repo.list_by_user(&user_id).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert!(listed[0].created_at() <= listed[1].created_at());
    }

    #[tokio::test]
    async fn test_delete_scoped_to_owner_is_noop_for_stranger() {
        let (repo, user_id) = repo_with_user().await;
        let habit = Habit::new(user_id.clone(), "Read".to_string(), None, HabitTheme::Blue);
        repo.save(&habit).await.unwrap();

        repo.delete(&UserId::new(), habit.id()).await.unwrap();
        assert!(repo
            .find_by_id(&user_id, habit.id())
            .await
            .unwrap()
            .is_some());

        repo.delete(&user_id, habit.id()).await.unwrap();
        assert!(repo
            .find_by_id(&user_id, habit.id())
            .await
            .unwrap()
            .is_none());
    }
}
