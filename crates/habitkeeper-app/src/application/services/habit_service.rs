use std::sync::Arc;

use tracing::info;

use crate::application::dtos::HabitDto;
use habitkeeper_domain::habit::{Habit, HabitRepository, HabitTheme};
use habitkeeper_domain::shared::{DomainError, HabitId, UserId};

/// Thin habit registry. The ledger depends on it only for valid habit
/// references; everything here is user-scoped CRUD.
pub struct HabitService {
    habits: Arc<dyn HabitRepository>,
}

impl HabitService {
    pub fn new(habits: Arc<dyn HabitRepository>) -> Self {
        Self { habits }
    }

    pub async fn create(
        &self,
        user_id: &str,
        title: &str,
        icon: Option<String>,
        theme: &str,
    ) -> Result<HabitDto, DomainError> {
        if title.trim().is_empty() {
            return Err(DomainError::Validation("title is required".to_string()));
        }
        let theme = HabitTheme::parse(theme)?;

        let habit = Habit::new(
            UserId::from_string(user_id),
            title.to_string(),
            icon,
            theme,
        );
        self.habits.save(&habit).await?;

        info!(user_id, habit_id = %habit.id(), title, "habit created");
        Ok(HabitDto::from(&habit))
    }

    pub async fn list(&self, user_id: &str) -> Result<Vec<HabitDto>, DomainError> {
        let habits = self
            .habits
            .list_by_user(&UserId::from_string(user_id))
            .await?;
        Ok(habits.iter().map(HabitDto::from).collect())
    }

    /// Delete a habit and all of its check-ins as one atomic unit.
    pub async fn delete(&self, user_id: &str, habit_id: &str) -> Result<(), DomainError> {
        self.habits
            .delete(
                &UserId::from_string(user_id),
                &HabitId::from_string(habit_id),
            )
            .await?;

        info!(user_id, habit_id, "habit deleted with its checkins");
        Ok(())
    }
}
