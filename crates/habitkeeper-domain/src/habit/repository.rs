use async_trait::async_trait;

use super::Habit;
use crate::shared::{DomainError, HabitId, UserId};

/// Habit registry, scoped strictly to the owning user id.
#[async_trait]
pub trait HabitRepository: Send + Sync {
    async fn save(&self, habit: &Habit) -> Result<(), DomainError>;

    /// Find a habit by id, but only if it is owned by `user_id`.
    async fn find_by_id(
        &self,
        user_id: &UserId,
        habit_id: &HabitId,
    ) -> Result<Option<Habit>, DomainError>;

    /// List a user's habits ordered by creation time ascending.
    async fn list_by_user(&self, user_id: &UserId) -> Result<Vec<Habit>, DomainError>;

    /// Delete a habit and, atomically, all of its check-ins. Deleting a
    /// habit the user does not own is a no-op.
    async fn delete(&self, user_id: &UserId, habit_id: &HabitId) -> Result<(), DomainError>;
}
