use chrono::{DateTime, Utc};

use super::{HabitStatus, HabitTheme};
use crate::shared::{HabitId, UserId};

const DEFAULT_ICON: &str = "🌟";

/// A habit belongs to exactly one user and exclusively owns its check-ins
/// for lifecycle purposes: deleting the habit cascades to them.
#[derive(Debug, Clone)]
pub struct Habit {
    id: HabitId,
    user_id: UserId,
    title: String,
    icon: String,
    theme: HabitTheme,
    status: HabitStatus,
    created_at: DateTime<Utc>,
}

impl Habit {
    pub fn new(user_id: UserId, title: String, icon: Option<String>, theme: HabitTheme) -> Self {
        Self {
            id: HabitId::new(),
            user_id,
            title,
            icon: icon.unwrap_or_else(|| DEFAULT_ICON.to_string()),
            theme,
            status: HabitStatus::Active,
            created_at: Utc::now(),
        }
    }

    /// Rehydrate a habit from stored state.
    pub fn restore(
        id: HabitId,
        user_id: UserId,
        title: String,
        icon: String,
        theme: HabitTheme,
        status: HabitStatus,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            user_id,
            title,
            icon,
            theme,
            status,
            created_at,
        }
    }

    pub fn id(&self) -> &HabitId {
        &self.id
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn icon(&self) -> &str {
        &self.icon
    }

    pub fn theme(&self) -> HabitTheme {
        self.theme
    }

    pub fn status(&self) -> HabitStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
