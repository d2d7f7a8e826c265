use serde::{Deserialize, Serialize};

use crate::shared::DomainError;

/// Habit lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HabitStatus {
    Active,
    Archived,
}

impl HabitStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            HabitStatus::Active => "active",
            HabitStatus::Archived => "archived",
        }
    }

    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s {
            "active" => Ok(HabitStatus::Active),
            "archived" => Ok(HabitStatus::Archived),
            other => Err(DomainError::DataIntegrity(format!(
                "Unknown habit status: {}",
                other
            ))),
        }
    }
}

/// Display theme for a habit card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HabitTheme {
    Red,
    Orange,
    Green,
    Blue,
    Purple,
}

impl HabitTheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            HabitTheme::Red => "red",
            HabitTheme::Orange => "orange",
            HabitTheme::Green => "green",
            HabitTheme::Blue => "blue",
            HabitTheme::Purple => "purple",
        }
    }

    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s {
            "red" => Ok(HabitTheme::Red),
            "orange" => Ok(HabitTheme::Orange),
            "green" => Ok(HabitTheme::Green),
            "blue" => Ok(HabitTheme::Blue),
            "purple" => Ok(HabitTheme::Purple),
            other => Err(DomainError::Validation(format!(
                "Unknown habit theme: {}",
                other
            ))),
        }
    }
}
