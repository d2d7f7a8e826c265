#[cfg(test)]
mod tests {
    use super::super::{Habit, HabitStatus, HabitTheme};
    use crate::shared::UserId;

    #[test]
    fn test_new_habit_starts_active_with_default_icon() {
        let habit = Habit::new(UserId::new(), "Read".to_string(), None, HabitTheme::Blue);

        assert_eq!(habit.status(), HabitStatus::Active);
        assert_eq!(habit.icon(), "🌟");
        assert_eq!(habit.theme(), HabitTheme::Blue);
    }

    #[test]
    fn test_new_habit_keeps_supplied_icon() {
        let habit = Habit::new(
            UserId::new(),
            "Run".to_string(),
            Some("🏃".to_string()),
            HabitTheme::Green,
        );
        assert_eq!(habit.icon(), "🏃");
    }

    #[test]
    fn test_theme_parse_round_trip() {
        for theme in [
            HabitTheme::Red,
            HabitTheme::Orange,
            HabitTheme::Green,
            HabitTheme::Blue,
            HabitTheme::Purple,
        ] {
            assert_eq!(HabitTheme::parse(theme.as_str()).unwrap(), theme);
        }
        assert!(HabitTheme::parse("magenta").is_err());
    }

    #[test]
    fn test_status_parse_round_trip() {
        assert_eq!(HabitStatus::parse("active").unwrap(), HabitStatus::Active);
        assert_eq!(
            HabitStatus::parse("archived").unwrap(),
            HabitStatus::Archived
        );
        assert!(HabitStatus::parse("paused").is_err());
    }
}
