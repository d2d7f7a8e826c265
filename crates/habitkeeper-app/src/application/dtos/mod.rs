use serde::{Deserialize, Serialize};

use habitkeeper_domain::checkin::Checkin;
use habitkeeper_domain::habit::Habit;
use habitkeeper_domain::user::UserTotals;

/// Wire shape of a check-in record:
/// `{id, userId, habitId, date: "YYYY-MM-DD", timestamp: epoch-millis,
///   type: "NORMAL"|"RETROACTIVE", note?}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckinDto {
    pub id: String,
    pub user_id: String,
    pub habit_id: String,
    pub date: String,
    pub timestamp: i64,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl From<&Checkin> for CheckinDto {
    fn from(checkin: &Checkin) -> Self {
        Self {
            id: checkin.id().to_string(),
            user_id: checkin.user_id().to_string(),
            habit_id: checkin.habit_id().to_string(),
            date: checkin.date().format("%Y-%m-%d").to_string(),
            timestamp: checkin.created_at().timestamp_millis(),
            kind: checkin.kind().as_str().to_string(),
            note: checkin.note().map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserTotalsDto {
    pub id: String,
    pub voucher_balance: u32,
    pub total_checkins: u32,
}

impl From<&UserTotals> for UserTotalsDto {
    fn from(totals: &UserTotals) -> Self {
        Self {
            id: totals.id().to_string(),
            voucher_balance: totals.voucher_balance(),
            total_checkins: totals.total_checkins(),
        }
    }
}

/// Result of a mutating ledger call: the (created or pre-existing) record
/// plus the user's post-operation totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckinOutcomeDto {
    pub checkin: CheckinDto,
    pub user: UserTotalsDto,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitDto {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub icon: String,
    pub theme_color: String,
    pub status: String,
    pub created_at: i64,
}

impl From<&Habit> for HabitDto {
    fn from(habit: &Habit) -> Self {
        Self {
            id: habit.id().to_string(),
            user_id: habit.user_id().to_string(),
            title: habit.title().to_string(),
            icon: habit.icon().to_string(),
            theme_color: habit.theme().as_str().to_string(),
            status: habit.status().as_str().to_string(),
            created_at: habit.created_at().timestamp_millis(),
        }
    }
}

/// Streak statistics for one habit.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitStreakDto {
    pub habit_id: String,
    pub title: String,
    pub current_streak: u32,
    pub max_streak: u32,
    pub total_days: u32,
    pub last_date: Option<String>,
}

/// Streak statistics across all of a user's habits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStreakDto {
    pub current_streak: u32,
    pub max_streak: u32,
    pub total_days: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use habitkeeper_domain::shared::{HabitId, UserId};

    #[test]
    fn test_checkin_wire_shape() {
        let checkin = Checkin::normal(
            UserId::from_string("u1"),
            HabitId::from_string("h1"),
            NaiveDate::parse_from_str("2024-01-05", "%Y-%m-%d").unwrap(),
            None,
        );
        let value = serde_json::to_value(CheckinDto::from(&checkin)).unwrap();

        assert_eq!(value["userId"], "u1");
        assert_eq!(value["habitId"], "h1");
        assert_eq!(value["date"], "2024-01-05");
        assert_eq!(value["type"], "NORMAL");
        assert!(value["timestamp"].is_i64());
        // Absent note is omitted entirely, not serialized as null.
        assert!(value.get("note").is_none());
    }

    #[test]
    fn test_checkin_wire_shape_keeps_note() {
        let checkin = Checkin::normal(
            UserId::from_string("u1"),
            HabitId::from_string("h1"),
            NaiveDate::parse_from_str("2024-01-05", "%Y-%m-%d").unwrap(),
            Some("evening walk".to_string()),
        );
        let value = serde_json::to_value(CheckinDto::from(&checkin)).unwrap();
        assert_eq!(value["note"], "evening walk");
    }

    #[test]
    fn test_user_totals_wire_shape() {
        let totals = UserTotals::restore(UserId::from_string("u1"), 2, 8);
        let value = serde_json::to_value(UserTotalsDto::from(&totals)).unwrap();

        assert_eq!(value["id"], "u1");
        assert_eq!(value["voucherBalance"], 2);
        assert_eq!(value["totalCheckins"], 8);
    }
}
