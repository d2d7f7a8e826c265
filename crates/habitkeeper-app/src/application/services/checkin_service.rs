use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tracing::info;

use crate::application::dtos::{CheckinDto, CheckinOutcomeDto, UserTotalsDto};
use habitkeeper_domain::checkin::CheckinLedger;
use habitkeeper_domain::shared::{DomainError, HabitId, UserId};

/// Ledger operations as the API layer sees them: string ids and ISO date
/// strings in, plain DTOs out. Date validation happens here; everything
/// transactional happens inside the ledger implementation.
pub struct CheckinLedgerService {
    ledger: Arc<dyn CheckinLedger>,
}

impl CheckinLedgerService {
    pub fn new(ledger: Arc<dyn CheckinLedger>) -> Self {
        Self { ledger }
    }

    pub async fn list(
        &self,
        user_id: &str,
        habit_id: Option<&str>,
    ) -> Result<Vec<CheckinDto>, DomainError> {
        let user_id = UserId::from_string(user_id);
        let habit_id = habit_id.map(HabitId::from_string);

        let checkins = self
            .ledger
            .list_checkins(&user_id, habit_id.as_ref())
            .await?;

        Ok(checkins.iter().map(CheckinDto::from).collect())
    }

    /// Record a normal check-in. A missing date defaults to the server's
    /// current date.
    pub async fn check_in(
        &self,
        user_id: &str,
        habit_id: &str,
        date: Option<&str>,
        note: Option<String>,
    ) -> Result<CheckinOutcomeDto, DomainError> {
        let date = match date {
            Some(raw) => parse_date(raw)?,
            None => Utc::now().date_naive(),
        };

        let (checkin, totals) = self
            .ledger
            .add_checkin(
                &UserId::from_string(user_id),
                &HabitId::from_string(habit_id),
                date,
                note,
            )
            .await?;

        Ok(CheckinOutcomeDto {
            checkin: CheckinDto::from(&checkin),
            user: UserTotalsDto::from(&totals),
        })
    }

    pub async fn undo_check_in(
        &self,
        user_id: &str,
        habit_id: &str,
        date: &str,
    ) -> Result<(), DomainError> {
        let date = parse_date(date)?;

        self.ledger
            .remove_checkin(
                &UserId::from_string(user_id),
                &HabitId::from_string(habit_id),
                date,
            )
            .await?;

        info!(user_id, habit_id, %date, "checkin removed (counters kept)");
        Ok(())
    }

    pub async fn spend_voucher(
        &self,
        user_id: &str,
        habit_id: &str,
        date: &str,
    ) -> Result<CheckinOutcomeDto, DomainError> {
        let date = parse_date(date)?;

        let (checkin, totals) = self
            .ledger
            .spend_voucher(
                &UserId::from_string(user_id),
                &HabitId::from_string(habit_id),
                date,
            )
            .await?;

        Ok(CheckinOutcomeDto {
            checkin: CheckinDto::from(&checkin),
            user: UserTotalsDto::from(&totals),
        })
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, DomainError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|e| DomainError::InvalidDate(format!("{} ({})", raw, e)))
}
