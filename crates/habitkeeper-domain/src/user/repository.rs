use async_trait::async_trait;

use super::UserTotals;
use crate::shared::{DomainError, UserId};

/// Read/provision access to the counters slice of the user row. User
/// identity itself is owned by the auth collaborator; `ensure_user` is the
/// provisioning hook that collaborator calls so the ledger has a row to
/// mutate.
#[async_trait]
pub trait UserLedger: Send + Sync {
    /// Create the counters row for a user if it does not exist yet.
    async fn ensure_user(&self, user_id: &UserId) -> Result<(), DomainError>;

    /// Fetch the user's current voucher balance and check-in total.
    async fn fetch_totals(&self, user_id: &UserId) -> Result<UserTotals, DomainError>;
}
