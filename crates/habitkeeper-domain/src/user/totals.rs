use serde::{Deserialize, Serialize};

use crate::shared::UserId;

/// One voucher is earned per this many cumulative normal check-ins.
pub const VOUCHER_CADENCE: u32 = 4;

/// Whether a just-incremented `total_checkins` value earns a voucher.
///
/// Evaluated strictly on the post-increment total, never re-evaluated
/// retroactively and never batched. Deleting a check-in does not undo an
/// award, so the total and the ledger may legitimately disagree.
pub fn earns_voucher(total_checkins: u32) -> bool {
    total_checkins > 0 && total_checkins % VOUCHER_CADENCE == 0
}

/// The slice of the user row the ledger owns: the voucher balance and the
/// cumulative normal check-in counter. Identity fields belong to the auth
/// collaborator and are not modeled here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserTotals {
    id: UserId,
    voucher_balance: u32,
    total_checkins: u32,
}

impl UserTotals {
    pub fn restore(id: UserId, voucher_balance: u32, total_checkins: u32) -> Self {
        Self {
            id,
            voucher_balance,
            total_checkins,
        }
    }

    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn voucher_balance(&self) -> u32 {
        self.voucher_balance
    }

    pub fn total_checkins(&self) -> u32 {
        self.total_checkins
    }

    pub fn can_spend_voucher(&self) -> bool {
        self.voucher_balance >= 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_voucher_earned_only_at_positive_multiples_of_four() {
        assert!(!earns_voucher(0));
        assert!(!earns_voucher(1));
        assert!(!earns_voucher(2));
        assert!(!earns_voucher(3));
        assert!(earns_voucher(4));
        assert!(!earns_voucher(5));
        assert!(earns_voucher(8));
        assert!(earns_voucher(12));
        assert!(!earns_voucher(13));
    }

    #[test]
    fn test_can_spend_requires_positive_balance() {
        let broke = UserTotals::restore(UserId::new(), 0, 7);
        assert!(!broke.can_spend_voucher());

        let funded = UserTotals::restore(UserId::new(), 1, 4);
        assert!(funded.can_spend_voucher());
    }
}
