mod repository;
mod totals;

pub use repository::UserLedger;
pub use totals::{earns_voucher, UserTotals, VOUCHER_CADENCE};
