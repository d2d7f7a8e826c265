pub mod checkin_ledger_repo;
pub mod habit_repo;
pub mod user_ledger_repo;

pub use checkin_ledger_repo::SqliteCheckinLedger;
pub use habit_repo::SqliteHabitRepository;
pub use user_ledger_repo::SqliteUserLedger;
