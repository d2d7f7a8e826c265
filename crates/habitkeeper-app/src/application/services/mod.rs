mod checkin_service;
mod habit_service;

pub use checkin_service::CheckinLedgerService;
pub use habit_service::HabitService;
