// Domain layer - Pure business logic
// No dependencies on infrastructure or presentation layers

pub mod checkin;
pub mod habit;
pub mod shared;
pub mod user;

// Re-exports for convenience
pub use shared::{CheckinId, DomainError, HabitId, UserId};
