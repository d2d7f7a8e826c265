mod aggregate;
mod repository;
mod value_objects;

#[cfg(test)]
mod aggregate_test;

pub use aggregate::Habit;
pub use repository::HabitRepository;
pub use value_objects::{HabitStatus, HabitTheme};
