mod aggregate;
mod repository;
pub mod streak;
mod value_objects;


pub use aggregate::Checkin;
pub use repository::CheckinLedger;
pub use value_objects::CheckinKind;
