use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! define_id {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(String);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::new_v4().to_string())
            }

            pub fn from_string(s: &str) -> Self {
                Self(s.to_string())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }
    };
}

define_id!(UserId);
define_id!(HabitId);
define_id!(CheckinId);

/// Error codes for structured error handling, surfaced to the API
/// collaborator as rejection reason codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    // Resource Not Found (2xxx)
    HabitNotFound = 2001,

    // Business Logic (3xxx)
    InsufficientVoucher = 3001,

    // Data & Persistence (4xxx)
    RepositoryError = 4001,
    ConstraintViolation = 4002,
    DataIntegrityError = 4003,

    // Infrastructure (5xxx)
    InfrastructureError = 5001,

    // Validation (6xxx)
    ValidationError = 6001,
    InvalidDate = 6002,
}

impl ErrorCode {
    /// Get error code as integer
    pub fn code(&self) -> u16 {
        *self as u16
    }

    /// Get error severity
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            ErrorCode::HabitNotFound
            | ErrorCode::InsufficientVoucher
            | ErrorCode::ValidationError
            | ErrorCode::InvalidDate => ErrorSeverity::Info,

            ErrorCode::ConstraintViolation => ErrorSeverity::Warning,

            ErrorCode::RepositoryError
            | ErrorCode::DataIntegrityError
            | ErrorCode::InfrastructureError => ErrorSeverity::Error,
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
}

#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("Habit not found: {0}")]
    HabitNotFound(String),

    #[error("Insufficient vouchers: {0}")]
    InsufficientVoucher(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// A concurrent insert raced past the idempotency pre-check and hit the
    /// store uniqueness constraint. The ledger resolves this for normal
    /// check-ins by returning the existing record.
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Repository error: {0}")]
    Repository(String),

    #[error("Infrastructure error: {0}")]
    Infrastructure(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Data integrity error: {0}")]
    DataIntegrity(String),
}

impl DomainError {
    /// Get error code
    pub fn code(&self) -> ErrorCode {
        match self {
            DomainError::HabitNotFound(_) => ErrorCode::HabitNotFound,
            DomainError::InsufficientVoucher(_) => ErrorCode::InsufficientVoucher,
            DomainError::InvalidDate(_) => ErrorCode::InvalidDate,
            DomainError::Conflict(_) => ErrorCode::ConstraintViolation,
            DomainError::Repository(_) => ErrorCode::RepositoryError,
            DomainError::Infrastructure(_) => ErrorCode::InfrastructureError,
            DomainError::Validation(_) => ErrorCode::ValidationError,
            DomainError::DataIntegrity(_) => ErrorCode::DataIntegrityError,
        }
    }

    /// Get error severity
    pub fn severity(&self) -> ErrorSeverity {
        self.code().severity()
    }

    /// Format error with code
    pub fn format_with_code(&self) -> String {
        format!("[{}] {}", self.code().code(), self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_are_stable() {
        assert_eq!(DomainError::HabitNotFound("h1".into()).code().code(), 2001);
        assert_eq!(
            DomainError::InsufficientVoucher("balance is 0".into())
                .code()
                .code(),
            3001
        );
        assert_eq!(DomainError::InvalidDate("2024-13-01".into()).code().code(), 6002);
        assert_eq!(DomainError::Conflict("duplicate".into()).code().code(), 4002);
    }

    #[test]
    fn test_format_with_code() {
        let err = DomainError::InsufficientVoucher("balance is 0".into());
        assert_eq!(err.format_with_code(), "[3001] Insufficient vouchers: balance is 0");
    }

    #[test]
    fn test_ids_are_unique_and_round_trip() {
        let a = UserId::new();
        let b = UserId::new();
        assert_ne!(a, b);

        let restored = UserId::from_string(a.as_str());
        assert_eq!(a, restored);
    }
}
