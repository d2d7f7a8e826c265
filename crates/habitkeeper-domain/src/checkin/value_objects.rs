use serde::{Deserialize, Serialize};

use crate::shared::DomainError;

/// How a check-in record came to exist. Normal check-ins count toward the
/// voucher reward cadence; retroactive ones are bought with a voucher and
/// do not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckinKind {
    Normal,
    Retroactive,
}

impl CheckinKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckinKind::Normal => "NORMAL",
            CheckinKind::Retroactive => "RETROACTIVE",
        }
    }

    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s {
            "NORMAL" => Ok(CheckinKind::Normal),
            "RETROACTIVE" => Ok(CheckinKind::Retroactive),
            other => Err(DomainError::DataIntegrity(format!(
                "Unknown check-in kind: {}",
                other
            ))),
        }
    }
}
