use habitkeeper_domain::shared::DomainError;

/// Maps sqlx errors into domain errors with operation context.
pub struct RepositoryErrorMapper;

impl RepositoryErrorMapper {
    pub fn map_sqlx_error(e: sqlx::Error, context: &str) -> DomainError {
        match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                DomainError::Conflict(format!("{}: {}", context, db.message()))
            }
            _ => DomainError::Repository(format!("{}: {}", context, e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_database_error_maps_to_repository() {
        let err = RepositoryErrorMapper::map_sqlx_error(sqlx::Error::RowNotFound, "Fetch totals");
        match err {
            DomainError::Repository(msg) => assert!(msg.starts_with("Fetch totals")),
            other => panic!("Expected Repository error, got {:?}", other),
        }
    }
}
