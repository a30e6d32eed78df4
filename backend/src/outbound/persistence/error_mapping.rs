//! Shared Diesel error mapping for the repositories.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Database failure classified into the cases repositories care about.
#[derive(Debug)]
pub(super) enum DieselFailure {
    UniqueViolation { constraint: Option<String> },
    ForeignKeyViolation { constraint: Option<String> },
    Connection(&'static str),
    Query(&'static str),
}

/// Message carried by a pool failure.
pub(super) fn pool_message(error: PoolError) -> String {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    }
}

/// Classify a Diesel error, logging its details at debug level.
pub(super) fn classify(error: DieselError) -> DieselFailure {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(
                ?kind,
                message = info.message(),
                constraint = info.constraint_name(),
                "diesel operation failed"
            );
        }
        _ => debug!(%error, "diesel operation failed"),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            DieselFailure::UniqueViolation {
                constraint: info.constraint_name().map(str::to_owned),
            }
        }
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) => {
            DieselFailure::ForeignKeyViolation {
                constraint: info.constraint_name().map(str::to_owned),
            }
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            DieselFailure::Connection("database connection error")
        }
        DieselError::NotFound => DieselFailure::Query("record not found"),
        DieselError::QueryBuilderError(_) => DieselFailure::Query("database query error"),
        _ => DieselFailure::Query("database error"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diesel::result::DatabaseErrorInformation;

    struct Info(Option<&'static str>);

    impl DatabaseErrorInformation for Info {
        fn message(&self) -> &str {
            "constraint violated"
        }
        fn details(&self) -> Option<&str> {
            None
        }
        fn hint(&self) -> Option<&str> {
            None
        }
        fn table_name(&self) -> Option<&str> {
            None
        }
        fn column_name(&self) -> Option<&str> {
            None
        }
        fn constraint_name(&self) -> Option<&str> {
            self.0
        }
        fn statement_position(&self) -> Option<i32> {
            None
        }
    }

    fn db_error(kind: DatabaseErrorKind, constraint: Option<&'static str>) -> DieselError {
        DieselError::DatabaseError(kind, Box::new(Info(constraint)))
    }

    #[test]
    fn unique_violation_keeps_constraint_name() {
        let failure = classify(db_error(
            DatabaseErrorKind::UniqueViolation,
            Some("users_username_key"),
        ));
        assert!(matches!(
            failure,
            DieselFailure::UniqueViolation { constraint: Some(ref name) } if name == "users_username_key"
        ));
    }

    #[test]
    fn foreign_key_violation_is_classified() {
        let failure = classify(db_error(DatabaseErrorKind::ForeignKeyViolation, None));
        assert!(matches!(failure, DieselFailure::ForeignKeyViolation { .. }));
    }

    #[test]
    fn closed_connection_is_a_connection_failure() {
        let failure = classify(db_error(DatabaseErrorKind::ClosedConnection, None));
        assert!(matches!(failure, DieselFailure::Connection(_)));
    }

    #[test]
    fn not_found_is_a_query_failure() {
        assert!(matches!(classify(DieselError::NotFound), DieselFailure::Query(_)));
    }
}
