//! Mapping from pool and Diesel failures to user persistence errors.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use crate::domain::ports::{UniqueField, UserPersistenceError};

use super::pool::PoolError;

const EMAIL_CONSTRAINT: &str = "users_email_key";
const NICKNAME_CONSTRAINT: &str = "users_nickname_key";

/// Map pool errors into connection failures.
pub(super) fn map_pool_error(error: PoolError) -> UserPersistenceError {
    let message = match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    };
    UserPersistenceError::connection(message)
}

fn unique_field(constraint: Option<&str>) -> Option<UniqueField> {
    match constraint? {
        EMAIL_CONSTRAINT => Some(UniqueField::Email),
        NICKNAME_CONSTRAINT => Some(UniqueField::Nickname),
        _ => None,
    }
}

/// Map Diesel errors into repository errors.
///
/// Unique violations on the email and nickname constraints become
/// [`UserPersistenceError::Duplicate`] so racing registrations surface the same
/// error as the service-level pre-checks.
pub(super) fn map_diesel_error(error: DieselError) -> UserPersistenceError {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(
                ?kind,
                message = info.message(),
                constraint = ?info.constraint_name(),
                "diesel operation failed"
            );
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            match unique_field(info.constraint_name()) {
                Some(field) => UserPersistenceError::duplicate(field),
                None => UserPersistenceError::query("unique constraint violated"),
            }
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            UserPersistenceError::connection("database connection error")
        }
        DieselError::NotFound => UserPersistenceError::query("record not found"),
        DieselError::QueryBuilderError(_) => UserPersistenceError::query("database query error"),
        _ => UserPersistenceError::query("database error"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diesel::result::DatabaseErrorInformation;
    use rstest::rstest;

    struct Info {
        constraint: Option<&'static str>,
    }

    impl DatabaseErrorInformation for Info {
        fn message(&self) -> &str {
            "duplicate key value violates unique constraint"
        }
        fn details(&self) -> Option<&str> {
            None
        }
        fn hint(&self) -> Option<&str> {
            None
        }
        fn table_name(&self) -> Option<&str> {
            Some("users")
        }
        fn column_name(&self) -> Option<&str> {
            None
        }
        fn constraint_name(&self) -> Option<&str> {
            self.constraint
        }
        fn statement_position(&self) -> Option<i32> {
            None
        }
    }

    fn database_error(kind: DatabaseErrorKind, constraint: Option<&'static str>) -> DieselError {
        DieselError::DatabaseError(kind, Box::new(Info { constraint }))
    }

    #[rstest]
    #[case(Some("users_email_key"), UserPersistenceError::duplicate(UniqueField::Email))]
    #[case(Some("users_nickname_key"), UserPersistenceError::duplicate(UniqueField::Nickname))]
    #[case(Some("users_pkey"), UserPersistenceError::query("unique constraint violated"))]
    #[case(None, UserPersistenceError::query("unique constraint violated"))]
    fn unique_violations_name_the_field(
        #[case] constraint: Option<&'static str>,
        #[case] expected: UserPersistenceError,
    ) {
        let mapped = map_diesel_error(database_error(DatabaseErrorKind::UniqueViolation, constraint));
        assert_eq!(mapped, expected);
    }

    #[rstest]
    fn closed_connections_are_connection_errors() {
        let mapped = map_diesel_error(database_error(DatabaseErrorKind::ClosedConnection, None));
        assert!(matches!(mapped, UserPersistenceError::Connection { .. }));
    }

    #[rstest]
    fn pool_errors_are_connection_errors() {
        let mapped = map_pool_error(PoolError::checkout("timed out"));
        assert_eq!(mapped, UserPersistenceError::connection("timed out"));
    }

    #[rstest]
    fn other_errors_are_query_errors() {
        assert_eq!(
            map_diesel_error(DieselError::NotFound),
            UserPersistenceError::query("record not found")
        );
    }
}
