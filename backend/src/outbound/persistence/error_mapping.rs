//! Translation of pool and Diesel failures into port error constructors.
//!
//! Each repository passes its own `query` and `connection` constructors so
//! the classification lives in one place.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use crate::domain::ports::{InventoryRepositoryError, TokenStoreError, UserPersistenceError};

use super::pool::PoolError;

/// Coarse classification of a Diesel failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FailureClass {
    Connection,
    UniqueViolation,
    ForeignKeyViolation,
    CheckViolation,
    Query,
}

pub(crate) fn classify(error: &DieselError) -> FailureClass {
    match error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
            match kind {
                DatabaseErrorKind::ClosedConnection => FailureClass::Connection,
                DatabaseErrorKind::UniqueViolation => FailureClass::UniqueViolation,
                DatabaseErrorKind::ForeignKeyViolation => FailureClass::ForeignKeyViolation,
                DatabaseErrorKind::CheckViolation => FailureClass::CheckViolation,
                _ => FailureClass::Query,
            }
        }
        other => {
            debug!(error = %other, "diesel operation failed");
            FailureClass::Query
        }
    }
}

fn describe(class: FailureClass) -> &'static str {
    match class {
        FailureClass::Connection => "database connection error",
        FailureClass::UniqueViolation => "unique constraint violation",
        FailureClass::ForeignKeyViolation => "foreign key violation",
        FailureClass::CheckViolation => "check constraint violation",
        FailureClass::Query => "database error",
    }
}

pub(crate) fn inventory_pool_error(error: PoolError) -> InventoryRepositoryError {
    InventoryRepositoryError::connection(error.into_message())
}

pub(crate) fn inventory_diesel_error(error: DieselError) -> InventoryRepositoryError {
    match classify(&error) {
        FailureClass::Connection => {
            InventoryRepositoryError::connection(describe(FailureClass::Connection))
        }
        class => InventoryRepositoryError::query(describe(class)),
    }
}

pub(crate) fn user_pool_error(error: PoolError) -> UserPersistenceError {
    UserPersistenceError::connection(error.into_message())
}

pub(crate) fn user_diesel_error(error: DieselError) -> UserPersistenceError {
    match classify(&error) {
        FailureClass::Connection => {
            UserPersistenceError::connection(describe(FailureClass::Connection))
        }
        class => UserPersistenceError::query(describe(class)),
    }
}

pub(crate) fn token_pool_error(error: PoolError) -> TokenStoreError {
    TokenStoreError::connection(error.into_message())
}

pub(crate) fn token_diesel_error(error: DieselError) -> TokenStoreError {
    match classify(&error) {
        FailureClass::Connection => {
            TokenStoreError::connection(describe(FailureClass::Connection))
        }
        class => TokenStoreError::query(describe(class)),
    }
}
