//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{
    EmailAddress, NewUserAccount, PasswordDigest, User, UserAccount, UserId, Username,
};

use super::error_mapping::{DieselFailure, classify, pool_message};
use super::models::{NewUserRow, UserRow};
use super::pool::DbPool;
use super::schema::users;

/// Diesel-backed implementation of the [`UserRepository`] port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Repository over a shared pool.
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_diesel_error(error: diesel::result::Error, username: &str) -> UserPersistenceError {
    match classify(error) {
        DieselFailure::UniqueViolation { .. } => UserPersistenceError::duplicate_username(username),
        DieselFailure::Connection(message) => UserPersistenceError::connection(message),
        DieselFailure::ForeignKeyViolation { .. } => {
            UserPersistenceError::query("unexpected foreign key violation")
        }
        DieselFailure::Query(message) => UserPersistenceError::query(message),
    }
}

fn row_to_account(row: UserRow) -> Result<UserAccount, UserPersistenceError> {
    let invalid = |err: crate::domain::UserValidationError| {
        warn!(user_id = %row.id, %err, "stored user row failed validation");
        UserPersistenceError::query(format!("stored user is invalid: {err}"))
    };
    let username = Username::new(&row.username).map_err(invalid)?;
    let email = EmailAddress::new(&row.email).map_err(invalid)?;
    Ok(UserAccount {
        user: User::new(UserId::from_uuid(row.id), username, email, row.admin),
        password_digest: PasswordDigest::from_stored(row.password_hash),
    })
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn create(&self, account: &NewUserAccount) -> Result<User, UserPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| UserPersistenceError::connection(pool_message(err)))?;

        let row = NewUserRow {
            id: *UserId::random().as_uuid(),
            username: account.username.as_ref(),
            email: account.email.as_ref(),
            password_hash: account.password_digest.as_str(),
            admin: false,
        };

        let stored: UserRow = diesel::insert_into(users::table)
            .values(&row)
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, account.username.as_ref()))?;

        row_to_account(stored).map(|created| created.user)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| UserPersistenceError::connection(pool_message(err)))?;

        let row: Option<UserRow> = users::table
            .filter(users::id.eq(id.as_uuid()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, ""))?;

        row.map(row_to_account)
            .transpose()
            .map(|found| found.map(|account| account.user))
    }

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserAccount>, UserPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| UserPersistenceError::connection(pool_message(err)))?;

        let row: Option<UserRow> = users::table
            .filter(users::username.eq(username))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, username))?;

        row.map(row_to_account).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn row(username: &str) -> UserRow {
        UserRow {
            id: Uuid::new_v4(),
            username: username.to_owned(),
            email: "a@example.com".to_owned(),
            password_hash: "$argon2id$stub".to_owned(),
            admin: true,
            created_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn converts_valid_rows() {
        let account = row_to_account(row("alice")).expect("valid row");
        assert_eq!(account.user.username().as_ref(), "alice");
        assert!(account.user.is_admin());
        assert_eq!(account.password_digest.as_str(), "$argon2id$stub");
    }

    #[test]
    fn invalid_rows_become_query_errors() {
        let err = row_to_account(row("has space")).expect_err("invalid username");
        assert!(matches!(err, UserPersistenceError::Query { .. }));
    }

    #[test]
    fn not_found_maps_to_query_error() {
        let err = map_diesel_error(diesel::result::Error::NotFound, "alice");
        assert!(matches!(err, UserPersistenceError::Query { .. }));
    }
}
