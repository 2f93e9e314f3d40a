//! Users service.

use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::{
    auth::AuthSession,
    database::Db,
    domain::users::{errors::UsersServiceError, models::User, repository::PgUsersRepository},
};

#[derive(Debug, Clone)]
pub struct PgUsersService {
    db: Db,
    repository: PgUsersRepository,
}

impl PgUsersService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgUsersRepository::new(),
        }
    }
}

#[async_trait]
impl UsersService for PgUsersService {
    async fn list_users(&self, session: &AuthSession) -> Result<Vec<User>, UsersServiceError> {
        if !session.is_admin() {
            return Err(UsersServiceError::Forbidden);
        }

        let mut tx = self.db.begin().await?;

        let users = self.repository.list_users(&mut tx).await?;

        tx.commit().await?;

        Ok(users)
    }

    async fn delete_user(
        &self,
        session: &AuthSession,
        user: Uuid,
    ) -> Result<(), UsersServiceError> {
        if !session.is_admin() {
            return Err(UsersServiceError::Forbidden);
        }

        let mut tx = self.db.begin().await?;

        let rows_affected = self.repository.delete_non_admin_user(&mut tx, user).await?;

        if rows_affected == 0 {
            // Distinguish "missing" from "present but admin".
            return match self.repository.get_user(&mut tx, user).await? {
                Some(_) => Err(UsersServiceError::CannotDeleteAdmin),
                None => Err(UsersServiceError::NotFound),
            };
        }

        tx.commit().await?;

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait UsersService: Send + Sync {
    /// List all accounts. Admin only; credential hashes are never included.
    async fn list_users(&self, session: &AuthSession) -> Result<Vec<User>, UsersServiceError>;

    /// Delete an account. Admin only; admin-role accounts are protected.
    async fn delete_user(&self, session: &AuthSession, user: Uuid)
    -> Result<(), UsersServiceError>;
}
