//! Auth service.

use async_trait::async_trait;
use mockall::automock;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    auth::{
        AuthServiceError, AuthSession, IssuedSession, NewAccount, SessionTokenVersion,
        format_session_token, generate_session_secret,
        models::NewSessionRecord,
        parse_session_token,
        password::{hash_password, verify_password},
        repository::PgAuthRepository,
        session_token_verifier,
    },
    domain::users::models::{Role, User, UserUuid},
};

#[derive(Debug, Clone)]
pub struct PgAuthService {
    repository: PgAuthRepository,
    bcrypt_cost: u32,
}

impl PgAuthService {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self::with_cost(pool, bcrypt::DEFAULT_COST)
    }

    /// Build a service with a non-default bcrypt cost. Test harnesses use the
    /// minimum cost to keep credential-heavy suites fast.
    #[must_use]
    pub fn with_cost(pool: PgPool, bcrypt_cost: u32) -> Self {
        Self {
            repository: PgAuthRepository::new(pool),
            bcrypt_cost,
        }
    }

    /// Create an admin account and issue a session for it.
    ///
    /// Operator tooling only; the HTTP surface never creates admins.
    ///
    /// # Errors
    ///
    /// Returns an error if hashing fails or the email is taken.
    pub async fn create_admin(
        &self,
        account: NewAccount,
    ) -> Result<IssuedSession, AuthServiceError> {
        self.create_account(account, Role::Admin).await
    }

    async fn create_account(
        &self,
        account: NewAccount,
        role: Role,
    ) -> Result<IssuedSession, AuthServiceError> {
        if account.name.trim().is_empty()
            || account.email.trim().is_empty()
            || account.password.is_empty()
        {
            return Err(AuthServiceError::MissingRequiredData);
        }

        let password_hash = hash_password(&account.password, self.bcrypt_cost)?;

        let user = self
            .repository
            .create_user(
                Uuid::now_v7(),
                account.name.trim(),
                account.email.trim(),
                &password_hash,
                role,
            )
            .await?;

        self.issue_session(user).await
    }

    async fn issue_session(&self, user: User) -> Result<IssuedSession, AuthServiceError> {
        let session_uuid = Uuid::now_v7();
        let version = SessionTokenVersion::V1;
        let secret = generate_session_secret();
        let token = format_session_token(session_uuid, version, &secret);

        let token_hash = session_token_verifier(&session_uuid, version, &user.uuid, &secret);

        self.repository
            .create_session(&NewSessionRecord {
                uuid: session_uuid,
                user_uuid: user.uuid,
                token_hash,
            })
            .await?;

        Ok(IssuedSession { token, user })
    }
}

#[async_trait]
impl AuthService for PgAuthService {
    async fn register(&self, account: NewAccount) -> Result<IssuedSession, AuthServiceError> {
        self.create_account(account, Role::User).await
    }

    async fn login(&self, email: &str, password: &str) -> Result<IssuedSession, AuthServiceError> {
        let credentials = self
            .repository
            .find_credentials_by_email(email.trim())
            .await?
            .ok_or(AuthServiceError::InvalidCredentials)?;

        // Same error for unknown email and wrong password.
        if !verify_password(password, &credentials.password_hash)? {
            return Err(AuthServiceError::InvalidCredentials);
        }

        self.issue_session(credentials.user).await
    }

    async fn authenticate_bearer(
        &self,
        bearer_token: &str,
    ) -> Result<AuthSession, AuthServiceError> {
        let parsed = parse_session_token(bearer_token).map_err(|_| AuthServiceError::NotFound)?;

        let session = self
            .repository
            .find_active_session(parsed.session_uuid)
            .await?
            .ok_or(AuthServiceError::NotFound)?;

        let expected = session_token_verifier(
            &parsed.session_uuid,
            parsed.version,
            &session.user_uuid,
            &parsed.secret,
        );

        if expected != session.token_hash {
            return Err(AuthServiceError::NotFound);
        }

        Ok(AuthSession::new(session.user_uuid, session.role))
    }
}

#[automock]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Create a user-role account and issue a session token for it.
    async fn register(&self, account: NewAccount) -> Result<IssuedSession, AuthServiceError>;

    /// Verify a credential pair and issue a session token.
    async fn login(&self, email: &str, password: &str)
    -> Result<IssuedSession, AuthServiceError>;

    /// Resolve a bearer token to the verified session it represents.
    async fn authenticate_bearer(
        &self,
        bearer_token: &str,
    ) -> Result<AuthSession, AuthServiceError>;
}
