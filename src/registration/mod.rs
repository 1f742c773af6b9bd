//! Registration orchestration: the only multi-step flow in the service.

use crate::{error::Error, idp::IdpClient, users::{User, UserRepo}};
use secrecy::SecretString;
use sqlx::PgPool;
use tracing::{debug, instrument};

/// Creates the account with the provider and the local mirror row, in that
/// order. Constructed once at startup and cloned into handlers.
#[derive(Debug, Clone)]
pub struct Registrar {
    pool: PgPool,
    idp: IdpClient,
}

impl Registrar {
    #[must_use]
    pub fn new(pool: PgPool, idp: IdpClient) -> Self {
        Self { pool, idp }
    }

    /// Register a new user.
    ///
    /// Steps, strictly ordered, no compensation on failure:
    /// 1. local lookup by email — a hit terminates the request before any
    ///    provider call;
    /// 2. provider `SignUp` — a failure leaves no local row;
    /// 3. local insert — a failure here leaves the remote account in place:
    ///    the step-2 write is never rolled back, and two concurrent
    ///    registrations for one email can both pass step 1. The unique
    ///    indexes are the only backstop.
    ///
    /// # Errors
    /// `Error::Duplicate` when the email is already mirrored,
    /// `Error::Provider` when the remote sign-up fails, `Error::Constraint`
    /// or `Error::Store` when the local insert fails.
    #[instrument(skip(self, password))]
    pub async fn register(
        &self,
        username: &str,
        password: &SecretString,
        email: &str,
    ) -> Result<User, Error> {
        if UserRepo::find_by_email(&self.pool, email).await?.is_some() {
            return Err(Error::Duplicate(
                "User with this email already exists".to_string(),
            ));
        }

        let response = self.idp.sign_up(username, password, email).await?;
        debug!("provider sign-up response: {:?}", response);

        UserRepo::create(&self.pool, username, email).await
    }
}
