//! Authentication service — password sign-in and token issuance.

use gatehouse_core::error::{GatehouseError, GatehouseResult};
use gatehouse_core::repository::AccountRepository;
use tracing::debug;
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::token;

/// Input for the sign-in flow.
#[derive(Debug)]
pub struct SignInInput {
    pub email: String,
    pub password: String,
}

/// Successful sign-in result.
#[derive(Debug)]
pub struct SignInOutput {
    /// Signed JWT access token.
    pub access_token: String,
    /// Authenticated account ID.
    pub user_id: Uuid,
    /// Access token lifetime in seconds.
    pub expires_in: u64,
}

/// Authentication service.
///
/// Generic over the account repository so that the auth layer has no
/// dependency on the database crate.
pub struct AuthService<A: AccountRepository> {
    account_repo: A,
    config: AuthConfig,
}

impl<A: AccountRepository> AuthService<A> {
    pub fn new(account_repo: A, config: AuthConfig) -> Self {
        Self {
            account_repo,
            config,
        }
    }

    /// Authenticate with email + password and issue an access token.
    ///
    /// Credential checking is delegated to the account repository,
    /// which owns the hashing scheme. An unknown email and a wrong
    /// password both surface as `InvalidCredentials` so callers
    /// cannot enumerate accounts.
    pub async fn sign_in(&self, input: SignInInput) -> GatehouseResult<SignInOutput> {
        let account = match self
            .account_repo
            .verify_credentials(&input.email, &input.password)
            .await
        {
            Ok(account) => account,
            Err(GatehouseError::Unauthenticated { .. }) | Err(GatehouseError::NotFound { .. }) => {
                debug!(email = %input.email, "sign-in rejected");
                return Err(AuthError::InvalidCredentials.into());
            }
            Err(other) => return Err(other),
        };

        let access_token = token::issue_access_token(account.id, &self.config)?;

        Ok(SignInOutput {
            access_token,
            user_id: account.id,
            expires_in: self.config.access_token_lifetime_secs,
        })
    }
}
