//! Account provisioning policy.
//!
//! Decides who may create accounts and with what role, including the
//! one-time super_admin bootstrap. The bootstrap branch relies on the
//! store's atomic lock claim (see `AccountRepository`), so repeated
//! or concurrent bootstrap attempts from any client cannot seed a
//! second super_admin.

use gatehouse_core::error::{GatehouseError, GatehouseResult};
use gatehouse_core::models::account::NewAccount;
use gatehouse_core::models::role::Role;
use gatehouse_core::repository::{AccountRepository, RoleRepository};
use tracing::info;
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::token;

/// A create-account request as received from the wire.
///
/// The role arrives as a raw string and is validated against the
/// closed role set before anything else happens.
#[derive(Debug, Clone)]
pub struct CreateAccountRequest {
    pub email: String,
    pub password: String,
    pub role: String,
    pub full_name: Option<String>,
    pub phone_number: Option<String>,
    pub flat_number: Option<String>,
}

/// Successful provisioning result.
#[derive(Debug, Clone)]
pub struct ProvisionedAccount {
    pub user_id: Uuid,
    /// True when this call performed the one-time bootstrap.
    pub seeded: bool,
}

/// Account-creation authority.
pub struct ProvisioningAuthority<A: AccountRepository, R: RoleRepository> {
    account_repo: A,
    role_repo: R,
    config: AuthConfig,
}

impl<A: AccountRepository, R: RoleRepository> ProvisioningAuthority<A, R> {
    pub fn new(account_repo: A, role_repo: R, config: AuthConfig) -> Self {
        Self {
            account_repo,
            role_repo,
            config,
        }
    }

    /// Create an account.
    ///
    /// While no super_admin exists the call runs unauthenticated and
    /// must request `super_admin` (the bootstrap). Afterwards a
    /// bearer token resolving to an admin or super_admin caller is
    /// required.
    pub async fn create_account(
        &self,
        request: CreateAccountRequest,
        bearer: Option<&str>,
    ) -> GatehouseResult<ProvisionedAccount> {
        let role = self.validate(&request)?;

        let super_admins = self.role_repo.count_with_role(Role::SuperAdmin).await?;

        if super_admins == 0 {
            return self.bootstrap(request, role).await;
        }

        self.authorize_caller(bearer).await?;

        let account = self
            .account_repo
            .create_with_role(
                NewAccount {
                    email: request.email,
                    password: request.password,
                    full_name: request.full_name,
                    phone_number: request.phone_number,
                    flat_number: request.flat_number,
                },
                role,
            )
            .await?;

        info!(user_id = %account.id, role = %role, "account provisioned");

        Ok(ProvisionedAccount {
            user_id: account.id,
            seeded: false,
        })
    }

    fn validate(&self, request: &CreateAccountRequest) -> GatehouseResult<Role> {
        if request.email.is_empty() || !request.email.contains('@') {
            return Err(GatehouseError::InvalidArgument {
                message: "a valid email is required".into(),
            });
        }
        if request.password.len() < self.config.min_password_length {
            return Err(GatehouseError::InvalidArgument {
                message: format!(
                    "password must be at least {} characters",
                    self.config.min_password_length
                ),
            });
        }
        request.role.parse::<Role>()
    }

    async fn bootstrap(
        &self,
        request: CreateAccountRequest,
        role: Role,
    ) -> GatehouseResult<ProvisionedAccount> {
        if role != Role::SuperAdmin {
            return Err(GatehouseError::PolicyViolation {
                message: "first account must be super_admin".into(),
            });
        }

        let account = self
            .account_repo
            .create_bootstrap(NewAccount {
                email: request.email,
                password: request.password,
                full_name: request.full_name.or_else(|| Some("Super Admin".into())),
                phone_number: request.phone_number,
                flat_number: request.flat_number,
            })
            .await?;

        info!(user_id = %account.id, "super_admin bootstrap complete");

        Ok(ProvisionedAccount {
            user_id: account.id,
            seeded: true,
        })
    }

    async fn authorize_caller(&self, bearer: Option<&str>) -> GatehouseResult<Uuid> {
        let bearer = bearer.ok_or(AuthError::TokenInvalid("missing bearer token".into()))?;
        let claims = token::validate_access_token(bearer, &self.config)?;
        let caller_id = claims.user_id()?;

        let roles = self.role_repo.roles_for(caller_id).await?;
        if roles.is_empty() {
            return Err(GatehouseError::Unauthenticated {
                reason: "caller has no role assignment".into(),
            });
        }

        if !roles.iter().any(|r| r.can_provision()) {
            return Err(GatehouseError::Forbidden {
                reason: "only admin or super_admin may create accounts".into(),
            });
        }

        Ok(caller_id)
    }
}
