//! Role resolution — principal to role set.

use gatehouse_core::error::{GatehouseError, GatehouseResult};
use gatehouse_core::models::role::RoleSet;
use gatehouse_core::repository::RoleRepository;
use uuid::Uuid;

/// Resolves an authenticated principal to its assigned roles.
///
/// Pure lookup; a principal with no assignment resolves to
/// `NotFound` and must be treated as unauthenticated — never
/// defaulted to a privileged role.
pub struct RoleResolver<R: RoleRepository> {
    role_repo: R,
}

impl<R: RoleRepository> RoleResolver<R> {
    pub fn new(role_repo: R) -> Self {
        Self { role_repo }
    }

    pub async fn resolve(&self, principal_id: Uuid) -> GatehouseResult<RoleSet> {
        let roles = self.role_repo.roles_for(principal_id).await?;
        if roles.is_empty() {
            return Err(GatehouseError::NotFound {
                entity: "role assignment".into(),
                id: principal_id.to_string(),
            });
        }
        Ok(RoleSet::new(roles))
    }
}
