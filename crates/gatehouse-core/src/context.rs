//! Explicit authorization context.
//!
//! The original store enforced access with ambient row-level
//! policies. Here every operation takes an [`AuthorizationContext`]
//! and the scope checks happen in the service layer instead.

use uuid::Uuid;

use crate::error::{GatehouseError, GatehouseResult};
use crate::models::role::{Role, RoleSet};

/// An authenticated caller and its resolved roles.
#[derive(Debug, Clone)]
pub struct AuthorizationContext {
    pub user_id: Uuid,
    pub roles: RoleSet,
}

impl AuthorizationContext {
    pub fn new(user_id: Uuid, roles: RoleSet) -> Self {
        Self { user_id, roles }
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(role)
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(Role::Admin) || self.has_role(Role::SuperAdmin)
    }

    /// Fail with `Forbidden` unless the caller holds `role`.
    pub fn require(&self, role: Role) -> GatehouseResult<()> {
        if self.has_role(role) {
            Ok(())
        } else {
            Err(GatehouseError::Forbidden {
                reason: format!("requires role {role}"),
            })
        }
    }
}
