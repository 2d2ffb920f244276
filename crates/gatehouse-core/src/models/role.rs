//! Role domain model.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::GatehouseError;

/// The closed set of portal roles.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Resident,
    Guard,
    Admin,
    SuperAdmin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Resident => "resident",
            Role::Guard => "guard",
            Role::Admin => "admin",
            Role::SuperAdmin => "super_admin",
        }
    }

    /// True for roles allowed to provision new accounts.
    pub fn can_provision(&self) -> bool {
        matches!(self, Role::Admin | Role::SuperAdmin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = GatehouseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "resident" => Ok(Role::Resident),
            "guard" => Ok(Role::Guard),
            "admin" => Ok(Role::Admin),
            "super_admin" => Ok(Role::SuperAdmin),
            other => Err(GatehouseError::InvalidArgument {
                message: format!("invalid role: {other}"),
            }),
        }
    }
}

/// A principal -> role association. Created once at provisioning
/// time and otherwise immutable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleAssignment {
    pub user_id: Uuid,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// The full set of roles held by one principal.
///
/// Data may hold several roles per principal; dashboard routing
/// treats role as singular via [`RoleSet::primary`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleSet {
    roles: Vec<Role>,
}

impl RoleSet {
    pub fn new(roles: Vec<Role>) -> Self {
        Self { roles }
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    pub fn contains(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Role> {
        self.roles.iter()
    }

    /// The single effective role for dashboard routing.
    ///
    /// Fixed precedence: super_admin > admin > guard > resident.
    pub fn primary(&self) -> Option<Role> {
        const PRECEDENCE: [Role; 4] = [Role::SuperAdmin, Role::Admin, Role::Guard, Role::Resident];
        PRECEDENCE.into_iter().find(|r| self.contains(*r))
    }
}
