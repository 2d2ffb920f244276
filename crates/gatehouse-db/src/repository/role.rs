//! SurrealDB implementation of [`RoleRepository`].
//!
//! Role assignments live in a flat `user_role` table with a UNIQUE
//! (user, role) index. The single-super_admin invariant is enforced
//! by the bootstrap lock, not here.

use gatehouse_core::error::GatehouseResult;
use gatehouse_core::models::role::Role;
use gatehouse_core::repository::RoleRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct RoleRow {
    role: String,
}

/// Row struct for count queries.
#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

fn parse_role(s: &str) -> Result<Role, DbError> {
    s.parse::<Role>()
        .map_err(|_| DbError::Decode(format!("unknown role: {s}")))
}

/// SurrealDB implementation of the Role repository.
#[derive(Clone)]
pub struct SurrealRoleRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealRoleRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> RoleRepository for SurrealRoleRepository<C> {
    async fn roles_for(&self, user_id: Uuid) -> GatehouseResult<Vec<Role>> {
        let mut result = self
            .db
            .query(
                "SELECT role, created_at FROM user_role \
                 WHERE user_id = $user_id \
                 ORDER BY created_at ASC",
            )
            .bind(("user_id", user_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<RoleRow> = result.take(0).map_err(DbError::from)?;

        Ok(rows
            .into_iter()
            .map(|row| parse_role(&row.role))
            .collect::<Result<Vec<_>, DbError>>()?)
    }

    async fn count_with_role(&self, role: Role) -> GatehouseResult<u64> {
        let mut result = self
            .db
            .query(
                "SELECT count() AS total FROM user_role \
                 WHERE role = $role GROUP ALL",
            )
            .bind(("role", role.as_str().to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<CountRow> = result.take(0).map_err(DbError::from)?;
        Ok(rows.first().map(|r| r.total).unwrap_or(0))
    }
}
