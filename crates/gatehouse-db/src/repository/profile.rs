//! SurrealDB implementation of [`ProfileRepository`].

use chrono::{DateTime, Utc};
use gatehouse_core::error::GatehouseResult;
use gatehouse_core::models::profile::{CreateProfile, Profile};
use gatehouse_core::repository::{PaginatedResult, Pagination, ProfileRepository};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct ProfileRow {
    user_id: String,
    full_name: String,
    phone_number: String,
    flat_number: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ProfileRow {
    fn try_into_profile(self) -> Result<Profile, DbError> {
        let user_id = Uuid::parse_str(&self.user_id)
            .map_err(|e| DbError::Decode(format!("invalid user UUID: {e}")))?;
        Ok(Profile {
            user_id,
            full_name: self.full_name,
            phone_number: self.phone_number,
            flat_number: self.flat_number,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Row struct for count queries.
#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

/// SurrealDB implementation of the Profile repository.
#[derive(Clone)]
pub struct SurrealProfileRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealProfileRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> ProfileRepository for SurrealProfileRepository<C> {
    async fn create(&self, input: CreateProfile) -> GatehouseResult<Profile> {
        let id_str = input.user_id.to_string();

        // A requested flat is claimed in the same transaction; the
        // claim record id is the flat number, so an occupied flat
        // fails the whole unit.
        let claim_stmt = if input.flat_number.is_some() {
            "CREATE type::record('flat_claim', $flat_number) SET user_id = $id; "
        } else {
            ""
        };

        let query = format!(
            "BEGIN TRANSACTION; \
             {claim_stmt}\
             CREATE type::record('profile', $id) SET \
             user_id = $id, \
             full_name = $full_name, \
             phone_number = $phone_number, \
             flat_number = $flat_number; \
             COMMIT TRANSACTION;"
        );

        let result = self
            .db
            .query(query)
            .bind(("id", id_str))
            .bind(("full_name", input.full_name))
            .bind(("phone_number", input.phone_number))
            .bind(("flat_number", input.flat_number))
            .await
            .map_err(DbError::from)?;

        result.check().map_err(DbError::from_query_failure)?;

        // Re-read rather than untangle per-statement transaction output.
        self.get_by_user(input.user_id).await
    }

    async fn get_by_user(&self, user_id: Uuid) -> GatehouseResult<Profile> {
        let id_str = user_id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('profile', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ProfileRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "profile".into(),
            id: id_str,
        })?;

        Ok(row.try_into_profile()?)
    }

    async fn get_by_flat(&self, flat_number: &str) -> GatehouseResult<Profile> {
        let mut result = self
            .db
            .query(
                "SELECT * FROM profile \
                 WHERE flat_number = $flat_number",
            )
            .bind(("flat_number", flat_number.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ProfileRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "flat".into(),
            id: flat_number.to_string(),
        })?;

        Ok(row.try_into_profile()?)
    }

    async fn assign_flat(&self, user_id: Uuid, flat_number: &str) -> GatehouseResult<Profile> {
        // Profiles are never deleted, so existence can be checked up
        // front without racing the claim below.
        self.get_by_user(user_id).await?;

        // Release any previous claim, claim the target flat, and
        // update the profile as one transaction. The fixed-id claim
        // record means two racing assignments to the same flat cannot
        // both commit; the loser fails with `Conflict`.
        let result = self
            .db
            .query(
                "BEGIN TRANSACTION; \
                 DELETE flat_claim WHERE user_id = $id; \
                 CREATE type::record('flat_claim', $flat_number) SET user_id = $id; \
                 UPDATE type::record('profile', $id) SET \
                 flat_number = $flat_number, updated_at = time::now(); \
                 COMMIT TRANSACTION;",
            )
            .bind(("id", user_id.to_string()))
            .bind(("flat_number", flat_number.to_string()))
            .await
            .map_err(DbError::from)?;

        result.check().map_err(DbError::from_query_failure)?;

        self.get_by_user(user_id).await
    }

    async fn list(&self, pagination: Pagination) -> GatehouseResult<PaginatedResult<Profile>> {
        let mut count_result = self
            .db
            .query("SELECT count() AS total FROM profile GROUP ALL")
            .await
            .map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        let mut result = self
            .db
            .query(
                "SELECT * FROM profile \
                 ORDER BY created_at ASC \
                 LIMIT $limit START $offset",
            )
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ProfileRow> = result.take(0).map_err(DbError::from)?;

        let items = rows
            .into_iter()
            .map(|row| row.try_into_profile())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }
}
