//! SurrealDB implementation of [`VisitorRepository`].
//!
//! Status transitions are compare-and-swap: a single `UPDATE ...
//! WHERE status = $from` so two racing decisions on the same record
//! cannot both succeed.

use chrono::{DateTime, Utc};
use gatehouse_core::error::GatehouseResult;
use gatehouse_core::models::visitor::{CreateVisitor, Visitor, VisitorStatus};
use gatehouse_core::repository::{PaginatedResult, Pagination, VisitorRepository};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct VisitorRow {
    visitor_name: String,
    visitor_phone: String,
    purpose: String,
    flat_number: String,
    resident_id: String,
    logged_by: String,
    status: String,
    expected_at: Option<DateTime<Utc>>,
    notes: Option<String>,
    approved_at: Option<DateTime<Utc>>,
    approved_by: Option<String>,
    created_at: DateTime<Utc>,
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct VisitorRowWithId {
    record_id: String,
    visitor_name: String,
    visitor_phone: String,
    purpose: String,
    flat_number: String,
    resident_id: String,
    logged_by: String,
    status: String,
    expected_at: Option<DateTime<Utc>>,
    notes: Option<String>,
    approved_at: Option<DateTime<Utc>>,
    approved_by: Option<String>,
    created_at: DateTime<Utc>,
}

fn parse_status(s: &str) -> Result<VisitorStatus, DbError> {
    match s {
        "pending" => Ok(VisitorStatus::Pending),
        "approved" => Ok(VisitorStatus::Approved),
        "denied" => Ok(VisitorStatus::Denied),
        other => Err(DbError::Decode(format!("unknown visitor status: {other}"))),
    }
}

fn parse_uuid(s: &str, field: &str) -> Result<Uuid, DbError> {
    Uuid::parse_str(s).map_err(|e| DbError::Decode(format!("invalid {field} UUID: {e}")))
}

impl VisitorRow {
    fn into_visitor(self, id: Uuid) -> Result<Visitor, DbError> {
        Ok(Visitor {
            id,
            visitor_name: self.visitor_name,
            visitor_phone: self.visitor_phone,
            purpose: self.purpose,
            flat_number: self.flat_number,
            resident_id: parse_uuid(&self.resident_id, "resident")?,
            logged_by: parse_uuid(&self.logged_by, "creator")?,
            status: parse_status(&self.status)?,
            expected_at: self.expected_at,
            notes: self.notes,
            approved_at: self.approved_at,
            approved_by: self
                .approved_by
                .map(|s| parse_uuid(&s, "approver"))
                .transpose()?,
            created_at: self.created_at,
        })
    }
}

impl VisitorRowWithId {
    fn try_into_visitor(self) -> Result<Visitor, DbError> {
        let id = parse_uuid(&self.record_id, "visitor")?;
        Ok(Visitor {
            id,
            visitor_name: self.visitor_name,
            visitor_phone: self.visitor_phone,
            purpose: self.purpose,
            flat_number: self.flat_number,
            resident_id: parse_uuid(&self.resident_id, "resident")?,
            logged_by: parse_uuid(&self.logged_by, "creator")?,
            status: parse_status(&self.status)?,
            expected_at: self.expected_at,
            notes: self.notes,
            approved_at: self.approved_at,
            approved_by: self
                .approved_by
                .map(|s| parse_uuid(&s, "approver"))
                .transpose()?,
            created_at: self.created_at,
        })
    }
}

/// Row struct for count queries.
#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

/// SurrealDB implementation of the Visitor repository.
#[derive(Clone)]
pub struct SurrealVisitorRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealVisitorRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> VisitorRepository for SurrealVisitorRepository<C> {
    async fn create(&self, input: CreateVisitor) -> GatehouseResult<Visitor> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('visitor', $id) SET \
                 visitor_name = $visitor_name, \
                 visitor_phone = $visitor_phone, \
                 purpose = $purpose, \
                 flat_number = $flat_number, \
                 resident_id = $resident_id, \
                 logged_by = $logged_by, \
                 status = $status, \
                 expected_at = $expected_at, \
                 notes = $notes, \
                 approved_at = $approved_at, \
                 approved_by = $approved_by",
            )
            .bind(("id", id_str.clone()))
            .bind(("visitor_name", input.visitor_name))
            .bind(("visitor_phone", input.visitor_phone))
            .bind(("purpose", input.purpose))
            .bind(("flat_number", input.flat_number))
            .bind(("resident_id", input.resident_id.to_string()))
            .bind(("logged_by", input.logged_by.to_string()))
            .bind(("status", input.status.as_str().to_string()))
            .bind(("expected_at", input.expected_at))
            .bind(("notes", input.notes))
            .bind(("approved_at", input.approved_at))
            .bind(("approved_by", input.approved_by.map(|u| u.to_string())))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(DbError::from_query_failure)?;

        let rows: Vec<VisitorRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "visitor".into(),
            id: id_str,
        })?;

        Ok(row.into_visitor(id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> GatehouseResult<Visitor> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('visitor', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<VisitorRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "visitor".into(),
            id: id_str,
        })?;

        Ok(row.into_visitor(id)?)
    }

    async fn transition(
        &self,
        id: Uuid,
        from: VisitorStatus,
        to: VisitorStatus,
        decided_by: Option<Uuid>,
    ) -> GatehouseResult<Visitor> {
        // Reject illegal edges before touching the store.
        if !from.allows(to) {
            return Err(gatehouse_core::GatehouseError::InvalidTransition {
                from: from.to_string(),
                to: to.to_string(),
            });
        }

        let id_str = id.to_string();

        // Approval stamps only on the edge into `approved`.
        let query = if to == VisitorStatus::Approved {
            "UPDATE type::record('visitor', $id) SET \
             status = $to, \
             approved_at = time::now(), \
             approved_by = $decided_by \
             WHERE status = $from"
        } else {
            "UPDATE type::record('visitor', $id) SET status = $to \
             WHERE status = $from"
        };

        let result = self
            .db
            .query(query)
            .bind(("id", id_str.clone()))
            .bind(("from", from.as_str().to_string()))
            .bind(("to", to.as_str().to_string()))
            .bind(("decided_by", decided_by.map(|u| u.to_string())))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(DbError::from_query_failure)?;

        let rows: Vec<VisitorRow> = result.take(0).map_err(DbError::from)?;
        match rows.into_iter().next() {
            Some(row) => Ok(row.into_visitor(id)?),
            None => {
                // Precondition failed: distinguish a lost race from a
                // missing record by re-reading current state.
                let current = self.get_by_id(id).await?;
                Err(gatehouse_core::GatehouseError::InvalidTransition {
                    from: current.status.to_string(),
                    to: to.to_string(),
                })
            }
        }
    }

    async fn list_all(&self, pagination: Pagination) -> GatehouseResult<PaginatedResult<Visitor>> {
        let mut count_result = self
            .db
            .query("SELECT count() AS total FROM visitor GROUP ALL")
            .await
            .map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM visitor \
                 ORDER BY created_at DESC \
                 LIMIT $limit START $offset",
            )
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<VisitorRowWithId> = result.take(0).map_err(DbError::from)?;

        let items = rows
            .into_iter()
            .map(|row| row.try_into_visitor())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }

    async fn list_by_flat(&self, flat_number: &str) -> GatehouseResult<Vec<Visitor>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM visitor \
                 WHERE flat_number = $flat_number \
                 ORDER BY created_at DESC",
            )
            .bind(("flat_number", flat_number.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<VisitorRowWithId> = result.take(0).map_err(DbError::from)?;

        Ok(rows
            .into_iter()
            .map(|row| row.try_into_visitor())
            .collect::<Result<Vec<_>, DbError>>()?)
    }

    async fn list_recent(&self, limit: u64) -> GatehouseResult<Vec<Visitor>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM visitor \
                 ORDER BY created_at DESC \
                 LIMIT $limit",
            )
            .bind(("limit", limit))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<VisitorRowWithId> = result.take(0).map_err(DbError::from)?;

        Ok(rows
            .into_iter()
            .map(|row| row.try_into_visitor())
            .collect::<Result<Vec<_>, DbError>>()?)
    }

    async fn list_expected(&self, flat_number: &str) -> GatehouseResult<Vec<Visitor>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM visitor \
                 WHERE flat_number = $flat_number \
                 AND status = 'approved' \
                 AND expected_at != NONE \
                 ORDER BY expected_at ASC",
            )
            .bind(("flat_number", flat_number.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<VisitorRowWithId> = result.take(0).map_err(DbError::from)?;

        Ok(rows
            .into_iter()
            .map(|row| row.try_into_visitor())
            .collect::<Result<Vec<_>, DbError>>()?)
    }
}
