//! Visitor entry lifecycle.
//!
//! Two entry paths exist: a guard logs a walk-up visitor (starts
//! `pending`, the owning resident decides) and a resident
//! pre-registers an expected guest (starts `approved` immediately).
//! Every status change is a compare-and-swap at the store, so racing
//! decisions cannot both take effect.

use chrono::{DateTime, Utc};
use gatehouse_core::context::AuthorizationContext;
use gatehouse_core::error::{GatehouseError, GatehouseResult};
use gatehouse_core::events::{ChangeEvent, ChangeFeed, ChangeOp};
use gatehouse_core::models::role::Role;
use gatehouse_core::models::visitor::{
    CreateVisitor, Decision, Visitor, VisitorInfo, VisitorStatus,
};
use gatehouse_core::repository::{
    PaginatedResult, Pagination, ProfileRepository, VisitorRepository,
};
use tracing::info;
use uuid::Uuid;

/// Which slice of the visitor log a caller may see.
#[derive(Debug, Clone)]
pub enum ListScope {
    /// Every record, paginated. Admin and super_admin only.
    All(Pagination),
    /// Records for the caller's own flat. Resident only.
    OwnFlat,
    /// Most recent records across all flats. Guard only.
    Recent { limit: u64 },
}

/// Orchestrates the visitor entry state machine.
pub struct VisitorLifecycleManager<V, P, F>
where
    V: VisitorRepository,
    P: ProfileRepository,
    F: ChangeFeed,
{
    visitor_repo: V,
    profile_repo: P,
    feed: F,
}

impl<V, P, F> VisitorLifecycleManager<V, P, F>
where
    V: VisitorRepository,
    P: ProfileRepository,
    F: ChangeFeed,
{
    pub fn new(visitor_repo: V, profile_repo: P, feed: F) -> Self {
        Self {
            visitor_repo,
            profile_repo,
            feed,
        }
    }

    /// Guard logs a walk-up visitor at the gate.
    ///
    /// The flat number resolves to its resident, who owns the
    /// approval decision; an unassigned flat fails `NotFound`. The
    /// record starts `pending`.
    pub async fn log_entry(
        &self,
        info: VisitorInfo,
        flat_number: &str,
        ctx: &AuthorizationContext,
    ) -> GatehouseResult<Visitor> {
        ctx.require(Role::Guard)?;

        let resident = self.profile_repo.get_by_flat(flat_number).await?;

        let visitor = self
            .visitor_repo
            .create(CreateVisitor {
                visitor_name: info.visitor_name,
                visitor_phone: info.visitor_phone,
                purpose: info.purpose,
                flat_number: flat_number.to_string(),
                resident_id: resident.user_id,
                logged_by: ctx.user_id,
                status: VisitorStatus::Pending,
                expected_at: None,
                notes: info.notes,
                approved_at: None,
                approved_by: None,
            })
            .await?;

        info!(
            visitor_id = %visitor.id,
            flat = %visitor.flat_number,
            "visitor entry logged"
        );
        self.publish(ChangeOp::Create, &visitor);

        Ok(visitor)
    }

    /// Resident pre-registers an expected guest for their own flat.
    ///
    /// Pre-registrations bypass the gate decision: the record is
    /// created already `approved`, stamped with the registering
    /// resident. A resident without a flat assignment cannot
    /// pre-register (`NotFound`).
    pub async fn pre_register(
        &self,
        info: VisitorInfo,
        expected_at: DateTime<Utc>,
        ctx: &AuthorizationContext,
    ) -> GatehouseResult<Visitor> {
        ctx.require(Role::Resident)?;

        let profile = self.profile_repo.get_by_user(ctx.user_id).await?;
        let flat_number = profile.flat_number.ok_or_else(|| GatehouseError::NotFound {
            entity: "flat assignment".into(),
            id: ctx.user_id.to_string(),
        })?;

        let visitor = self
            .visitor_repo
            .create(CreateVisitor {
                visitor_name: info.visitor_name,
                visitor_phone: info.visitor_phone,
                purpose: info.purpose,
                flat_number,
                resident_id: ctx.user_id,
                logged_by: ctx.user_id,
                status: VisitorStatus::Approved,
                expected_at: Some(expected_at),
                notes: info.notes,
                approved_at: Some(Utc::now()),
                approved_by: Some(ctx.user_id),
            })
            .await?;

        info!(
            visitor_id = %visitor.id,
            flat = %visitor.flat_number,
            expected_at = %expected_at,
            "guest pre-registered"
        );
        self.publish(ChangeOp::Create, &visitor);

        Ok(visitor)
    }

    /// Resident decides on a pending entry for their own flat.
    ///
    /// Applies `pending -> approved` or `pending -> denied` as a
    /// conditional update; a record no longer pending fails
    /// `InvalidTransition`.
    pub async fn decide(
        &self,
        visitor_id: Uuid,
        decision: Decision,
        ctx: &AuthorizationContext,
    ) -> GatehouseResult<Visitor> {
        let visitor = self.owned_visitor(visitor_id, ctx).await?;

        let updated = self
            .visitor_repo
            .transition(
                visitor.id,
                VisitorStatus::Pending,
                decision.status(),
                Some(ctx.user_id),
            )
            .await?;

        info!(
            visitor_id = %updated.id,
            status = %updated.status,
            "visitor entry decided"
        );
        self.publish(ChangeOp::Update, &updated);

        Ok(updated)
    }

    /// Resident withdraws a previously granted approval.
    ///
    /// Only `approved -> denied` is legal here; revoking a pending
    /// or already-denied record fails `InvalidTransition`. The
    /// record is never deleted.
    pub async fn revoke(
        &self,
        visitor_id: Uuid,
        ctx: &AuthorizationContext,
    ) -> GatehouseResult<Visitor> {
        let visitor = self.owned_visitor(visitor_id, ctx).await?;

        let updated = self
            .visitor_repo
            .transition(
                visitor.id,
                VisitorStatus::Approved,
                VisitorStatus::Denied,
                Some(ctx.user_id),
            )
            .await?;

        info!(visitor_id = %updated.id, "visitor approval revoked");
        self.publish(ChangeOp::Update, &updated);

        Ok(updated)
    }

    /// Read the visitor log under a role-gated scope.
    pub async fn list(
        &self,
        scope: ListScope,
        ctx: &AuthorizationContext,
    ) -> GatehouseResult<PaginatedResult<Visitor>> {
        match scope {
            ListScope::All(pagination) => {
                if !ctx.is_admin() {
                    return Err(GatehouseError::Forbidden {
                        reason: "full visitor log requires admin".into(),
                    });
                }
                self.visitor_repo.list_all(pagination).await
            }
            ListScope::OwnFlat => {
                ctx.require(Role::Resident)?;
                let profile = self.profile_repo.get_by_user(ctx.user_id).await?;
                let flat_number =
                    profile.flat_number.ok_or_else(|| GatehouseError::NotFound {
                        entity: "flat assignment".into(),
                        id: ctx.user_id.to_string(),
                    })?;
                let items = self.visitor_repo.list_by_flat(&flat_number).await?;
                Ok(unpaged(items))
            }
            ListScope::Recent { limit } => {
                ctx.require(Role::Guard)?;
                let items = self.visitor_repo.list_recent(limit).await?;
                Ok(unpaged(items))
            }
        }
    }

    /// Guard lookup: still-approved pre-registrations for a flat,
    /// soonest expected arrival first. Lets the gate recognise an
    /// expected guest instead of logging a duplicate pending entry.
    pub async fn expected_for_flat(
        &self,
        flat_number: &str,
        ctx: &AuthorizationContext,
    ) -> GatehouseResult<Vec<Visitor>> {
        ctx.require(Role::Guard)?;
        self.visitor_repo.list_expected(flat_number).await
    }

    /// Fetch a visitor and verify the caller is the owning resident.
    async fn owned_visitor(
        &self,
        visitor_id: Uuid,
        ctx: &AuthorizationContext,
    ) -> GatehouseResult<Visitor> {
        ctx.require(Role::Resident)?;

        let visitor = self.visitor_repo.get_by_id(visitor_id).await?;
        if visitor.resident_id != ctx.user_id {
            return Err(GatehouseError::Forbidden {
                reason: "visitor entry belongs to another flat".into(),
            });
        }
        Ok(visitor)
    }

    fn publish(&self, op: ChangeOp, visitor: &Visitor) {
        self.feed.publish(ChangeEvent {
            table: "visitor".into(),
            op,
            record_id: visitor.id,
            flat_number: Some(visitor.flat_number.clone()),
        });
    }
}

fn unpaged(items: Vec<Visitor>) -> PaginatedResult<Visitor> {
    let total = items.len() as u64;
    PaginatedResult {
        items,
        total,
        offset: 0,
        limit: total,
    }
}
