//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async. Concurrency correctness is
//! enforced at the store: status transitions are conditional updates
//! and account bootstrap is guarded by an atomic precondition, never
//! by in-memory locks.

use uuid::Uuid;

use crate::error::GatehouseResult;
use crate::models::{
    account::{Account, NewAccount},
    profile::{CreateProfile, Profile},
    role::Role,
    visitor::{CreateVisitor, Visitor, VisitorStatus},
};

/// Pagination parameters for list queries.
#[derive(Debug, Clone)]
pub struct Pagination {
    pub offset: u64,
    pub limit: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: 50,
        }
    }
}

/// A paginated result set.
#[derive(Debug, Clone)]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub offset: u64,
    pub limit: u64,
}

// ---------------------------------------------------------------------------
// Accounts (identity provider)
// ---------------------------------------------------------------------------

pub trait AccountRepository: Send + Sync {
    /// One-time bootstrap: claim the super_admin slot and create
    /// account + role assignment + profile as a single transaction.
    ///
    /// The claim is an atomic precondition at the store; when two
    /// bootstrap calls race, exactly one succeeds and the loser
    /// fails with `Conflict`.
    fn create_bootstrap(
        &self,
        input: NewAccount,
    ) -> impl Future<Output = GatehouseResult<Account>> + Send;

    /// Create account + role assignment + profile as a single
    /// transaction, so a half-created account cannot occur.
    fn create_with_role(
        &self,
        input: NewAccount,
        role: Role,
    ) -> impl Future<Output = GatehouseResult<Account>> + Send;

    fn get_by_id(&self, id: Uuid) -> impl Future<Output = GatehouseResult<Account>> + Send;

    fn get_by_email(&self, email: &str)
    -> impl Future<Output = GatehouseResult<Account>> + Send;

    /// Look up the account for `email` and verify `password` against
    /// its stored hash. An unknown email and a wrong password both
    /// fail with `Unauthenticated`, so callers cannot tell them apart.
    fn verify_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> impl Future<Output = GatehouseResult<Account>> + Send;
}

// ---------------------------------------------------------------------------
// Role assignments
// ---------------------------------------------------------------------------

pub trait RoleRepository: Send + Sync {
    /// All roles held by a principal. Empty when none assigned.
    fn roles_for(&self, user_id: Uuid) -> impl Future<Output = GatehouseResult<Vec<Role>>> + Send;

    /// Number of principals holding `role`.
    fn count_with_role(&self, role: Role) -> impl Future<Output = GatehouseResult<u64>> + Send;
}

// ---------------------------------------------------------------------------
// Profiles
// ---------------------------------------------------------------------------

pub trait ProfileRepository: Send + Sync {
    fn create(&self, input: CreateProfile)
    -> impl Future<Output = GatehouseResult<Profile>> + Send;

    fn get_by_user(&self, user_id: Uuid) -> impl Future<Output = GatehouseResult<Profile>> + Send;

    /// The single resident profile assigned to a flat.
    fn get_by_flat(&self, flat_number: &str)
    -> impl Future<Output = GatehouseResult<Profile>> + Send;

    /// Admin operation: set (or move) a resident's flat assignment.
    /// Fails with `Conflict` when another resident holds the flat,
    /// even under concurrent assignment.
    fn assign_flat(
        &self,
        user_id: Uuid,
        flat_number: &str,
    ) -> impl Future<Output = GatehouseResult<Profile>> + Send;

    fn list(
        &self,
        pagination: Pagination,
    ) -> impl Future<Output = GatehouseResult<PaginatedResult<Profile>>> + Send;
}

// ---------------------------------------------------------------------------
// Visitors
// ---------------------------------------------------------------------------

pub trait VisitorRepository: Send + Sync {
    fn create(&self, input: CreateVisitor)
    -> impl Future<Output = GatehouseResult<Visitor>> + Send;

    fn get_by_id(&self, id: Uuid) -> impl Future<Output = GatehouseResult<Visitor>> + Send;

    /// Compare-and-swap status transition: applies `from -> to` as a
    /// single conditional update. When `to` is `Approved`,
    /// `approved_at`/`approved_by` are stamped with `decided_by`.
    ///
    /// Fails with `InvalidTransition` if the record is no longer in
    /// `from`, or `NotFound` if it does not exist.
    fn transition(
        &self,
        id: Uuid,
        from: VisitorStatus,
        to: VisitorStatus,
        decided_by: Option<Uuid>,
    ) -> impl Future<Output = GatehouseResult<Visitor>> + Send;

    /// All visitors, newest first.
    fn list_all(
        &self,
        pagination: Pagination,
    ) -> impl Future<Output = GatehouseResult<PaginatedResult<Visitor>>> + Send;

    /// Visitors for one flat, newest first.
    fn list_by_flat(
        &self,
        flat_number: &str,
    ) -> impl Future<Output = GatehouseResult<Vec<Visitor>>> + Send;

    /// Most recent entries across all flats, newest first.
    fn list_recent(&self, limit: u64)
    -> impl Future<Output = GatehouseResult<Vec<Visitor>>> + Send;

    /// Still-approved pre-registrations for a flat, ordered by
    /// expected arrival time ascending.
    fn list_expected(
        &self,
        flat_number: &str,
    ) -> impl Future<Output = GatehouseResult<Vec<Visitor>>> + Send;
}
