//! Account domain model — the identity-provider record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for account creation.
///
/// Profile fields travel with the account input because account,
/// role assignment, and profile are created as a single unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAccount {
    pub email: String,
    /// Raw password (hashed with Argon2id before storage).
    pub password: String,
    pub full_name: Option<String>,
    pub phone_number: Option<String>,
    pub flat_number: Option<String>,
}
