//! Profile domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    /// Same id as the owning account.
    pub user_id: Uuid,
    pub full_name: String,
    pub phone_number: String,
    /// Optional until an admin assigns one. Operations that need the
    /// caller's flat fail with `NotFound` while unassigned.
    pub flat_number: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProfile {
    pub user_id: Uuid,
    pub full_name: String,
    pub phone_number: String,
    pub flat_number: Option<String>,
}
