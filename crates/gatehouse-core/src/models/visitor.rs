//! Visitor domain model and entry state machine.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Visitor entry status. Closed set; `Denied` is terminal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum VisitorStatus {
    Pending,
    Approved,
    Denied,
}

impl VisitorStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VisitorStatus::Pending => "pending",
            VisitorStatus::Approved => "approved",
            VisitorStatus::Denied => "denied",
        }
    }

    /// Legal edges: pending -> approved, pending -> denied,
    /// approved -> denied. Nothing leaves `denied`, and `approved`
    /// never returns to `pending`.
    pub fn allows(&self, to: VisitorStatus) -> bool {
        matches!(
            (self, to),
            (VisitorStatus::Pending, VisitorStatus::Approved)
                | (VisitorStatus::Pending, VisitorStatus::Denied)
                | (VisitorStatus::Approved, VisitorStatus::Denied)
        )
    }
}

impl fmt::Display for VisitorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resident's decision on a pending entry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Approved,
    Denied,
}

impl Decision {
    pub fn status(&self) -> VisitorStatus {
        match self {
            Decision::Approved => VisitorStatus::Approved,
            Decision::Denied => VisitorStatus::Denied,
        }
    }
}

/// One record per physical-access request. Created once, then only
/// the status (and approval stamps) transition; never hard-deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Visitor {
    pub id: Uuid,
    pub visitor_name: String,
    pub visitor_phone: String,
    pub purpose: String,
    pub flat_number: String,
    /// Resident who owns the approval decision.
    pub resident_id: Uuid,
    /// Creator: the guard who logged the entry, or the resident who
    /// pre-registered it.
    pub logged_by: Uuid,
    pub status: VisitorStatus,
    /// Set only for pre-registrations.
    pub expected_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    /// Stamped on transition into `approved`.
    pub approved_at: Option<DateTime<Utc>>,
    pub approved_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Caller-supplied visitor details, shared by the guard log flow and
/// the resident pre-registration flow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisitorInfo {
    pub visitor_name: String,
    pub visitor_phone: String,
    pub purpose: String,
    pub notes: Option<String>,
}

/// Fully-resolved creation input for the visitor store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateVisitor {
    pub visitor_name: String,
    pub visitor_phone: String,
    pub purpose: String,
    pub flat_number: String,
    pub resident_id: Uuid,
    pub logged_by: Uuid,
    pub status: VisitorStatus,
    pub expected_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub approved_at: Option<DateTime<Utc>>,
    pub approved_by: Option<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_three_edges_are_legal() {
        use VisitorStatus::*;
        let all = [Pending, Approved, Denied];
        for from in all {
            for to in all {
                let legal = matches!(
                    (from, to),
                    (Pending, Approved) | (Pending, Denied) | (Approved, Denied)
                );
                assert_eq!(from.allows(to), legal, "{from} -> {to}");
            }
        }
    }

    #[test]
    fn denied_is_terminal() {
        assert!(!VisitorStatus::Denied.allows(VisitorStatus::Pending));
        assert!(!VisitorStatus::Denied.allows(VisitorStatus::Approved));
        assert!(!VisitorStatus::Denied.allows(VisitorStatus::Denied));
    }

    #[test]
    fn approved_never_returns_to_pending() {
        assert!(!VisitorStatus::Approved.allows(VisitorStatus::Pending));
    }
}
