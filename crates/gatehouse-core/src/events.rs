//! Change-feed abstraction.
//!
//! Dashboards refresh by subscribing to table mutations. The feed is
//! fan-out notification only — never a source of truth. Consumers
//! must tolerate lag and re-fetch current state on every event.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChangeOp {
    Create,
    Update,
    Delete,
}

/// A single table mutation, keyed by table and flat filter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub table: String,
    pub op: ChangeOp,
    pub record_id: Uuid,
    /// Flat the record belongs to, for per-flat dashboard filters.
    pub flat_number: Option<String>,
}

impl ChangeEvent {
    /// True if this event falls under a table(+flat) subscription.
    pub fn matches(&self, table: &str, flat_number: Option<&str>) -> bool {
        self.table == table
            && match flat_number {
                Some(flat) => self.flat_number.as_deref() == Some(flat),
                None => true,
            }
    }
}

/// Publisher side of the change feed.
pub trait ChangeFeed: Send + Sync {
    fn publish(&self, event: ChangeEvent);
}

/// In-process broadcast-backed feed.
///
/// Publishing never blocks and never fails: events sent with no
/// live subscriber are dropped.
#[derive(Clone)]
pub struct BroadcastFeed {
    tx: broadcast::Sender<ChangeEvent>,
}

impl BroadcastFeed {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.tx.subscribe()
    }
}

impl Default for BroadcastFeed {
    fn default() -> Self {
        Self::new(256)
    }
}

impl ChangeFeed for BroadcastFeed {
    fn publish(&self, event: ChangeEvent) {
        let _ = self.tx.send(event);
    }
}

/// Feed that drops every event. For callers with no dashboards.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullFeed;

impl ChangeFeed for NullFeed {
    fn publish(&self, _event: ChangeEvent) {}
}
