//! GATEHOUSE Access — the visitor entry lifecycle.
//!
//! Every operation takes an explicit [`AuthorizationContext`] and
//! performs its own scope checks; there is no ambient row-level
//! policy layer underneath.
//!
//! [`AuthorizationContext`]: gatehouse_core::AuthorizationContext

mod lifecycle;

pub use lifecycle::{ListScope, VisitorLifecycleManager};
