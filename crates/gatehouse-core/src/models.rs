//! Domain models for GATEHOUSE.
//!
//! These are the core types shared across all crates.

pub mod account;
pub mod profile;
pub mod role;
pub mod visitor;
