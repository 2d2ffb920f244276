//! GATEHOUSE Core — domain models, repository traits, authorization
//! context, and the error taxonomy shared across all crates.

pub mod context;
pub mod error;
pub mod events;
pub mod models;
pub mod repository;

pub use context::AuthorizationContext;
pub use error::{GatehouseError, GatehouseResult};
