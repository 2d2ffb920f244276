//! Error types for the GATEHOUSE system.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatehouseError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("Invalid status transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },

    #[error("Unauthenticated: {reason}")]
    Unauthenticated { reason: String },

    #[error("Forbidden: {reason}")]
    Forbidden { reason: String },

    #[error("Policy violation: {message}")]
    PolicyViolation { message: String },

    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Store error: {0}")]
    Store(String),

    #[error("Cryptography error: {0}")]
    Crypto(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type GatehouseResult<T> = Result<T, GatehouseError>;
