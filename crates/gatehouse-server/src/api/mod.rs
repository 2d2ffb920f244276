//! HTTP API: router, state, handlers, and error mapping.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use router::create_router;
pub use state::AppState;
