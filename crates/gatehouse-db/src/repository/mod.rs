//! SurrealDB repository implementations.

mod account;
mod profile;
mod role;
mod visitor;

pub use account::{SurrealAccountRepository, verify_password};
pub use profile::SurrealProfileRepository;
pub use role::SurrealRoleRepository;
pub use visitor::SurrealVisitorRepository;
