//! Request handlers.

mod accounts;
mod events;
mod health;
mod profiles;
mod sessions;
mod visitors;

pub use accounts::create_user;
pub use events::stream_events;
pub use health::health;
pub use profiles::{assign_flat, list_profiles};
pub use sessions::sign_in;
pub use visitors::{decide, expected_for_flat, list_visitors, log_entry, pre_register, revoke};
