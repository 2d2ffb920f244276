//! GATEHOUSE Auth — sign-in, JWT issuance and validation, role
//! resolution, and account provisioning policy.
//!
//! Password hashing lives with the account store; this crate only
//! sees the verification outcome through [`AccountRepository`].
//!
//! [`AccountRepository`]: gatehouse_core::repository::AccountRepository

pub mod config;
pub mod error;
pub mod provisioning;
pub mod roles;
pub mod service;
pub mod token;

pub use config::AuthConfig;
pub use error::AuthError;
pub use provisioning::{CreateAccountRequest, ProvisionedAccount, ProvisioningAuthority};
pub use roles::RoleResolver;
pub use service::{AuthService, SignInInput, SignInOutput};
pub use token::AccessTokenClaims;
