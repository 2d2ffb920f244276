//! SurrealDB implementation of [`AccountRepository`].
//!
//! Password hashing uses Argon2id with OWASP-recommended parameters
//! (memory: 19 MiB, iterations: 2, parallelism: 1). Salt is randomly
//! generated per hash. An optional pepper (server-side secret) can be
//! provided at construction time.
//!
//! Account, role assignment, and profile are always created inside
//! one store transaction; the bootstrap path additionally claims a
//! fixed-id lock record so concurrent bootstraps cannot both succeed.

use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHasher};
use chrono::{DateTime, Utc};
use gatehouse_core::error::{GatehouseError, GatehouseResult};
use gatehouse_core::models::account::{Account, NewAccount};
use gatehouse_core::models::role::Role;
use gatehouse_core::repository::AccountRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct AccountRow {
    email: String,
    password_hash: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct AccountRowWithId {
    record_id: String,
    email: String,
    password_hash: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl AccountRow {
    fn into_account(self, id: Uuid) -> Account {
        Account {
            id,
            email: self.email,
            password_hash: self.password_hash,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl AccountRowWithId {
    fn try_into_account(self) -> Result<Account, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Decode(format!("invalid UUID: {e}")))?;
        Ok(Account {
            id,
            email: self.email,
            password_hash: self.password_hash,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Hash a password with Argon2id using OWASP-recommended parameters.
///
/// If a pepper is provided, it is prepended to the password before
/// hashing. The salt is randomly generated for each call.
fn hash_password(password: &str, pepper: Option<&str>) -> Result<String, DbError> {
    // OWASP ASVS recommended: m=19456 (19 MiB), t=2, p=1
    let params = argon2::Params::new(19456, 2, 1, None)
        .map_err(|e| DbError::Decode(format!("argon2 params error: {e}")))?;
    let argon2 = Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params);

    let peppered: String;
    let input = match pepper {
        Some(p) => {
            peppered = format!("{p}{password}");
            peppered.as_bytes()
        }
        None => password.as_bytes(),
    };

    let salt = SaltString::generate(&mut argon2::password_hash::rand_core::OsRng);
    let hash = argon2
        .hash_password(input, &salt)
        .map_err(|e| DbError::Decode(format!("password hash error: {e}")))?;

    Ok(hash.to_string())
}

/// SurrealDB implementation of the Account repository.
#[derive(Clone)]
pub struct SurrealAccountRepository<C: Connection> {
    db: Surreal<C>,
    /// Optional server-side pepper for password hashing.
    pepper: Option<String>,
}

impl<C: Connection> SurrealAccountRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db, pepper: None }
    }

    pub fn with_pepper(db: Surreal<C>, pepper: String) -> Self {
        Self {
            db,
            pepper: Some(pepper),
        }
    }

    /// Run the account + role + profile creation transaction.
    ///
    /// When `claim_bootstrap_lock` is set, the transaction first
    /// creates the fixed-id `bootstrap_lock:super_admin` record;
    /// a duplicate claim fails the whole transaction.
    async fn create_account_txn(
        &self,
        input: NewAccount,
        role: Role,
        claim_bootstrap_lock: bool,
    ) -> GatehouseResult<Account> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let password_hash = hash_password(&input.password, self.pepper.as_deref())?;

        let lock_stmt = if claim_bootstrap_lock {
            "CREATE type::record('bootstrap_lock', 'super_admin') \
             SET claimed_by = $id; "
        } else {
            ""
        };

        // A requested flat is claimed inside the same transaction, so
        // provisioning a resident into an occupied flat fails whole.
        let flat_claim_stmt = if input.flat_number.is_some() {
            "CREATE type::record('flat_claim', $flat_number) SET user_id = $id; "
        } else {
            ""
        };

        let query = format!(
            "BEGIN TRANSACTION; \
             {lock_stmt}\
             {flat_claim_stmt}\
             CREATE type::record('account', $id) SET \
             email = $email, password_hash = $password_hash; \
             CREATE user_role SET user_id = $id, role = $role; \
             CREATE type::record('profile', $id) SET \
             user_id = $id, \
             full_name = $full_name, \
             phone_number = $phone_number, \
             flat_number = $flat_number; \
             COMMIT TRANSACTION;"
        );

        let result = self
            .db
            .query(query)
            .bind(("id", id_str.clone()))
            .bind(("email", input.email))
            .bind(("password_hash", password_hash))
            .bind(("role", role.as_str().to_string()))
            .bind(("full_name", input.full_name.unwrap_or_default()))
            .bind(("phone_number", input.phone_number.unwrap_or_default()))
            .bind(("flat_number", input.flat_number))
            .await
            .map_err(DbError::from)?;

        result.check().map_err(DbError::from_query_failure)?;

        // Re-read rather than untangle per-statement transaction output.
        self.get_by_id(id).await
    }
}

impl<C: Connection> AccountRepository for SurrealAccountRepository<C> {
    async fn create_bootstrap(&self, input: NewAccount) -> GatehouseResult<Account> {
        self.create_account_txn(input, Role::SuperAdmin, true).await
    }

    async fn create_with_role(&self, input: NewAccount, role: Role) -> GatehouseResult<Account> {
        self.create_account_txn(input, role, false).await
    }

    async fn get_by_id(&self, id: Uuid) -> GatehouseResult<Account> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('account', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<AccountRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "account".into(),
            id: id_str,
        })?;

        Ok(row.into_account(id))
    }

    async fn get_by_email(&self, email: &str) -> GatehouseResult<Account> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM account \
                 WHERE email = $email",
            )
            .bind(("email", email.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<AccountRowWithId> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "account".into(),
            id: format!("email={email}"),
        })?;

        Ok(row.try_into_account()?)
    }

    async fn verify_credentials(&self, email: &str, password: &str) -> GatehouseResult<Account> {
        let account = match self.get_by_email(email).await {
            Ok(account) => account,
            Err(GatehouseError::NotFound { .. }) => {
                return Err(GatehouseError::Unauthenticated {
                    reason: "invalid credentials".into(),
                });
            }
            Err(other) => return Err(other),
        };

        let valid = verify_password(password, &account.password_hash, self.pepper.as_deref())?;
        if !valid {
            return Err(GatehouseError::Unauthenticated {
                reason: "invalid credentials".into(),
            });
        }

        Ok(account)
    }
}

/// Verify a password against an Argon2id hash.
pub fn verify_password(password: &str, hash: &str, pepper: Option<&str>) -> Result<bool, DbError> {
    use argon2::PasswordVerifier;

    let peppered: String;
    let input = match pepper {
        Some(p) => {
            peppered = format!("{p}{password}");
            peppered.as_bytes()
        }
        None => password.as_bytes(),
    };

    let parsed_hash = argon2::PasswordHash::new(hash)
        .map_err(|e| DbError::Decode(format!("invalid hash format: {e}")))?;

    let argon2 = Argon2::default();
    match argon2.verify_password(input, &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(DbError::Decode(format!("verify error: {e}"))),
    }
}
