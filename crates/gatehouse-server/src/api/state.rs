//! Shared application state for API handlers.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use gatehouse_access::VisitorLifecycleManager;
use gatehouse_auth::config::AuthConfig;
use gatehouse_auth::provisioning::ProvisioningAuthority;
use gatehouse_auth::roles::RoleResolver;
use gatehouse_auth::service::AuthService;
use gatehouse_core::events::BroadcastFeed;
use gatehouse_db::DbManager;
use gatehouse_db::repository::{
    SurrealAccountRepository, SurrealProfileRepository, SurrealRoleRepository,
    SurrealVisitorRepository,
};
use surrealdb::engine::remote::ws::Client;

pub type Provisioning =
    ProvisioningAuthority<SurrealAccountRepository<Client>, SurrealRoleRepository<Client>>;
pub type Auth = AuthService<SurrealAccountRepository<Client>>;
pub type Resolver = RoleResolver<SurrealRoleRepository<Client>>;
pub type Visitors = VisitorLifecycleManager<
    SurrealVisitorRepository<Client>,
    SurrealProfileRepository<Client>,
    BroadcastFeed,
>;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub provisioning: Arc<Provisioning>,
    pub auth: Arc<Auth>,
    pub resolver: Arc<Resolver>,
    pub visitors: Arc<Visitors>,
    pub profiles: Arc<SurrealProfileRepository<Client>>,
    pub db: DbManager,
    /// Change feed; SSE subscribers hang off this.
    pub feed: BroadcastFeed,
    pub auth_config: AuthConfig,
    pub version: String,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(manager: DbManager, auth_config: AuthConfig) -> Self {
        let db = manager.client().clone();
        let feed = BroadcastFeed::new(1024);

        let account_repo = match &auth_config.pepper {
            Some(pepper) => SurrealAccountRepository::with_pepper(db.clone(), pepper.clone()),
            None => SurrealAccountRepository::new(db.clone()),
        };

        let provisioning = Arc::new(ProvisioningAuthority::new(
            account_repo.clone(),
            SurrealRoleRepository::new(db.clone()),
            auth_config.clone(),
        ));
        let auth = Arc::new(AuthService::new(account_repo, auth_config.clone()));
        let resolver = Arc::new(RoleResolver::new(SurrealRoleRepository::new(db.clone())));
        let visitors = Arc::new(VisitorLifecycleManager::new(
            SurrealVisitorRepository::new(db.clone()),
            SurrealProfileRepository::new(db.clone()),
            feed.clone(),
        ));
        let profiles = Arc::new(SurrealProfileRepository::new(db.clone()));

        Self {
            provisioning,
            auth,
            resolver,
            visitors,
            profiles,
            db: manager,
            feed,
            auth_config,
            version: env!("CARGO_PKG_VERSION").to_string(),
            started_at: Utc::now(),
        }
    }
}
