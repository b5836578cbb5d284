use std::sync::Arc;

use anyhow::Result;

use crate::auth::AuthManager;
use crate::config::Config;
use crate::gateway::router::RouteTable;
use crate::gateway::service_client::ServiceClient;

/// Application context containing shared dependencies.
///
/// Built once at startup and read-only afterwards, so request tasks share it
/// through an `Arc` with no locking.
pub struct AppContext {
    pub config: Arc<Config>,
    pub routes: RouteTable,
    pub auth_manager: Arc<AuthManager>,
    pub service_client: ServiceClient,
}

impl AppContext {
    /// Creates a new application context
    pub fn new(config: Arc<Config>) -> Result<Self> {
        let routes = RouteTable::from_config(&config)?;
        let auth_manager = Arc::new(AuthManager::new(&config)?);
        let service_client = ServiceClient::new();

        Ok(Self {
            config,
            routes,
            auth_manager,
            service_client,
        })
    }
}
