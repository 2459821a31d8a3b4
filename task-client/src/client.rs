// task-client/src/client.rs
use common::{setup_tracing, Config};
use std::sync::Arc;

use crate::api::{AuthApi, TasksApi};
use crate::boundary::ProtectedBoundary;
use crate::credential_store::CredentialStore;
use crate::error::BuildError;
use crate::gateway::ApiGateway;
use crate::routes::Router;
use crate::session_guard::SessionGuard;
use crate::storage::LocalStorage;
use crate::views::{DashboardView, LoginView, RegisterView};

/// Wires storage, session guard, gateway and boundary together once per
/// process and hands out the pieces views need
pub struct TaskClient {
    config: Config,
    store: Arc<CredentialStore>,
    guard: Arc<SessionGuard>,
    gateway: Arc<ApiGateway>,
    boundary: ProtectedBoundary,
    router: Router,
}

impl TaskClient {
    /// Process entry point: load configuration, install tracing, open the
    /// persisted session
    pub fn bootstrap() -> Result<Self, BuildError> {
        let config = Config::from_env()?;
        setup_tracing(&config.log_level);

        tracing::info!("Starting task client against {}", config.api_base_url);
        Self::new(config)
    }

    /// Build a client persisting its session at `config.storage_path`
    pub fn new(config: Config) -> Result<Self, BuildError> {
        let storage = Arc::new(LocalStorage::open(&config.storage_path));
        Self::with_storage(config, storage)
    }

    pub fn with_storage(config: Config, storage: Arc<LocalStorage>) -> Result<Self, BuildError> {
        let store = Arc::new(CredentialStore::new(storage));
        let guard = Arc::new(SessionGuard::new(store.clone()));
        let gateway = Arc::new(ApiGateway::new(&config, guard.clone())?);
        let boundary = ProtectedBoundary::new(guard.clone());
        let router = Router::new(boundary.clone());

        Ok(Self {
            config,
            store,
            guard,
            gateway,
            boundary,
            router,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn credential_store(&self) -> &Arc<CredentialStore> {
        &self.store
    }

    pub fn session(&self) -> &Arc<SessionGuard> {
        &self.guard
    }

    pub fn gateway(&self) -> &Arc<ApiGateway> {
        &self.gateway
    }

    pub fn boundary(&self) -> &ProtectedBoundary {
        &self.boundary
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    pub fn auth(&self) -> AuthApi {
        AuthApi::new(self.gateway.clone(), self.guard.clone())
    }

    pub fn tasks(&self) -> TasksApi {
        TasksApi::new(self.gateway.clone())
    }

    pub fn login_view(&self) -> LoginView {
        LoginView::new(self.auth())
    }

    pub fn register_view(&self) -> RegisterView {
        RegisterView::new(self.auth())
    }

    pub fn dashboard_view(&self) -> DashboardView {
        DashboardView::new(self.boundary.clone(), self.tasks(), self.auth())
    }
}
