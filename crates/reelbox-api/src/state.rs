//! Application state shared by handlers and middleware.

use crate::auth::{AuthState, RouteTable};
use crate::services::ingest::{IngestLimits, IngestionCoordinator};
use reelbox_core::{Config, DeliveryResolver};
use reelbox_db::MetadataStore;
use reelbox_storage::StorageClient;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub ingest: Arc<IngestionCoordinator>,
    pub store: Arc<dyn MetadataStore>,
    pub storage: Arc<dyn StorageClient>,
    pub delivery: DeliveryResolver,
    pub auth: Arc<AuthState>,
    /// Cancelled on process shutdown; requests work on child tokens
    pub shutdown: CancellationToken,
}

impl AppState {
    /// Wire the collaborators built during setup into one state value.
    pub fn new(
        config: Config,
        storage: Arc<dyn StorageClient>,
        store: Arc<dyn MetadataStore>,
        shutdown: CancellationToken,
    ) -> Self {
        let ingest = Arc::new(IngestionCoordinator::new(
            storage.clone(),
            store.clone(),
            IngestLimits::from_config(&config),
        ));
        let delivery = DeliveryResolver::new(
            config.delivery_base_url(),
            config.storage_cloud_name().unwrap_or_default(),
        );
        let auth = Arc::new(AuthState::new(
            config.jwt_secret(),
            Arc::new(RouteTable::default_table()),
        ));

        Self {
            config,
            ingest,
            store,
            storage,
            delivery,
            auth,
            shutdown,
        }
    }

    /// Token for one request; fires when the process shuts down.
    pub fn request_token(&self) -> CancellationToken {
        self.shutdown.child_token()
    }
}
