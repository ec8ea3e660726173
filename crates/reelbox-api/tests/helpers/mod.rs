//! Test helpers: build AppState and router for integration tests.
//!
//! Run from workspace root: `cargo test -p reelbox-api`. The app runs on the in-memory
//! metadata store, so no database is needed.

#![allow(dead_code)]

pub mod auth;
pub mod storage;

use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use reelbox_api::setup::routes;
use reelbox_api::AppState;
use reelbox_core::{BaseConfig, Config, MetadataBackend, ServiceConfig, StorageBackend};
use reelbox_db::{InMemoryMediaRepository, MetadataStore};
use reelbox_storage::StorageClient;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use self::storage::StubStorage;

pub const MIB: usize = 1024 * 1024;

/// Test application: server plus handles on its collaborators.
pub struct TestApp {
    pub server: TestServer,
    pub state: Arc<AppState>,
    pub storage: Arc<StubStorage>,
    pub store: Arc<InMemoryMediaRepository>,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }
}

/// App with a call-counting storage stub and an empty in-memory store.
pub fn setup_test_app() -> TestApp {
    setup_test_app_with_storage(StubStorage::new())
}

pub fn setup_test_app_with_storage(stub: StubStorage) -> TestApp {
    let storage = Arc::new(stub);
    let store = Arc::new(InMemoryMediaRepository::new());
    let server = build_server(storage.clone(), store.clone());
    TestApp {
        state: server.1,
        server: server.0,
        storage,
        store,
    }
}

/// Server over arbitrary collaborators.
pub fn build_server(
    storage: Arc<dyn StorageClient>,
    store: Arc<dyn MetadataStore>,
) -> (TestServer, Arc<AppState>) {
    let config = test_config();
    let state = Arc::new(AppState::new(
        config.clone(),
        storage,
        store,
        CancellationToken::new(),
    ));
    let app = routes::setup_routes(&config, state.clone()).expect("Failed to setup routes");
    let server = TestServer::new(app.into_make_service()).expect("Failed to create test server");
    (server, state)
}

pub fn test_config() -> Config {
    let base = BaseConfig {
        server_port: 4000,
        cors_origins: vec!["*".to_string()],
        environment: "test".to_string(),
        jwt_secret: auth::TEST_JWT_SECRET.to_string(),
        log_format: "pretty".to_string(),
    };
    Config(Box::new(ServiceConfig {
        base,
        metadata_backend: MetadataBackend::Memory,
        database_url: None,
        db_max_connections: 5,
        db_timeout_seconds: 30,
        storage_backend: StorageBackend::Local,
        storage_cloud_name: Some("demo".to_string()),
        storage_api_key: None,
        storage_api_secret: None,
        storage_api_base: "http://127.0.0.1:9".to_string(),
        delivery_base_url: "https://res.example.com".to_string(),
        storage_folder: "reelbox".to_string(),
        local_storage_path: "/tmp/reelbox-test".to_string(),
        max_video_size_bytes: 70 * MIB,
        max_image_size_bytes: 10 * MIB,
        max_request_body_bytes: 150 * MIB,
        storage_upload_timeout_secs: 30,
        compensating_delete_enabled: true,
        http_concurrency_limit: 64,
    }))
}

/// Video upload form with every field the upload page sends.
pub fn video_form(size: usize, title: &str) -> MultipartForm {
    MultipartForm::new()
        .add_text("title", title)
        .add_text("declaredOriginalSize", size.to_string())
        .add_part(
            "file",
            Part::bytes(vec![0u8; size])
                .file_name("clip.mp4")
                .mime_type("video/mp4"),
        )
}

/// Image form as sent by the social-share page: the file only.
pub fn image_form(size: usize, file_name: &str) -> MultipartForm {
    MultipartForm::new().add_part(
        "file",
        Part::bytes(vec![0u8; size])
            .file_name(file_name)
            .mime_type("image/png"),
    )
}
