pub mod fixtures;
pub mod storage;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use axum_test::TestServer;
use fanout_api::setup::services::{build_state, setup_local_areas};
use fanout_api::{setup_routes, AppState};
use fanout_core::{Config, LocalUploadConfig, RemoteConfig, UploadLimits};
use fanout_storage::RemoteStore;
use tempfile::TempDir;

use storage::MockRemoteStore;

pub const TEST_BUCKET: &str = "test-bucket";

/// Test application state
pub struct TestApp {
    pub server: TestServer,
    pub state: Arc<AppState>,
    pub remote: Arc<MockRemoteStore>,
    pub temp_dir: TempDir,
}

impl TestApp {
    /// Get the HTTP test client
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    pub fn services_dir(&self) -> PathBuf {
        self.temp_dir.path().join("service")
    }

    /// Every file written below the local services area
    pub fn local_artifacts(&self) -> Vec<PathBuf> {
        let mut files = Vec::new();
        collect_files(&self.services_dir(), &mut files);
        files.sort();
        files
    }

    /// Poll until the mock store holds `count` objects (fire-and-forget puts).
    pub async fn wait_for_remote_objects(&self, count: usize) -> Vec<String> {
        for _ in 0..100 {
            if self.remote.keys().len() >= count {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        self.remote.keys()
    }
}

fn collect_files(dir: &Path, out: &mut Vec<PathBuf>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_files(&path, out);
        } else {
            out.push(path);
        }
    }
}

pub fn test_config(temp_dir: &TempDir, wait_for_remote: bool) -> Config {
    Config {
        server_port: 0,
        environment: "test".to_string(),
        cors_origins: vec!["*".to_string()],
        remote: RemoteConfig {
            enabled: true,
            access_key_id: None,
            secret_access_key: None,
            region: "ap-south-1".to_string(),
            endpoint: None,
            bucket: TEST_BUCKET.to_string(),
        },
        local: LocalUploadConfig {
            enabled: true,
            users_dir: temp_dir.path().join("users"),
            services_dir: temp_dir.path().join("service"),
            log_dir: None,
        },
        limits: UploadLimits {
            wait_for_remote,
            ..UploadLimits::default()
        },
        filename_secret: b"integration-test-secret".to_vec(),
    }
}

/// Setup a test application backed by a temp directory and an in-memory remote store
pub async fn setup_test_app() -> TestApp {
    setup_test_app_with(false, MockRemoteStore::default()).await
}

pub async fn setup_test_app_with(wait_for_remote: bool, remote: MockRemoteStore) -> TestApp {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config = test_config(&temp_dir, wait_for_remote);
    let remote = Arc::new(remote);

    let local = setup_local_areas(&config)
        .await
        .expect("Failed to create local areas");
    let state = build_state(
        config.clone(),
        local,
        Some(remote.clone() as Arc<dyn RemoteStore>),
    )
    .expect("Failed to build state");
    let router = setup_routes(&config, state.clone()).expect("Failed to setup routes");
    let server = TestServer::new(router).expect("Failed to start test server");

    TestApp {
        server,
        state,
        remote,
        temp_dir,
    }
}
