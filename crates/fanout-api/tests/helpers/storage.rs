use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;
use fanout_storage::{ProvisionOutcome, RemoteStore, StorageError, StorageResult};

/// In-memory remote store. Keys containing `fail_on` are rejected.
#[derive(Default)]
pub struct MockRemoteStore {
    objects: Mutex<HashMap<String, String>>,
    provision_calls: AtomicUsize,
    fail_on: Option<String>,
}

impl MockRemoteStore {
    pub fn failing_on(pattern: &str) -> Self {
        Self {
            fail_on: Some(pattern.to_string()),
            ..Default::default()
        }
    }

    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<_> = self.objects.lock().unwrap().keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn content_type(&self, key: &str) -> Option<String> {
        self.objects.lock().unwrap().get(key).cloned()
    }

    pub fn provision_count(&self) -> usize {
        self.provision_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RemoteStore for MockRemoteStore {
    async fn ensure_namespace(
        &self,
        _bucket: &str,
        _namespace: &str,
    ) -> StorageResult<ProvisionOutcome> {
        self.provision_calls.fetch_add(1, Ordering::SeqCst);
        Ok(ProvisionOutcome::Created)
    }

    async fn put_public(
        &self,
        bucket: &str,
        key: &str,
        _data: Bytes,
        content_type: &str,
    ) -> StorageResult<()> {
        if let Some(pattern) = &self.fail_on {
            if key.contains(pattern.as_str()) {
                return Err(StorageError::UploadFailed(format!("simulated failure for {}", key)));
            }
        }
        self.objects
            .lock()
            .unwrap()
            .insert(format!("{}/{}", bucket, key), content_type.to_string());
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "mock"
    }
}
