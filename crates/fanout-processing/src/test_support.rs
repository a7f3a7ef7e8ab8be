//! Fixtures shared by the unit tests of this crate.

use std::collections::HashMap;
use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use fanout_storage::{ProvisionOutcome, RemoteStore, StorageError, StorageResult};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};

/// Encode a gradient image of the given size.
pub fn encoded_image(width: u32, height: u32, format: ImageFormat) -> Bytes {
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
    });
    let mut buf = Vec::new();
    let img = match format {
        ImageFormat::WebP => DynamicImage::ImageRgba8(DynamicImage::ImageRgb8(img).to_rgba8()),
        _ => DynamicImage::ImageRgb8(img),
    };
    img.write_to(&mut Cursor::new(&mut buf), format).unwrap();
    Bytes::from(buf)
}

/// In-memory remote store; keys containing `fail_on` are rejected.
#[derive(Default)]
pub struct MockRemoteStore {
    pub objects: Mutex<HashMap<String, (Bytes, String)>>,
    pub provision_calls: AtomicUsize,
    pub fail_on: Option<String>,
    pub fail_provisioning: bool,
    /// Latency of every put.
    pub put_delay: Option<Duration>,
    pub puts_started: AtomicUsize,
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

    pub fn started_puts(&self) -> usize {
        self.puts_started.load(Ordering::SeqCst)
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
        if self.fail_provisioning {
            return Err(StorageError::ProvisionFailed("access denied".to_string()));
        }
        Ok(ProvisionOutcome::AlreadyExists)
    }

    async fn put_public(
        &self,
        bucket: &str,
        key: &str,
        data: Bytes,
        content_type: &str,
    ) -> StorageResult<()> {
        self.puts_started.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.put_delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(pattern) = &self.fail_on {
            if key.contains(pattern.as_str()) {
                return Err(StorageError::UploadFailed(format!("simulated failure for {}", key)));
            }
        }
        self.objects.lock().unwrap().insert(
            format!("{}/{}", bucket, key),
            (data, content_type.to_string()),
        );
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "mock"
    }
}
