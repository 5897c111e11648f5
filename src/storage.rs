//! Durable storage for images pulled off recipe pages.
//!
//! The crate only defines the seam; the host application supplies the
//! object-store backend.

use crate::error::ScrapeError;
use crate::fetch::PageFetcher;
use async_trait::async_trait;
use log::info;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Length of the random part of generated object names
const RANDOM_SUFFIX_LEN: usize = 13;

/// An object store that keeps image bytes and hands back a URL for them
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Store `bytes` under `name` and return the URL they can be read from
    async fn put(&self, name: &str, bytes: Vec<u8>, content_type: &str) -> Result<String, ScrapeError>;
}

/// Unique object name of the form `imported-{unix_millis}-{random}.{extension}`
pub fn blob_name(extension: &str) -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis())
        .unwrap_or_default();
    let random = Uuid::new_v4().simple().to_string();
    format!(
        "imported-{millis}-{}.{extension}",
        &random[..RANDOM_SUFFIX_LEN]
    )
}

/// Download a remote image and copy it into `store`, returning its durable URL
pub async fn save_remote_image(
    fetcher: &PageFetcher,
    store: &dyn ImageStore,
    url: &str,
    max_bytes: usize,
) -> Result<String, ScrapeError> {
    let image = fetcher.fetch_image(url, max_bytes).await?;
    let name = blob_name(image.extension());
    let size = image.bytes.len();

    let stored_url = store.put(&name, image.bytes, &image.content_type).await?;
    info!("Stored {size} byte image from {url} as {name}");
    Ok(stored_url)
}

/// Bytes and type of an object held by [`MemoryImageStore`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// In-process [`ImageStore`] handing out `memory://` URLs
#[derive(Debug, Default)]
pub struct MemoryImageStore {
    objects: Mutex<HashMap<String, StoredObject>>,
}

impl MemoryImageStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<StoredObject> {
        self.objects.lock().ok()?.get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.objects.lock().map(|objects| objects.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ImageStore for MemoryImageStore {
    async fn put(&self, name: &str, bytes: Vec<u8>, content_type: &str) -> Result<String, ScrapeError> {
        let mut objects = self
            .objects
            .lock()
            .map_err(|_| ScrapeError::Storage("image store lock poisoned".to_string()))?;
        objects.insert(
            name.to_string(),
            StoredObject {
                bytes,
                content_type: content_type.to_string(),
            },
        );
        Ok(format!("memory://{name}"))
    }
}
