use crate::abstract_trait::PermissionCacheTrait;
use async_trait::async_trait;
use std::{collections::HashMap, time::Duration};
use tokio::{sync::RwLock, time::Instant};
use tracing::debug;

/// In-process TTL cache, used when no Redis is configured.
///
/// Expired entries are evicted lazily on read.
#[derive(Default)]
pub struct MemoryPermissionCache {
    entries: RwLock<HashMap<String, (Instant, Vec<String>)>>,
}

impl MemoryPermissionCache {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PermissionCacheTrait for MemoryPermissionCache {
    async fn get_permissions(&self, key: &str) -> Option<Vec<String>> {
        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                Some((expires_at, permissions)) if Instant::now() < *expires_at => {
                    return Some(permissions.clone());
                }
                Some(_) => {}
                None => return None,
            }
        }

        debug!("Evicting expired permissions for {key}");
        self.entries.write().await.remove(key);
        None
    }

    async fn set_permissions(&self, key: &str, permissions: &[String], ttl: Duration) -> bool {
        self.entries.write().await.insert(
            key.to_string(),
            (Instant::now() + ttl, permissions.to_vec()),
        );
        true
    }

    async fn delete_permissions(&self, key: &str) -> bool {
        self.entries.write().await.remove(key).is_some()
    }
}
