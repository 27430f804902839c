use async_trait::async_trait;
use std::{sync::Arc, time::Duration};

pub type DynPermissionCache = Arc<dyn PermissionCacheTrait + Send + Sync>;

#[async_trait]
pub trait PermissionCacheTrait {
    async fn get_permissions(&self, key: &str) -> Option<Vec<String>>;
    async fn set_permissions(&self, key: &str, permissions: &[String], ttl: Duration) -> bool;
    async fn delete_permissions(&self, key: &str) -> bool;
}
