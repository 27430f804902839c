use crate::abstract_trait::PermissionCacheTrait;
use async_trait::async_trait;
use deadpool_redis::{Connection, Pool, redis::AsyncCommands};
use std::time::Duration;
use tracing::{debug, error};

#[derive(Clone)]
pub struct RedisPermissionCache {
    pool: Pool,
}

impl RedisPermissionCache {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    async fn get_conn(&self) -> Option<Connection> {
        match self.pool.get().await {
            Ok(conn) => Some(conn),
            Err(e) => {
                error!("Failed to get Redis connection from pool: {:?}", e);
                None
            }
        }
    }
}

#[async_trait]
impl PermissionCacheTrait for RedisPermissionCache {
    async fn get_permissions(&self, key: &str) -> Option<Vec<String>> {
        let mut conn = self.get_conn().await?;
        let result: Result<Option<String>, _> = conn.get(key).await;

        match result {
            Ok(Some(data)) => match serde_json::from_str::<Vec<String>>(&data) {
                Ok(permissions) => Some(permissions),
                Err(e) => {
                    error!("Failed to deserialize cached permissions: {:?}", e);
                    None
                }
            },
            Ok(None) => {
                debug!("Permission cache miss: {}", key);
                None
            }
            Err(e) => {
                error!("Redis get error for {}: {:?}", key, e);
                None
            }
        }
    }

    async fn set_permissions(&self, key: &str, permissions: &[String], ttl: Duration) -> bool {
        let json_data = match serde_json::to_string(permissions) {
            Ok(json) => json,
            Err(e) => {
                error!("Failed to serialize permissions: {:?}", e);
                return false;
            }
        };

        let Some(mut conn) = self.get_conn().await else {
            return false;
        };

        let result: Result<(), _> = conn.set_ex(key, &json_data, ttl.as_secs().max(1)).await;

        match result {
            Ok(_) => {
                debug!("Cached permissions under {}", key);
                true
            }
            Err(e) => {
                error!("Failed to cache permissions: {:?}", e);
                false
            }
        }
    }

    async fn delete_permissions(&self, key: &str) -> bool {
        let Some(mut conn) = self.get_conn().await else {
            return false;
        };

        let result: Result<(), _> = conn.del(key).await;
        match result {
            Ok(_) => {
                debug!("Deleted cached permissions: {}", key);
                true
            }
            Err(e) => {
                error!("Failed to delete cached permissions {}: {:?}", key, e);
                false
            }
        }
    }
}
