use crate::{
    abstract_trait::DynPermissionCache,
    cache::{MemoryPermissionCache, RedisPermissionCache},
    config::Config,
    di::DependenciesInject,
    menu::{CONSOLE_MENU, MenuSection},
    resolver::PermissionResolver,
    service::build_http_client,
};
use anyhow::{Context, Result};
use prometheus_client::registry::Registry;
use shared::{
    abstract_trait::DynJwtService,
    config::{JwtConfig, RedisClient, RedisConfig},
};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

#[derive(Clone)]
pub struct AppState {
    pub jwt_config: DynJwtService,
    pub resolver: Arc<PermissionResolver>,
    pub di_container: DependenciesInject,
    pub registry: Arc<Mutex<Registry>>,
    pub menu: &'static [MenuSection],
    pub secure_cookies: bool,
}

impl AppState {
    pub async fn new(config: &Config) -> Result<Self> {
        let jwt_config = Arc::new(JwtConfig::new(&config.jwt_secret)) as DynJwtService;
        let mut registry = Registry::default();

        let http = build_http_client(config.api_timeout)?;
        let di_container = DependenciesInject::new(http, &config.api_base_url, &mut registry);

        let cache: DynPermissionCache = match &config.redis_url {
            Some(url) => {
                info!("Initializing Redis connection for the permission cache");
                let redis = RedisClient::new(&RedisConfig::new(url.clone()))
                    .context("Failed to connect to Redis")?;

                redis.ping().await.context("Failed to ping Redis server")?;

                Arc::new(RedisPermissionCache::new(redis.pool.clone()))
            }
            None => {
                info!("REDIS_URL not set, caching permissions in memory");
                Arc::new(MemoryPermissionCache::new())
            }
        };

        let resolver = PermissionResolver::new(
            di_container.role_client.clone(),
            cache,
            config.permission_cache_ttl,
        );

        #[cfg(feature = "test-mode")]
        let resolver = if config.test_mode {
            resolver.with_test_bypass()
        } else {
            resolver
        };

        Ok(Self::from_parts(
            jwt_config,
            di_container,
            Arc::new(resolver),
            registry,
            config.secure_cookies,
        ))
    }

    pub fn from_parts(
        jwt_config: DynJwtService,
        di_container: DependenciesInject,
        resolver: Arc<PermissionResolver>,
        registry: Registry,
        secure_cookies: bool,
    ) -> Self {
        Self {
            jwt_config,
            resolver,
            di_container,
            registry: Arc::new(Mutex::new(registry)),
            menu: CONSOLE_MENU,
            secure_cookies,
        }
    }
}
