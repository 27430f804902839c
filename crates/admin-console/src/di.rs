use crate::{
    abstract_trait::{DynAuthApiClient, DynRoleApiClient},
    service::{AuthApiClientService, RoleApiClientService},
};
use prometheus_client::registry::Registry;
use std::sync::Arc;

#[derive(Clone)]
pub struct DependenciesInject {
    pub auth_client: DynAuthApiClient,
    pub role_client: DynRoleApiClient,
}

impl std::fmt::Debug for DependenciesInject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DependenciesInject")
            .field("auth_client", &"DynAuthApiClient")
            .field("role_client", &"DynRoleApiClient")
            .finish()
    }
}

impl DependenciesInject {
    pub fn new(http: reqwest::Client, api_base_url: &str, registry: &mut Registry) -> Self {
        let auth_client: DynAuthApiClient = Arc::new(AuthApiClientService::new(
            http.clone(),
            api_base_url,
            registry,
        ));

        let role_client: DynRoleApiClient =
            Arc::new(RoleApiClientService::new(http, api_base_url, registry));

        Self {
            auth_client,
            role_client,
        }
    }
}
