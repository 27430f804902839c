use crate::domain::PermissionRecord;
use async_trait::async_trait;
use shared::errors::ServiceError;
use std::sync::Arc;

pub type DynRoleApiClient = Arc<dyn RoleApiClientTrait + Send + Sync>;

#[async_trait]
pub trait RoleApiClientTrait {
    async fn find_permissions(
        &self,
        role_id: i64,
        credentials: Option<&str>,
    ) -> Result<Vec<PermissionRecord>, ServiceError>;
}
