use crate::domain::requests::LoginRequest;
use async_trait::async_trait;
use shared::errors::ServiceError;
use std::sync::Arc;

pub type DynAuthApiClient = Arc<dyn AuthApiClientTrait + Send + Sync>;

#[async_trait]
pub trait AuthApiClientTrait {
    /// Exchanges credentials for a signed session token.
    async fn login(&self, req: &LoginRequest) -> Result<String, ServiceError>;
}
