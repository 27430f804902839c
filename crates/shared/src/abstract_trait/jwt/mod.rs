use crate::{domain::SessionClaims, errors::ServiceError};
use std::sync::Arc;

pub type DynJwtService = Arc<dyn JwtServiceTrait + Send + Sync>;

pub trait JwtServiceTrait: Send + Sync + std::fmt::Debug {
    fn generate_token(&self, claims: &SessionClaims) -> Result<String, ServiceError>;
    fn verify_token(&self, token: &str) -> Result<SessionClaims, ServiceError>;
}
