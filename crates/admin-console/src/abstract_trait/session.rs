use crate::domain::SessionUser;
use async_trait::async_trait;
use shared::errors::ServiceError;
use std::sync::Arc;

pub type DynSessionSource = Arc<dyn SessionSourceTrait + Send + Sync>;

/// Where the resolver learns who is signed in.
#[async_trait]
pub trait SessionSourceTrait {
    /// `Ok(None)` when nobody is signed in.
    async fn current_session(&self) -> Result<Option<SessionUser>, ServiceError>;

    /// Token forwarded to the backend on follow-up lookups.
    fn credentials(&self) -> Option<String> {
        None
    }
}
