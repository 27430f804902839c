use crate::domain::session::SessionUser;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SessionResponse {
    pub user: Option<SessionUser>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SessionError {
    pub error: String,
}
