use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Claims carried by the signed `token` cookie.
///
/// `permissions` is optional: older tokens only carry `role_id` and the
/// permission list has to be looked up from the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    pub user_id: i64,
    pub email: String,
    pub role: String,
    pub role_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub org_id: Option<i64>,
    pub exp: usize,
    pub iat: usize,
}

impl SessionClaims {
    pub fn is_expired(&self) -> bool {
        self.exp <= Utc::now().timestamp() as usize
    }
}
