use serde::{Deserialize, Serialize};
use shared::domain::SessionClaims;
use utoipa::ToSchema;

/// Role name that passes every permission check.
pub const SUPER_ADMIN_ROLE: &str = "SuperAdmin";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SessionUser {
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

impl SessionUser {
    pub fn is_super_admin(&self) -> bool {
        self.role == SUPER_ADMIN_ROLE
    }
}

impl From<SessionClaims> for SessionUser {
    fn from(claims: SessionClaims) -> Self {
        Self {
            user_id: claims.user_id,
            email: claims.email,
            role: claims.role,
            role_id: claims.role_id,
            permissions: claims.permissions,
            org_id: claims.org_id,
            exp: claims.exp,
            iat: claims.iat,
        }
    }
}

/// Readable mirror of the session kept in the `userData` cookie.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserData {
    pub user_id: i64,
    pub email: String,
    pub role: String,
    pub role_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub org_id: Option<i64>,
    pub exp: usize,
}

impl From<&SessionUser> for UserData {
    fn from(user: &SessionUser) -> Self {
        Self {
            user_id: user.user_id,
            email: user.email.clone(),
            role: user.role.clone(),
            role_id: user.role_id,
            org_id: user.org_id,
            exp: user.exp,
        }
    }
}
