use crate::domain::permission::PermissionRecord;
use serde::{Deserialize, Serialize};

/// `success / message / data` envelope used by every backend endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
    pub data: T,
}

/// The role permissions endpoint returns either `{ permissions: [...] }` or
/// the bare list under `data`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RolePermissionsData {
    Wrapped { permissions: Vec<PermissionRecord> },
    List(Vec<PermissionRecord>),
}

impl RolePermissionsData {
    pub fn into_records(self) -> Vec<PermissionRecord> {
        match self {
            RolePermissionsData::Wrapped { permissions } => permissions,
            RolePermissionsData::List(records) => records,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginData {
    #[serde(alias = "access_token")]
    pub token: String,
}
