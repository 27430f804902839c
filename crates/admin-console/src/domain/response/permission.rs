use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PermissionsResponse {
    pub role: Option<String>,
    pub is_super_admin: bool,
    pub permissions: Vec<String>,
    pub grouped: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CheckPermissionResponse {
    pub is_allowed: bool,
}
