use serde::Deserialize;
use serde_json::Value;
use utoipa::ToSchema;

/// `permission` may be a string, an array of strings, or null.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CheckPermissionRequest {
    #[serde(default)]
    #[schema(value_type = Object)]
    pub permission: Value,
}
