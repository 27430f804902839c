use crate::menu::VisibleSection;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct NavigationResponse {
    #[schema(value_type = Vec<Object>)]
    pub sections: Vec<VisibleSection>,
    pub first_accessible: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PageResponse {
    pub path: String,
    pub title: Option<String>,
    pub permission: Option<Vec<String>>,
}
