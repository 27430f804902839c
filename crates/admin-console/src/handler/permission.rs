use crate::{
    domain::{
        Requirement,
        requests::CheckPermissionRequest,
        response::{CheckPermissionResponse, PermissionsResponse},
    },
    middleware::session::session_middleware,
    resolver::AccessSnapshot,
    state::AppState,
};
use axum::{
    Extension, Json,
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post},
};
use std::sync::Arc;
use tracing::debug;
use utoipa_axum::router::OpenApiRouter;

#[utoipa::path(
    get,
    path = "/api/permissions",
    responses(
        (status = 200, description = "Permissions held by the caller", body = PermissionsResponse)
    ),
    tag = "Permission"
)]
pub async fn get_permissions_handler(
    Extension(snapshot): Extension<AccessSnapshot>,
) -> impl IntoResponse {
    let permissions = snapshot.permissions();

    let response = PermissionsResponse {
        role: snapshot.user().map(|u| u.role.clone()),
        is_super_admin: snapshot.is_super_admin(),
        permissions: permissions.to_strings(),
        grouped: permissions.grouped_by_resource(),
    };

    (StatusCode::OK, Json(response))
}

#[utoipa::path(
    post,
    path = "/api/permissions/check",
    request_body = CheckPermissionRequest,
    responses(
        (status = 200, description = "Whether the caller passes the requirement", body = CheckPermissionResponse)
    ),
    tag = "Permission"
)]
pub async fn check_permission_handler(
    Extension(snapshot): Extension<AccessSnapshot>,
    Json(body): Json<CheckPermissionRequest>,
) -> impl IntoResponse {
    let requirement = Requirement::from_value(&body.permission);
    let is_allowed = snapshot.is_allowed(&requirement);

    debug!("Permission check {:?}: {is_allowed}", body.permission);

    (StatusCode::OK, Json(CheckPermissionResponse { is_allowed }))
}

pub fn permission_routes(app_state: Arc<AppState>) -> OpenApiRouter {
    OpenApiRouter::new()
        .route("/api/permissions", get(get_permissions_handler))
        .route("/api/permissions/check", post(check_permission_handler))
        .route_layer(middleware::from_fn(session_middleware))
        .layer(Extension(app_state.resolver.clone()))
        .layer(Extension(app_state.jwt_config.clone()))
        .with_state(app_state)
}
