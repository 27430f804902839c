use crate::{
    domain::response::NavigationResponse,
    guard::get_first_accessible_route,
    menu::visible_sections,
    middleware::session::session_middleware,
    resolver::AccessSnapshot,
    state::AppState,
};
use axum::{
    Extension, Json, extract::State, http::StatusCode, middleware, response::IntoResponse,
    routing::get,
};
use std::sync::Arc;
use utoipa_axum::router::OpenApiRouter;

#[utoipa::path(
    get,
    path = "/api/navigation",
    responses(
        (status = 200, description = "Sidebar sections visible to the caller", body = NavigationResponse)
    ),
    tag = "Navigation"
)]
pub async fn get_navigation_handler(
    State(state): State<Arc<AppState>>,
    Extension(snapshot): Extension<AccessSnapshot>,
) -> impl IntoResponse {
    let response = NavigationResponse {
        sections: visible_sections(state.menu, &snapshot),
        first_accessible: get_first_accessible_route(state.menu, snapshot.permissions())
            .map(String::from),
    };

    (StatusCode::OK, Json(response))
}

pub fn navigation_routes(app_state: Arc<AppState>) -> OpenApiRouter {
    OpenApiRouter::new()
        .route("/api/navigation", get(get_navigation_handler))
        .route_layer(middleware::from_fn(session_middleware))
        .layer(Extension(app_state.resolver.clone()))
        .layer(Extension(app_state.jwt_config.clone()))
        .with_state(app_state)
}
