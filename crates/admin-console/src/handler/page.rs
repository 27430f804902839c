use crate::{
    domain::response::PageResponse,
    guard::{find_guard_entry, normalize_path},
    menu::{MenuItem, MenuSection},
    middleware::{route_guard::route_guard_middleware, session::session_middleware},
    state::AppState,
};
use axum::{
    Extension, Json,
    extract::State,
    http::{StatusCode, Uri},
    middleware,
    response::IntoResponse,
    routing::get,
};
use shared::errors::HttpError;
use std::sync::Arc;
use utoipa_axum::router::OpenApiRouter;

fn menu_item<'a>(menu: &'a [MenuSection], path: &str) -> Option<&'a MenuItem> {
    find_guard_entry(menu, path).or_else(|| {
        menu.iter()
            .flat_map(|section| section.children.iter())
            .find(|item| normalize_path(item.path) == path)
    })
}

/// Page shell for any console path. The route guard has already run, so
/// reaching this handler means the caller may see the page.
#[utoipa::path(
    get,
    path = "/{path}",
    params(
        ("path" = String, Path, description = "Console page path")
    ),
    responses(
        (status = 200, description = "Page the caller may open", body = PageResponse),
        (status = 303, description = "Not permitted, redirected to an accessible page"),
        (status = 404, description = "Unknown API path")
    ),
    tag = "Page"
)]
pub async fn page_handler(
    State(state): State<Arc<AppState>>,
    uri: Uri,
) -> Result<impl IntoResponse, HttpError> {
    let path = normalize_path(uri.path());

    if path == "/api" || path.starts_with("/api/") {
        return Err(HttpError::NotFound(format!("No API route for {path}")));
    }

    let item = menu_item(state.menu, path);

    let response = PageResponse {
        path: path.to_string(),
        title: item.map(|i| i.name.to_string()),
        permission: item.and_then(|i| i.permission.names()),
    };

    Ok((StatusCode::OK, Json(response)))
}

pub fn page_routes(app_state: Arc<AppState>) -> OpenApiRouter {
    OpenApiRouter::new()
        .route("/", get(page_handler))
        .route("/{*path}", get(page_handler))
        .route_layer(middleware::from_fn_with_state(
            app_state.clone(),
            route_guard_middleware,
        ))
        .route_layer(middleware::from_fn(session_middleware))
        .layer(Extension(app_state.resolver.clone()))
        .layer(Extension(app_state.jwt_config.clone()))
        .with_state(app_state)
}
