use crate::{
    abstract_trait::NavigatorTrait,
    guard::{GuardView, ROOT_PATH, RouteGuard},
    resolver::{AccessSnapshot, ScopeState},
    state::AppState,
};
use axum::{
    Extension,
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use std::sync::{Arc, OnceLock};
use tracing::warn;

/// Keeps the first navigation the guard asks for.
#[derive(Debug, Default)]
struct CapturedRedirect(OnceLock<String>);

impl NavigatorTrait for CapturedRedirect {
    fn navigate(&self, to: &str) {
        if self.0.set(to.to_string()).is_err() {
            warn!("Ignoring second redirect to {to}");
        }
    }
}

/// Runs the route guard for one page request. A denied page answers with
/// `303 See Other` to the first page the caller can open.
pub async fn route_guard_middleware(
    State(state): State<Arc<AppState>>,
    Extension(snapshot): Extension<AccessSnapshot>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let navigator = CapturedRedirect::default();
    let mut guard = RouteGuard::new();

    let view = guard.render(
        req.uri().path(),
        &ScopeState::Ready(snapshot),
        state.menu,
        &navigator,
    );

    match view {
        GuardView::Content => next.run(req).await,
        GuardView::Unauthorized { redirect_to } => Redirect::to(&redirect_to).into_response(),
        GuardView::Loading | GuardView::Redirecting => {
            let target = navigator.0.get().map(String::as_str).unwrap_or(ROOT_PATH);
            Redirect::to(target).into_response()
        }
    }
}
