use crate::{resolver::PermissionResolver, service::TokenSession};
use axum::{
    Extension,
    body::Body,
    http::{Request, header},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use shared::abstract_trait::DynJwtService;
use std::sync::Arc;

pub const TOKEN_COOKIE: &str = "token";
pub const USER_DATA_COOKIE: &str = "userData";

pub fn session_token<B>(cookie_jar: &CookieJar, req: &Request<B>) -> Option<String> {
    cookie_jar
        .get(TOKEN_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .or_else(|| {
            req.headers()
                .get(header::AUTHORIZATION)
                .and_then(|auth_header| auth_header.to_str().ok())
                .and_then(|auth_value| auth_value.strip_prefix("Bearer ").map(str::to_owned))
        })
        .filter(|token| !token.is_empty())
}

/// Resolves the caller's [`AccessSnapshot`](crate::resolver::AccessSnapshot)
/// and stores it on the request. Anonymous callers get an empty snapshot;
/// rejecting is left to the handlers and the route guard.
pub async fn session_middleware(
    cookie_jar: CookieJar,
    Extension(jwt): Extension<DynJwtService>,
    Extension(resolver): Extension<Arc<PermissionResolver>>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let token = session_token(&cookie_jar, &req);
    let source = TokenSession::new(jwt, token);

    let snapshot = resolver.resolve(&source).await;
    req.extensions_mut().insert(snapshot);

    next.run(req).await
}
