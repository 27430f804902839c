use crate::{
    domain::{
        SessionUser,
        requests::LoginRequest,
        response::{SessionError, SessionResponse},
        session::UserData,
    },
    middleware::{
        session::{TOKEN_COOKIE, USER_DATA_COOKIE, session_middleware, session_token},
        validate::SimpleValidatedJson,
    },
    resolver::AccessSnapshot,
    state::AppState,
};
use axum::{
    Extension, Json,
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde_json::json;
use shared::errors::{HttpError, ServiceError};
use std::sync::Arc;
use time::OffsetDateTime;
use tracing::{debug, error, info};
use utoipa_axum::router::OpenApiRouter;

fn session_cookie(
    name: &'static str,
    value: String,
    http_only: bool,
    expires: OffsetDateTime,
    secure: bool,
) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .http_only(http_only)
        .same_site(SameSite::Lax)
        .secure(secure)
        .expires(expires)
        .build()
}

fn clear_session_cookies(jar: CookieJar) -> CookieJar {
    jar.remove(Cookie::build(TOKEN_COOKIE).path("/"))
        .remove(Cookie::build(USER_DATA_COOKIE).path("/"))
}

/// `userData` holds the non-sensitive claims as JSON; the cookie jar
/// percent-encodes it on the way out.
fn user_data_value(user: &SessionUser) -> Result<String, HttpError> {
    serde_json::to_string(&UserData::from(user))
        .map_err(|e| HttpError::Internal(format!("Failed to encode user data: {e}")))
}

#[utoipa::path(
    get,
    path = "/api/session",
    responses(
        (status = 200, description = "Current session", body = SessionResponse),
        (status = 401, description = "No valid session", body = SessionResponse),
        (status = 500, description = "Session could not be read", body = SessionError)
    ),
    tag = "Session"
)]
pub async fn get_session_handler(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    req: Request<Body>,
) -> Response {
    let Some(token) = session_token(&jar, &req) else {
        return (StatusCode::UNAUTHORIZED, Json(SessionResponse { user: None })).into_response();
    };

    match state.jwt_config.verify_token(&token) {
        Ok(claims) => {
            let user = SessionUser::from(claims);
            (StatusCode::OK, Json(SessionResponse { user: Some(user) })).into_response()
        }
        Err(ServiceError::TokenExpired) => {
            debug!("Session token expired, clearing cookies");
            (
                StatusCode::UNAUTHORIZED,
                clear_session_cookies(jar),
                Json(SessionResponse { user: None }),
            )
                .into_response()
        }
        Err(e) if e.is_auth() => {
            debug!("Rejecting session token: {e}");
            (StatusCode::UNAUTHORIZED, Json(SessionResponse { user: None })).into_response()
        }
        Err(e) => {
            error!("Failed to read session: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(SessionError {
                    error: "Failed to read session".into(),
                }),
            )
                .into_response()
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = SessionResponse),
        (status = 400, description = "Invalid request body"),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "Auth"
)]
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    SimpleValidatedJson(body): SimpleValidatedJson<LoginRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let token = state.di_container.auth_client.login(&body).await?;
    let user = SessionUser::from(state.jwt_config.verify_token(&token)?);

    let expires = OffsetDateTime::from_unix_timestamp(user.exp as i64)
        .map_err(|e| HttpError::Internal(format!("Token expiry out of range: {e}")))?;

    let jar = jar
        .add(session_cookie(
            TOKEN_COOKIE,
            token,
            true,
            expires,
            state.secure_cookies,
        ))
        .add(session_cookie(
            USER_DATA_COOKIE,
            user_data_value(&user)?,
            false,
            expires,
            state.secure_cookies,
        ));

    info!("User {} signed in as {}", user.user_id, user.role);

    Ok((StatusCode::OK, jar, Json(SessionResponse { user: Some(user) })))
}

#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = 200, description = "Session cookies cleared")
    ),
    tag = "Auth"
)]
pub async fn logout_handler(
    State(state): State<Arc<AppState>>,
    Extension(snapshot): Extension<AccessSnapshot>,
    jar: CookieJar,
) -> impl IntoResponse {
    if let Some(user) = snapshot.user() {
        state.resolver.invalidate_role(user.role_id).await;
        info!("User {} signed out", user.user_id);
    }

    (
        StatusCode::OK,
        clear_session_cookies(jar),
        Json(json!({
            "status": "success",
            "message": "Logged out"
        })),
    )
}

pub fn session_routes(app_state: Arc<AppState>) -> OpenApiRouter {
    let public_routes = OpenApiRouter::new()
        .route("/api/session", get(get_session_handler))
        .route("/api/auth/login", post(login_handler));

    let private_routes = OpenApiRouter::new()
        .route("/api/auth/logout", post(logout_handler))
        .route_layer(middleware::from_fn(session_middleware))
        .layer(Extension(app_state.resolver.clone()))
        .layer(Extension(app_state.jwt_config.clone()));

    public_routes.merge(private_routes).with_state(app_state)
}
