use crate::errors::{error::ErrorResponse, service::ServiceError};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

#[derive(Debug)]
pub enum HttpError {
    BadRequest(String),
    Unauthorized(String),
    Forbidden(String),
    NotFound(String),
    ServiceUnavailable(String),
    Internal(String),
}

impl From<ServiceError> for HttpError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Jwt(err) => HttpError::Unauthorized(format!("JWT error: {err}")),
            ServiceError::TokenExpired => HttpError::Unauthorized("Token expired".into()),

            ServiceError::Backend { status, message } => match status {
                400 | 422 => HttpError::BadRequest(message),
                401 => HttpError::Unauthorized(message),
                403 => HttpError::Forbidden(message),
                404 => HttpError::NotFound(message),
                _ => HttpError::ServiceUnavailable(format!("Backend error ({status}): {message}")),
            },

            ServiceError::Network(err) => {
                HttpError::ServiceUnavailable(format!("Backend unreachable: {err}"))
            }

            ServiceError::Decode(msg) | ServiceError::Internal(msg) => HttpError::Internal(msg),
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let (status, msg) = match self {
            HttpError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            HttpError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            HttpError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            HttpError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            HttpError::ServiceUnavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
            HttpError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(ErrorResponse {
            status: "error".into(),
            message: msg,
        });

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_statuses_map_to_http_statuses() {
        let forbidden = HttpError::from(ServiceError::Backend {
            status: 403,
            message: "nope".into(),
        });
        assert_eq!(forbidden.into_response().status(), StatusCode::FORBIDDEN);

        let upstream = HttpError::from(ServiceError::Backend {
            status: 502,
            message: "bad gateway".into(),
        });
        assert_eq!(
            upstream.into_response().status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn expired_token_is_unauthorized() {
        let err = HttpError::from(ServiceError::TokenExpired);
        assert_eq!(err.into_response().status(), StatusCode::UNAUTHORIZED);
    }
}
