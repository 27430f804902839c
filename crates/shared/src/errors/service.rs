use jsonwebtoken::errors::Error as JwtError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("JWT error: {0}")]
    Jwt(#[from] JwtError),

    #[error("Token has expired")]
    TokenExpired,

    #[error("Backend responded {status}: {message}")]
    Backend { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    /// Errors that mean "there is no usable session" rather than a fault.
    pub fn is_auth(&self) -> bool {
        matches!(
            self,
            ServiceError::Jwt(_)
                | ServiceError::TokenExpired
                | ServiceError::Backend { status: 401, .. }
        )
    }
}

impl From<serde_json::Error> for ServiceError {
    fn from(error: serde_json::Error) -> Self {
        ServiceError::Decode(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_session_failures_count_as_auth() {
        assert!(ServiceError::TokenExpired.is_auth());
        assert!(
            ServiceError::Backend {
                status: 401,
                message: "missing token".into()
            }
            .is_auth()
        );

        assert!(
            !ServiceError::Backend {
                status: 500,
                message: "role store unavailable".into()
            }
            .is_auth()
        );
        assert!(!ServiceError::Decode("bad body".into()).is_auth());
    }
}
