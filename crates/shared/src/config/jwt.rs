use crate::{abstract_trait::JwtServiceTrait, domain::SessionClaims, errors::ServiceError};
use chrono::{Duration, Utc};
use jsonwebtoken::{
    DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub jwt_secret: String,
}

impl JwtConfig {
    pub fn new(jwt_secret: &str) -> Self {
        JwtConfig {
            jwt_secret: jwt_secret.to_string(),
        }
    }

    /// Claims valid for `ttl` from now. Used by tests and local tooling; in
    /// production tokens are minted by the backend with the same secret.
    pub fn claims_for(
        user_id: i64,
        email: &str,
        role: &str,
        role_id: i64,
        permissions: Option<Vec<String>>,
        ttl: Duration,
    ) -> SessionClaims {
        let now = Utc::now();
        SessionClaims {
            user_id,
            email: email.to_string(),
            role: role.to_string(),
            role_id,
            permissions,
            org_id: None,
            exp: (now + ttl).timestamp() as usize,
            iat: now.timestamp() as usize,
        }
    }
}

impl JwtServiceTrait for JwtConfig {
    fn generate_token(&self, claims: &SessionClaims) -> Result<String, ServiceError> {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )
        .map_err(ServiceError::Jwt)
    }

    fn verify_token(&self, token: &str) -> Result<SessionClaims, ServiceError> {
        let decoding_key = DecodingKey::from_secret(self.jwt_secret.as_ref());

        let mut validation = Validation::default();
        validation.leeway = 0;

        let token_data =
            decode::<SessionClaims>(token, &decoding_key, &validation).map_err(|e| {
                match e.kind() {
                    ErrorKind::ExpiredSignature => ServiceError::TokenExpired,
                    _ => ServiceError::Jwt(e),
                }
            })?;

        if token_data.claims.is_expired() {
            return Err(ServiceError::TokenExpired);
        }

        Ok(token_data.claims)
    }
}
