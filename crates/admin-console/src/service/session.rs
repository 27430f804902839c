use crate::{
    abstract_trait::SessionSourceTrait,
    domain::{SessionUser, response::SessionResponse},
    service::{backend_error, credential_headers, decode_json},
};
use async_trait::async_trait;
use reqwest::{StatusCode, header::HeaderMap};
use shared::{abstract_trait::DynJwtService, errors::ServiceError};
use tracing::debug;

/// Reads the session straight from the signed cookie token.
#[derive(Debug, Clone)]
pub struct TokenSession {
    jwt: DynJwtService,
    token: Option<String>,
}

impl TokenSession {
    pub fn new(jwt: DynJwtService, token: Option<String>) -> Self {
        Self { jwt, token }
    }
}

#[async_trait]
impl SessionSourceTrait for TokenSession {
    async fn current_session(&self) -> Result<Option<SessionUser>, ServiceError> {
        let Some(token) = self.token.as_deref() else {
            return Ok(None);
        };

        match self.jwt.verify_token(token) {
            Ok(claims) => Ok(Some(claims.into())),
            Err(e) if e.is_auth() => {
                debug!("Ignoring unusable session token: {e}");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    fn credentials(&self) -> Option<String> {
        self.token.clone()
    }
}

/// Asks a running console for `GET /api/session`, the way a browser would.
#[derive(Debug, Clone)]
pub struct HttpSessionClient {
    http: reqwest::Client,
    console_url: String,
    token: Option<String>,
}

impl HttpSessionClient {
    pub fn new(http: reqwest::Client, console_url: &str, token: Option<String>) -> Self {
        Self {
            http,
            console_url: console_url.trim_end_matches('/').to_string(),
            token,
        }
    }
}

#[async_trait]
impl SessionSourceTrait for HttpSessionClient {
    async fn current_session(&self) -> Result<Option<SessionUser>, ServiceError> {
        let headers = match self.token.as_deref() {
            Some(token) => credential_headers(token)?,
            None => HeaderMap::new(),
        };

        let url = format!("{}/api/session", self.console_url);
        let response = self.http.get(&url).headers(headers).send().await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            return Ok(None);
        }

        if !response.status().is_success() {
            return Err(backend_error(response).await);
        }

        let body: SessionResponse = decode_json(response).await?;
        Ok(body.user)
    }

    fn credentials(&self) -> Option<String> {
        self.token.clone()
    }
}
