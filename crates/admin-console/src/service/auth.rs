use crate::{
    abstract_trait::AuthApiClientTrait,
    domain::{
        requests::LoginRequest,
        response::{ApiResponse, LoginData},
    },
    service::{ClientTelemetry, backend_error, decode_json},
};
use async_trait::async_trait;
use opentelemetry::KeyValue;
use prometheus_client::registry::Registry;
use reqwest::header::HeaderMap;
use shared::{errors::ServiceError, utils::Method};
use tracing::info;

#[derive(Debug, Clone)]
pub struct AuthApiClientService {
    http: reqwest::Client,
    base_url: String,
    telemetry: ClientTelemetry,
}

impl AuthApiClientService {
    pub fn new(http: reqwest::Client, base_url: &str, registry: &mut Registry) -> Self {
        let telemetry = ClientTelemetry::new(
            "auth-api-client",
            registry,
            "auth_api_client",
            "AuthApiClientService",
        );

        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            telemetry,
        }
    }
}

#[async_trait]
impl AuthApiClientTrait for AuthApiClientService {
    async fn login(&self, req: &LoginRequest) -> Result<String, ServiceError> {
        info!("Logging in user: {}", req.email);

        let method = Method::Post;
        let tracing_ctx = self.telemetry.start_tracing(
            "LoginUser",
            vec![
                KeyValue::new("component", "auth"),
                KeyValue::new("operation", "login"),
                KeyValue::new("user.email", req.email.clone()),
            ],
        );

        let mut headers = HeaderMap::new();
        self.telemetry
            .inject_trace_context(&tracing_ctx.cx, &mut headers);

        let url = format!("{}/api/v1/auth/login", self.base_url);

        let response = match self.http.post(&url).headers(headers).json(req).send().await {
            Ok(response) => response,
            Err(e) => {
                self.telemetry
                    .complete_error(&tracing_ctx, method, "Login request failed");
                return Err(e.into());
            }
        };

        if !response.status().is_success() {
            let err = backend_error(response).await;
            self.telemetry
                .complete_error(&tracing_ctx, method, &err.to_string());
            return Err(err);
        }

        let body: ApiResponse<LoginData> = match decode_json(response).await {
            Ok(body) => body,
            Err(e) => {
                self.telemetry
                    .complete_error(&tracing_ctx, method, "Login response carried no token");
                return Err(e);
            }
        };

        self.telemetry
            .complete_success(&tracing_ctx, method, "User logged in");

        Ok(body.data.token)
    }
}
