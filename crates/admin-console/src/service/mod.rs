mod auth;
mod role;
mod session;

pub use self::auth::AuthApiClientService;
pub use self::role::RoleApiClientService;
pub use self::session::{HttpSessionClient, TokenSession};

use anyhow::{Context as _, Result};
use opentelemetry::{
    Context, KeyValue,
    global::{self, BoxedTracer},
    trace::{Span, SpanKind, TraceContextExt, Tracer},
};
use prometheus_client::registry::Registry;
use reqwest::{
    Response,
    header::{HeaderMap, HeaderValue},
};
use serde::{Deserialize, de::DeserializeOwned};
use shared::{
    errors::ServiceError,
    utils::{HeaderInjector, Method, Metrics, Status as StatusUtils, TracingContext},
};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{error, info};

/// Shared reqwest client for every backend call.
pub fn build_http_client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(3))
        .build()
        .context("Failed to build backend HTTP client")
}

/// Span and Prometheus bookkeeping for one backend client.
#[derive(Debug, Clone)]
pub struct ClientTelemetry {
    tracer_name: &'static str,
    metrics: Metrics,
}

impl ClientTelemetry {
    pub fn new(tracer_name: &'static str, registry: &mut Registry, prefix: &str, subject: &str) -> Self {
        let metrics = Metrics::new();
        metrics.register(registry, prefix, subject);

        Self {
            tracer_name,
            metrics,
        }
    }

    fn get_tracer(&self) -> BoxedTracer {
        global::tracer(self.tracer_name)
    }

    pub fn inject_trace_context(&self, cx: &Context, headers: &mut HeaderMap) {
        global::get_text_map_propagator(|propagator| {
            propagator.inject_context(cx, &mut HeaderInjector(headers))
        });
    }

    pub fn start_tracing(&self, operation_name: &str, attributes: Vec<KeyValue>) -> TracingContext {
        let start_time = Instant::now();
        let tracer = self.get_tracer();
        let mut span = tracer
            .span_builder(operation_name.to_string())
            .with_kind(SpanKind::Client)
            .with_attributes(attributes)
            .start(&tracer);

        info!("Starting operation: {operation_name}");

        span.add_event(
            "Operation started",
            vec![KeyValue::new("operation", operation_name.to_string())],
        );

        let cx = Context::current_with_span(span);
        TracingContext { cx, start_time }
    }

    pub fn complete_success(&self, tracing_ctx: &TracingContext, method: Method, message: &str) {
        self.complete(tracing_ctx, method, true, message);
    }

    pub fn complete_error(&self, tracing_ctx: &TracingContext, method: Method, message: &str) {
        self.complete(tracing_ctx, method, false, message);
    }

    fn complete(&self, tracing_ctx: &TracingContext, method: Method, is_success: bool, message: &str) {
        let status_str = if is_success { "SUCCESS" } else { "ERROR" };
        let status = if is_success {
            StatusUtils::Success
        } else {
            StatusUtils::Error
        };
        let elapsed = tracing_ctx.start_time.elapsed().as_secs_f64();

        tracing_ctx.cx.span().add_event(
            "Operation completed",
            vec![
                KeyValue::new("status", status_str),
                KeyValue::new("duration_secs", elapsed.to_string()),
                KeyValue::new("message", message.to_string()),
            ],
        );

        if is_success {
            info!("Operation completed successfully: {message}");
        } else {
            error!("Operation failed: {message}");
        }

        self.metrics.record(method, status, elapsed);

        tracing_ctx.cx.span().end();
    }
}

/// `Authorization: Bearer` plus the `token` cookie, which is what the
/// backend accepts on browser-originated calls.
pub fn credential_headers(token: &str) -> Result<HeaderMap, ServiceError> {
    let mut headers = HeaderMap::new();

    let bearer = HeaderValue::from_str(&format!("Bearer {token}"))
        .map_err(|_| ServiceError::Internal("Session token is not a valid header value".into()))?;
    let cookie = HeaderValue::from_str(&format!("token={token}"))
        .map_err(|_| ServiceError::Internal("Session token is not a valid header value".into()))?;

    headers.insert(reqwest::header::AUTHORIZATION, bearer);
    headers.insert(reqwest::header::COOKIE, cookie);

    Ok(headers)
}

#[derive(Deserialize)]
struct BackendMessage {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Turns a non-2xx response into [`ServiceError::Backend`], using the
/// body's `message` or `error` field when there is one.
pub async fn backend_error(response: Response) -> ServiceError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();

    let message = serde_json::from_str::<BackendMessage>(&body)
        .ok()
        .and_then(|b| b.message.or(b.error))
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Unexpected backend response")
                .to_string()
        });

    ServiceError::Backend {
        status: status.as_u16(),
        message,
    }
}

pub async fn decode_json<T: DeserializeOwned>(response: Response) -> Result<T, ServiceError> {
    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}
