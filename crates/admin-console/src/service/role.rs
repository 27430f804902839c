use crate::{
    abstract_trait::RoleApiClientTrait,
    domain::{
        PermissionRecord,
        response::{ApiResponse, RolePermissionsData},
    },
    service::{ClientTelemetry, backend_error, credential_headers, decode_json},
};
use async_trait::async_trait;
use opentelemetry::KeyValue;
use prometheus_client::registry::Registry;
use reqwest::header::HeaderMap;
use shared::{errors::ServiceError, utils::Method};
use tracing::info;

#[derive(Debug, Clone)]
pub struct RoleApiClientService {
    http: reqwest::Client,
    base_url: String,
    telemetry: ClientTelemetry,
}

impl RoleApiClientService {
    pub fn new(http: reqwest::Client, base_url: &str, registry: &mut Registry) -> Self {
        let telemetry = ClientTelemetry::new(
            "role-api-client",
            registry,
            "role_api_client",
            "RoleApiClientService",
        );

        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            telemetry,
        }
    }
}

#[async_trait]
impl RoleApiClientTrait for RoleApiClientService {
    async fn find_permissions(
        &self,
        role_id: i64,
        credentials: Option<&str>,
    ) -> Result<Vec<PermissionRecord>, ServiceError> {
        info!("Fetching permissions for role {role_id}");

        let method = Method::Get;
        let tracing_ctx = self.telemetry.start_tracing(
            "FindRolePermissions",
            vec![
                KeyValue::new("component", "role"),
                KeyValue::new("operation", "find_permissions"),
                KeyValue::new("role.id", role_id.to_string()),
            ],
        );

        let mut headers = match credentials {
            Some(token) => credential_headers(token)?,
            None => HeaderMap::new(),
        };
        self.telemetry
            .inject_trace_context(&tracing_ctx.cx, &mut headers);

        let url = format!("{}/api/v1/roles/{role_id}/permissions", self.base_url);

        let response = match self.http.get(&url).headers(headers).send().await {
            Ok(response) => response,
            Err(e) => {
                self.telemetry.complete_error(
                    &tracing_ctx,
                    method,
                    "Role permissions request failed",
                );
                return Err(e.into());
            }
        };

        if !response.status().is_success() {
            let err = backend_error(response).await;
            self.telemetry
                .complete_error(&tracing_ctx, method, &err.to_string());
            return Err(err);
        }

        let body: ApiResponse<RolePermissionsData> = match decode_json(response).await {
            Ok(body) => body,
            Err(e) => {
                self.telemetry
                    .complete_error(&tracing_ctx, method, "Malformed role permissions body");
                return Err(e);
            }
        };

        let records = body.data.into_records();

        self.telemetry.complete_success(
            &tracing_ctx,
            method,
            &format!("Fetched {} permissions for role {role_id}", records.len()),
        );

        Ok(records)
    }
}
