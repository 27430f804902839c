//! Backend REST clients against throwaway servers on 127.0.0.1.

mod common;

use admin_console::{
    abstract_trait::{RoleApiClientTrait, SessionSourceTrait},
    service::{HttpSessionClient, RoleApiClientService, build_http_client},
};
use common::{ANALYST_ROLE, EMPTY_ROLE, start_console, start_fake_backend, token_for};
use prometheus_client::registry::Registry;
use shared::errors::ServiceError;
use std::time::Duration;

fn http() -> reqwest::Client {
    build_http_client(Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn role_client_reads_wrapped_permission_records() {
    let (backend_url, calls) = start_fake_backend().await;
    let client = RoleApiClientService::new(http(), &backend_url, &mut Registry::default());

    let records = client
        .find_permissions(ANALYST_ROLE, Some("token-value"))
        .await
        .unwrap();

    let names: Vec<String> = records
        .iter()
        .filter_map(|r| r.to_permission())
        .map(|p| p.to_string())
        .collect();
    assert_eq!(names, vec!["samples:read", "sites:read"]);
    assert_eq!(calls.role_permissions(), 1);
}

#[tokio::test]
async fn role_client_reads_bare_lists() {
    let (backend_url, _) = start_fake_backend().await;
    let client = RoleApiClientService::new(http(), &backend_url, &mut Registry::default());

    let records = client
        .find_permissions(EMPTY_ROLE, Some("token-value"))
        .await
        .unwrap();
    assert!(records.is_empty());
}

#[tokio::test]
async fn role_client_surfaces_backend_errors() {
    let (backend_url, _) = start_fake_backend().await;
    let client = RoleApiClientService::new(http(), &backend_url, &mut Registry::default());

    match client.find_permissions(42, Some("token-value")).await {
        Err(ServiceError::Backend { status, message }) => {
            assert_eq!(status, 500);
            assert_eq!(message, "role store unavailable");
        }
        other => panic!("expected backend error, got {other:?}"),
    }

    match client.find_permissions(ANALYST_ROLE, None).await {
        Err(ServiceError::Backend { status, .. }) => assert_eq!(status, 401),
        other => panic!("expected 401, got {other:?}"),
    }
}

#[tokio::test]
async fn role_client_reports_unreachable_backend() {
    let client = RoleApiClientService::new(
        http(),
        "http://127.0.0.1:9",
        &mut Registry::default(),
    );

    let err = client.find_permissions(1, None).await.unwrap_err();
    assert!(matches!(err, ServiceError::Network(_)));
}

#[tokio::test]
async fn http_session_client_reads_the_console_session() {
    let (backend_url, _) = start_fake_backend().await;
    let console_url = start_console(&backend_url).await;
    let token = token_for("Analyst", ANALYST_ROLE, None);

    let signed_in = HttpSessionClient::new(http(), &console_url, Some(token.clone()));
    let user = signed_in.current_session().await.unwrap().unwrap();
    assert_eq!(user.role_id, ANALYST_ROLE);
    assert_eq!(signed_in.credentials(), Some(token));

    let anonymous = HttpSessionClient::new(http(), &console_url, None);
    assert!(anonymous.current_session().await.unwrap().is_none());
}
