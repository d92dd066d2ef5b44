use super::common::*;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use crate::submissions::memory::InMemoryResourceStore;
use crate::submissions::router::{submission_router, IDENTITY_HEADER};
use crate::submissions::service::SubmissionService;

fn router_for(
    service: SubmissionService<InMemoryResourceStore>,
) -> axum::Router {
    submission_router(Arc::new(service))
}

async fn read_json_body(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 16 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

fn json_request(method: &str, uri: &str, identity: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(identity) = identity {
        builder = builder.header(IDENTITY_HEADER, identity);
    }
    builder
        .body(Body::from(body.to_string()))
        .expect("request builds")
}

fn bare_request(method: &str, uri: &str, identity: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(identity) = identity {
        builder = builder.header(IDENTITY_HEADER, identity);
    }
    builder.body(Body::empty()).expect("request builds")
}

#[tokio::test]
async fn registration_round_trips_through_the_router() {
    let (service, _store) = build_service();
    let app = router_for(service);

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/v1/accounts",
            Some("login|operator"),
            json!({
                "first_name": "Dana",
                "last_name": "Fielding",
                "email": "dana@riverbend.example",
                "phone": "555-0147",
                "organization": "Riverbend Disposal LLC",
                "subscribed": true,
            }),
        ))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = read_json_body(response).await;
    assert_eq!(body["external_id"], "login|operator");
    assert_eq!(body["access_level"], "standard");
}

#[tokio::test]
async fn anonymous_requests_receive_401_with_the_code() {
    let (service, _store) = build_service();
    let app = router_for(service);

    let response = app
        .oneshot(bare_request("POST", "/api/v1/inventories/1/submit", None))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = read_json_body(response).await;
    assert_eq!(body["code"], "A01");
}

#[tokio::test]
async fn cross_owner_access_maps_to_403() {
    let (service, _store) = build_service();
    let (_site, inventory) = seed_submittable_inventory(&service, -1).await;
    service
        .register_account(
            crate::submissions::Identity::with_external_id("login|second"),
            operator_profile(),
        )
        .await
        .expect("second account registers");
    let app = router_for(service);

    let response = app
        .oneshot(bare_request(
            "GET",
            &format!("/api/v1/inventories/{}", inventory.id),
            Some("login|second"),
        ))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = read_json_body(response).await;
    assert_eq!(body["code"], "I01");
}

#[tokio::test]
async fn workflow_state_denials_map_to_422() {
    let (service, _store) = build_service();
    seed_operator(&service).await;
    let site = seed_site(&service).await;
    seed_qualifying_contact(&service, site.id).await;
    let inventory = seed_inventory(&service, site.id, -1).await;
    let app = router_for(service);

    let response = app
        .oneshot(bare_request(
            "POST",
            &format!("/api/v1/inventories/{}/submit", inventory.id),
            Some("login|operator"),
        ))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = read_json_body(response).await;
    assert_eq!(body["code"], "IS01");
}

#[tokio::test]
async fn owners_read_their_inventory_with_derived_flags() {
    let (service, _store) = build_service();
    let (_site, inventory) = seed_submittable_inventory(&service, -1).await;
    let app = router_for(service);

    let response = app
        .oneshot(bare_request(
            "GET",
            &format!("/api/v1/inventories/{}", inventory.id),
            Some("login|operator"),
        ))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["status"], "complete");
    assert_eq!(body["completeness"]["location"], true);
    assert_eq!(body["completeness"]["payment"], true);
}

#[tokio::test]
async fn missing_records_map_to_404() {
    let (service, _store) = build_service();
    seed_operator(&service).await;
    let app = router_for(service);

    let response = app
        .oneshot(bare_request(
            "GET",
            "/api/v1/inventories/424242",
            Some("login|operator"),
        ))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = read_json_body(response).await;
    assert_eq!(body["code"], "I02");
}
