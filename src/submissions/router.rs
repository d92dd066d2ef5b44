use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Router,
};
use serde_json::json;
use tracing::error;

use super::authz::FailureKind;
use super::context::Identity;
use super::domain::ResourceId;
use super::service::{
    AccountProfile, InventoryAnnotation, InventoryPatch, NewContact, NewInventory, NewSite,
    NewWell, ServiceError, SubmissionService, WellPatch,
};
use super::store::{ResourceStore, StoreError};

/// Header carrying the authenticated identity's external account claim. The
/// wrapper in front of this service resolves sessions; this router only reads
/// the result.
pub const IDENTITY_HEADER: &str = "x-account-external-id";

/// Router builder exposing the submission operations over HTTP. Everything
/// here is a thin shell: the policy chains inside the service decide who may
/// do what.
pub fn submission_router<S>(service: Arc<SubmissionService<S>>) -> Router
where
    S: ResourceStore + 'static,
{
    Router::new()
        .route("/api/v1/accounts", post(register_account::<S>))
        .route(
            "/api/v1/accounts/:account_id/promote",
            post(promote_account::<S>),
        )
        .route("/api/v1/sites", post(create_site::<S>))
        .route("/api/v1/sites/:site_id/submit", post(submit_site::<S>))
        .route("/api/v1/sites/:site_id/contacts", post(add_contact::<S>))
        .route(
            "/api/v1/sites/:site_id/contacts/:contact_id",
            delete(remove_contact::<S>),
        )
        .route(
            "/api/v1/sites/:site_id/inventories",
            post(create_inventory::<S>),
        )
        .route(
            "/api/v1/inventories/:inventory_id",
            get(get_inventory::<S>),
        )
        .route(
            "/api/v1/inventories/:inventory_id/edit",
            post(update_inventory::<S>),
        )
        .route(
            "/api/v1/inventories/:inventory_id/annotate",
            post(annotate_inventory::<S>),
        )
        .route(
            "/api/v1/inventories/:inventory_id/submit",
            post(submit_inventory::<S>),
        )
        .route(
            "/api/v1/inventories/:inventory_id/review",
            post(review_inventory::<S>),
        )
        .route(
            "/api/v1/inventories/:inventory_id/approve",
            post(approve_inventory::<S>),
        )
        .route(
            "/api/v1/inventories/:inventory_id/authorize",
            post(authorize_inventory::<S>),
        )
        .route(
            "/api/v1/inventories/:inventory_id/wells",
            post(create_well::<S>),
        )
        .route("/api/v1/wells/:well_id/edit", post(update_well::<S>))
        .route("/api/v1/notifications", get(list_notifications::<S>))
        .route(
            "/api/v1/notifications/:receipt_id/read",
            post(read_notification::<S>),
        )
        .route(
            "/api/v1/notifications/:receipt_id",
            delete(delete_notification::<S>),
        )
        .with_state(service)
}

fn identity_from(headers: &HeaderMap) -> Identity {
    match headers.get(IDENTITY_HEADER) {
        None => Identity::Anonymous,
        Some(value) => match value.to_str() {
            Ok(claim) if !claim.trim().is_empty() => Identity::with_external_id(claim.trim()),
            _ => Identity::Claims { external_id: None },
        },
    }
}

/// Maps the failure-code families onto response classes; anything outside the
/// expected taxonomy collapses to a generic message so internals stay inside.
fn error_response(err: ServiceError) -> Response {
    match err {
        ServiceError::Denied(failure) => {
            let status = match failure.code.kind() {
                FailureKind::Unauthenticated => StatusCode::UNAUTHORIZED,
                FailureKind::NotFound => StatusCode::NOT_FOUND,
                FailureKind::Forbidden => StatusCode::FORBIDDEN,
                FailureKind::WorkflowState => StatusCode::UNPROCESSABLE_ENTITY,
            };
            let payload = json!({
                "code": failure.code.as_str(),
                "error": failure.to_string(),
            });
            (status, axum::Json(payload)).into_response()
        }
        ServiceError::Store(StoreError::NotFound) => {
            let payload = json!({ "error": "record not found" });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        ServiceError::Store(StoreError::Conflict) => {
            let payload = json!({ "error": "record already exists" });
            (StatusCode::CONFLICT, axum::Json(payload)).into_response()
        }
        other => {
            error!(error = %other, "submission operation failed");
            let payload = json!({ "error": "internal error" });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

fn ok_json<T: serde::Serialize>(value: T) -> Response {
    (StatusCode::OK, axum::Json(value)).into_response()
}

async fn register_account<S: ResourceStore>(
    State(service): State<Arc<SubmissionService<S>>>,
    headers: HeaderMap,
    axum::Json(profile): axum::Json<AccountProfile>,
) -> Response {
    match service
        .register_account(identity_from(&headers), profile)
        .await
    {
        Ok(account) => (StatusCode::CREATED, axum::Json(account)).into_response(),
        Err(err) => error_response(err),
    }
}

async fn promote_account<S: ResourceStore>(
    State(service): State<Arc<SubmissionService<S>>>,
    headers: HeaderMap,
    Path(account_id): Path<u64>,
) -> Response {
    match service
        .promote_account(identity_from(&headers), ResourceId(account_id))
        .await
    {
        Ok(account) => ok_json(account),
        Err(err) => error_response(err),
    }
}

async fn create_site<S: ResourceStore>(
    State(service): State<Arc<SubmissionService<S>>>,
    headers: HeaderMap,
    axum::Json(input): axum::Json<NewSite>,
) -> Response {
    match service.create_site(identity_from(&headers), input).await {
        Ok(site) => (StatusCode::CREATED, axum::Json(site)).into_response(),
        Err(err) => error_response(err),
    }
}

async fn submit_site<S: ResourceStore>(
    State(service): State<Arc<SubmissionService<S>>>,
    headers: HeaderMap,
    Path(site_id): Path<u64>,
) -> Response {
    match service
        .submit_site(identity_from(&headers), ResourceId(site_id))
        .await
    {
        Ok(site) => ok_json(site),
        Err(err) => error_response(err),
    }
}

async fn add_contact<S: ResourceStore>(
    State(service): State<Arc<SubmissionService<S>>>,
    headers: HeaderMap,
    Path(site_id): Path<u64>,
    axum::Json(input): axum::Json<NewContact>,
) -> Response {
    match service
        .add_contact(identity_from(&headers), ResourceId(site_id), input)
        .await
    {
        Ok(contact) => (StatusCode::CREATED, axum::Json(contact)).into_response(),
        Err(err) => error_response(err),
    }
}

async fn remove_contact<S: ResourceStore>(
    State(service): State<Arc<SubmissionService<S>>>,
    headers: HeaderMap,
    Path((site_id, contact_id)): Path<(u64, u64)>,
) -> Response {
    match service
        .remove_contact(
            identity_from(&headers),
            ResourceId(site_id),
            ResourceId(contact_id),
        )
        .await
    {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err),
    }
}

async fn create_inventory<S: ResourceStore>(
    State(service): State<Arc<SubmissionService<S>>>,
    headers: HeaderMap,
    Path(site_id): Path<u64>,
    axum::Json(input): axum::Json<NewInventory>,
) -> Response {
    match service
        .create_inventory(identity_from(&headers), ResourceId(site_id), input)
        .await
    {
        Ok(inventory) => (StatusCode::CREATED, axum::Json(inventory)).into_response(),
        Err(err) => error_response(err),
    }
}

async fn get_inventory<S: ResourceStore>(
    State(service): State<Arc<SubmissionService<S>>>,
    headers: HeaderMap,
    Path(inventory_id): Path<u64>,
) -> Response {
    match service
        .get_inventory(identity_from(&headers), ResourceId(inventory_id))
        .await
    {
        Ok(inventory) => ok_json(inventory),
        Err(err) => error_response(err),
    }
}

async fn update_inventory<S: ResourceStore>(
    State(service): State<Arc<SubmissionService<S>>>,
    headers: HeaderMap,
    Path(inventory_id): Path<u64>,
    axum::Json(patch): axum::Json<InventoryPatch>,
) -> Response {
    match service
        .update_inventory(identity_from(&headers), ResourceId(inventory_id), patch)
        .await
    {
        Ok(inventory) => ok_json(inventory),
        Err(err) => error_response(err),
    }
}

async fn annotate_inventory<S: ResourceStore>(
    State(service): State<Arc<SubmissionService<S>>>,
    headers: HeaderMap,
    Path(inventory_id): Path<u64>,
    axum::Json(annotation): axum::Json<InventoryAnnotation>,
) -> Response {
    match service
        .annotate_inventory(
            identity_from(&headers),
            ResourceId(inventory_id),
            annotation,
        )
        .await
    {
        Ok(inventory) => ok_json(inventory),
        Err(err) => error_response(err),
    }
}

async fn submit_inventory<S: ResourceStore>(
    State(service): State<Arc<SubmissionService<S>>>,
    headers: HeaderMap,
    Path(inventory_id): Path<u64>,
) -> Response {
    match service
        .submit_inventory(identity_from(&headers), ResourceId(inventory_id))
        .await
    {
        Ok(inventory) => ok_json(inventory),
        Err(err) => error_response(err),
    }
}

async fn review_inventory<S: ResourceStore>(
    State(service): State<Arc<SubmissionService<S>>>,
    headers: HeaderMap,
    Path(inventory_id): Path<u64>,
) -> Response {
    match service
        .review_inventory(identity_from(&headers), ResourceId(inventory_id))
        .await
    {
        Ok(inventory) => ok_json(inventory),
        Err(err) => error_response(err),
    }
}

async fn approve_inventory<S: ResourceStore>(
    State(service): State<Arc<SubmissionService<S>>>,
    headers: HeaderMap,
    Path(inventory_id): Path<u64>,
) -> Response {
    match service
        .approve_inventory(identity_from(&headers), ResourceId(inventory_id))
        .await
    {
        Ok(inventory) => ok_json(inventory),
        Err(err) => error_response(err),
    }
}

async fn authorize_inventory<S: ResourceStore>(
    State(service): State<Arc<SubmissionService<S>>>,
    headers: HeaderMap,
    Path(inventory_id): Path<u64>,
) -> Response {
    match service
        .authorize_inventory(identity_from(&headers), ResourceId(inventory_id))
        .await
    {
        Ok(inventory) => ok_json(inventory),
        Err(err) => error_response(err),
    }
}

async fn create_well<S: ResourceStore>(
    State(service): State<Arc<SubmissionService<S>>>,
    headers: HeaderMap,
    Path(inventory_id): Path<u64>,
    axum::Json(input): axum::Json<NewWell>,
) -> Response {
    match service
        .create_well(identity_from(&headers), ResourceId(inventory_id), input)
        .await
    {
        Ok(well) => (StatusCode::CREATED, axum::Json(well)).into_response(),
        Err(err) => error_response(err),
    }
}

async fn update_well<S: ResourceStore>(
    State(service): State<Arc<SubmissionService<S>>>,
    headers: HeaderMap,
    Path(well_id): Path<u64>,
    axum::Json(patch): axum::Json<WellPatch>,
) -> Response {
    match service
        .update_well(identity_from(&headers), ResourceId(well_id), patch)
        .await
    {
        Ok(well) => ok_json(well),
        Err(err) => error_response(err),
    }
}

async fn list_notifications<S: ResourceStore>(
    State(service): State<Arc<SubmissionService<S>>>,
    headers: HeaderMap,
) -> Response {
    match service.list_notifications(identity_from(&headers)).await {
        Ok(views) => ok_json(views),
        Err(err) => error_response(err),
    }
}

async fn read_notification<S: ResourceStore>(
    State(service): State<Arc<SubmissionService<S>>>,
    headers: HeaderMap,
    Path(receipt_id): Path<u64>,
) -> Response {
    match service
        .read_notification(identity_from(&headers), ResourceId(receipt_id))
        .await
    {
        Ok(view) => ok_json(view),
        Err(err) => error_response(err),
    }
}

async fn delete_notification<S: ResourceStore>(
    State(service): State<Arc<SubmissionService<S>>>,
    headers: HeaderMap,
    Path(receipt_id): Path<u64>,
) -> Response {
    match service
        .delete_notification(identity_from(&headers), ResourceId(receipt_id))
        .await
    {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err),
    }
}
