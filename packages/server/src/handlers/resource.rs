//! Resource handlers: register, read, and delete.
//!
//! - `POST   /resource` — register a new resource.
//! - `GET    /resource/{resourceId}` — read a specific resource.
//! - `DELETE /resource/{resourceId}` — delete a resource.
//!
//! A resource may name a parent, which must already be registered and be of
//! the same type. Deleting a parent leaves its children in place.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::{header, HeaderValue, StatusCode},
    response::IntoResponse,
    Json,
};
use resource_registry_api::{
    action, RegisterResourceMedia, RegisterResourceResponseMedia, ResourceMedia,
};

use crate::{
    error::AppError,
    storage::{ResourceRecord, StorageError},
};

use super::{AppState, MediaJson};

/// `POST /resource` — register a new resource.
///
/// Returns 201 with the identifier of the stored resource and a `Location`
/// header pointing at it. A blank or absent `resource_id` is replaced by a
/// freshly generated UUIDv7.
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterResourceMedia>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    // validate() guarantees a non-blank type.
    let resource_type = payload.resource_type.clone().unwrap_or_default();

    // Parent existence and type are checked by storage, atomically with the insert.
    let parent_resource_id = payload.parent_id().map(str::to_string);

    let resource_id = payload
        .requested_id()
        .map(str::to_string)
        .unwrap_or_else(|| uuid::Uuid::now_v7().to_string());

    let record = ResourceRecord {
        resource_id: resource_id.clone(),
        resource_type,
        parent_resource_id,
        resource_scopes: Vec::new(),
    };
    state.storage.put_resource(&record).await?;

    tracing::info!(
        resource_id = %record.resource_id,
        resource_type = %record.resource_type,
        parent = ?record.parent_resource_id,
        "resource registered"
    );

    let location = action::READ.url_path(&resource_id);
    let mut resp = (
        StatusCode::CREATED,
        MediaJson(RegisterResourceResponseMedia {
            resource_id: Some(resource_id),
        }),
    )
        .into_response();
    if let Ok(v) = HeaderValue::from_str(&location) {
        resp.headers_mut().insert(header::LOCATION, v);
    }
    Ok(resp)
}

/// `GET /resource/{resourceId}` — read a specific resource.
///
/// Returns 404 if the identifier is not registered.
pub async fn read(
    State(state): State<AppState>,
    resource_id: Result<Path<String>, PathRejection>,
) -> Result<MediaJson<ResourceMedia>, AppError> {
    let Path(resource_id) = resource_id?;

    let record = state
        .storage
        .get_resource(&resource_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("resource {resource_id} not found")))?;

    Ok(MediaJson(record.into()))
}

/// `DELETE /resource/{resourceId}` — delete a resource.
///
/// Returns 204 on success, 404 if the identifier is not registered.
pub async fn delete(
    State(state): State<AppState>,
    resource_id: Result<Path<String>, PathRejection>,
) -> Result<StatusCode, AppError> {
    let Path(resource_id) = resource_id?;

    state
        .storage
        .delete_resource(&resource_id)
        .await
        .map_err(|e| match e {
            StorageError::NotFound => {
                AppError::NotFound(format!("resource {resource_id} not found"))
            }
            other => other.into(),
        })?;

    tracing::info!(resource_id = %resource_id, "resource deleted");
    Ok(StatusCode::NO_CONTENT)
}
