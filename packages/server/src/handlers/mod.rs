//! HTTP request handlers for the `resource` entity.
//!
//! Handlers are async functions that receive Axum extractors and return
//! `Result<impl IntoResponse, AppError>`. Extractor rejections are taken as
//! `Result`s and folded into [`AppError`] so that every failure renders the
//! JSON:API error document with a declared status.

pub mod resource;

use std::sync::Arc;

use axum::{
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
};
use resource_registry_api::MediaType;
use serde::Serialize;

use crate::{config::RegistryConfig, error::AppError, storage::Storage};

/// Shared application state threaded through all Axum handlers via [`axum::extract::State`].
#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<dyn Storage>,
    pub config: RegistryConfig,
}

/// JSON response whose `Content-Type` is the body's media type identifier.
///
/// A body that fails to serialise renders as an internal [`AppError`].
pub struct MediaJson<T>(pub T);

impl<T> IntoResponse for MediaJson<T>
where
    T: MediaType + Serialize,
{
    fn into_response(self) -> Response {
        match serde_json::to_vec(&self.0) {
            Ok(bytes) => (
                [(header::CONTENT_TYPE, HeaderValue::from_static(T::IDENTIFIER))],
                bytes,
            )
                .into_response(),
            Err(e) => {
                AppError::Internal(format!("failed to serialise {}: {e}", T::IDENTIFIER))
                    .into_response()
            }
        }
    }
}
