//! Assembles the Axum [`Router`] from the route table.

use std::sync::Arc;

use axum::{
    http::{Method, Uri},
    middleware,
    routing::{delete, get, post},
    Router,
};
use resource_registry_api::action;
use tower_http::trace::TraceLayer;

use crate::{
    config::RegistryConfig,
    error::AppError,
    handlers::{resource, AppState},
    middleware::auth::require_token,
    storage::Storage,
};

/// Build the complete application router with shared state.
///
/// Paths come from the API crate's route table; read and delete share a
/// path and are merged into one method router.
pub fn build_router(storage: Arc<dyn Storage>, config: RegistryConfig) -> Router {
    let state = AppState { storage, config };

    Router::new()
        .route(action::REGISTER.path, post(resource::register))
        .route(action::READ.path, get(resource::read))
        .route(action::DELETE.path, delete(resource::delete))
        .method_not_allowed_fallback(method_not_allowed)
        .fallback(no_such_route)
        .layer(middleware::from_fn_with_state(state.clone(), require_token))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

async fn no_such_route(method: Method, uri: Uri) -> AppError {
    AppError::NotFound(format!("no action for {method} {}", uri.path()))
}

async fn method_not_allowed(method: Method, uri: Uri) -> AppError {
    AppError::MethodNotAllowed(format!("{method} is not allowed on {}", uri.path()))
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
        response::Response,
    };
    use http_body_util::BodyExt;
    use resource_registry_api::{
        Action, JsonApiErrors, MediaType, RegisterResourceResponseMedia, ResourceMedia,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::storage::{memory::MemoryStorage, ResourceRecord, StorageError};

    fn build_app() -> (Router, Arc<MemoryStorage>) {
        build_app_with(RegistryConfig::ephemeral())
    }

    fn build_app_with(config: RegistryConfig) -> (Router, Arc<MemoryStorage>) {
        let mem = Arc::new(MemoryStorage::new());
        let storage: Arc<dyn Storage> = Arc::clone(&mem) as Arc<dyn Storage>;
        (build_router(storage, config), mem)
    }

    fn post_json(body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/resource")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn bare(method: &str, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    async fn json_body(resp: Response) -> Value {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn assert_declared(action: &str, resp: &Response) {
        let action = Action::find(action).unwrap();
        let status = resp.status().as_u16();
        let declared = action
            .response(status)
            .unwrap_or_else(|| panic!("{} emitted undeclared {status}", action.name));
        if let Some(media) = declared.media {
            assert_eq!(resp.headers()[header::CONTENT_TYPE], media);
        }
    }

    // --- register ------------------------------------------------------------

    #[tokio::test]
    async fn register_generates_id_when_absent() {
        let (app, mem) = build_app();
        let resp = app.oneshot(post_json(json!({ "type": "area" }))).await.unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
        assert_declared("register", &resp);

        let location = resp.headers()[header::LOCATION].to_str().unwrap().to_string();
        let body: RegisterResourceResponseMedia =
            serde_json::from_value(json_body(resp).await).unwrap();
        let id = body.resource_id.unwrap();
        assert!(uuid::Uuid::parse_str(&id).is_ok(), "generated id {id}");
        assert_eq!(location, format!("/resource/{id}"));

        let stored = mem.get_resource(&id).await.unwrap().unwrap();
        assert_eq!(stored.resource_type, "area");
        assert!(stored.resource_scopes.is_empty());
    }

    #[tokio::test]
    async fn register_keeps_supplied_id_and_accepts_vendor_content_type() {
        let (app, _mem) = build_app();
        let req = Request::builder()
            .method("POST")
            .uri("/resource")
            .header(
                header::CONTENT_TYPE,
                resource_registry_api::RegisterResourceMedia::IDENTIFIER,
            )
            .body(Body::from(
                json!({ "type": "area", "resource_id": "my-area" }).to_string(),
            ))
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
        assert_eq!(json_body(resp).await["resource_id"], "my-area");
    }

    #[tokio::test]
    async fn register_blank_id_is_generated() {
        let (app, _mem) = build_app();
        let resp = app
            .oneshot(post_json(json!({ "type": "area", "resource_id": "" })))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
        let id = json_body(resp).await["resource_id"].as_str().unwrap().to_string();
        assert!(!id.is_empty());
    }

    #[tokio::test]
    async fn register_without_type_returns_400() {
        let (app, mem) = build_app();
        let resp = app
            .oneshot(post_json(json!({ "resource_id": "x" })))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_declared("register", &resp);
        let body: JsonApiErrors = serde_json::from_value(json_body(resp).await).unwrap();
        assert_eq!(body.errors[0].status.as_deref(), Some("400"));
        assert!(mem.is_empty());
    }

    #[tokio::test]
    async fn register_malformed_json_returns_400() {
        let (app, _mem) = build_app();
        let req = Request::builder()
            .method("POST")
            .uri("/resource")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_declared("register", &resp);
    }

    #[tokio::test]
    async fn register_wrong_content_type_returns_400() {
        let (app, _mem) = build_app();
        let req = Request::builder()
            .method("POST")
            .uri("/resource")
            .header(header::CONTENT_TYPE, "text/plain")
            .body(Body::from(json!({ "type": "area" }).to_string()))
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_declared("register", &resp);
    }

    #[tokio::test]
    async fn register_wrong_field_type_returns_400() {
        let (app, _mem) = build_app();
        let resp = app.oneshot(post_json(json!({ "type": 42 }))).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn register_duplicate_id_returns_400() {
        let (app, mem) = build_app();
        mem.put_resource(&ResourceRecord::new("taken", "area"))
            .await
            .unwrap();
        let resp = app
            .oneshot(post_json(json!({ "type": "area", "resource_id": "taken" })))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_declared("register", &resp);
    }

    #[tokio::test]
    async fn register_unknown_parent_returns_404() {
        let (app, mem) = build_app();
        let resp = app
            .oneshot(post_json(
                json!({ "type": "area", "parent_resource_id": "ghost" }),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_declared("register", &resp);
        assert!(mem.is_empty());
    }

    #[tokio::test]
    async fn register_parent_of_other_type_returns_400() {
        let (app, mem) = build_app();
        mem.put_resource(&ResourceRecord::new("space-1", "space"))
            .await
            .unwrap();
        let resp = app
            .oneshot(post_json(
                json!({ "type": "area", "parent_resource_id": "space-1" }),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(mem.len(), 1);
    }

    #[tokio::test]
    async fn register_child_of_same_type_records_parent() {
        let (app, mem) = build_app();
        mem.put_resource(&ResourceRecord::new("root", "area"))
            .await
            .unwrap();
        let resp = app
            .oneshot(post_json(json!({
                "type": "area",
                "parent_resource_id": "root",
                "resource_id": "child"
            })))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
        let child = mem.get_resource("child").await.unwrap().unwrap();
        assert_eq!(child.parent_resource_id.as_deref(), Some("root"));
    }

    // --- read ----------------------------------------------------------------

    #[tokio::test]
    async fn read_returns_resource_media() {
        let (app, mem) = build_app();
        let mut record = ResourceRecord::new("r1", "area");
        record.resource_scopes = vec!["view".into()];
        mem.put_resource(&record).await.unwrap();

        let resp = app.oneshot(bare("GET", "/resource/r1")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_declared("read", &resp);
        assert_eq!(
            resp.headers()[header::CONTENT_TYPE],
            ResourceMedia::IDENTIFIER
        );

        let body = json_body(resp).await;
        assert_eq!(
            body,
            json!({ "resource_scopes": ["view"], "type": "area", "resource_id": "r1" })
        );
    }

    #[tokio::test]
    async fn read_unknown_returns_404() {
        let (app, _mem) = build_app();
        let resp = app.oneshot(bare("GET", "/resource/nope")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_declared("read", &resp);
        let body: JsonApiErrors = serde_json::from_value(json_body(resp).await).unwrap();
        assert!(body.first_detail().unwrap().contains("nope"));
    }

    #[tokio::test]
    async fn read_decodes_percent_encoded_ids() {
        let (app, mem) = build_app();
        mem.put_resource(&ResourceRecord::new("a b", "area"))
            .await
            .unwrap();
        let resp = app.oneshot(bare("GET", "/resource/a%20b")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    // --- delete --------------------------------------------------------------

    #[tokio::test]
    async fn delete_returns_204_then_404() {
        let (app, mem) = build_app();
        mem.put_resource(&ResourceRecord::new("r1", "area"))
            .await
            .unwrap();

        let resp = app
            .clone()
            .oneshot(bare("DELETE", "/resource/r1"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
        assert_declared("delete", &resp);
        assert!(mem.is_empty());

        let resp = app.oneshot(bare("DELETE", "/resource/r1")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_declared("delete", &resp);
    }

    // --- credential gate -----------------------------------------------------

    fn guarded() -> (Router, Arc<MemoryStorage>) {
        let mut config = RegistryConfig::ephemeral();
        config.api_token = Some("s3cret".into());
        build_app_with(config)
    }

    #[tokio::test]
    async fn every_action_requires_token_when_configured() {
        for (name, req) in [
            ("register", post_json(json!({ "type": "area" }))),
            ("read", bare("GET", "/resource/r1")),
            ("delete", bare("DELETE", "/resource/r1")),
        ] {
            let (app, _mem) = guarded();
            let resp = app.oneshot(req).await.unwrap();
            assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "{name}");
            assert_declared(name, &resp);
        }
    }

    #[tokio::test]
    async fn wrong_token_returns_401_and_right_token_passes() {
        let (app, mem) = guarded();
        mem.put_resource(&ResourceRecord::new("r1", "area"))
            .await
            .unwrap();

        let wrong = Request::builder()
            .uri("/resource/r1")
            .header(header::AUTHORIZATION, "Bearer nope")
            .body(Body::empty())
            .unwrap();
        let resp = app.clone().oneshot(wrong).await.unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let right = Request::builder()
            .uri("/resource/r1")
            .header(header::AUTHORIZATION, "Bearer s3cret")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(right).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    // --- requests outside the route table ------------------------------------

    async fn assert_jsonapi_error(resp: Response, status: StatusCode) -> JsonApiErrors {
        assert_eq!(resp.status(), status);
        assert_eq!(resp.headers()[header::CONTENT_TYPE], JsonApiErrors::IDENTIFIER);
        serde_json::from_value(json_body(resp).await).unwrap()
    }

    #[tokio::test]
    async fn unsupported_method_renders_jsonapi_405() {
        for (method, uri) in [("GET", "/resource"), ("PUT", "/resource/x")] {
            let (app, _mem) = build_app();
            let resp = app.oneshot(bare(method, uri)).await.unwrap();
            let body = assert_jsonapi_error(resp, StatusCode::METHOD_NOT_ALLOWED).await;
            assert_eq!(body.first_code(), Some("method_not_allowed"));
            assert!(body.first_detail().unwrap().contains(method));
        }
    }

    #[tokio::test]
    async fn unknown_path_renders_jsonapi_404() {
        for uri in ["/resource/", "/elsewhere"] {
            let (app, _mem) = build_app();
            let resp = app.oneshot(bare("GET", uri)).await.unwrap();
            let body = assert_jsonapi_error(resp, StatusCode::NOT_FOUND).await;
            assert_eq!(body.first_code(), Some("not_found"));
        }
    }

    // --- storage failures ----------------------------------------------------

    /// Storage whose every call fails with a backend error.
    struct FailingStorage;

    #[async_trait::async_trait]
    impl Storage for FailingStorage {
        async fn put_resource(&self, _: &ResourceRecord) -> Result<(), StorageError> {
            Err(StorageError::Internal("disk full at /var/lib/registry".into()))
        }

        async fn get_resource(&self, _: &str) -> Result<Option<ResourceRecord>, StorageError> {
            Err(StorageError::Internal("disk full at /var/lib/registry".into()))
        }

        async fn delete_resource(&self, _: &str) -> Result<(), StorageError> {
            Err(StorageError::Internal("disk full at /var/lib/registry".into()))
        }
    }

    #[tokio::test]
    async fn storage_failure_renders_generic_500_for_every_action() {
        for (name, req) in [
            ("register", post_json(json!({ "type": "area" }))),
            ("read", bare("GET", "/resource/r1")),
            ("delete", bare("DELETE", "/resource/r1")),
        ] {
            let app = build_router(Arc::new(FailingStorage), RegistryConfig::ephemeral());
            let resp = app.oneshot(req).await.unwrap();
            assert_declared(name, &resp);
            let body = assert_jsonapi_error(resp, StatusCode::INTERNAL_SERVER_ERROR).await;
            assert_eq!(body.first_code(), Some("internal_error"), "{name}");
            assert_eq!(
                body.first_detail(),
                Some("an internal error occurred"),
                "{name}"
            );
        }
    }
}
