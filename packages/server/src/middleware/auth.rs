//! Bearer-token credential gate.
//!
//! Every action declares `401 Unauthorized`. When the registry is configured
//! with an API token, requests must carry `Authorization: Bearer <token>`;
//! otherwise the gate is open. There is no per-resource authorization.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};

use crate::{error::AppError, handlers::AppState};

/// Axum `from_fn_with_state` middleware enforcing the configured bearer token.
pub async fn require_token(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    if let Some(expected) = state.config.api_token.as_deref() {
        let presented = bearer_token(&req).ok_or_else(|| {
            AppError::Unauthorized("missing bearer token in Authorization header".into())
        })?;
        if !constant_time_eq(presented.as_bytes(), expected.as_bytes()) {
            tracing::debug!("rejected request with invalid bearer token");
            return Err(AppError::Unauthorized("invalid bearer token".into()));
        }
    }
    Ok(next.run(req).await)
}

/// Extract the token from an `Authorization: Bearer <token>` header.
fn bearer_token(req: &Request) -> Option<&str> {
    let value = req.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
