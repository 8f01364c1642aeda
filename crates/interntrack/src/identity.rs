//! Caller identity for routes that touch user-owned records.
//!
//! Authentication happens upstream (the gateway validates the session and
//! forwards the subject as an opaque id); every state-machine operation takes
//! that id as an explicit argument rather than reading ambient request state.

use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt;

pub const IDENTITY_HEADER: &str = "x-user-id";

/// Opaque identifier of an authenticated user.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Read the forwarded identity header, rejecting the request when absent.
pub fn caller_identity(headers: &HeaderMap) -> Result<UserId, Response> {
    let subject = headers
        .get(IDENTITY_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty());

    match subject {
        Some(subject) => Ok(UserId(subject.to_string())),
        None => {
            let payload = json!({ "error": format!("missing {IDENTITY_HEADER} header") });
            Err((StatusCode::UNAUTHORIZED, Json(payload)).into_response())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn extracts_trimmed_subject() {
        let mut headers = HeaderMap::new();
        headers.insert(IDENTITY_HEADER, HeaderValue::from_static(" user-7 "));
        let identity = caller_identity(&headers).expect("identity present");
        assert_eq!(identity, UserId::from("user-7"));
    }

    #[test]
    fn rejects_missing_header() {
        let headers = HeaderMap::new();
        let response = caller_identity(&headers).expect_err("identity absent");
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn rejects_blank_header() {
        let mut headers = HeaderMap::new();
        headers.insert(IDENTITY_HEADER, HeaderValue::from_static("   "));
        assert!(caller_identity(&headers).is_err());
    }
}
