// src/logging_middleware.rs
//! Debug-level logging of request and response bodies with secrets redacted

use axum::body::to_bytes;
use axum::{body::Body, extract::Request, http::StatusCode, middleware::Next, response::Response};
use serde_json::Value;
use tracing::{debug, enabled, Level};

const REDACTED_KEYS: [&str; 3] = ["smtp_password", "password", "token"];

/// Replaces the values of secret-bearing keys, at any depth
fn redact(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for (key, inner) in map.iter_mut() {
                if REDACTED_KEYS.contains(&key.as_str()) {
                    *inner = Value::String("***".to_string());
                } else {
                    redact(inner);
                }
            }
        }
        Value::Array(items) => items.iter_mut().for_each(redact),
        _ => {}
    }
}

/// Loggable form of a body; non-JSON bodies are summarized by length
fn describe_body(bytes: &[u8]) -> String {
    match serde_json::from_slice::<Value>(bytes) {
        Ok(mut json) => {
            redact(&mut json);
            json.to_string()
        }
        Err(_) => format!("<{} bytes>", bytes.len()),
    }
}

pub async fn log_request_response(request: Request, next: Next) -> Result<Response, StatusCode> {
    if !enabled!(Level::DEBUG) {
        return Ok(next.run(request).await);
    }

    let (parts, body) = request.into_parts();
    let bytes = to_bytes(body, usize::MAX)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    if !bytes.is_empty() {
        debug!(
            method = %parts.method,
            uri = %parts.uri,
            request_body = %describe_body(&bytes),
            "Request"
        );
    }

    let response = next.run(Request::from_parts(parts, Body::from(bytes))).await;

    let (parts, body) = response.into_parts();
    let bytes = to_bytes(body, usize::MAX)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    if !bytes.is_empty() {
        debug!(
            status = %parts.status,
            response_body = %describe_body(&bytes),
            "Response"
        );
    }

    Ok(Response::from_parts(parts, Body::from(bytes)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redacts_nested_secrets() {
        let body = br#"{"smtp_host":"smtp.example.com","smtp_password":"hunter2","nested":[{"token":"abc"}]}"#;
        let logged = describe_body(body);
        assert!(!logged.contains("hunter2"));
        assert!(!logged.contains("abc"));
        assert!(logged.contains("smtp.example.com"));
    }

    #[test]
    fn test_non_json_body_is_summarized() {
        assert_eq!(describe_body(b"plain text"), "<10 bytes>");
    }
}
