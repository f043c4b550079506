//! Uniform `{ code, message, data }` response envelope.
//!
//! Every endpoint wraps its payload in [`Envelope`]; error responses produce
//! the same shape with `data: null` (see `error.rs`). `code` mirrors the
//! HTTP status of the response.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// Standard response envelope.
#[derive(Debug, Serialize)]
pub struct Envelope<T: Serialize> {
    pub code: u16,
    pub message: String,
    pub data: Option<T>,
}

impl<T: Serialize> Envelope<T> {
    /// 200 envelope with a payload.
    pub fn ok(data: T) -> Self {
        Envelope {
            code: 200,
            message: "Success".to_string(),
            data: Some(data),
        }
    }

    /// 201 envelope with a payload.
    pub fn created(data: T) -> Self {
        Envelope {
            code: 201,
            message: "Created Successfully".to_string(),
            data: Some(data),
        }
    }
}

impl Envelope<()> {
    /// 200 envelope with no payload (used by delete endpoints).
    pub fn success() -> Self {
        Envelope {
            code: 200,
            message: "Success".to_string(),
            data: None,
        }
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.code).unwrap_or(StatusCode::OK);
        (status, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ok_envelope_serializes_with_data() {
        let envelope = Envelope::ok(vec![1, 2, 3]);
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["code"], 200);
        assert_eq!(json["message"], "Success");
        assert_eq!(json["data"], serde_json::json!([1, 2, 3]));
    }

    #[test]
    fn success_envelope_has_null_data() {
        let envelope = Envelope::success();
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["data"], serde_json::Value::Null);
    }
}
