//! Outbound response state shared by the pipeline stages.
//!
//! # Responsibilities
//! - Hold the status and headers stages set directly on the response
//! - Turn the finished descriptor into the JSON body
//!
//! # Design Decisions
//! - Injected headers override defaults, including `content-type`
//! - Framing headers (`date`, `content-length`, `connection`) are added at
//!   the socket level only when no stage set them

use axum::{
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::pipeline::descriptor::ResponseDescriptor;

/// Status and headers of the response under construction.
#[derive(Debug, Clone)]
pub struct OutboundResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
}

impl OutboundResponse {
    /// Create a new response defaulting to 200 with no headers.
    pub fn new() -> Self {
        Self {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
        }
    }

    /// Serialize `descriptor` as the body and attach status and headers.
    pub fn finalize(self, descriptor: ResponseDescriptor) -> Response {
        (self.status, self.headers, Json(descriptor)).into_response()
    }
}

impl Default for OutboundResponse {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::request::RequestHead;
    use axum::http::{header, HeaderValue};

    #[tokio::test]
    async fn injected_headers_override_content_type() {
        let mut outbound = OutboundResponse::new();
        outbound.status = StatusCode::CREATED;
        outbound
            .headers
            .insert(header::CONTENT_TYPE, HeaderValue::from_static("text/plain"));
        outbound.headers.insert("foo", HeaderValue::from_static("bar"));

        let head = RequestHead {
            method: "GET".into(),
            target: "/".into(),
            version: "1.1".into(),
            raw_headers: Vec::new(),
        };
        let response = outbound.finalize(ResponseDescriptor::from_head(&head));

        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(response.headers()["content-type"], "text/plain");
        assert_eq!(response.headers()["foo"], "bar");

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["method"], "GET");
    }
}
