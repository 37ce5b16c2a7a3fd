//! Status-code resolution.
//!
//! Precedence, first match wins:
//! 1. `x-mock-status`, used verbatim
//! 2. single-header length limit exceeded
//! 3. aggregate header length limit exceeded
//! 4. 200

use std::collections::BTreeMap;

use axum::http::StatusCode;
use futures_util::future::BoxFuture;

use crate::pipeline::directives::{directive, parse_int, X_MOCK_STATUS};
use crate::pipeline::limits::{all_headers_limit_status, single_header_limit_status};
use crate::pipeline::{Exchange, PipelineError, Stage};

/// Sets the response status from explicit and limit directives.
pub struct StatusStage;

impl Stage for StatusStage {
    fn name(&self) -> &'static str {
        "status"
    }

    fn process<'a>(&'a self, exchange: &'a mut Exchange) -> BoxFuture<'a, Result<(), PipelineError>> {
        Box::pin(async move {
            exchange.response.status = resolve_status(&exchange.descriptor.headers)?;
            Ok(())
        })
    }
}

/// Pick the response status from the normalized request headers.
pub fn resolve_status(headers: &BTreeMap<String, String>) -> Result<StatusCode, PipelineError> {
    if let Some(raw) = directive(headers, X_MOCK_STATUS) {
        let code = parse_int(raw).ok_or_else(|| PipelineError::InvalidStatus(raw.to_string()))?;
        return to_status(code);
    }

    if let Some(code) = single_header_limit_status(headers) {
        return to_status(code);
    }

    if let Some(code) = all_headers_limit_status(headers) {
        return to_status(code);
    }

    Ok(StatusCode::OK)
}

/// Anything the status line can carry (100..=999) is accepted.
fn to_status(code: i64) -> Result<StatusCode, PipelineError> {
    u16::try_from(code)
        .ok()
        .and_then(|c| StatusCode::from_u16(c).ok())
        .ok_or_else(|| PipelineError::InvalidStatus(code.to_string()))
}
