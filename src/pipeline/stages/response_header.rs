//! `x-mock-response-header`: inject arbitrary response headers.

use axum::http::{HeaderMap, HeaderName, HeaderValue};
use futures_util::future::BoxFuture;
use serde_json::Value;

use crate::pipeline::directives::X_MOCK_RESPONSE_HEADER;
use crate::pipeline::{Exchange, PipelineError, Stage};

/// Why an injection directive could not be applied.
#[derive(Debug, thiserror::Error)]
pub enum HeaderInjectionError {
    #[error("{0}")]
    Json(#[from] serde_json::Error),

    #[error("expected a JSON object mapping header names to values")]
    NotAnObject,

    #[error("invalid header name {0:?}")]
    InvalidName(String),

    #[error("invalid value for header {0:?}")]
    InvalidValue(String),
}

/// Sets every header of the JSON object directive on the response.
///
/// A malformed directive never fails the request; its message is recorded on
/// the descriptor and headers applied before the failure stay applied.
pub struct ResponseHeaderStage;

impl Stage for ResponseHeaderStage {
    fn name(&self) -> &'static str {
        "response-header"
    }

    fn process<'a>(&'a self, exchange: &'a mut Exchange) -> BoxFuture<'a, Result<(), PipelineError>> {
        Box::pin(async move {
            let Some(raw) = exchange.directive(X_MOCK_RESPONSE_HEADER).map(str::to_owned) else {
                return Ok(());
            };

            if let Err(e) = apply_response_headers(&raw, &mut exchange.response.headers) {
                tracing::debug!(error = %e, "Malformed x-mock-response-header");
                exchange.descriptor.x_mock_response_header_error = Some(e.to_string());
            }
            Ok(())
        })
    }
}

/// Parse `raw` as a JSON object and set its entries on `headers`.
///
/// Scalars replace any existing value; arrays set one value per element.
pub fn apply_response_headers(raw: &str, headers: &mut HeaderMap) -> Result<(), HeaderInjectionError> {
    let Value::Object(entries) = serde_json::from_str::<Value>(raw)? else {
        return Err(HeaderInjectionError::NotAnObject);
    };

    for (name, value) in entries {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| HeaderInjectionError::InvalidName(name.clone()))?;

        match value {
            Value::Array(items) => {
                let values = items
                    .iter()
                    .map(|item| header_value(&name, item))
                    .collect::<Result<Vec<_>, _>>()?;
                headers.remove(&header_name);
                for v in values {
                    headers.append(header_name.clone(), v);
                }
            }
            scalar => {
                headers.insert(header_name, header_value(&name, &scalar)?);
            }
        }
    }
    Ok(())
}

fn header_value(name: &str, value: &Value) -> Result<HeaderValue, HeaderInjectionError> {
    let text = match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return Err(HeaderInjectionError::InvalidValue(name.to_string())),
    };
    let invalid = || HeaderInjectionError::InvalidValue(name.to_string());

    // one octet per char, mirroring how request header values are decoded
    let octets = text
        .chars()
        .map(|c| u8::try_from(u32::from(c)).map_err(|_| invalid()))
        .collect::<Result<Vec<u8>, _>>()?;
    HeaderValue::from_bytes(&octets).map_err(|_| invalid())
}
