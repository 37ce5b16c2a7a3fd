//! `x-mock-body`: resolve the echoed body.

use futures_util::future::BoxFuture;

use crate::pipeline::directives::{MIRROR_URL, X_MOCK_BODY};
use crate::pipeline::{Exchange, PipelineError, Stage};

/// Literal override, `mirror-url` for the request target, or the payload itself.
pub struct BodyStage;

impl Stage for BodyStage {
    fn name(&self) -> &'static str {
        "body"
    }

    fn process<'a>(&'a self, exchange: &'a mut Exchange) -> BoxFuture<'a, Result<(), PipelineError>> {
        Box::pin(async move {
            let body = match exchange.directive(X_MOCK_BODY).map(str::to_owned) {
                Some(value) if value == MIRROR_URL => exchange.descriptor.url.clone(),
                Some(value) => value,
                None => read_payload(exchange).await?,
            };
            exchange.descriptor.body = Some(body);
            Ok(())
        })
    }
}

/// Drain the request payload and decode it as text.
async fn read_payload(exchange: &mut Exchange) -> Result<String, PipelineError> {
    let Some(body) = exchange.take_body() else {
        return Ok(String::new());
    };
    let bytes = axum::body::to_bytes(body, exchange.body_limit())
        .await
        .map_err(PipelineError::BodyRead)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
