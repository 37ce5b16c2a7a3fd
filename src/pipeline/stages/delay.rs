//! `x-mock-delay`: hold the response back.

use std::collections::BTreeMap;
use std::time::Duration;

use futures_util::future::BoxFuture;

use crate::pipeline::directives::{directive, parse_int, X_MOCK_DELAY};
use crate::pipeline::{Exchange, PipelineError, Stage};

/// Runs last, once status and headers are fixed.
pub struct DelayStage;

impl Stage for DelayStage {
    fn name(&self) -> &'static str {
        "delay"
    }

    fn process<'a>(&'a self, exchange: &'a mut Exchange) -> BoxFuture<'a, Result<(), PipelineError>> {
        Box::pin(async move {
            let delay = delay_from(&exchange.descriptor.headers);
            if !delay.is_zero() {
                tracing::debug!(delay_ms = delay.as_millis() as u64, "Delaying response");
                tokio::time::sleep(delay).await;
            }
            Ok(())
        })
    }
}

/// Requested delay; absent, negative or unparsable means none.
pub fn delay_from(headers: &BTreeMap<String, String>) -> Duration {
    directive(headers, X_MOCK_DELAY)
        .and_then(parse_int)
        .and_then(|ms| u64::try_from(ms).ok())
        .map(Duration::from_millis)
        .unwrap_or(Duration::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::request::{RawHeader, RequestHead};
    use axum::body::Body;
    use std::time::Instant;

    fn headers(value: &str) -> BTreeMap<String, String> {
        [(X_MOCK_DELAY.to_string(), value.to_string())].into_iter().collect()
    }

    #[test]
    fn parses_delay_values() {
        assert_eq!(delay_from(&headers("50")), Duration::from_millis(50));
        assert_eq!(delay_from(&headers("-5")), Duration::ZERO);
        assert_eq!(delay_from(&headers("soon")), Duration::ZERO);
        assert_eq!(delay_from(&BTreeMap::new()), Duration::ZERO);
    }

    #[tokio::test]
    async fn waits_at_least_the_requested_time() {
        let head = RequestHead {
            method: "GET".into(),
            target: "/".into(),
            version: "1.1".into(),
            raw_headers: vec![RawHeader::new("X-Mock-Delay", "50")],
        };
        let mut ex = Exchange::new(&head, Body::empty(), 0);

        let started = Instant::now();
        DelayStage.process(&mut ex).await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(50));
    }
}
