//! `x-mock-counter`: bump a shared per-key counter.

use futures_util::future::BoxFuture;

use crate::pipeline::counter::CounterStore;
use crate::pipeline::directives::X_MOCK_COUNTER;
use crate::pipeline::{Exchange, PipelineError, Stage};

/// Stamps the descriptor with the incremented counter for the requested key.
pub struct CounterStage {
    counters: CounterStore,
}

impl CounterStage {
    /// Create a new counter stage backed by `counters`.
    pub fn new(counters: CounterStore) -> Self {
        Self { counters }
    }
}

impl Stage for CounterStage {
    fn name(&self) -> &'static str {
        "counter"
    }

    fn process<'a>(&'a self, exchange: &'a mut Exchange) -> BoxFuture<'a, Result<(), PipelineError>> {
        Box::pin(async move {
            if let Some(key) = exchange.directive(X_MOCK_COUNTER).map(str::to_owned) {
                let value = self.counters.increment(&key);
                tracing::debug!(key = %key, value, "Counter incremented");
                exchange.descriptor.counter = Some(value);
            }
            Ok(())
        })
    }
}
