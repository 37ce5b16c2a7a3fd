//! Request-processing pipeline.
//!
//! # Data Flow
//! ```text
//! RequestHead + body
//!     → descriptor.rs (method, url, headers, rawHeaders, size)
//!     → stages, strictly in order:
//!         response headers → body → counter → status → delay
//!     → OutboundResponse::finalize (JSON body)
//! ```
//!
//! # Design Decisions
//! - Stages mutate one `Exchange`; none runs before the previous one completes
//! - `size` is computed once when the descriptor is built
//! - The counter store is the only state shared between requests

pub mod counter;
pub mod descriptor;
pub mod directives;
pub mod error;
pub mod limits;
pub mod size;
pub mod stages;

use axum::body::Body;
use futures_util::future::BoxFuture;

use crate::http::request::RequestHead;
use crate::http::response::OutboundResponse;

pub use counter::CounterStore;
pub use descriptor::ResponseDescriptor;
pub use error::PipelineError;

/// One request in flight: its descriptor, its payload and the response being built.
#[derive(Debug)]
pub struct Exchange {
    pub descriptor: ResponseDescriptor,
    pub response: OutboundResponse,
    body: Option<Body>,
    body_limit: usize,
}

impl Exchange {
    /// Create an exchange with a fresh descriptor and a default response.
    pub fn new(head: &RequestHead, body: Body, body_limit: usize) -> Self {
        Self {
            descriptor: ResponseDescriptor::from_head(head),
            response: OutboundResponse::new(),
            body: Some(body),
            body_limit,
        }
    }

    /// Value of a mock directive header, `None` if absent or empty.
    pub fn directive(&self, name: &str) -> Option<&str> {
        directives::directive(&self.descriptor.headers, name)
    }

    /// Take the request payload; later calls return `None`.
    pub fn take_body(&mut self) -> Option<Body> {
        self.body.take()
    }

    /// Get the maximum payload size in bytes.
    pub fn body_limit(&self) -> usize {
        self.body_limit
    }
}

/// A unit of the fixed-order pipeline.
pub trait Stage: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Inspect the request and mutate the exchange. May suspend.
    fn process<'a>(&'a self, exchange: &'a mut Exchange) -> BoxFuture<'a, Result<(), PipelineError>>;
}

/// Ordered list of stages run for every request.
pub struct Pipeline {
    stages: Vec<Box<dyn Stage>>,
}

impl Pipeline {
    /// The standard stage order.
    pub fn new(counters: CounterStore) -> Self {
        Self {
            stages: vec![
                Box::new(stages::ResponseHeaderStage),
                Box::new(stages::BodyStage),
                Box::new(stages::CounterStage::new(counters)),
                Box::new(stages::StatusStage),
                Box::new(stages::DelayStage),
            ],
        }
    }

    /// Stage names in execution order.
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    /// Run every stage in order, stopping at the first failure.
    pub async fn execute(&self, exchange: &mut Exchange) -> Result<(), PipelineError> {
        for stage in &self.stages {
            tracing::trace!(stage = stage.name(), "Running stage");
            stage.process(exchange).await?;
        }
        Ok(())
    }
}
