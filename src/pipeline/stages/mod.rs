//! The five pipeline stages.
//!
//! Each stage reads directives from the normalized request headers and
//! writes to the descriptor or straight onto the outbound response.

mod body;
mod counter;
mod delay;
mod response_header;
mod status;

pub use body::BodyStage;
pub use counter::CounterStage;
pub use delay::{delay_from, DelayStage};
pub use response_header::{apply_response_headers, HeaderInjectionError, ResponseHeaderStage};
pub use status::{resolve_status, StatusStage};
