pub mod metrics;
pub mod tracing;

pub use metrics::{HTTP_REQUESTS_TOTAL, HTTP_REQUEST_DURATION, metrics_middleware};
pub use tracing::{REQUEST_ID_HEADER, request_id_middleware};
