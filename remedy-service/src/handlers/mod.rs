pub mod health;
pub mod metrics;
pub mod remedies;
pub mod speech;
pub mod summary;

pub use health::{health_check, readiness_check};
pub use metrics::metrics;
pub use remedies::get_remedies;
pub use speech::text_to_speech;
pub use summary::get_summary;
