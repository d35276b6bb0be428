//! service-core: shared HTTP service infrastructure (errors, config, tracing, middleware).
pub mod config;
pub mod error;
pub mod middleware;
pub mod observability;
