//! Remedy Service - herbal remedy lookup, summaries and speech over HTTP.

pub mod config;
pub mod handlers;
pub mod models;
pub mod services;
pub mod startup;
pub mod utils;
