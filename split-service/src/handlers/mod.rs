pub mod health;
pub mod splits;

pub use health::{health_check, metrics_endpoint, not_found, readiness_check};
