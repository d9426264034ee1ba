//! service-core: Shared HTTP infrastructure for the relay service.
pub mod config;
pub mod error;
pub mod middleware;
pub mod observability;
