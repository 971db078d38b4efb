//! Core library for the `weather` tool.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The temperature provider abstraction and its two upstream implementations
//! - The aggregator that queries every provider concurrently under one deadline
//!
//! It is used by `weather-cli`, but can also be reused by other binaries or services.

pub mod aggregator;
pub mod config;
pub mod error;
pub mod model;
pub mod provider;

pub use aggregator::Aggregator;
pub use config::{AggregatorConfig, Config, DEFAULT_DEADLINE, ProviderConfig};
pub use error::AggregateError;
pub use model::TemperatureReport;
pub use provider::{ProviderId, TemperatureProvider};
