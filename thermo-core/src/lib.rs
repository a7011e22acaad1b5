//! Core library for the `thermo` temperature assistant.
//!
//! This crate defines:
//! - Configuration handling
//! - The relay server that forwards browser requests to the upstream service
//! - The client controller that turns relay responses into display state
//! - Shared domain models (readings, questions, answers)
//!
//! It is used by `thermo-cli`, but can also be reused by other binaries or services.

pub mod client;
pub mod config;
pub mod model;
pub mod relay;
pub mod upstream;

pub use config::{Config, Overrides};
pub use model::{Answer, Measurement, Question, TemperatureReading, Tier};
pub use relay::{RelayError, RelayState, build_router, serve};
pub use upstream::{HttpUpstream, UpstreamService};
