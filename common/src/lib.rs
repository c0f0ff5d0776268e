//! Shared types for the AgriScience workspace: crop and disease result
//! mapping, the inference wire protocol, session state and configuration.

pub mod analysis;
pub mod config;
pub mod crop;
pub mod disease;
pub mod error;
pub mod protocol;
pub mod session;
