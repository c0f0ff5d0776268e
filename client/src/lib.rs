//! Clients for the services AgriScience depends on, plus report export.
//!
//! - [`inference`]: crop recommendation and disease detection API
//! - [`auth`]: identity provider (Firebase Identity Toolkit or in-memory)
//! - [`sessions`]: server-side session table
//! - [`report`]: PDF report exporter

pub mod auth;
pub mod fallback;
pub mod inference;
pub mod report;
pub mod sessions;
