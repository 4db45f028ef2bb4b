//! # RDI Infrastructure
//!
//! Infrastructure implementations of the `rdi-core` ports.
//!
//! This crate contains:
//! - The reqwest-based HTTP client
//! - Session management, action polling and error normalization for RDI
//! - `RdiApiClient`, the [`rdi_core::PipelineTransport`] implementation
//! - Configuration loading
//!
//! ## Architecture
//! - Implements traits defined in `rdi-core`
//! - Depends on `rdi-domain` and `rdi-core`
//! - Contains all "impure" code (network, environment, files)

pub mod config;
pub mod errors;
pub mod http;
pub mod rdi;

// Re-export commonly used items
pub use errors::InfraError;
pub use http::{HttpClient, HttpClientBuilder};
pub use rdi::{ActionPoller, RdiApiClient, SessionManager};
