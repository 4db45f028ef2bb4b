//! # RDI Domain
//!
//! Domain types for the RDI pipeline control-plane client.
//!
//! This crate contains:
//! - Instance, session, pipeline and action types
//! - The normalized error type and its stable error codes
//! - Client configuration structures
//! - Pure helpers that reshape wire payloads
//!
//! ## Architecture
//! - No dependencies on other workspace crates
//! - No I/O

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;
pub mod utils;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
