//! # RDI Core
//!
//! Business logic layer for the RDI client - no HTTP code.
//!
//! This crate contains:
//! - Port interfaces (traits) for the pipeline transport and the instance
//!   registry
//! - The id-based pipeline service used by the API layer
//!
//! ## Architecture Principles
//! - Only depends on `rdi-domain`
//! - No database, HTTP, or platform code
//! - All external dependencies via traits

pub mod rdi;

// Re-export specific items to avoid ambiguity
pub use rdi::ports::{PipelineTransport, RdiInstanceRepository};
pub use rdi::RdiPipelineService;
