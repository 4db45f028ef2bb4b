//! Pure helpers for reshaping upstream payloads

pub mod case;
pub mod pipeline;

pub use case::{keys_to_camel_case, to_camel_case};
pub use pipeline::{pipeline_from_wire, pipeline_to_wire};
