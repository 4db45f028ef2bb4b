//! Domain types and models
//!
//! Shapes exchanged with RDI, both as this client sees them and as they travel
//! on the wire.

pub mod action;
pub mod connections;
pub mod dry_run;
pub mod instance;
pub mod pipeline;
pub mod session;
pub mod statistics;

pub use action::{ActionHandle, ActionOutcome, ActionState, ActionStatusReply, PipelineAction};
pub use connections::{
    SourceConnectionResult, TargetConnectionResult, TargetConnectionStatus,
    TestConnectionsResponse,
};
pub use dry_run::{DryRunJobRequest, DryRunJobResponse, DryRunJobResult, DryRunStatus};
pub use instance::RdiInstance;
pub use pipeline::RdiPipeline;
pub use session::SessionToken;
pub use statistics::StatisticsResult;
