//! RDI control-plane client
//!
//! [`RdiApiClient`] implements [`rdi_core::PipelineTransport`] on top of three
//! building blocks: the [`SessionManager`] that keeps one bearer token per
//! instance, the [`ActionPoller`] that waits on long-running actions, and
//! the [`normalizer`] that turns any upstream failure into an
//! [`rdi_domain::RdiError`].

mod client;
pub mod normalizer;
mod poller;
mod session;
pub mod urls;

pub use client::RdiApiClient;
pub use poller::ActionPoller;
pub use session::SessionManager;
