//! RDI client constants
//!
//! Centralized location for the defaults and user-facing messages shared by
//! the client crates.

// Configuration defaults
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 30_000;
pub const DEFAULT_TOKEN_EXPIRY_MARGIN_SECS: u64 = 5;
pub const DEFAULT_WAIT_BEFORE_POLLING_MS: u64 = 1_000;
pub const DEFAULT_POLLING_INTERVAL_MS: u64 = 1_000;
pub const DEFAULT_MAX_POLLING_WAIT_MS: u64 = 120_000;

// Error messages
pub const MSG_DEPLOY_PIPELINE_FAILURE: &str = "Failed to deploy pipeline";
pub const MSG_RESET_PIPELINE_FAILURE: &str = "Failed to reset pipeline";
pub const MSG_STOP_PIPELINE_FAILURE: &str = "Failed to stop pipeline";
pub const MSG_START_PIPELINE_FAILURE: &str = "Failed to start pipeline";
pub const MSG_TIMEOUT_ERROR: &str = "Encountered a timeout error while attempting to retrieve data";
pub const MSG_INVALID_INSTANCE_ID: &str = "Invalid rdi instance id.";
pub const MSG_INVALID_ACCESS_TOKEN: &str = "Invalid access token received from RDI";
