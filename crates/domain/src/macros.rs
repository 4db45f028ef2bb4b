//! Macro for implementing Display and FromStr for wire-level status enums
//!
//! RDI reports action states, dry-run results and connection results as bare
//! strings. This macro gives each of those enums a single source of truth for
//! the string form, with case-insensitive parsing.
//!
//! # Example
//!
//! ```rust
//! use rdi_domain::impl_domain_status_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum JobState {
//!     Running,
//!     Stopped,
//! }
//!
//! impl_domain_status_conversions!(JobState {
//!     Running => "running",
//!     Stopped => "stopped",
//! });
//! ```

/// Implements Display and FromStr traits for status enums
///
/// * `$enum_name` - The name of the enum type
/// * `$variant => $str` - Mapping of enum variants to their wire strings
#[macro_export]
macro_rules! impl_domain_status_conversions {
    ($enum_name:ident { $($variant:ident => $str:literal),+ $(,)? }) => {
        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(Self::$variant => write!(f, $str),)+
                }
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.to_lowercase().as_str() {
                    $($str => Ok(Self::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use crate::types::{ActionState, PipelineAction};

    #[test]
    fn test_pipeline_action_display() {
        assert_eq!(PipelineAction::Deploy.to_string(), "deploy");
        assert_eq!(PipelineAction::Reset.to_string(), "reset");
        assert_eq!(PipelineAction::Start.to_string(), "start");
        assert_eq!(PipelineAction::Stop.to_string(), "stop");
    }

    #[test]
    fn test_action_state_parses_any_case() {
        assert_eq!(ActionState::from_str("completed").unwrap(), ActionState::Completed);
        assert_eq!(ActionState::from_str("FAILED").unwrap(), ActionState::Failed);
        assert_eq!(ActionState::from_str("Started").unwrap(), ActionState::Started);
    }

    #[test]
    fn test_unknown_value_names_the_enum() {
        let err = PipelineAction::from_str("restart").unwrap_err();
        assert!(err.contains("PipelineAction"));
        assert!(err.contains("restart"));
    }
}
