//! Statistics result
//!
//! Statistics are advisory: a failed fetch is reported in-band so a UI that is
//! merely polling health is never interrupted by an error.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum StatisticsResult {
    Success { data: Value },
    Failed { error: String },
}

impl StatisticsResult {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn data(&self) -> Option<&Value> {
        match self {
            Self::Success { data } => Some(data),
            Self::Failed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Success { .. } => None,
            Self::Failed { error } => Some(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_wire_shape() {
        let ok = StatisticsResult::Success { data: json!({ "a": 1 }) };
        assert_eq!(serde_json::to_value(&ok).unwrap(), json!({ "status": "success", "data": { "a": 1 } }));

        let failed = StatisticsResult::Failed { error: "Unauthorized".into() };
        assert_eq!(
            serde_json::to_value(&failed).unwrap(),
            json!({ "status": "failed", "error": "Unauthorized" })
        );
        assert_eq!(failed.error(), Some("Unauthorized"));
        assert!(failed.data().is_none());
    }
}
