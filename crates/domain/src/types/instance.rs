//! Instance reference supplied by the external registry

use std::fmt;

use serde::{Deserialize, Serialize};

/// Connection details for one RDI deployment
///
/// Owned by the instance registry; the client only borrows it for the
/// duration of a call.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RdiInstance {
    pub id: String,
    /// Base URL every endpoint path is appended to
    pub url: String,
    pub username: String,
    pub password: String,
}

impl RdiInstance {
    pub fn new(
        id: impl Into<String>,
        url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self { id: id.into(), url: url.into(), username: username.into(), password: password.into() }
    }
}

impl fmt::Debug for RdiInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RdiInstance")
            .field("id", &self.id)
            .field("url", &self.url)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_password() {
        let instance = RdiInstance::new("rdi-1", "http://host", "default", "s3cret");
        let rendered = format!("{instance:?}");
        assert!(rendered.contains("rdi-1"));
        assert!(!rendered.contains("s3cret"));
    }
}
