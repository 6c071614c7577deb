//! Upstream provider credentials carried by an inbound request.

use std::fmt;

/// The access token and integration identifier a caller supplies for the
/// embedding and completion providers.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub token: String,
    pub integration_id: String,
}

impl Credentials {
    pub fn new(token: impl Into<String>, integration_id: impl Into<String>) -> Self {
        Self { token: token.into(), integration_id: integration_id.into() }
    }

    /// A copy of these credentials presenting a different integration id.
    pub fn with_integration_id(&self, integration_id: impl Into<String>) -> Self {
        Self { token: self.token.clone(), integration_id: integration_id.into() }
    }
}

// Tokens must never end up in logs.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("token", &"<redacted>")
            .field("integration_id", &self.integration_id)
            .finish()
    }
}
