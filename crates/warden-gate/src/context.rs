//! Per-request state handed to the gates.

use warden_core::Identity;

/// What the host knows about the current request.
///
/// Built once per request and passed explicitly; nothing in Warden reads the
/// current user from global state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    identity: Identity,
}

impl RequestContext {
    /// Context for a request made by `identity`.
    pub fn new(identity: Identity) -> Self {
        Self { identity }
    }

    /// Context for an anonymous request.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// The requester.
    pub fn identity(&self) -> &Identity {
        &self.identity
    }
}

impl From<Identity> for RequestContext {
    fn from(identity: Identity) -> Self {
        Self::new(identity)
    }
}
