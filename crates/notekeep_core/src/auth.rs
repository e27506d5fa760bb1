//! Request-scoped caller identity.
//!
//! # Responsibility
//! - Carry the identity-provider result into every service call.
//! - Provide the single "who is calling" lookup used by ownership checks.
//!
//! # Invariants
//! - A context is built per request and passed explicitly; there is no
//!   process-wide "current user".
//! - An empty or whitespace-only subject is treated as unauthenticated.
//! - Any other subject is used byte-exact as the owner id.

use crate::model::note::UserId;

/// Authenticated identity reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserIdentity {
    /// Stable subject identifier (the provider's `sub` claim).
    pub subject: String,
}

/// Explicit per-request context handed to service operations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    identity: Option<UserIdentity>,
}

impl RequestContext {
    /// Context for a caller the identity provider has authenticated.
    pub fn authenticated(subject: impl Into<String>) -> Self {
        Self {
            identity: Some(UserIdentity {
                subject: subject.into(),
            }),
        }
    }

    /// Context for a caller with no identity.
    pub fn anonymous() -> Self {
        Self { identity: None }
    }

    /// Builds a context from an optional subject, e.g. a decoded session.
    pub fn from_subject(subject: Option<String>) -> Self {
        match subject {
            Some(subject) => Self::authenticated(subject),
            None => Self::anonymous(),
        }
    }

    /// Returns the caller's owner id, or `None` when unauthenticated.
    pub fn user_id(&self) -> Option<UserId> {
        self.identity
            .as_ref()
            .map(|identity| identity.subject.as_str())
            .filter(|subject| !subject.trim().is_empty())
            .map(UserId::new)
    }

    pub fn is_authenticated(&self) -> bool {
        self.user_id().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::RequestContext;
    use crate::model::note::UserId;

    #[test]
    fn authenticated_context_exposes_subject() {
        let ctx = RequestContext::authenticated("user_123");
        assert_eq!(ctx.user_id(), Some(UserId::new("user_123")));
        assert!(ctx.is_authenticated());
    }

    #[test]
    fn anonymous_and_blank_subjects_are_unauthenticated() {
        assert_eq!(RequestContext::anonymous().user_id(), None);
        assert_eq!(RequestContext::authenticated("   ").user_id(), None);
        assert!(!RequestContext::from_subject(None).is_authenticated());
    }

    #[test]
    fn subject_is_kept_byte_exact() {
        let padded = RequestContext::authenticated(" alice ");
        assert_eq!(padded.user_id(), Some(UserId::new(" alice ")));
        assert_ne!(
            padded.user_id(),
            RequestContext::authenticated("alice").user_id()
        );
    }
}
