use exam_core::model::UserId;

/// The signed-in user as seen by the session engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserIdentity {
    pub id: UserId,
    pub email: String,
}

impl UserIdentity {
    #[must_use]
    pub fn new(id: UserId, email: impl Into<String>) -> Self {
        Self {
            id,
            email: email.into(),
        }
    }
}

/// Injected identity accessor.
///
/// Authentication lives outside this system; the session service only
/// ever asks "who, if anyone, is signed in right now". Injecting the
/// accessor (rather than reading ambient globals) keeps submission
/// testable.
pub trait IdentityProvider: Send + Sync {
    fn current_user(&self) -> Option<UserIdentity>;
}

/// Identity fixed at construction. The desktop shell and the tests both
/// use this.
#[derive(Debug, Clone)]
pub struct StaticIdentity(Option<UserIdentity>);

impl StaticIdentity {
    #[must_use]
    pub fn signed_in(id: UserId, email: impl Into<String>) -> Self {
        Self(Some(UserIdentity::new(id, email)))
    }

    #[must_use]
    pub fn signed_out() -> Self {
        Self(None)
    }
}

impl IdentityProvider for StaticIdentity {
    fn current_user(&self) -> Option<UserIdentity> {
        self.0.clone()
    }
}
