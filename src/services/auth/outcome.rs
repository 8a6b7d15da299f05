use crate::services::auth::claims::AuthClaim;

/// Result of authenticating one request.
///
/// Fields are private so that `is_authenticated() == claim().is_some()` always holds.
/// `raw_credential` is kept whenever one was presented, valid or not, for passthrough.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthOutcome {
    is_authenticated: bool,
    claim: Option<AuthClaim>,
    raw_credential: Option<String>,
}

impl AuthOutcome {
    /// No credential was presented.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// A credential was presented but could not be verified or its identity is gone.
    pub fn rejected(raw_credential: String) -> Self {
        Self {
            is_authenticated: false,
            claim: None,
            raw_credential: Some(raw_credential),
        }
    }

    pub fn authenticated(claim: AuthClaim, raw_credential: String) -> Self {
        Self {
            is_authenticated: true,
            claim: Some(claim),
            raw_credential: Some(raw_credential),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.is_authenticated
    }

    pub fn claim(&self) -> Option<&AuthClaim> {
        self.claim.as_ref()
    }

    pub fn raw_credential(&self) -> Option<&str> {
        self.raw_credential.as_deref()
    }
}
