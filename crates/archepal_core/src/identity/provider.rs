//! External identity provider contract.

use crate::model::identity::Identity;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::future::Future;

/// Federated sign-in providers offered by the sign-in page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OAuthProvider {
    Google,
}

impl OAuthProvider {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Google => "google",
        }
    }
}

/// Identity provider fault.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityError {
    /// The provider refused the credentials or the account request.
    Rejected(String),
    /// The provider could not be reached or answered with an internal error.
    Unavailable(String),
}

impl Display for IdentityError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rejected(message) => write!(f, "identity provider rejected request: {message}"),
            Self::Unavailable(message) => write!(f, "identity provider unavailable: {message}"),
        }
    }
}

impl Error for IdentityError {}

/// Operations consumed from the external identity provider.
///
/// Authentication mechanics are opaque here; only the outcome and the
/// resulting identity matter.
pub trait IdentityProvider: Send + Sync {
    /// Returns the provider's current session identity.
    fn current_identity(&self) -> Result<Option<Identity>, IdentityError>;

    fn sign_in_with_email(
        &self,
        email: &str,
        password: &str,
    ) -> impl Future<Output = Result<Identity, IdentityError>> + Send;

    fn sign_up_with_email(
        &self,
        email: &str,
        password: &str,
    ) -> impl Future<Output = Result<Identity, IdentityError>> + Send;

    fn sign_in_with_oauth(
        &self,
        provider: OAuthProvider,
    ) -> impl Future<Output = Result<Identity, IdentityError>> + Send;

    fn sign_out(&self) -> impl Future<Output = Result<(), IdentityError>> + Send;
}
