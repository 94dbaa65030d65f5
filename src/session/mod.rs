//! Session ownership and gating of protected screens.

pub mod guard;
pub mod login;
pub mod router;

use std::sync::Arc;

use crate::api::Gateway;
use crate::app::Result;
use crate::domain::Credential;
use crate::store::CredentialStore;

pub use guard::{GuardState, SessionGuard};
pub use login::LoginScreen;
pub use router::{RecordingRouter, Route, Router};

/// The signed-in session, owned by the application root and shared by
/// reference with every screen that needs the credential.
pub struct Session {
    store: Arc<dyn CredentialStore>,
}

impl Session {
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self { store }
    }

    /// Copy of the current credential, if any.
    pub fn credential(&self) -> Option<Credential> {
        self.store.read()
    }

    pub fn is_authenticated(&self) -> bool {
        self.credential().is_some()
    }

    /// Exchanges username/password for a token and persists it.
    ///
    /// Nothing is stored unless the server issued a token.
    pub async fn login(&self, gateway: &dyn Gateway, username: &str, password: &str) -> Result<()> {
        let credential = gateway.login(username, password).await?;
        self.store.save(&credential)?;
        tracing::info!("Signed in as {}", username);
        Ok(())
    }

    pub fn logout(&self) -> Result<()> {
        self.store.clear()?;
        tracing::info!("Signed out");
        Ok(())
    }
}
