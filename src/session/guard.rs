use std::sync::Arc;

use crate::api::ApiResult;
use crate::app::ApiError;
use crate::domain::Credential;
use crate::session::{Route, Router, Session};

/// `Unchecked -> {Unauthenticated, Authenticated} -> (on 401) -> Unauthenticated`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardState {
    Unchecked,
    Unauthenticated,
    Authenticated(Credential),
}

/// Gate in front of every protected screen.
///
/// Resolves the stored credential on activation, hands copies of it to
/// requests, and is the only place that logs the user out automatically.
pub struct SessionGuard {
    session: Arc<Session>,
    router: Arc<dyn Router>,
    state: GuardState,
}

impl SessionGuard {
    pub fn new(session: Arc<Session>, router: Arc<dyn Router>) -> Self {
        Self {
            session,
            router,
            state: GuardState::Unchecked,
        }
    }

    pub fn state(&self) -> &GuardState {
        &self.state
    }

    /// Credential for one request, read from the session every time so a
    /// logout or another screen's 401 takes effect immediately. Finding the
    /// store empty ends the session here and routes to `/login`.
    pub fn credential(&mut self) -> Option<Credential> {
        if self.state == GuardState::Unchecked {
            return None;
        }
        match self.session.credential() {
            Some(credential) => {
                self.state = GuardState::Authenticated(credential.clone());
                Some(credential)
            }
            None => {
                if self.state != GuardState::Unauthenticated {
                    tracing::info!("Credential gone, redirecting to {}", Route::Login);
                    self.redirect_to_login();
                }
                None
            }
        }
    }

    /// Reads the credential for a screen that is being mounted. Without one
    /// the router is sent to `/login` and `None` tells the screen to stop.
    pub fn activate(&mut self) -> Option<Credential> {
        match self.session.credential() {
            Some(credential) => {
                self.state = GuardState::Authenticated(credential.clone());
                Some(credential)
            }
            None => {
                tracing::info!("No stored credential, redirecting to {}", Route::Login);
                self.redirect_to_login();
                None
            }
        }
    }

    /// Passes a protected response through, logging out on `Unauthorized`.
    pub fn observe<T>(&mut self, result: ApiResult<T>) -> ApiResult<T> {
        if result.as_ref().is_err_and(ApiError::is_unauthorized) {
            self.expire();
        }
        result
    }

    fn expire(&mut self) {
        if let Err(e) = self.session.logout() {
            tracing::warn!("Failed to clear expired credential: {}", e);
        }
        if self.state != GuardState::Unauthenticated {
            tracing::info!("Credential rejected by server, redirecting to {}", Route::Login);
            self.redirect_to_login();
        }
    }

    fn redirect_to_login(&mut self) {
        self.state = GuardState::Unauthenticated;
        self.router.navigate(Route::Login);
    }
}
