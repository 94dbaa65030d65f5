use std::sync::Arc;

use crate::api::Gateway;
use crate::app::{MurmurError, Result};
use crate::session::{Route, Router, Session};

/// State behind the `/login` screen.
pub struct LoginScreen {
    session: Arc<Session>,
    gateway: Arc<dyn Gateway>,
    router: Arc<dyn Router>,
    error: Option<String>,
    submitting: bool,
}

impl LoginScreen {
    pub fn new(session: Arc<Session>, gateway: Arc<dyn Gateway>, router: Arc<dyn Router>) -> Self {
        Self {
            session,
            gateway,
            router,
            error: None,
            submitting: false,
        }
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Signs in and routes to the feed. On failure the screen keeps the
    /// message in [`LoginScreen::error`] and the error is returned.
    pub async fn submit(&mut self, username: &str, password: &str) -> Result<()> {
        self.submitting = true;
        self.error = None;

        let result = self
            .session
            .login(self.gateway.as_ref(), username, password)
            .await;
        self.submitting = false;

        match result {
            Ok(()) => {
                self.router.navigate(Route::Feed);
                Ok(())
            }
            Err(e) => {
                self.error = Some(match &e {
                    MurmurError::Api(api) => api.user_message(),
                    other => format!("Could not save session: {}", other),
                });
                Err(e)
            }
        }
    }
}
