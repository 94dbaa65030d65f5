//! The `/profile/{id}` screen.

use std::sync::Arc;

use crate::api::Gateway;
use crate::domain::{UserId, UserProfile};
use crate::session::{Router, Session, SessionGuard};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileStatus {
    Loading,
    Ready(UserProfile),
    Failed(String),
}

/// Read-only profile screen.
///
/// Fetches once when mounted. Any later fetch happens only through
/// [`ProfileScreen::refresh`].
pub struct ProfileScreen {
    user_id: UserId,
    gateway: Arc<dyn Gateway>,
    guard: SessionGuard,
    status: ProfileStatus,
    mounted: bool,
    fetched: bool,
}

impl ProfileScreen {
    pub fn new(
        user_id: UserId,
        session: Arc<Session>,
        gateway: Arc<dyn Gateway>,
        router: Arc<dyn Router>,
    ) -> Self {
        Self {
            user_id,
            gateway,
            guard: SessionGuard::new(session, router),
            status: ProfileStatus::Loading,
            mounted: false,
            fetched: false,
        }
    }

    pub fn status(&self) -> &ProfileStatus {
        &self.status
    }

    pub fn profile(&self) -> Option<&UserProfile> {
        match &self.status {
            ProfileStatus::Ready(profile) => Some(profile),
            _ => None,
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub async fn mount(&mut self) {
        if self.mounted {
            return;
        }
        self.mounted = true;
        if self.guard.activate().is_none() {
            return;
        }
        if !self.fetched {
            self.fetch().await;
        }
    }

    pub fn unmount(&mut self) {
        self.mounted = false;
        self.fetched = false;
        self.status = ProfileStatus::Loading;
    }

    /// Manual refresh.
    pub async fn refresh(&mut self) {
        if self.mounted {
            self.fetch().await;
        }
    }

    async fn fetch(&mut self) {
        let Some(credential) = self.guard.credential() else {
            return;
        };
        self.fetched = true;
        self.status = ProfileStatus::Loading;

        let result = self.gateway.fetch_profile(&credential, self.user_id).await;
        if !self.mounted {
            return;
        }
        self.status = match self.guard.observe(result) {
            Ok(profile) => ProfileStatus::Ready(profile),
            Err(e) => {
                tracing::warn!("Profile {} failed to load: {}", self.user_id, e);
                ProfileStatus::Failed(e.user_message())
            }
        };
    }
}
