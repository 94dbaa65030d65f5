use std::fmt;
use std::sync::{Mutex, PoisonError};

use crate::domain::UserId;

/// Screens the core can ask to navigate to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Feed,
    Profile(UserId),
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::Login => "/login".to_string(),
            Route::Feed => "/".to_string(),
            Route::Profile(id) => format!("/profile/{}", id),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Navigation is performed by whoever renders screens; the core only asks.
pub trait Router: Send + Sync {
    fn navigate(&self, route: Route);
}

/// Router that keeps the navigation history instead of rendering anything.
#[derive(Default)]
pub struct RecordingRouter {
    history: Mutex<Vec<Route>>,
}

impl RecordingRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<Route> {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .copied()
    }

    pub fn history(&self) -> Vec<Route> {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Router for RecordingRouter {
    fn navigate(&self, route: Route) {
        tracing::debug!("Navigate to {}", route);
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(route);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_paths() {
        assert_eq!(Route::Login.path(), "/login");
        assert_eq!(Route::Feed.path(), "/");
        assert_eq!(Route::Profile(12).to_string(), "/profile/12");
    }

    #[test]
    fn test_recording_router_tracks_current() {
        let router = RecordingRouter::new();
        assert_eq!(router.current(), None);

        router.navigate(Route::Login);
        router.navigate(Route::Feed);

        assert_eq!(router.current(), Some(Route::Feed));
        assert_eq!(router.history(), vec![Route::Login, Route::Feed]);
    }
}
