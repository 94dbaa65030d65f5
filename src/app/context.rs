use std::path::PathBuf;
use std::sync::Arc;

use crate::api::{Gateway, HttpGateway};
use crate::app::error::{MurmurError, Result};
use crate::config::Config;
use crate::domain::UserId;
use crate::feed::{FeedController, PostDetail, PostViewModel};
use crate::profile::ProfileScreen;
use crate::session::{LoginScreen, RecordingRouter, Session};
use crate::store::{CredentialStore, SqliteCredentialStore};

/// Application root: owns the session and hands it to every screen.
pub struct AppContext {
    pub config: Config,
    pub session: Arc<Session>,
    pub gateway: Arc<dyn Gateway>,
    pub router: Arc<RecordingRouter>,
}

impl AppContext {
    pub fn new(config: Config) -> Result<Self> {
        let db_path = match &config.session.store_path {
            Some(p) => p.clone(),
            None => Self::default_db_path()?,
        };

        let store: Arc<dyn CredentialStore> = Arc::new(SqliteCredentialStore::new(&db_path)?);
        let gateway: Arc<dyn Gateway> = Arc::new(HttpGateway::new(&config.api)?);
        Ok(Self::with_parts(config, store, gateway))
    }

    /// Keeps the credential in memory only; nothing survives the process.
    pub fn ephemeral(config: Config) -> Result<Self> {
        let store: Arc<dyn CredentialStore> = Arc::new(SqliteCredentialStore::in_memory()?);
        let gateway: Arc<dyn Gateway> = Arc::new(HttpGateway::new(&config.api)?);
        Ok(Self::with_parts(config, store, gateway))
    }

    pub fn with_parts(
        config: Config,
        store: Arc<dyn CredentialStore>,
        gateway: Arc<dyn Gateway>,
    ) -> Self {
        Self {
            config,
            session: Arc::new(Session::new(store)),
            gateway,
            router: Arc::new(RecordingRouter::new()),
        }
    }

    pub fn login_screen(&self) -> LoginScreen {
        LoginScreen::new(self.session.clone(), self.gateway.clone(), self.router.clone())
    }

    pub fn feed(&self) -> FeedController {
        FeedController::new(
            self.session.clone(),
            self.gateway.clone(),
            self.router.clone(),
            &self.config.interactions,
        )
    }

    /// Opens one post on its own screen. Its author relationship stays
    /// shared with the feed the view model came from.
    pub fn post_detail(&self, post: PostViewModel) -> PostDetail {
        PostDetail::new(
            post,
            self.session.clone(),
            self.gateway.clone(),
            self.router.clone(),
            &self.config.interactions,
        )
    }

    pub fn profile(&self, user_id: UserId) -> ProfileScreen {
        ProfileScreen::new(
            user_id,
            self.session.clone(),
            self.gateway.clone(),
            self.router.clone(),
        )
    }

    fn default_db_path() -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| MurmurError::Config("Could not find data directory".into()))?;
        let murmur_dir = data_dir.join("murmur");
        std::fs::create_dir_all(&murmur_dir)?;
        Ok(murmur_dir.join("murmur.db"))
    }
}
