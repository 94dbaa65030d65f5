use std::sync::Arc;

use crate::api::Gateway;
use crate::app::{MurmurError, Result};
use crate::config::InteractionConfig;
use crate::domain::Credential;
use crate::feed::reducer::{self, PostAction, Reconciliation};
use crate::feed::view_model::PostViewModel;
use crate::session::{Router, Session, SessionGuard};

/// A single post opened on its own screen.
///
/// The view model is a copy of the feed's, but its author relationship is
/// shared, so a follow toggled here shows up on the feed as well. Requests
/// run to completion one at a time.
pub struct PostDetail {
    gateway: Arc<dyn Gateway>,
    guard: SessionGuard,
    post: PostViewModel,
    mounted: bool,
    rollback_on_failure: bool,
}

impl PostDetail {
    pub fn new(
        post: PostViewModel,
        session: Arc<Session>,
        gateway: Arc<dyn Gateway>,
        router: Arc<dyn Router>,
        settings: &InteractionConfig,
    ) -> Self {
        Self {
            gateway,
            guard: SessionGuard::new(session, router),
            post,
            mounted: false,
            rollback_on_failure: settings.rollback_on_failure,
        }
    }

    pub fn post(&self) -> &PostViewModel {
        &self.post
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Returns whether the screen may show the post.
    pub fn mount(&mut self) -> bool {
        self.mounted = self.guard.activate().is_some();
        self.mounted
    }

    pub fn unmount(&mut self) {
        self.mounted = false;
    }

    pub async fn dispatch(&mut self, action: PostAction) -> Result<Reconciliation> {
        let credential = self.credential()?;
        match action {
            PostAction::ToggleLike => {
                let pending = reducer::apply_optimistic_like(&mut self.post);
                let result = self.gateway.toggle_like(&credential, self.post.id).await;
                let result = self.guard.observe(result);
                match result {
                    Ok(outcome) => Ok(reducer::reconcile_like(&mut self.post, &pending, &outcome)),
                    Err(e) => {
                        reducer::fail_like(&mut self.post, &pending, &e, self.rollback_on_failure);
                        Err(e.into())
                    }
                }
            }
            PostAction::ToggleFollow => {
                let relationship = self.post.relationship.clone();
                let pending = reducer::apply_optimistic_follow(&relationship);
                let result = self
                    .gateway
                    .toggle_follow(&credential, pending.author_id)
                    .await;
                match self.guard.observe(result) {
                    Ok(outcome) => {
                        reducer::clear_notice(&mut self.post);
                        Ok(reducer::reconcile_follow(&relationship, &pending, &outcome))
                    }
                    Err(e) => {
                        reducer::fail_follow(&relationship, &pending, self.rollback_on_failure);
                        reducer::set_notice(&mut self.post, &e);
                        Err(e.into())
                    }
                }
            }
            PostAction::SubmitComment(text) => {
                let content = reducer::prepare_comment(&mut self.post, &text)?;
                let result = self
                    .gateway
                    .add_comment(&credential, self.post.id, &content)
                    .await;
                match self.guard.observe(result) {
                    Ok(comment) => {
                        reducer::append_comment(&mut self.post, &content, comment);
                        Ok(Reconciliation::Confirmed)
                    }
                    Err(e) => {
                        reducer::fail_comment(&mut self.post, &e);
                        Err(e.into())
                    }
                }
            }
        }
    }

    fn credential(&mut self) -> Result<Credential> {
        if !self.mounted {
            return Err(MurmurError::NotAuthenticated);
        }
        self.guard.credential().ok_or(MurmurError::NotAuthenticated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::{comment, following, liked, post, FakeGateway};
    use crate::app::ApiError;
    use crate::feed::view_model::RelationshipRegistry;
    use crate::session::{RecordingRouter, Route};
    use crate::store::MemoryCredentialStore;

    struct Fixture {
        detail: PostDetail,
        gateway: Arc<FakeGateway>,
        session: Arc<Session>,
        router: Arc<RecordingRouter>,
    }

    fn fixture(vm: PostViewModel, signed_in: bool) -> Fixture {
        let store = if signed_in {
            MemoryCredentialStore::with_credential(Credential::new("tok").unwrap())
        } else {
            MemoryCredentialStore::new()
        };
        let session = Arc::new(Session::new(Arc::new(store)));
        let gateway = Arc::new(FakeGateway::new());
        let router = Arc::new(RecordingRouter::new());
        let detail = PostDetail::new(
            vm,
            session.clone(),
            gateway.clone(),
            router.clone(),
            &InteractionConfig::default(),
        );
        Fixture {
            detail,
            gateway,
            session,
            router,
        }
    }

    #[test]
    fn test_mount_without_session_redirects() {
        let mut registry = RelationshipRegistry::new();
        let vm = PostViewModel::from_post(post(1, 7, 0), &mut registry);
        let mut f = fixture(vm, false);

        assert!(!f.detail.mount());
        assert_eq!(f.router.current(), Some(Route::Login));
        assert!(matches!(
            tokio_test::block_on(f.detail.dispatch(PostAction::ToggleLike)),
            Err(MurmurError::NotAuthenticated)
        ));
        assert!(f.gateway.calls().is_empty());
    }

    #[tokio::test]
    async fn test_like_from_detail() {
        let mut registry = RelationshipRegistry::new();
        let vm = PostViewModel::from_post(post(1, 7, 3), &mut registry);
        let mut f = fixture(vm, true);
        f.gateway.push_like(liked(4));
        f.detail.mount();

        let applied = f.detail.dispatch(PostAction::ToggleLike).await.unwrap();

        assert_eq!(applied, Reconciliation::Confirmed);
        assert_eq!(f.detail.post().like_count(), 4);
        assert!(f.detail.post().is_liked_by_viewer());
    }

    #[tokio::test]
    async fn test_follow_from_detail_reaches_feed_copies() {
        let mut registry = RelationshipRegistry::new();
        let in_feed = PostViewModel::from_post(post(1, 7, 0), &mut registry);
        let sibling = PostViewModel::from_post(post(2, 7, 0), &mut registry);
        let mut f = fixture(in_feed.clone(), true);
        f.gateway.push_follow(following(true));
        f.detail.mount();

        f.detail.dispatch(PostAction::ToggleFollow).await.unwrap();

        assert!(in_feed.is_following_author());
        assert!(sibling.is_following_author());
    }

    #[tokio::test]
    async fn test_comment_from_detail() {
        let mut registry = RelationshipRegistry::new();
        let vm = PostViewModel::from_post(post(1, 7, 0), &mut registry);
        let mut f = fixture(vm, true);
        f.gateway.push_comment(Ok(comment(5, "ana", "nice")));
        f.detail.mount();

        f.detail
            .dispatch(PostAction::SubmitComment("nice".into()))
            .await
            .unwrap();

        assert_eq!(f.detail.post().comments().len(), 1);
        assert_eq!(f.detail.post().comment_draft(), "");
    }

    #[tokio::test]
    async fn test_unauthorized_comment_logs_out() {
        let mut registry = RelationshipRegistry::new();
        let vm = PostViewModel::from_post(post(1, 7, 0), &mut registry);
        let mut f = fixture(vm, true);
        f.gateway.push_comment(Err(ApiError::Unauthorized));
        f.detail.mount();

        let result = f
            .detail
            .dispatch(PostAction::SubmitComment("hi".into()))
            .await;

        assert!(matches!(result, Err(MurmurError::Api(ApiError::Unauthorized))));
        assert!(f.session.credential().is_none());
        assert_eq!(f.router.current(), Some(Route::Login));
        assert_eq!(f.detail.post().comment_draft(), "hi");
    }
}
