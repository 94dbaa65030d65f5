use std::sync::Arc;

use crate::api::{ApiResult, FollowOutcome, Gateway, LikeOutcome};
use crate::app::{MurmurError, Result};
use crate::config::InteractionConfig;
use crate::domain::{Comment, Credential, Post, PostId};
use crate::feed::reducer::{self, PendingFollow, PendingLike, PostAction, Reconciliation};
use crate::feed::view_model::{AuthorRelationship, PostViewModel, RelationshipRegistry};
use crate::session::{Router, Session, SessionGuard};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedStatus {
    Loading,
    Ready,
    Failed(String),
}

#[derive(Debug)]
pub struct FeedState {
    pub status: FeedStatus,
    pub items: Vec<PostViewModel>,
}

impl FeedState {
    fn new() -> Self {
        Self {
            status: FeedStatus::Loading,
            items: Vec::new(),
        }
    }
}

/// An issued feed fetch. Dispatch it, then hand the result back to
/// [`FeedController::finish_load`].
pub struct LoadTicket {
    generation: u64,
    credential: Credential,
}

impl LoadTicket {
    pub async fn dispatch(&self, gateway: &dyn Gateway) -> ApiResult<Vec<Post>> {
        gateway.list_posts(&self.credential).await
    }
}

pub struct LikeTicket {
    generation: u64,
    credential: Credential,
    pending: PendingLike,
}

impl LikeTicket {
    pub fn post_id(&self) -> PostId {
        self.pending.post_id
    }

    pub async fn dispatch(&self, gateway: &dyn Gateway) -> ApiResult<LikeOutcome> {
        gateway
            .toggle_like(&self.credential, self.pending.post_id)
            .await
    }
}

pub struct FollowTicket {
    generation: u64,
    credential: Credential,
    post_id: PostId,
    relationship: AuthorRelationship,
    pending: PendingFollow,
}

impl FollowTicket {
    pub fn post_id(&self) -> PostId {
        self.post_id
    }

    pub async fn dispatch(&self, gateway: &dyn Gateway) -> ApiResult<FollowOutcome> {
        gateway
            .toggle_follow(&self.credential, self.pending.author_id)
            .await
    }
}

pub struct CommentTicket {
    generation: u64,
    credential: Credential,
    post_id: PostId,
    content: String,
}

impl CommentTicket {
    pub fn post_id(&self) -> PostId {
        self.post_id
    }

    pub async fn dispatch(&self, gateway: &dyn Gateway) -> ApiResult<Comment> {
        gateway
            .add_comment(&self.credential, self.post_id, &self.content)
            .await
    }
}

/// Owns the feed screen's state for as long as the screen is mounted.
///
/// Every request goes through a `begin_*` step that applies local changes
/// and returns a ticket, and a `finish_*` step that applies the response.
/// Tickets remember the feed generation they were issued in; a reload or
/// unmount bumps the generation so older responses are dropped.
pub struct FeedController {
    gateway: Arc<dyn Gateway>,
    guard: SessionGuard,
    state: FeedState,
    generation: u64,
    mounted: bool,
    rollback_on_failure: bool,
}

impl FeedController {
    pub fn new(
        session: Arc<Session>,
        gateway: Arc<dyn Gateway>,
        router: Arc<dyn Router>,
        settings: &InteractionConfig,
    ) -> Self {
        Self {
            gateway,
            guard: SessionGuard::new(session, router),
            state: FeedState::new(),
            generation: 0,
            mounted: false,
            rollback_on_failure: settings.rollback_on_failure,
        }
    }

    pub fn state(&self) -> &FeedState {
        &self.state
    }

    pub fn status(&self) -> &FeedStatus {
        &self.state.status
    }

    pub fn items(&self) -> &[PostViewModel] {
        &self.state.items
    }

    pub fn post(&self, post_id: PostId) -> Option<&PostViewModel> {
        self.state.items.iter().find(|p| p.id == post_id)
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Screen mount: check the session, then fetch if signed in.
    pub async fn mount(&mut self) {
        self.mounted = true;
        if self.guard.activate().is_some() {
            self.load().await;
        }
    }

    /// Tears the screen state down; in-flight responses will be discarded.
    pub fn unmount(&mut self) {
        self.mounted = false;
        self.generation += 1;
        self.state = FeedState::new();
    }

    /// Fetches the whole feed and replaces the item list. Also the manual
    /// refresh action.
    pub async fn load(&mut self) {
        let Some(ticket) = self.begin_load() else {
            return;
        };
        let result = ticket.dispatch(self.gateway.as_ref()).await;
        self.finish_load(ticket, result);
    }

    pub fn begin_load(&mut self) -> Option<LoadTicket> {
        if !self.mounted {
            return None;
        }
        let credential = self.guard.credential()?;

        self.generation += 1;
        self.state.status = FeedStatus::Loading;
        tracing::debug!("Loading feed (generation {})", self.generation);

        Some(LoadTicket {
            generation: self.generation,
            credential,
        })
    }

    /// Applies a feed fetch. Returns whether the response was used.
    pub fn finish_load(&mut self, ticket: LoadTicket, result: ApiResult<Vec<Post>>) -> bool {
        if !self.mounted {
            return false;
        }
        let result = self.guard.observe(result);
        if ticket.generation != self.generation {
            tracing::debug!("Dropping feed response from generation {}", ticket.generation);
            return false;
        }

        // Anything issued against the old items is now stale.
        self.generation += 1;

        match result {
            Ok(posts) => {
                let mut relationships = RelationshipRegistry::new();
                self.state.items = posts
                    .into_iter()
                    .map(|post| PostViewModel::from_post(post, &mut relationships))
                    .collect();
                self.state.status = FeedStatus::Ready;
                tracing::info!("Feed ready with {} posts", self.state.items.len());
            }
            Err(e) => {
                tracing::warn!("Feed load failed: {}", e);
                self.state.items.clear();
                self.state.status = FeedStatus::Failed(e.user_message());
            }
        }
        true
    }

    /// Runs one user action on a post to completion.
    pub async fn dispatch(&mut self, post_id: PostId, action: PostAction) -> Result<Reconciliation> {
        match action {
            PostAction::ToggleLike => self.toggle_like(post_id).await,
            PostAction::ToggleFollow => self.toggle_follow(post_id).await,
            PostAction::SubmitComment(text) => self.submit_comment(post_id, &text).await,
        }
    }

    pub async fn toggle_like(&mut self, post_id: PostId) -> Result<Reconciliation> {
        let ticket = self.begin_toggle_like(post_id)?;
        let result = ticket.dispatch(self.gateway.as_ref()).await;
        self.finish_toggle_like(ticket, result)
    }

    pub fn begin_toggle_like(&mut self, post_id: PostId) -> Result<LikeTicket> {
        let credential = self.credential()?;
        let generation = self.generation;
        let post = self.post_mut(post_id)?;
        let pending = reducer::apply_optimistic_like(post);

        Ok(LikeTicket {
            generation,
            credential,
            pending,
        })
    }

    pub fn finish_toggle_like(
        &mut self,
        ticket: LikeTicket,
        result: ApiResult<LikeOutcome>,
    ) -> Result<Reconciliation> {
        let Some(result) = self.accept(ticket.generation, result) else {
            return Ok(Reconciliation::Discarded);
        };
        let rollback = self.rollback_on_failure;
        let Ok(post) = self.post_mut(ticket.pending.post_id) else {
            return Ok(Reconciliation::Discarded);
        };

        match result {
            Ok(outcome) => Ok(reducer::reconcile_like(post, &ticket.pending, &outcome)),
            Err(e) => match reducer::fail_like(post, &ticket.pending, &e, rollback) {
                Reconciliation::Superseded => Ok(Reconciliation::Superseded),
                _ => Err(e.into()),
            },
        }
    }

    pub async fn toggle_follow(&mut self, post_id: PostId) -> Result<Reconciliation> {
        let ticket = self.begin_toggle_follow(post_id)?;
        let result = ticket.dispatch(self.gateway.as_ref()).await;
        self.finish_toggle_follow(ticket, result)
    }

    /// Follow state is per author: the flip shows on every post by them.
    pub fn begin_toggle_follow(&mut self, post_id: PostId) -> Result<FollowTicket> {
        let credential = self.credential()?;
        let generation = self.generation;
        let relationship = self.post_mut(post_id)?.relationship.clone();
        let pending = reducer::apply_optimistic_follow(&relationship);

        Ok(FollowTicket {
            generation,
            credential,
            post_id,
            relationship,
            pending,
        })
    }

    pub fn finish_toggle_follow(
        &mut self,
        ticket: FollowTicket,
        result: ApiResult<FollowOutcome>,
    ) -> Result<Reconciliation> {
        let Some(result) = self.accept(ticket.generation, result) else {
            return Ok(Reconciliation::Discarded);
        };

        match result {
            Ok(outcome) => {
                let applied = reducer::reconcile_follow(&ticket.relationship, &ticket.pending, &outcome);
                if let Ok(post) = self.post_mut(ticket.post_id) {
                    reducer::clear_notice(post);
                }
                Ok(applied)
            }
            Err(e) => {
                let applied =
                    reducer::fail_follow(&ticket.relationship, &ticket.pending, self.rollback_on_failure);
                if applied == Reconciliation::Superseded {
                    return Ok(applied);
                }
                if let Ok(post) = self.post_mut(ticket.post_id) {
                    reducer::set_notice(post, &e);
                }
                Err(e.into())
            }
        }
    }

    pub async fn submit_comment(&mut self, post_id: PostId, text: &str) -> Result<Reconciliation> {
        let ticket = self.begin_comment(post_id, text)?;
        let result = ticket.dispatch(self.gateway.as_ref()).await;
        self.finish_comment(ticket, result)
    }

    /// Blank or oversized text fails here, before any request exists.
    pub fn begin_comment(&mut self, post_id: PostId, text: &str) -> Result<CommentTicket> {
        let credential = self.credential()?;
        let generation = self.generation;
        let post = self.post_mut(post_id)?;
        let content = reducer::prepare_comment(post, text)?;

        Ok(CommentTicket {
            generation,
            credential,
            post_id,
            content,
        })
    }

    pub fn finish_comment(
        &mut self,
        ticket: CommentTicket,
        result: ApiResult<Comment>,
    ) -> Result<Reconciliation> {
        let Some(result) = self.accept(ticket.generation, result) else {
            return Ok(Reconciliation::Discarded);
        };
        let Ok(post) = self.post_mut(ticket.post_id) else {
            return Ok(Reconciliation::Discarded);
        };

        match result {
            Ok(comment) => {
                reducer::append_comment(post, &ticket.content, comment);
                Ok(Reconciliation::Confirmed)
            }
            Err(e) => {
                reducer::fail_comment(post, &e);
                Err(e.into())
            }
        }
    }

    /// Gatekeeping shared by every `finish_*`: unmounted screens ignore
    /// responses entirely, a 401 always ends the session, and responses
    /// from an older generation are dropped.
    fn accept<T>(&mut self, generation: u64, result: ApiResult<T>) -> Option<ApiResult<T>> {
        if !self.mounted {
            tracing::debug!("Dropping response for unmounted feed");
            return None;
        }
        let result = self.guard.observe(result);
        if generation != self.generation {
            tracing::debug!("Dropping response from generation {}", generation);
            return None;
        }
        Some(result)
    }

    fn credential(&mut self) -> Result<Credential> {
        self.guard.credential().ok_or(MurmurError::NotAuthenticated)
    }

    fn post_mut(&mut self, post_id: PostId) -> Result<&mut PostViewModel> {
        self.state
            .items
            .iter_mut()
            .find(|p| p.id == post_id)
            .ok_or(MurmurError::PostNotFound(post_id))
    }
}
