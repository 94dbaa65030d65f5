use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::domain::{AuthorSummary, Comment, Post, PostId, UserId};

#[derive(Debug, Default)]
pub(super) struct RelationshipState {
    pub following: bool,
    /// Sequence number of the latest follow request issued for this author.
    pub seq: u64,
    /// Last count reported by a follow response.
    pub followers_count: Option<u64>,
}

/// Viewer's follow state towards one author.
///
/// Clones share the same state, so every post by the author sees a toggle
/// made from any of them.
#[derive(Debug, Clone)]
pub struct AuthorRelationship {
    author_id: UserId,
    state: Arc<Mutex<RelationshipState>>,
}

impl AuthorRelationship {
    pub fn new(author_id: UserId, following: bool) -> Self {
        Self {
            author_id,
            state: Arc::new(Mutex::new(RelationshipState {
                following,
                ..RelationshipState::default()
            })),
        }
    }

    pub fn author_id(&self) -> UserId {
        self.author_id
    }

    pub fn is_following(&self) -> bool {
        self.lock().following
    }

    /// `None` until a follow response for this author has been applied.
    pub fn followers_count(&self) -> Option<u64> {
        self.lock().followers_count
    }

    /// Whether both handles point at the same relationship.
    pub fn is_shared_with(&self, other: &AuthorRelationship) -> bool {
        Arc::ptr_eq(&self.state, &other.state)
    }

    pub(super) fn lock(&self) -> MutexGuard<'_, RelationshipState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// One [`AuthorRelationship`] per author for a loaded feed.
#[derive(Debug, Default)]
pub struct RelationshipRegistry {
    by_author: HashMap<UserId, AuthorRelationship>,
}

impl RelationshipRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the shared relationship for `author_id`, creating it on first
    /// sight. The first post seen for an author seeds its flag.
    pub fn resolve(&mut self, author_id: UserId, reported: Option<bool>) -> AuthorRelationship {
        if let Some(existing) = self.by_author.get(&author_id) {
            return existing.clone();
        }
        let relationship = AuthorRelationship::new(author_id, reported.unwrap_or(false));
        self.by_author.insert(author_id, relationship.clone());
        relationship
    }

    pub fn len(&self) -> usize {
        self.by_author.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_author.is_empty()
    }
}

/// Client-side feed item with its mutable social state.
///
/// `like_count` and `liked_by_viewer` only change together through the
/// reducer, which keeps them consistent.
#[derive(Debug, Clone)]
pub struct PostViewModel {
    pub id: PostId,
    pub title: String,
    pub body: String,
    pub author: AuthorSummary,
    pub media_uri: Option<String>,
    pub(super) like_count: u64,
    pub(super) liked_by_viewer: bool,
    pub(super) relationship: AuthorRelationship,
    pub(super) comments: Vec<Comment>,
    pub(super) comment_draft: String,
    pub(super) notice: Option<String>,
    /// Sequence number of the latest like request issued for this post.
    pub(super) like_seq: u64,
}

impl PostViewModel {
    pub fn from_post(post: Post, relationships: &mut RelationshipRegistry) -> Self {
        let relationship = relationships.resolve(post.author.id, post.following_author);
        Self {
            id: post.id,
            title: post.title,
            body: post.body,
            author: post.author,
            media_uri: post.media_uri,
            like_count: post.like_count,
            liked_by_viewer: post.liked_by_viewer.unwrap_or(false),
            relationship,
            comments: post.comments,
            comment_draft: String::new(),
            notice: None,
            like_seq: 0,
        }
    }

    pub fn like_count(&self) -> u64 {
        self.like_count
    }

    pub fn is_liked_by_viewer(&self) -> bool {
        self.liked_by_viewer
    }

    pub fn is_following_author(&self) -> bool {
        self.relationship.is_following()
    }

    pub fn author_followers_count(&self) -> Option<u64> {
        self.relationship.followers_count()
    }

    pub fn relationship(&self) -> &AuthorRelationship {
        &self.relationship
    }

    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    /// Comment text typed but not yet accepted by the server.
    pub fn comment_draft(&self) -> &str {
        &self.comment_draft
    }

    pub fn set_comment_draft(&mut self, text: impl Into<String>) {
        self.comment_draft = text.into();
    }

    /// Last interaction failure on this post, for display.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            "(Untitled)"
        } else {
            &self.title
        }
    }
}
