//! State transitions for a single post's like/follow/comment state.
//!
//! Nothing here performs I/O. Each toggle is split into an optimistic step,
//! applied when the user acts, and a reconciliation step applied when the
//! server answers. Sequence numbers make sure only the answer to the latest
//! request for a post (or author) is ever applied.

use crate::api::{validate_comment, ApiResult, FollowOutcome, LikeOutcome};
use crate::app::ApiError;
use crate::domain::{Comment, PostId, UserId};
use crate::feed::view_model::{AuthorRelationship, PostViewModel};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostAction {
    ToggleLike,
    ToggleFollow,
    SubmitComment(String),
}

/// What happened to local state when a response came back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciliation {
    /// Server values written over the local state.
    Confirmed,
    /// A newer request for the same target is in flight; response ignored.
    Superseded,
    /// Request failed and the optimistic change was undone.
    RolledBack,
    /// Request failed and the optimistic change was kept.
    Unreverted,
    /// The screen was reloaded or unmounted; response dropped.
    Discarded,
}

/// Record of an optimistic like flip awaiting the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingLike {
    pub post_id: PostId,
    pub seq: u64,
    pub previous_count: u64,
    pub previous_liked: bool,
    pub assumed_liked: bool,
}

/// Record of an optimistic follow flip awaiting the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingFollow {
    pub author_id: UserId,
    pub seq: u64,
    pub previous: bool,
    pub assumed: bool,
}

/// Flips the like flag and moves the count by one in the same direction.
pub fn apply_optimistic_like(post: &mut PostViewModel) -> PendingLike {
    let previous_count = post.like_count;
    let previous_liked = post.liked_by_viewer;

    post.liked_by_viewer = !previous_liked;
    post.like_count = if post.liked_by_viewer {
        previous_count.saturating_add(1)
    } else {
        previous_count.saturating_sub(1)
    };
    post.like_seq += 1;

    PendingLike {
        post_id: post.id,
        seq: post.like_seq,
        previous_count,
        previous_liked,
        assumed_liked: post.liked_by_viewer,
    }
}

pub fn reconcile_like(
    post: &mut PostViewModel,
    pending: &PendingLike,
    outcome: &LikeOutcome,
) -> Reconciliation {
    if pending.seq != post.like_seq {
        return Reconciliation::Superseded;
    }

    post.like_count = outcome.like_count;
    post.liked_by_viewer = outcome.is_liked.unwrap_or(pending.assumed_liked);
    post.notice = None;
    Reconciliation::Confirmed
}

pub fn fail_like(
    post: &mut PostViewModel,
    pending: &PendingLike,
    error: &ApiError,
    rollback: bool,
) -> Reconciliation {
    if pending.seq != post.like_seq {
        return Reconciliation::Superseded;
    }

    post.notice = Some(error.user_message());
    if rollback {
        post.like_count = pending.previous_count;
        post.liked_by_viewer = pending.previous_liked;
        Reconciliation::RolledBack
    } else {
        Reconciliation::Unreverted
    }
}

pub fn apply_optimistic_follow(relationship: &AuthorRelationship) -> PendingFollow {
    let mut state = relationship.lock();
    let previous = state.following;
    state.following = !previous;
    state.seq += 1;

    PendingFollow {
        author_id: relationship.author_id(),
        seq: state.seq,
        previous,
        assumed: state.following,
    }
}

pub fn reconcile_follow(
    relationship: &AuthorRelationship,
    pending: &PendingFollow,
    outcome: &FollowOutcome,
) -> Reconciliation {
    let mut state = relationship.lock();
    if pending.seq != state.seq {
        return Reconciliation::Superseded;
    }

    state.following = outcome.is_following;
    if outcome.followers_count.is_some() {
        state.followers_count = outcome.followers_count;
    }
    Reconciliation::Confirmed
}

pub fn fail_follow(
    relationship: &AuthorRelationship,
    pending: &PendingFollow,
    rollback: bool,
) -> Reconciliation {
    let mut state = relationship.lock();
    if pending.seq != state.seq {
        return Reconciliation::Superseded;
    }

    if rollback {
        state.following = pending.previous;
        Reconciliation::RolledBack
    } else {
        Reconciliation::Unreverted
    }
}

/// Stores `text` as the post's draft and checks it is worth sending.
///
/// Comments are never shown before the server confirms them.
pub fn prepare_comment(post: &mut PostViewModel, text: &str) -> ApiResult<String> {
    post.comment_draft = text.to_string();
    match validate_comment(text) {
        Ok(content) => Ok(content.to_string()),
        Err(e) => {
            post.notice = Some(e.user_message());
            Err(e)
        }
    }
}

/// Appends the server's copy of the comment. The draft is cleared only if
/// the user has not edited it since submitting.
pub fn append_comment(post: &mut PostViewModel, submitted: &str, comment: Comment) {
    post.comments.push(comment);
    if post.comment_draft == submitted {
        post.comment_draft.clear();
    }
    post.notice = None;
}

/// Leaves comments and draft untouched so the user can retry.
pub fn fail_comment(post: &mut PostViewModel, error: &ApiError) {
    post.notice = Some(error.user_message());
}

pub fn set_notice(post: &mut PostViewModel, error: &ApiError) {
    post.notice = Some(error.user_message());
}

pub fn clear_notice(post: &mut PostViewModel) {
    post.notice = None;
}
