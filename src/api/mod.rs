pub mod http_gateway;
mod wire;

#[cfg(test)]
pub(crate) mod fake;

use async_trait::async_trait;

use crate::app::ApiError;
use crate::domain::{Comment, Credential, Post, PostId, UserId, UserProfile};

pub use http_gateway::HttpGateway;

pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Longest comment the server accepts.
pub const MAX_COMMENT_CHARS: usize = 500;

/// Server answer to a like toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LikeOutcome {
    pub like_count: u64,
    /// `None` when the server reports only the count.
    pub is_liked: Option<bool>,
}

/// Server answer to a follow toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FollowOutcome {
    pub is_following: bool,
    pub followers_count: Option<u64>,
}

/// One operation per server capability. Each call is exactly one
/// request/response; retries are the caller's business.
#[async_trait]
pub trait Gateway: Send + Sync {
    async fn login(&self, username: &str, password: &str) -> ApiResult<Credential>;

    async fn list_posts(&self, credential: &Credential) -> ApiResult<Vec<Post>>;

    async fn fetch_profile(&self, credential: &Credential, user_id: UserId)
        -> ApiResult<UserProfile>;

    async fn toggle_like(&self, credential: &Credential, post_id: PostId)
        -> ApiResult<LikeOutcome>;

    async fn toggle_follow(
        &self,
        credential: &Credential,
        author_id: UserId,
    ) -> ApiResult<FollowOutcome>;

    /// Rejects blank or oversized content without touching the network.
    async fn add_comment(
        &self,
        credential: &Credential,
        post_id: PostId,
        content: &str,
    ) -> ApiResult<Comment>;
}

/// Client-side comment check shared by the gateway and the reducer.
pub fn validate_comment(content: &str) -> ApiResult<&str> {
    if content.trim().is_empty() {
        return Err(ApiError::Validation("Please enter a comment.".into()));
    }
    if content.chars().count() > MAX_COMMENT_CHARS {
        return Err(ApiError::Validation(format!(
            "Comments are limited to {} characters.",
            MAX_COMMENT_CHARS
        )));
    }
    Ok(content)
}

pub fn validate_login(username: &str, password: &str) -> ApiResult<()> {
    if username.trim().is_empty() || password.is_empty() {
        return Err(ApiError::Validation(
            "Username and password are required.".into(),
        ));
    }
    Ok(())
}
