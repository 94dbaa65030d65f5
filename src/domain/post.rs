use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{PostId, UserId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorSummary {
    pub id: UserId,
    pub display_name: String,
    pub avatar_uri: Option<String>,
}

impl AuthorSummary {
    /// Name used when the server sent only the author's id.
    pub fn placeholder_name(id: UserId) -> String {
        format!("user #{}", id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: Option<u64>,
    pub author: String,
    pub content: String,
    pub created_at: Option<DateTime<Utc>>,
}

/// A feed item as validated at the gateway boundary.
///
/// This is server state only; the mutable client-side view lives in
/// [`crate::feed::PostViewModel`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub title: String,
    pub body: String,
    pub author: AuthorSummary,
    pub media_uri: Option<String>,
    pub like_count: u64,
    pub liked_by_viewer: Option<bool>,
    pub following_author: Option<bool>,
    pub comments: Vec<Comment>,
}

impl Post {
    pub fn new(id: PostId, author: AuthorSummary) -> Self {
        Self {
            id,
            title: String::new(),
            body: String::new(),
            author,
            media_uri: None,
            like_count: 0,
            liked_by_viewer: None,
            following_author: None,
            comments: Vec::new(),
        }
    }
}
