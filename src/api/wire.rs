//! JSON shapes exchanged with the blog API and their conversion into
//! domain types. Anything that cannot be converted is a malformed response.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{AuthorSummary, Comment, Post, UserId, UserProfile};

/// A user reference is either a primary key or a display name depending
/// on which serializer produced it.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum UserRef {
    Id(u64),
    Name(String),
}

impl UserRef {
    fn id(&self) -> Option<u64> {
        match self {
            UserRef::Id(id) => Some(*id),
            UserRef::Name(_) => None,
        }
    }

    fn name(&self) -> Option<&str> {
        match self {
            UserRef::Name(name) if !name.is_empty() => Some(name),
            _ => None,
        }
    }
}

#[derive(Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Serialize)]
pub(crate) struct CommentRequest<'a> {
    pub content: &'a str,
}

#[derive(Deserialize)]
pub(crate) struct TokenResponse {
    pub token: String,
}

#[derive(Deserialize, Default)]
pub(crate) struct ErrorBody {
    error: Option<String>,
    detail: Option<String>,
    message: Option<String>,
}

impl ErrorBody {
    pub fn into_message(self) -> Option<String> {
        self.error.or(self.detail).or(self.message)
    }
}

#[derive(Deserialize)]
pub(crate) struct PostRecord {
    id: Option<u64>,
    title: Option<String>,
    #[serde(alias = "body")]
    subscription: Option<String>,
    photo_post: Option<String>,
    author: Option<UserRef>,
    author_id: Option<u64>,
    #[serde(alias = "author_username")]
    author_name: Option<String>,
    author_photo: Option<String>,
    likes_count: Option<u64>,
    likes: Option<Vec<serde_json::Value>>,
    #[serde(alias = "liked")]
    is_liked: Option<bool>,
    #[serde(alias = "following")]
    is_following: Option<bool>,
    comments: Option<Vec<CommentRecord>>,
}

impl PostRecord {
    pub fn into_post(self) -> Result<Post, String> {
        let id = self.id.ok_or("post without id")?;
        let author_id = self
            .author_id
            .or_else(|| self.author.as_ref().and_then(UserRef::id))
            .ok_or_else(|| format!("post {} has no author id", id))?;

        let display_name = self
            .author
            .as_ref()
            .and_then(UserRef::name)
            .map(String::from)
            .or(self.author_name)
            .unwrap_or_else(|| AuthorSummary::placeholder_name(author_id));

        let like_count = self
            .likes_count
            .or_else(|| self.likes.as_ref().map(|l| l.len() as u64))
            .unwrap_or(0);

        Ok(Post {
            id,
            title: self.title.unwrap_or_default(),
            body: self.subscription.unwrap_or_default(),
            author: AuthorSummary {
                id: author_id,
                display_name,
                avatar_uri: non_empty(self.author_photo),
            },
            media_uri: non_empty(self.photo_post),
            like_count,
            liked_by_viewer: self.is_liked,
            following_author: self.is_following,
            comments: self
                .comments
                .unwrap_or_default()
                .into_iter()
                .map(CommentRecord::into_comment)
                .collect(),
        })
    }
}

#[derive(Deserialize)]
pub(crate) struct CommentRecord {
    id: Option<u64>,
    author: Option<UserRef>,
    #[serde(default)]
    content: String,
    created_at: Option<String>,
}

impl CommentRecord {
    pub fn into_comment(self) -> Comment {
        let author = match self.author {
            Some(UserRef::Name(name)) if !name.is_empty() => name,
            Some(UserRef::Id(id)) => AuthorSummary::placeholder_name(id),
            _ => "unknown".to_string(),
        };

        Comment {
            id: self.id,
            author,
            content: self.content,
            created_at: self.created_at.as_deref().and_then(parse_timestamp),
        }
    }
}

#[derive(Deserialize)]
pub(crate) struct ProfileRecord {
    id: Option<u64>,
    user: Option<UserRef>,
    bio: Option<String>,
    photo: Option<String>,
    followers_count: Option<u64>,
}

impl ProfileRecord {
    pub fn into_profile(self, requested: UserId) -> UserProfile {
        let id = self
            .user
            .as_ref()
            .and_then(UserRef::id)
            .or(self.id)
            .unwrap_or(requested);

        let display_name = self
            .user
            .as_ref()
            .and_then(UserRef::name)
            .map(String::from)
            .unwrap_or_else(|| AuthorSummary::placeholder_name(id));

        UserProfile {
            id,
            display_name,
            bio: self.bio.unwrap_or_default(),
            avatar_uri: non_empty(self.photo),
            followers_count: self.followers_count,
        }
    }
}

#[derive(Deserialize)]
pub(crate) struct LikeRecord {
    pub likes_count: u64,
    #[serde(alias = "liked")]
    pub is_liked: Option<bool>,
}

#[derive(Deserialize)]
pub(crate) struct FollowRecord {
    #[serde(alias = "following")]
    pub is_following: bool,
    pub followers_count: Option<u64>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Accepts RFC 3339 and the naive ISO form servers emit without a zone.
fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|naive| naive.and_utc())
        })
}
