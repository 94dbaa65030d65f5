//! Scripted in-memory gateway for controller tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::api::{validate_comment, validate_login, ApiResult, FollowOutcome, Gateway, LikeOutcome};
use crate::app::ApiError;
use crate::domain::{AuthorSummary, Comment, Credential, Post, PostId, UserId, UserProfile};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    Login(String),
    ListPosts,
    FetchProfile(UserId),
    ToggleLike(PostId),
    ToggleFollow(UserId),
    AddComment(PostId, String),
}

#[derive(Default)]
struct Script {
    logins: VecDeque<ApiResult<Credential>>,
    posts: VecDeque<ApiResult<Vec<Post>>>,
    profiles: VecDeque<ApiResult<UserProfile>>,
    likes: VecDeque<ApiResult<LikeOutcome>>,
    follows: VecDeque<ApiResult<FollowOutcome>>,
    comments: VecDeque<ApiResult<Comment>>,
    calls: Vec<Call>,
    tokens: Vec<String>,
}

#[derive(Default)]
pub(crate) struct FakeGateway {
    script: Mutex<Script>,
}

impl FakeGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_login(&self, result: ApiResult<Credential>) -> &Self {
        self.script.lock().unwrap().logins.push_back(result);
        self
    }

    pub fn push_posts(&self, result: ApiResult<Vec<Post>>) -> &Self {
        self.script.lock().unwrap().posts.push_back(result);
        self
    }

    pub fn push_profile(&self, result: ApiResult<UserProfile>) -> &Self {
        self.script.lock().unwrap().profiles.push_back(result);
        self
    }

    pub fn push_like(&self, result: ApiResult<LikeOutcome>) -> &Self {
        self.script.lock().unwrap().likes.push_back(result);
        self
    }

    pub fn push_follow(&self, result: ApiResult<FollowOutcome>) -> &Self {
        self.script.lock().unwrap().follows.push_back(result);
        self
    }

    pub fn push_comment(&self, result: ApiResult<Comment>) -> &Self {
        self.script.lock().unwrap().comments.push_back(result);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.script.lock().unwrap().calls.clone()
    }

    /// Tokens sent with protected calls, in order.
    pub fn tokens(&self) -> Vec<String> {
        self.script.lock().unwrap().tokens.clone()
    }

    fn next<T>(
        &self,
        credential: Option<&Credential>,
        call: Call,
        pick: impl FnOnce(&mut Script) -> Option<ApiResult<T>>,
    ) -> ApiResult<T> {
        let mut script = self.script.lock().unwrap();
        script.calls.push(call);
        if let Some(credential) = credential {
            script.tokens.push(credential.as_str().to_string());
        }
        pick(&mut script).unwrap_or_else(|| Err(ApiError::Network("no scripted response".into())))
    }
}

#[async_trait]
impl Gateway for FakeGateway {
    async fn login(&self, username: &str, password: &str) -> ApiResult<Credential> {
        validate_login(username, password)?;
        self.next(None, Call::Login(username.to_string()), |s| s.logins.pop_front())
    }

    async fn list_posts(&self, credential: &Credential) -> ApiResult<Vec<Post>> {
        self.next(Some(credential), Call::ListPosts, |s| s.posts.pop_front())
    }

    async fn fetch_profile(&self, credential: &Credential, user_id: UserId) -> ApiResult<UserProfile> {
        self.next(Some(credential), Call::FetchProfile(user_id), |s| s.profiles.pop_front())
    }

    async fn toggle_like(&self, credential: &Credential, post_id: PostId) -> ApiResult<LikeOutcome> {
        self.next(Some(credential), Call::ToggleLike(post_id), |s| s.likes.pop_front())
    }

    async fn toggle_follow(&self, credential: &Credential, author_id: UserId) -> ApiResult<FollowOutcome> {
        self.next(Some(credential), Call::ToggleFollow(author_id), |s| s.follows.pop_front())
    }

    async fn add_comment(&self, credential: &Credential, post_id: PostId, content: &str) -> ApiResult<Comment> {
        let content = validate_comment(content)?;
        self.next(Some(credential), Call::AddComment(post_id, content.to_string()), |s| s.comments.pop_front())
    }
}

pub(crate) fn post(id: PostId, author_id: UserId, like_count: u64) -> Post {
    let mut post = Post::new(
        id,
        AuthorSummary {
            id: author_id,
            display_name: format!("author{}", author_id),
            avatar_uri: None,
        },
    );
    post.title = format!("post {}", id);
    post.like_count = like_count;
    post
}

pub(crate) fn comment(id: u64, author: &str, content: &str) -> Comment {
    Comment {
        id: Some(id),
        author: author.to_string(),
        content: content.to_string(),
        created_at: None,
    }
}

pub(crate) fn liked(like_count: u64) -> ApiResult<LikeOutcome> {
    Ok(LikeOutcome {
        like_count,
        is_liked: None,
    })
}

pub(crate) fn following(is_following: bool) -> ApiResult<FollowOutcome> {
    Ok(FollowOutcome {
        is_following,
        followers_count: None,
    })
}
