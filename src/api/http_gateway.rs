use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use url::Url;

use crate::api::wire::{
    CommentRecord, CommentRequest, ErrorBody, FollowRecord, LikeRecord, LoginRequest, PostRecord,
    ProfileRecord, TokenResponse,
};
use crate::api::{
    validate_comment, validate_login, ApiResult, FollowOutcome, Gateway, LikeOutcome,
};
use crate::app::{ApiError, MurmurError, Result};
use crate::config::ApiConfig;
use crate::domain::{Comment, Credential, Post, PostId, UserId, UserProfile};

/// reqwest-backed gateway for the blog REST API.
pub struct HttpGateway {
    client: Client,
    base: Url,
}

impl HttpGateway {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let mut builder = Client::builder()
            .gzip(true)
            .brotli(true)
            .user_agent(config.user_agent.as_str());

        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| MurmurError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base: Self::normalize_base(&config.base_url)?,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Endpoint paths are joined relative to the base, so the base must end
    /// in a slash for any path prefix to survive.
    fn normalize_base(base_url: &str) -> Result<Url> {
        let mut base = Url::parse(base_url)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(base)
    }

    fn endpoint(&self, path: &str) -> ApiResult<Url> {
        self.base
            .join(path)
            .map_err(|e| ApiError::Network(format!("invalid endpoint {}: {}", path, e)))
    }

    fn authorized(&self, builder: RequestBuilder, credential: &Credential) -> RequestBuilder {
        builder.header(AUTHORIZATION, credential.authorization())
    }

    async fn send(&self, builder: RequestBuilder) -> ApiResult<Response> {
        builder.send().await.map_err(|e| {
            tracing::warn!("Request failed before a response arrived: {}", e);
            ApiError::Network(e.to_string())
        })
    }

    /// Maps a non-2xx status of a protected endpoint onto the taxonomy.
    async fn check_status(response: Response) -> ApiResult<Response> {
        let status = response.status();
        tracing::debug!("{} {}", status.as_u16(), response.url().path());

        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::UNAUTHORIZED {
            tracing::warn!("Server rejected credential for {}", response.url().path());
            return Err(ApiError::Unauthorized);
        }

        let message = Self::error_message(response).await;
        tracing::warn!("Server error {}: {}", status.as_u16(), message);
        Err(ApiError::Server {
            status: status.as_u16(),
            message,
        })
    }

    async fn error_message(response: Response) -> String {
        let body = response.text().await.unwrap_or_default();
        serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(ErrorBody::into_message)
            .unwrap_or_default()
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        serde_json::from_str(&body).map_err(|e| ApiError::Server {
            status,
            message: format!("Malformed response: {}", e),
        })
    }
}

#[async_trait]
impl Gateway for HttpGateway {
    async fn login(&self, username: &str, password: &str) -> ApiResult<Credential> {
        validate_login(username, password)?;

        let url = self.endpoint("api/token/")?;
        let response = self
            .send(
                self.client
                    .post(url)
                    .json(&LoginRequest { username, password }),
            )
            .await?;

        let status = response.status();
        if matches!(
            status,
            StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN
        ) {
            tracing::info!("Login rejected for {}", username);
            return Err(ApiError::InvalidCredentials);
        }

        let response = Self::check_status(response).await?;
        let token: TokenResponse = Self::decode(response).await?;

        Credential::new(token.token).ok_or_else(|| ApiError::Server {
            status: status.as_u16(),
            message: "Malformed response: empty token".into(),
        })
    }

    async fn list_posts(&self, credential: &Credential) -> ApiResult<Vec<Post>> {
        let url = self.endpoint("api/posts/")?;
        let response = self
            .send(self.authorized(self.client.get(url), credential))
            .await?;
        let response = Self::check_status(response).await?;
        let status = response.status().as_u16();
        let records: Vec<PostRecord> = Self::decode(response).await?;

        records
            .into_iter()
            .map(PostRecord::into_post)
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|reason| ApiError::Server {
                status,
                message: format!("Malformed response: {}", reason),
            })
    }

    async fn fetch_profile(
        &self,
        credential: &Credential,
        user_id: UserId,
    ) -> ApiResult<UserProfile> {
        let url = self.endpoint(&format!("api/profile/{}/", user_id))?;
        let response = self
            .send(self.authorized(self.client.get(url), credential))
            .await?;
        let response = Self::check_status(response).await?;
        let record: ProfileRecord = Self::decode(response).await?;
        Ok(record.into_profile(user_id))
    }

    async fn toggle_like(&self, credential: &Credential, post_id: PostId) -> ApiResult<LikeOutcome> {
        let url = self.endpoint(&format!("api/posts/{}/like/", post_id))?;
        let response = self
            .send(self.authorized(self.client.post(url), credential))
            .await?;
        let response = Self::check_status(response).await?;
        let record: LikeRecord = Self::decode(response).await?;

        Ok(LikeOutcome {
            like_count: record.likes_count,
            is_liked: record.is_liked,
        })
    }

    async fn toggle_follow(
        &self,
        credential: &Credential,
        author_id: UserId,
    ) -> ApiResult<FollowOutcome> {
        let url = self.endpoint(&format!("api/follow/{}/", author_id))?;
        let response = self
            .send(self.authorized(self.client.post(url), credential))
            .await?;
        let response = Self::check_status(response).await?;
        let record: FollowRecord = Self::decode(response).await?;

        Ok(FollowOutcome {
            is_following: record.is_following,
            followers_count: record.followers_count,
        })
    }

    async fn add_comment(
        &self,
        credential: &Credential,
        post_id: PostId,
        content: &str,
    ) -> ApiResult<Comment> {
        let content = validate_comment(content)?;

        let url = self.endpoint(&format!("api/posts/{}/comments/", post_id))?;
        let response = self
            .send(
                self.authorized(self.client.post(url), credential)
                    .json(&CommentRequest { content }),
            )
            .await?;
        let response = Self::check_status(response).await?;
        let record: CommentRecord = Self::decode(response).await?;
        Ok(record.into_comment())
    }
}
