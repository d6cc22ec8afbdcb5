use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::MurmurError;
use crate::models::identity::Identity;
use crate::models::post::{Author, NewPost, Post, PostId, ProfileUpdate, TimelineVariant};

/// Remote collaborators the sync engine talks to. Every call is a single
/// request; a non-2xx answer is a definite failure and is never retried here.
#[async_trait]
pub trait FeedApi: Send + Sync {
    async fn fetch_feed(&self, viewer: &Identity, variant: TimelineVariant) -> Result<Vec<Post>, MurmurError>;

    async fn create_post(&self, post: &NewPost) -> Result<Post, MurmurError>;

    async fn like(&self, user: &Identity, post: PostId) -> Result<(), MurmurError>;

    async fn unlike(&self, user: &Identity, post: PostId) -> Result<(), MurmurError>;

    async fn follow(&self, follower: &Identity, followee: &Identity) -> Result<(), MurmurError>;

    async fn unfollow(&self, follower: &Identity, followee: &Identity) -> Result<(), MurmurError>;

    async fn fetch_author(&self, handle: &str, viewer: Option<&Identity>) -> Result<Author, MurmurError>;

    async fn fetch_own_profile(&self, me: &Identity) -> Result<Author, MurmurError>;

    async fn update_own_profile(&self, update: &ProfileUpdate) -> Result<Author, MurmurError>;
}

#[derive(Serialize)]
struct LikeBody<'a> {
    user_id: &'a Identity,
    tweet_id: PostId,
}

#[derive(Serialize)]
struct FollowBody<'a> {
    follower_id: &'a Identity,
    following_id: &'a Identity,
}

/// JSON-over-HTTP implementation of [`FeedApi`].
#[derive(Clone)]
pub struct HttpClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn check(resp: reqwest::Response) -> Result<reqwest::Response, MurmurError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let message = resp.text().await.unwrap_or_default();
        Err(MurmurError::Server { status: status.as_u16(), message })
    }

    async fn parse<R: DeserializeOwned>(resp: reqwest::Response) -> Result<R, MurmurError> {
        let resp = Self::check(resp).await?;
        resp.json::<R>()
            .await
            .map_err(|e| MurmurError::Decode(format!("response body: {}", e)))
    }
}

#[async_trait]
impl FeedApi for HttpClient {
    async fn fetch_feed(&self, viewer: &Identity, variant: TimelineVariant) -> Result<Vec<Post>, MurmurError> {
        let resp = self.http
            .get(self.url("tweet"))
            .query(&[("current_user_id", viewer.as_str()), ("type", variant.as_str())])
            .send()
            .await?;
        // The service answers `null` for an empty feed.
        let posts: Option<Vec<Post>> = Self::parse(resp).await?;
        Ok(posts.unwrap_or_default())
    }

    async fn create_post(&self, post: &NewPost) -> Result<Post, MurmurError> {
        let resp = self.http.post(self.url("tweet")).json(post).send().await?;
        Self::parse(resp).await
    }

    async fn like(&self, user: &Identity, post: PostId) -> Result<(), MurmurError> {
        let body = LikeBody { user_id: user, tweet_id: post };
        let resp = self.http.post(self.url("likes")).json(&body).send().await?;
        Self::check(resp).await.map(|_| ())
    }

    async fn unlike(&self, user: &Identity, post: PostId) -> Result<(), MurmurError> {
        let body = LikeBody { user_id: user, tweet_id: post };
        let resp = self.http.delete(self.url("likes")).json(&body).send().await?;
        Self::check(resp).await.map(|_| ())
    }

    async fn follow(&self, follower: &Identity, followee: &Identity) -> Result<(), MurmurError> {
        let body = FollowBody { follower_id: follower, following_id: followee };
        let resp = self.http.post(self.url("follow")).json(&body).send().await?;
        Self::check(resp).await.map(|_| ())
    }

    async fn unfollow(&self, follower: &Identity, followee: &Identity) -> Result<(), MurmurError> {
        let body = FollowBody { follower_id: follower, following_id: followee };
        let resp = self.http.delete(self.url("follow")).json(&body).send().await?;
        Self::check(resp).await.map(|_| ())
    }

    async fn fetch_author(&self, handle: &str, viewer: Option<&Identity>) -> Result<Author, MurmurError> {
        let viewer = viewer.map(Identity::as_str).unwrap_or_default();
        let resp = self.http
            .get(self.url(&format!("user/{}", handle)))
            .query(&[("current_user_id", viewer)])
            .send()
            .await?;
        Self::parse(resp).await
    }

    async fn fetch_own_profile(&self, me: &Identity) -> Result<Author, MurmurError> {
        let resp = self.http
            .get(self.url("user/"))
            .query(&[("current_user_id", me.as_str())])
            .send()
            .await?;
        Self::parse(resp).await
    }

    async fn update_own_profile(&self, update: &ProfileUpdate) -> Result<Author, MurmurError> {
        let resp = self.http.put(self.url("user/")).json(update).send().await?;
        Self::parse(resp).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_is_normalized() {
        let client = HttpClient::new("http://localhost:8080/");
        assert_eq!(client.base_url(), "http://localhost:8080");
        assert_eq!(client.url("/tweet"), "http://localhost:8080/tweet");
        assert_eq!(client.url("user/"), "http://localhost:8080/user/");
    }

    #[test]
    fn like_body_uses_wire_names() {
        let user = Identity::new("u1");
        let body = serde_json::to_value(LikeBody { user_id: &user, tweet_id: 4 }).unwrap();
        assert_eq!(body, serde_json::json!({"user_id": "u1", "tweet_id": 4}));
    }
}
