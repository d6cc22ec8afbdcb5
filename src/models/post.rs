use std::fmt;
use std::str::FromStr;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::identity::Identity;

pub type PostId = u64;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PostKind {
    #[serde(rename = "tweet")]
    Original,
    Reply,
    Repost,
    Quote,
}

impl PostKind {
    /// Whether the kind points at an original post via `original_id`.
    pub fn embeds_original(self) -> bool {
        matches!(self, PostKind::Repost | PostKind::Quote)
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
    #[serde(other)]
    Unknown,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SentimentFilter {
    #[default]
    All,
    Only(Sentiment),
}

impl SentimentFilter {
    pub fn matches(self, sentiment: Option<Sentiment>) -> bool {
        match self {
            SentimentFilter::All => true,
            SentimentFilter::Only(wanted) => sentiment == Some(wanted),
        }
    }

    /// Cycles all -> positive -> neutral -> negative -> all.
    pub fn next(self) -> Self {
        match self {
            SentimentFilter::All => SentimentFilter::Only(Sentiment::Positive),
            SentimentFilter::Only(Sentiment::Positive) => SentimentFilter::Only(Sentiment::Neutral),
            SentimentFilter::Only(Sentiment::Neutral) => SentimentFilter::Only(Sentiment::Negative),
            SentimentFilter::Only(_) => SentimentFilter::All,
        }
    }
}

impl fmt::Display for SentimentFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SentimentFilter::All => f.write_str("all"),
            SentimentFilter::Only(Sentiment::Positive) => f.write_str("positive"),
            SentimentFilter::Only(Sentiment::Negative) => f.write_str("negative"),
            SentimentFilter::Only(Sentiment::Neutral) => f.write_str("neutral"),
            SentimentFilter::Only(Sentiment::Unknown) => f.write_str("unknown"),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TimelineVariant {
    #[default]
    #[serde(rename = "foryou")]
    ForYou,
    #[serde(rename = "following")]
    Following,
}

impl TimelineVariant {
    pub fn as_str(self) -> &'static str {
        match self {
            TimelineVariant::ForYou => "foryou",
            TimelineVariant::Following => "following",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            TimelineVariant::ForYou => TimelineVariant::Following,
            TimelineVariant::Following => TimelineVariant::ForYou,
        }
    }
}

impl fmt::Display for TimelineVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimelineVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "foryou" | "for-you" => Ok(TimelineVariant::ForYou),
            "following" => Ok(TimelineVariant::Following),
            other => Err(format!("unknown timeline '{}', expected foryou or following", other)),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Author {
    #[serde(rename = "firebase_uid", default)]
    pub id: Identity,
    #[serde(rename = "user_name")]
    pub handle: String,
    pub display_name: String,
    #[serde(rename = "self_introduction", default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub avatar_img: Option<String>,
    #[serde(default)]
    pub profile_img: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub birthdate: Option<String>,
    #[serde(default)]
    pub followers_count: u64,
    #[serde(default)]
    pub following_count: u64,
    #[serde(default)]
    pub is_following: bool,
}

/// Viewer-relative follow fields, captured before an optimistic write.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FollowState {
    pub is_following: bool,
    pub followers_count: u64,
}

impl Author {
    pub fn follow_state(&self) -> FollowState {
        FollowState {
            is_following: self.is_following,
            followers_count: self.followers_count,
        }
    }

    pub fn set_follow_state(&mut self, state: FollowState) {
        self.is_following = state.is_following;
        self.followers_count = state.followers_count;
    }

    /// Copies the fields a profile edit can change.
    pub fn copy_profile_fields(&mut self, from: &Author) {
        self.handle = from.handle.clone();
        self.display_name = from.display_name.clone();
        self.bio = from.bio.clone();
        self.avatar_img = from.avatar_img.clone();
        self.profile_img = from.profile_img.clone();
        self.url = from.url.clone();
        self.birthdate = from.birthdate.clone();
    }
}

impl FollowState {
    /// The state after one follow/unfollow. Followers move by exactly one.
    pub fn toggled(self) -> Self {
        if self.is_following {
            FollowState {
                is_following: false,
                followers_count: self.followers_count.saturating_sub(1),
            }
        } else {
            FollowState {
                is_following: true,
                followers_count: self.followers_count + 1,
            }
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Post {
    pub id: PostId,
    #[serde(rename = "user_id", default)]
    pub author_id: Identity,
    #[serde(rename = "type")]
    pub kind: PostKind,
    #[serde(rename = "reply_to_id", default)]
    pub parent_id: Option<PostId>,
    #[serde(default)]
    pub original_id: Option<PostId>,
    #[serde(default)]
    pub text: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub likes_count: u64,
    #[serde(default)]
    pub is_liked: bool,
    #[serde(default)]
    pub sentiment: Option<Sentiment>,
    #[serde(default)]
    pub sentiment_score: Option<f64>,
    #[serde(rename = "user")]
    pub author: Author,
    #[serde(default)]
    pub original: Option<Box<Post>>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LikeState {
    pub liked: bool,
    pub count: u64,
}

impl LikeState {
    pub fn toggled(self) -> Self {
        if self.liked {
            LikeState { liked: false, count: self.count.saturating_sub(1) }
        } else {
            LikeState { liked: true, count: self.count + 1 }
        }
    }
}

impl Post {
    pub fn like_state(&self) -> LikeState {
        LikeState { liked: self.is_liked, count: self.likes_count }
    }

    pub fn set_like_state(&mut self, state: LikeState) {
        self.is_liked = state.liked;
        self.likes_count = state.count;
    }

    /// The id a repost or quote of this post must point at. Reposts and quotes
    /// resolve to their own original so chains never grow past one hop.
    pub fn root_original_id(&self) -> PostId {
        if self.kind.embeds_original() {
            self.original_id
                .or_else(|| self.original.as_ref().map(|o| o.id))
                .unwrap_or(self.id)
        } else {
            self.id
        }
    }

    pub fn body(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }
}

/// Body of the post create endpoint.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct NewPost {
    pub user_id: Identity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(rename = "type")]
    pub kind: PostKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to_id: Option<PostId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_id: Option<PostId>,
}

/// Body of the own-profile update endpoint. Every editable field is sent with
/// its update flag raised.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ProfileUpdate {
    pub firebase_uid: Identity,
    pub user_name: String,
    pub display_name: String,
    pub self_introduction: Option<String>,
    #[serde(rename = "updateSelfIntro")]
    pub update_self_intro: bool,
    pub birthdate: Option<String>,
    #[serde(rename = "updateBirthdate")]
    pub update_birthdate: bool,
    pub url: Option<String>,
    #[serde(rename = "updateURL")]
    pub update_url: bool,
    pub profile_img: Option<String>,
    #[serde(rename = "updateProfileImg")]
    pub update_profile_img: bool,
    pub avatar_img: Option<String>,
    #[serde(rename = "updateAvatar")]
    pub update_avatar: bool,
    pub updated_at: DateTime<Utc>,
}

impl ProfileUpdate {
    pub fn from_author(author: &Author, now: DateTime<Utc>) -> Self {
        Self {
            firebase_uid: author.id.clone(),
            user_name: author.handle.clone(),
            display_name: author.display_name.clone(),
            self_introduction: author.bio.clone(),
            update_self_intro: true,
            birthdate: author.birthdate.clone(),
            update_birthdate: true,
            url: author.url.clone(),
            update_url: true,
            profile_img: author.profile_img.clone(),
            update_profile_img: true,
            avatar_img: author.avatar_img.clone(),
            update_avatar: true,
            updated_at: now,
        }
    }
}
