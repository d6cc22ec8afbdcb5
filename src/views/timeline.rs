use crate::models::identity::Identity;
use crate::models::post::{Post, PostId, PostKind, SentimentFilter, TimelineVariant};
use crate::models::store::PostStore;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TimelineQuery {
    pub variant: TimelineVariant,
    pub sentiment: SentimentFilter,
}

/// Root-level posts for the main feed, newest first.
///
/// Replies, reposts and quotes never appear here. Posts with equal timestamps
/// keep their store order. A snapshot loaded for another variant projects to
/// nothing until the feed is reloaded.
pub fn project(store: &PostStore, query: TimelineQuery) -> Vec<Post> {
    if store.variant().is_some_and(|loaded| loaded != query.variant) {
        return Vec::new();
    }
    let mut posts = store.filter(|p| p.kind == PostKind::Original && query.sentiment.matches(p.sentiment));
    posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    posts
}

/// Direct replies to `parent`, oldest first.
pub fn replies_of(store: &PostStore, parent: PostId) -> Vec<Post> {
    let mut replies = store.filter(|p| p.parent_id == Some(parent));
    replies.sort_by(|a, b| a.created_at.cmp(&b.created_at));
    replies
}

/// Everything `author` posted, of any kind, newest first.
pub fn posts_by(store: &PostStore, author: &Identity) -> Vec<Post> {
    let mut posts = store.filter(|p| p.author.id == *author);
    posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    posts
}
