use std::sync::Arc;
use parking_lot::RwLock;

use crate::models::identity::Identity;
use crate::models::post::{Author, Post, PostId, TimelineVariant};

/// Versioned, copy-on-write collection of feed posts, newest first.
///
/// Cloning a store is cheap and yields an immutable snapshot: every write
/// builds a new post list and swaps it in whole, so a snapshot taken before a
/// write never sees part of it.
#[derive(Clone, Debug, Default)]
pub struct PostStore {
    version: u64,
    variant: Option<TimelineVariant>,
    posts: Arc<Vec<Post>>,
}

impl PostStore {
    pub fn new(posts: Vec<Post>) -> Self {
        Self { version: 0, variant: None, posts: Arc::new(posts) }
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Timeline variant the current snapshot was loaded for, if any.
    pub fn variant(&self) -> Option<TimelineVariant> {
        self.variant
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    pub fn replace_all(&mut self, posts: Vec<Post>) {
        self.variant = None;
        self.swap(posts);
    }

    pub fn replace_all_for(&mut self, variant: TimelineVariant, posts: Vec<Post>) {
        self.variant = Some(variant);
        self.swap(posts);
    }

    pub fn prepend(&mut self, post: Post) {
        let mut next = Vec::with_capacity(self.posts.len() + 1);
        next.push(post);
        next.extend(self.posts.iter().cloned());
        self.swap(next);
    }

    /// Applies `f` to post `id`: its top-level entry and every copy embedded
    /// as another post's original. Returns false if the store has no copy.
    pub fn mutate_one<F>(&mut self, id: PostId, mut f: F) -> bool
    where
        F: FnMut(&mut Post),
    {
        let present = self
            .posts
            .iter()
            .any(|p| p.id == id || p.original.as_deref().is_some_and(|o| o.id == id));
        if !present {
            log::debug!("mutate_one: post {} not in store", id);
            return false;
        }
        let mut next = self.posts.as_ref().clone();
        for p in next.iter_mut() {
            if p.id == id {
                f(p);
            }
            if let Some(original) = p.original.as_deref_mut().filter(|o| o.id == id) {
                f(original);
            }
        }
        self.swap(next);
        true
    }

    /// Applies `f` to every embedded copy of `identity`'s author record,
    /// nested originals included. Returns the number of copies touched.
    pub fn mutate_by_author<F>(&mut self, identity: &Identity, mut f: F) -> usize
    where
        F: FnMut(&mut Author),
    {
        let mut next = self.posts.as_ref().clone();
        let mut touched = 0;
        for post in next.iter_mut() {
            if post.author.id == *identity {
                f(&mut post.author);
                touched += 1;
            }
            if let Some(original) = post.original.as_deref_mut() {
                if original.author.id == *identity {
                    f(&mut original.author);
                    touched += 1;
                }
            }
        }
        self.swap(next);
        log::debug!("mutate_by_author: {} copies of {} updated", touched, identity);
        touched
    }

    /// Looks up a post by id, falling back to embedded originals.
    pub fn find(&self, id: PostId) -> Option<&Post> {
        self.posts.iter().find(|p| p.id == id).or_else(|| {
            self.posts
                .iter()
                .filter_map(|p| p.original.as_deref())
                .find(|o| o.id == id)
        })
    }

    pub fn filter<P>(&self, mut predicate: P) -> Vec<Post>
    where
        P: FnMut(&Post) -> bool,
    {
        self.posts.iter().filter(|p| predicate(p)).cloned().collect()
    }

    /// First embedded copy of `identity` in store order.
    pub fn find_author(&self, identity: &Identity) -> Option<&Author> {
        self.posts.iter().find_map(|post| {
            if post.author.id == *identity {
                Some(&post.author)
            } else {
                post.original
                    .as_deref()
                    .filter(|o| o.author.id == *identity)
                    .map(|o| &o.author)
            }
        })
    }

    fn swap(&mut self, posts: Vec<Post>) {
        self.posts = Arc::new(posts);
        self.version += 1;
    }
}

/// Store handle shared by the UI task and the remote calls it has in flight.
/// Each read or write holds the lock for one operation only.
#[derive(Clone, Default)]
pub struct SharedStore {
    inner: Arc<RwLock<PostStore>>,
}

impl SharedStore {
    pub fn new(store: PostStore) -> Self {
        Self { inner: Arc::new(RwLock::new(store)) }
    }

    pub fn snapshot(&self) -> PostStore {
        self.inner.read().clone()
    }

    pub fn write<R>(&self, f: impl FnOnce(&mut PostStore) -> R) -> R {
        f(&mut self.inner.write())
    }

    pub fn read<R>(&self, f: impl FnOnce(&PostStore) -> R) -> R {
        f(&self.inner.read())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::models::post::PostKind;

    pub(crate) fn author(id: &str) -> Author {
        Author {
            id: Identity::new(id),
            handle: id.to_string(),
            display_name: id.to_uppercase(),
            bio: None,
            avatar_img: None,
            profile_img: None,
            url: None,
            birthdate: None,
            followers_count: 10,
            following_count: 3,
            is_following: false,
        }
    }

    pub(crate) fn post(id: PostId, by: &str, kind: PostKind, secs: i64) -> Post {
        Post {
            id,
            author_id: Identity::new(by),
            kind,
            parent_id: None,
            original_id: None,
            text: Some(format!("post {}", id)),
            created_at: Utc.timestamp_opt(secs, 0).unwrap(),
            likes_count: 0,
            is_liked: false,
            sentiment: None,
            sentiment_score: None,
            author: author(by),
            original: None,
        }
    }

    #[test]
    fn writes_bump_version_and_leave_snapshots_intact() {
        let mut store = PostStore::new(vec![post(1, "a", PostKind::Original, 10)]);
        let before = store.clone();

        store.prepend(post(2, "b", PostKind::Original, 20));
        assert_eq!(store.version(), before.version() + 1);
        assert_eq!(before.len(), 1);
        assert_eq!(store.posts().iter().map(|p| p.id).collect::<Vec<_>>(), vec![2, 1]);
    }

    #[test]
    fn mutate_one_touches_only_matching_post() {
        let mut store = PostStore::new(vec![
            post(1, "a", PostKind::Original, 10),
            post(2, "a", PostKind::Original, 20),
        ]);
        assert!(store.mutate_one(2, |p| p.likes_count = 9));
        assert_eq!(store.find(1).unwrap().likes_count, 0);
        assert_eq!(store.find(2).unwrap().likes_count, 9);
        assert!(!store.mutate_one(42, |p| p.likes_count = 1));
    }

    #[test]
    fn mutate_one_updates_embedded_copies_of_the_post() {
        let mut repost = post(2, "b", PostKind::Repost, 20);
        repost.original = Some(Box::new(post(1, "a", PostKind::Original, 10)));
        let mut store = PostStore::new(vec![repost.clone(), post(1, "a", PostKind::Original, 10)]);

        assert!(store.mutate_one(1, |p| p.likes_count = 4));
        assert_eq!(store.posts()[0].original.as_ref().unwrap().likes_count, 4);
        assert_eq!(store.posts()[1].likes_count, 4);
        assert_eq!(store.posts()[0].likes_count, 0);

        let mut only_embedded = PostStore::new(vec![repost]);
        assert!(only_embedded.mutate_one(1, |p| p.is_liked = true));
        assert!(only_embedded.find(1).unwrap().is_liked);
    }

    #[test]
    fn mutate_by_author_reaches_nested_originals() {
        let mut repost = post(2, "b", PostKind::Repost, 20);
        repost.original_id = Some(1);
        repost.original = Some(Box::new(post(1, "a", PostKind::Original, 10)));
        let mut store = PostStore::new(vec![repost, post(3, "a", PostKind::Reply, 30)]);

        let touched = store.mutate_by_author(&Identity::new("a"), |a| a.is_following = true);
        assert_eq!(touched, 2);
        assert!(store.find(3).unwrap().author.is_following);
        assert!(store.find(2).unwrap().original.as_ref().unwrap().author.is_following);
        assert!(!store.find(2).unwrap().author.is_following);
    }

    #[test]
    fn find_falls_back_to_embedded_original() {
        let mut quote = post(5, "b", PostKind::Quote, 20);
        quote.original = Some(Box::new(post(4, "a", PostKind::Original, 10)));
        let store = PostStore::new(vec![quote]);
        assert_eq!(store.find(4).map(|p| p.kind), Some(PostKind::Original));
        assert_eq!(store.find_author(&Identity::new("a")).map(|a| a.handle.as_str()), Some("a"));
    }

    #[test]
    fn replace_all_for_records_variant() {
        let mut store = PostStore::default();
        store.replace_all_for(TimelineVariant::Following, vec![]);
        assert_eq!(store.variant(), Some(TimelineVariant::Following));
        store.replace_all(vec![]);
        assert_eq!(store.variant(), None);
    }
}
