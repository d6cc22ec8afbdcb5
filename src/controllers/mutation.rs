use std::sync::Arc;

use crate::controllers::profile::ProfileReconciler;
use crate::error::MurmurError;
use crate::models::client::FeedApi;
use crate::models::identity::{Identity, IdentityWatch};
use crate::models::post::{Author, LikeState, NewPost, Post, PostId, PostKind};
use crate::models::store::SharedStore;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToggleOutcome {
    Committed,
    /// The remote call failed and the captured snapshot was restored.
    RolledBack,
    /// Nothing to toggle: no signed-in identity or unknown target.
    Skipped,
}

/// A post the user wants to publish.
#[derive(Clone, Debug, PartialEq)]
pub struct SubmitPost {
    pub kind: PostKind,
    pub text: Option<String>,
    pub parent_id: Option<PostId>,
    pub original_id: Option<PostId>,
}

impl SubmitPost {
    pub fn original(text: impl Into<String>) -> Self {
        Self { kind: PostKind::Original, text: Some(text.into()), parent_id: None, original_id: None }
    }

    pub fn reply(parent_id: PostId, text: impl Into<String>) -> Self {
        Self { kind: PostKind::Reply, text: Some(text.into()), parent_id: Some(parent_id), original_id: None }
    }

    pub fn repost(original_id: PostId) -> Self {
        Self { kind: PostKind::Repost, text: None, parent_id: None, original_id: Some(original_id) }
    }

    pub fn quote(original_id: PostId, text: impl Into<String>) -> Self {
        Self { kind: PostKind::Quote, text: Some(text.into()), parent_id: None, original_id: Some(original_id) }
    }
}

/// Optimistic writes against the shared store, confirmed or compensated once
/// the remote call settles.
///
/// Overlapping calls on the same entity are not serialized. Every call
/// captures its own snapshot when it is issued and restores exactly that
/// snapshot if its remote call fails, whatever happened in between.
pub struct MutationCoordinator {
    api: Arc<dyn FeedApi>,
    store: SharedStore,
    identity: IdentityWatch,
    profiles: Arc<ProfileReconciler>,
}

impl MutationCoordinator {
    pub fn new(
        api: Arc<dyn FeedApi>,
        store: SharedStore,
        identity: IdentityWatch,
        profiles: Arc<ProfileReconciler>,
    ) -> Self {
        Self { api, store, identity, profiles }
    }

    pub async fn toggle_like(&self, id: PostId) -> ToggleOutcome {
        let Some(me) = self.identity.current() else {
            log::debug!("like on {} ignored: not signed in", id);
            return ToggleOutcome::Skipped;
        };

        let before = self.store.write(|s| {
            let before = s.find(id).map(Post::like_state)?;
            s.mutate_one(id, |p| p.set_like_state(before.toggled()));
            Some(before)
        });
        let Some(before) = before else {
            log::debug!("like on {} ignored: post not in store", id);
            return ToggleOutcome::Skipped;
        };

        let result = if before.liked {
            self.api.unlike(&me, id).await
        } else {
            self.api.like(&me, id).await
        };

        match result {
            Ok(()) => {
                log::info!("post {} liked={}", id, !before.liked);
                ToggleOutcome::Committed
            }
            Err(e) => {
                // Not surfaced: the reader keeps going, the log keeps the trace.
                log::warn!("like toggle on {} failed, restoring {:?}: {}", id, before, e);
                self.restore_like(id, before);
                ToggleOutcome::RolledBack
            }
        }
    }

    fn restore_like(&self, id: PostId, before: LikeState) {
        self.store.write(|s| s.mutate_one(id, |p| p.set_like_state(before)));
    }

    pub async fn toggle_follow(&self, author: &Author) -> ToggleOutcome {
        let Some(me) = self.identity.current() else {
            log::debug!("follow on {} ignored: not signed in", author.id);
            return ToggleOutcome::Skipped;
        };
        if me == author.id {
            log::debug!("follow on self ignored");
            return ToggleOutcome::Skipped;
        }
        if author.id.as_str().is_empty() {
            log::debug!("follow on @{} ignored: author has no identity", author.handle);
            return ToggleOutcome::Skipped;
        }

        let target = author.id.clone();
        let before = self.store.write(|s| {
            let before = s
                .find_author(&target)
                .map(Author::follow_state)
                .or_else(|| self.profiles.fetched(&target).map(|a| a.follow_state()))
                .unwrap_or_else(|| author.follow_state());
            let after = before.toggled();
            s.mutate_by_author(&target, |a| a.set_follow_state(after));
            before
        });
        self.profiles.patch_fetched(&target, |a| a.set_follow_state(before.toggled()));

        let result = if before.is_following {
            self.api.unfollow(&me, &target).await
        } else {
            self.api.follow(&me, &target).await
        };

        match result {
            Ok(()) => {
                log::info!("{} following={}", target, !before.is_following);
                ToggleOutcome::Committed
            }
            Err(e) => {
                log::warn!("follow toggle on {} failed, restoring {:?}: {}", target, before, e);
                self.store.write(|s| s.mutate_by_author(&target, |a| a.set_follow_state(before)));
                self.profiles.patch_fetched(&target, |a| a.set_follow_state(before));
                ToggleOutcome::RolledBack
            }
        }
    }

    /// Publishes a post. Creation is pessimistic: the store only changes once
    /// the service has returned the new post.
    pub async fn submit_post(&self, request: SubmitPost) -> Result<Post, MurmurError> {
        let me = self.identity.current().ok_or(MurmurError::NoIdentity)?;
        let body = self.build(me, request)?;

        let mut created = self.api.create_post(&body).await.map_err(|e| {
            log::warn!("create {:?} failed: {}", body.kind, e);
            e
        })?;

        if matches!(created.kind, PostKind::Original | PostKind::Reply) {
            // The create response carries no viewer-specific like state.
            created.likes_count = 0;
            created.is_liked = false;
        }
        log::info!("created {:?} post {}", created.kind, created.id);
        self.store.write(|s| s.prepend(created.clone()));
        Ok(created)
    }

    fn build(&self, me: Identity, request: SubmitPost) -> Result<NewPost, MurmurError> {
        let has_text = request.text.as_deref().is_some_and(|t| !t.trim().is_empty());
        let missing = |what: &str| MurmurError::Validation(format!("{} is required", what));

        let (text, reply_to_id, original_id) = match request.kind {
            PostKind::Original => {
                if !has_text {
                    return Err(missing("Text"));
                }
                (request.text, None, None)
            }
            PostKind::Reply => {
                if !has_text {
                    return Err(missing("Reply text"));
                }
                let parent = request.parent_id.ok_or_else(|| missing("Reply target"))?;
                (request.text, Some(parent), None)
            }
            PostKind::Repost => {
                let target = request.original_id.ok_or_else(|| missing("Repost target"))?;
                let text = if has_text { request.text } else { None };
                (text, None, Some(self.resolve_original(target)?))
            }
            PostKind::Quote => {
                if !has_text {
                    return Err(missing("Quote text"));
                }
                let target = request.original_id.ok_or_else(|| missing("Quote target"))?;
                (request.text, None, Some(self.resolve_original(target)?))
            }
        };

        Ok(NewPost { user_id: me, text, kind: request.kind, reply_to_id, original_id })
    }

    /// Collapses repost/quote chains to the root original. Ids the store does
    /// not know are passed through for the service to judge.
    fn resolve_original(&self, target: PostId) -> Result<PostId, MurmurError> {
        self.store.read(|s| match s.find(target) {
            Some(post) if post.kind == PostKind::Reply => {
                Err(MurmurError::Validation("Replies cannot be reposted or quoted".to_string()))
            }
            Some(post) => Ok(post.root_original_id()),
            None => {
                log::debug!("repost target {} not in store, sending as-is", target);
                Ok(target)
            }
        })
    }
}
