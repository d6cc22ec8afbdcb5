use std::collections::HashMap;
use chrono::Utc;
use parking_lot::RwLock;

use crate::error::MurmurError;
use crate::models::client::FeedApi;
use crate::models::identity::Identity;
use crate::models::post::{Author, ProfileUpdate};
use crate::models::store::{PostStore, SharedStore};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Provenance {
    /// Only the copy embedded in feed posts is known; the fetch is pending or failed.
    Embedded,
    /// No post in the store carries this author.
    Fetched,
    Merged,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ProfileRecord {
    pub author: Author,
    pub provenance: Provenance,
}

/// Embedded fields win; optional fields the embedded copy lacks fall back to
/// the fetched record.
pub fn merge(fetched: &Author, embedded: &Author) -> Author {
    Author {
        id: embedded.id.clone(),
        handle: embedded.handle.clone(),
        display_name: embedded.display_name.clone(),
        bio: embedded.bio.clone().or_else(|| fetched.bio.clone()),
        avatar_img: embedded.avatar_img.clone().or_else(|| fetched.avatar_img.clone()),
        profile_img: embedded.profile_img.clone().or_else(|| fetched.profile_img.clone()),
        url: embedded.url.clone().or_else(|| fetched.url.clone()),
        birthdate: embedded.birthdate.clone().or_else(|| fetched.birthdate.clone()),
        followers_count: embedded.followers_count,
        following_count: embedded.following_count,
        is_following: embedded.is_following,
    }
}

/// Keeps the latest authoritative author fetches and reconciles them with the
/// copies embedded in feed posts, which may carry newer optimistic edits.
#[derive(Default)]
pub struct ProfileReconciler {
    fetched: RwLock<HashMap<Identity, Author>>,
}

impl ProfileReconciler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_fetch(&self, identity: Identity, author: Author) {
        self.fetched.write().insert(identity, author);
    }

    pub fn fetched(&self, identity: &Identity) -> Option<Author> {
        self.fetched.read().get(identity).cloned()
    }

    /// Edits the fetched record in place, if there is one.
    pub fn patch_fetched(&self, identity: &Identity, f: impl FnOnce(&mut Author)) -> bool {
        match self.fetched.write().get_mut(identity) {
            Some(author) => {
                f(author);
                true
            }
            None => false,
        }
    }

    pub fn resolve(&self, identity: &Identity, store: &PostStore) -> Option<ProfileRecord> {
        let embedded = store.find_author(identity);
        let fetched = self.fetched(identity);
        match (fetched, embedded) {
            (Some(fetched), Some(embedded)) => Some(ProfileRecord {
                author: merge(&fetched, embedded),
                provenance: Provenance::Merged,
            }),
            (None, Some(embedded)) => Some(ProfileRecord {
                author: embedded.clone(),
                provenance: Provenance::Embedded,
            }),
            (Some(fetched), None) => Some(ProfileRecord {
                author: fetched,
                provenance: Provenance::Fetched,
            }),
            (None, None) => None,
        }
    }

    /// Fetches `identity` by handle. On failure the previous state stays in
    /// place and the view keeps showing its best-effort record.
    pub async fn refresh(
        &self,
        api: &dyn FeedApi,
        store: &SharedStore,
        identity: &Identity,
        viewer: Option<&Identity>,
    ) -> Result<ProfileRecord, MurmurError> {
        let handle = store
            .read(|s| s.find_author(identity).map(|a| a.handle.clone()))
            .unwrap_or_else(|| identity.to_string());

        match api.fetch_author(&handle, viewer).await {
            Ok(author) => {
                log::info!("fetched profile @{}", handle);
                self.record_fetch(identity.clone(), author);
            }
            Err(e) => {
                log::warn!("profile fetch for @{} failed: {}", handle, e);
                return Err(e);
            }
        }

        let snapshot = store.snapshot();
        self.resolve(identity, &snapshot)
            .ok_or_else(|| MurmurError::Decode(format!("no profile for {}", identity)))
    }

    pub async fn load_own_profile(&self, api: &dyn FeedApi, me: &Identity) -> Result<Author, MurmurError> {
        let author = api.fetch_own_profile(me).await?;
        self.record_fetch(me.clone(), author.clone());
        Ok(author)
    }

    /// Saves an edited own profile. Nothing changes locally unless the service
    /// accepts the edit; then every embedded copy picks up the new fields.
    pub async fn update_own_profile(
        &self,
        api: &dyn FeedApi,
        store: &SharedStore,
        edited: &Author,
    ) -> Result<Author, MurmurError> {
        if edited.display_name.trim().is_empty() {
            return Err(MurmurError::Validation("Display name is required".to_string()));
        }

        let update = ProfileUpdate::from_author(edited, Utc::now());
        let saved = api.update_own_profile(&update).await.map_err(|e| {
            log::warn!("profile update failed: {}", e);
            e
        })?;

        self.record_fetch(edited.id.clone(), saved.clone());
        let copies = store.write(|s| s.mutate_by_author(&edited.id, |a| a.copy_profile_fields(&saved)));
        log::info!("profile saved, {} embedded copies updated", copies);
        Ok(saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::post::PostKind;
    use crate::models::store::tests::{author, post};

    #[test]
    fn embedded_copy_wins_on_conflict() {
        let mut fetched = author("a");
        fetched.is_following = false;
        fetched.followers_count = 10;
        fetched.bio = Some("from server".to_string());

        let mut p = post(1, "a", PostKind::Original, 10);
        p.author.is_following = true;
        p.author.followers_count = 11;
        let store = PostStore::new(vec![p]);

        let reconciler = ProfileReconciler::new();
        reconciler.record_fetch(Identity::new("a"), fetched);
        let record = reconciler.resolve(&Identity::new("a"), &store).unwrap();

        assert_eq!(record.provenance, Provenance::Merged);
        assert!(record.author.is_following);
        assert_eq!(record.author.followers_count, 11);
        assert_eq!(record.author.bio.as_deref(), Some("from server"));
    }

    #[test]
    fn best_effort_before_fetch() {
        let store = PostStore::new(vec![post(1, "a", PostKind::Original, 10)]);
        let record = ProfileReconciler::new().resolve(&Identity::new("a"), &store).unwrap();
        assert_eq!(record.provenance, Provenance::Embedded);
    }

    #[test]
    fn fetched_only_and_unknown() {
        let reconciler = ProfileReconciler::new();
        reconciler.record_fetch(Identity::new("z"), author("z"));
        let store = PostStore::default();
        assert_eq!(reconciler.resolve(&Identity::new("z"), &store).unwrap().provenance, Provenance::Fetched);
        assert!(reconciler.resolve(&Identity::new("y"), &store).is_none());
    }

    #[test]
    fn newest_embedded_copy_is_used() {
        let mut newer = post(2, "a", PostKind::Original, 20);
        newer.author.display_name = "Renamed".to_string();
        let store = PostStore::new(vec![newer, post(1, "a", PostKind::Original, 10)]);
        let record = ProfileReconciler::new().resolve(&Identity::new("a"), &store).unwrap();
        assert_eq!(record.author.display_name, "Renamed");
    }
}
