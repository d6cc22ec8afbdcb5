use crate::controllers::navigation::ViewState;
use crate::controllers::profile::{ProfileReconciler, ProfileRecord};
use crate::models::post::Post;
use crate::models::store::PostStore;
use crate::views::timeline::{self, TimelineQuery};

/// A view state resolved against one store snapshot.
#[derive(Clone, Debug, PartialEq)]
pub enum Screen {
    Timeline { posts: Vec<Post> },
    Detail { post: Post, replies: Vec<Post> },
    Profile { record: ProfileRecord, posts: Vec<Post> },
    NotFound(String),
}

pub fn resolve(
    state: &ViewState,
    store: &PostStore,
    profiles: &ProfileReconciler,
    query: TimelineQuery,
) -> Screen {
    match state {
        ViewState::Timeline => Screen::Timeline { posts: timeline::project(store, query) },
        ViewState::Detail(id) => match store.find(*id) {
            Some(post) => Screen::Detail {
                post: post.clone(),
                replies: timeline::replies_of(store, *id),
            },
            None => Screen::NotFound(format!("Post {} was not found", id)),
        },
        ViewState::Profile(identity) => match profiles.resolve(identity, store) {
            Some(record) => Screen::Profile {
                record,
                posts: timeline::posts_by(store, identity),
            },
            None => Screen::NotFound(format!("User {} was not found", identity)),
        },
    }
}

impl Screen {
    pub fn title(&self) -> String {
        match self {
            Screen::Timeline { .. } => "Home".to_string(),
            Screen::Detail { .. } => "Post".to_string(),
            Screen::Profile { record, .. } => {
                let a = &record.author;
                format!(
                    "{} @{} · {} followers · {} following{}",
                    a.display_name,
                    a.handle,
                    a.followers_count,
                    a.following_count,
                    if a.is_following { " · following" } else { "" }
                )
            }
            Screen::NotFound(_) => "Not found".to_string(),
        }
    }

    /// Posts in display order. A detail screen lists the post, then its replies.
    pub fn posts(&self) -> Vec<&Post> {
        match self {
            Screen::Timeline { posts } | Screen::Profile { posts, .. } => posts.iter().collect(),
            Screen::Detail { post, replies } => std::iter::once(post).chain(replies.iter()).collect(),
            Screen::NotFound(_) => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::identity::Identity;
    use crate::models::post::PostKind;
    use crate::models::store::tests::post;

    #[test]
    fn absent_targets_resolve_to_not_found() {
        let store = PostStore::new(vec![post(1, "a", PostKind::Original, 10)]);
        let profiles = ProfileReconciler::new();
        let query = TimelineQuery::default();

        let detail = resolve(&ViewState::Detail(99), &store, &profiles, query);
        assert!(matches!(detail, Screen::NotFound(_)));
        let profile = resolve(&ViewState::Profile(Identity::new("ghost")), &store, &profiles, query);
        assert!(matches!(profile, Screen::NotFound(_)));
    }

    #[test]
    fn detail_lists_post_then_replies() {
        let mut reply = post(2, "b", PostKind::Reply, 20);
        reply.parent_id = Some(1);
        let store = PostStore::new(vec![reply, post(1, "a", PostKind::Original, 10)]);

        let screen = resolve(&ViewState::Detail(1), &store, &ProfileReconciler::new(), TimelineQuery::default());
        let ids: Vec<_> = screen.posts().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }
}
