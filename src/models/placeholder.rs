use chrono::{DateTime, Duration, Utc};

use crate::models::identity::Identity;
use crate::models::post::{Author, Post, PostKind, Sentiment};

fn placeholder_author(handle: &str, display_name: &str, avatar: &str) -> Author {
    Author {
        id: Identity::new(format!("placeholder:{}", handle)),
        handle: handle.to_string(),
        display_name: display_name.to_string(),
        bio: None,
        avatar_img: Some(avatar.to_string()),
        profile_img: None,
        url: None,
        birthdate: None,
        followers_count: 0,
        following_count: 0,
        is_following: false,
    }
}

/// Sample feed shown when the feed endpoint cannot be reached.
pub fn placeholder_posts(now: DateTime<Utc>) -> Vec<Post> {
    let sample = |id, author: Author, text: &str, created_at| Post {
        id,
        author_id: author.id.clone(),
        kind: PostKind::Original,
        parent_id: None,
        original_id: None,
        text: Some(text.to_string()),
        created_at,
        likes_count: 15,
        is_liked: false,
        sentiment: Some(Sentiment::Neutral),
        sentiment_score: Some(0.5),
        author,
        original: None,
    };

    vec![
        sample(
            999,
            placeholder_author("dev_user", "Developer", "https://placehold.co/48x48/71717a/FFFFFF?text=D"),
            "This is a sample post. It is shown because the feed service could not be reached.\n\nCheck the api_url in your config.",
            now,
        ),
        sample(
            998,
            placeholder_author("murmur", "murmur", "https://placehold.co/48x48/1DA1F2/FFFFFF?text=M"),
            "The client itself is running fine. You can keep browsing while the service is unavailable.",
            now - Duration::minutes(15),
        ),
    ]
}
