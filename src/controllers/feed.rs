use std::env;
use std::fs;
use std::process::Command;
use chrono::Utc;

use crate::error::MurmurError;
use crate::models::client::FeedApi;
use crate::models::identity::Identity;
use crate::models::placeholder::placeholder_posts;
use crate::models::post::TimelineVariant;
use crate::models::store::SharedStore;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FeedSource {
    Remote,
    /// The feed endpoint failed and sample posts were loaded instead.
    Placeholder,
}

/// Replaces the store with `viewer`'s feed for `variant`. A failed read never
/// leaves the screen empty: the placeholder dataset is loaded instead.
pub async fn load_feed(
    api: &dyn FeedApi,
    store: &SharedStore,
    viewer: &Identity,
    variant: TimelineVariant,
) -> FeedSource {
    match api.fetch_feed(viewer, variant).await {
        Ok(posts) => {
            log::info!("loaded {} posts for {} timeline", posts.len(), variant);
            store.write(|s| s.replace_all_for(variant, posts));
            FeedSource::Remote
        }
        Err(e) => {
            log::warn!("feed fetch failed, showing placeholder posts: {}", e);
            store.write(|s| s.replace_all(placeholder_posts(Utc::now())));
            FeedSource::Placeholder
        }
    }
}

/// Opens `$EDITOR` (vi by default) on a scratch file seeded with `initial`
/// and returns what was saved, minus `#` comment lines.
pub fn compose_via_editor(initial: &str) -> Result<String, MurmurError> {
    let editor = env::var("EDITOR").unwrap_or_else(|_| "vi".to_string());

    let mut temp_path = env::temp_dir();
    temp_path.push(format!("murmur-{}.txt", std::process::id()));
    fs::write(&temp_path, initial)?;

    let status = Command::new(&editor).arg(&temp_path).status();
    let content = fs::read_to_string(&temp_path);
    let _ = fs::remove_file(&temp_path);

    if !status?.success() {
        return Err(MurmurError::Io(format!("{} exited with non-zero status", editor)));
    }
    Ok(strip_comments(&content?))
}

fn strip_comments(text: &str) -> String {
    text.lines()
        .filter(|line| !line.starts_with('#'))
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}
