pub mod client;
pub mod config;
pub mod identity;
pub mod placeholder;
pub mod post;
pub mod store;

// Re-export important structs for convenience
pub use client::{FeedApi, HttpClient};
pub use config::Config;
pub use identity::{Identity, IdentityProvider, IdentityState, IdentityWatch};
pub use post::{Author, Post, PostId, PostKind, Sentiment, SentimentFilter, TimelineVariant};
pub use store::{PostStore, SharedStore};
