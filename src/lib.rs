pub mod cli;
pub mod controllers;
pub mod error;
pub mod logging;
pub mod models;
pub mod views;

// Re-exports for convenience
pub use controllers::{start_app, App, Intent, MutationCoordinator, ProfileReconciler, SubmitPost};
pub use error::MurmurError;
pub use models::{Config, FeedApi, HttpClient, Post, PostStore, SharedStore};
