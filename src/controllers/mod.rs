pub mod app_controller;
pub mod feed;
pub mod mutation;
pub mod navigation;
pub mod profile;

// Re-export key types
pub use app_controller::{start_app, App, Dispatched, Intent};
pub use mutation::{MutationCoordinator, SubmitPost, ToggleOutcome};
pub use navigation::{Navigator, ViewState};
pub use profile::{ProfileReconciler, ProfileRecord, Provenance};
