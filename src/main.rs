use std::sync::Arc;
use anyhow::{Context, Result};
use chrono::Local;

use murmur::cli::Flags;
use murmur::controllers::feed::compose_via_editor;
use murmur::controllers::{start_app, App, Intent, SubmitPost};
use murmur::logging;
use murmur::models::{Config, FeedApi, HttpClient, IdentityProvider, IdentityState, Post};
use murmur::views::timeline;

fn print_post(post: &Post) {
    let when = post.created_at.with_timezone(&Local).format("%H:%M %h-%d-%Y");
    println!("{} @{} · {} · ♥ {}", post.author.display_name, post.author.handle, when, post.likes_count);
    if !post.body().is_empty() {
        println!("{}", post.body());
    }
    if let Some(original) = post.original.as_deref() {
        println!("  │ @{}: {}", original.author.handle, original.body());
    }
    println!();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let flags = Flags::from_args();

    let config_path = match &flags.config {
        Some(path) => path.clone(),
        None => Config::default_path()?,
    };
    let mut config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    if let Some(timeline) = flags.timeline {
        if timeline != config.timeline {
            config.timeline = timeline;
            config.save(&config_path)?;
        }
    }

    logging::init(&logging::default_log_file()?, &config.log_level)?;
    log::info!("starting against {}", config.api_url);

    // The configured identity stands in for the identity provider handshake.
    let provider = IdentityProvider::new();
    provider.set(match config.identity.clone() {
        Some(identity) => IdentityState::signed_in(identity),
        None => IdentityState::signed_out(),
    });

    let api: Arc<dyn FeedApi> = Arc::new(HttpClient::new(config.api_url.clone()));
    let mut app = App::new(api, provider.subscribe(), config.timeline);
    app.sync_identity().await;

    if flags.post() {
        let text = compose_via_editor("")?;
        app.dispatch(Intent::Submit(SubmitPost::original(text))).await?;
        println!("{}", app.notice().unwrap_or("Posted"));
    } else if flags.fetch() {
        if let Some(notice) = app.notice() {
            eprintln!("{}", notice);
        }
        let snapshot = app.store().snapshot();
        for post in timeline::project(&snapshot, app.query()) {
            print_post(&post);
        }
    } else if flags.profile() {
        let record = app.lookup_profile(flags.handle.as_deref()).await?;
        let author = &record.author;
        println!("{} @{}", author.display_name, author.handle);
        if let Some(bio) = &author.bio {
            println!("{}", bio);
        }
        println!(
            "{} followers · {} following{}",
            author.followers_count,
            author.following_count,
            if author.is_following { " · you follow them" } else { "" }
        );
    } else {
        start_app(app).await?;
    }

    Ok(())
}
