use std::sync::Arc;
use std::time::Duration;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use tokio::task::JoinHandle;

use crate::controllers::feed::{self, FeedSource};
use crate::controllers::mutation::{MutationCoordinator, SubmitPost};
use crate::controllers::navigation::{Navigator, ViewState};
use crate::controllers::profile::{ProfileReconciler, ProfileRecord};
use crate::error::MurmurError;
use crate::models::{Author, FeedApi, Identity, IdentityWatch, Post, PostId, SentimentFilter, SharedStore, TimelineVariant};
use crate::views::screen::{self, Screen};
use crate::views::timeline::TimelineQuery;
use crate::views::tui::{self, Tui};
use crate::views::widgets::Selection;

/// Something the user asked for.
#[derive(Clone, Debug, PartialEq)]
pub enum Intent {
    GotoTimeline,
    OpenPost(PostId),
    OpenProfile(Identity),
    Back,
    Refresh,
    SwitchVariant(TimelineVariant),
    SetSentiment(SentimentFilter),
    ToggleLike(PostId),
    ToggleFollow(Author),
    Submit(SubmitPost),
}

/// Result of routing an intent. Toggles and profile fetches run in the
/// background so input keeps flowing while they are in flight.
#[derive(Debug)]
pub enum Dispatched {
    Done,
    Pending(JoinHandle<()>),
}

pub struct App {
    api: Arc<dyn FeedApi>,
    store: SharedStore,
    profiles: Arc<ProfileReconciler>,
    mutations: Arc<MutationCoordinator>,
    identity: IdentityWatch,
    nav: Navigator,
    query: TimelineQuery,
    active_identity: Option<Identity>,
    notice: Option<String>,
}

impl App {
    pub fn new(api: Arc<dyn FeedApi>, identity: IdentityWatch, variant: TimelineVariant) -> Self {
        let store = SharedStore::default();
        let profiles = Arc::new(ProfileReconciler::new());
        let mutations = Arc::new(MutationCoordinator::new(
            Arc::clone(&api),
            store.clone(),
            identity.clone(),
            Arc::clone(&profiles),
        ));
        Self {
            api,
            store,
            profiles,
            mutations,
            identity,
            nav: Navigator::new(),
            query: TimelineQuery { variant, sentiment: SentimentFilter::All },
            active_identity: None,
            notice: None,
        }
    }

    pub fn store(&self) -> &SharedStore {
        &self.store
    }

    pub fn profiles(&self) -> &ProfileReconciler {
        &self.profiles
    }

    pub fn state(&self) -> &ViewState {
        self.nav.state()
    }

    pub fn query(&self) -> TimelineQuery {
        self.query
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn set_notice(&mut self, notice: impl Into<String>) {
        self.notice = Some(notice.into());
    }

    pub fn screen(&self) -> Screen {
        screen::resolve(self.nav.state(), &self.store.snapshot(), &self.profiles, self.query)
    }

    /// Reacts to the identity provider. A new identity reloads the feed; signing
    /// out empties the store. Updates are ignored until the provider is ready.
    /// Returns whether anything changed.
    pub async fn sync_identity(&mut self) -> bool {
        let state = self.identity.state();
        if !state.ready || state.identity == self.active_identity {
            return false;
        }
        log::info!("identity changed: {:?} -> {:?}", self.active_identity, state.identity);
        self.active_identity = state.identity;
        self.nav.goto_timeline();

        if let Some(me) = self.active_identity.clone() {
            self.reload(&me).await;
        } else {
            self.store.write(|s| s.replace_all(Vec::new()));
            self.notice = Some("Signed out".to_string());
        }
        true
    }

    async fn reload(&mut self, me: &Identity) -> FeedSource {
        let source = feed::load_feed(self.api.as_ref(), &self.store, me, self.query.variant).await;
        self.notice = match source {
            FeedSource::Remote => None,
            FeedSource::Placeholder => Some("Could not reach the feed service, showing sample posts".to_string()),
        };
        source
    }

    fn signed_in(&self) -> Result<Identity, MurmurError> {
        self.identity.current().ok_or(MurmurError::NoIdentity)
    }

    pub async fn dispatch(&mut self, intent: Intent) -> Result<Dispatched, MurmurError> {
        log::debug!("dispatch {:?}", intent);
        match intent {
            Intent::GotoTimeline => self.nav.goto_timeline(),
            Intent::OpenPost(id) => self.nav.goto_detail(id),
            Intent::Back => self.nav.back(),
            Intent::OpenProfile(identity) => {
                self.nav.goto_profile(identity.clone());
                let api = Arc::clone(&self.api);
                let store = self.store.clone();
                let profiles = Arc::clone(&self.profiles);
                let viewer = self.identity.current();
                return Ok(Dispatched::Pending(tokio::spawn(async move {
                    // Failure leaves the best-effort record on screen.
                    let _ = profiles.refresh(api.as_ref(), &store, &identity, viewer.as_ref()).await;
                })));
            }
            Intent::Refresh => {
                let me = self.signed_in()?;
                self.reload(&me).await;
            }
            Intent::SwitchVariant(variant) => {
                self.query.variant = variant;
                let me = self.signed_in()?;
                self.reload(&me).await;
            }
            Intent::SetSentiment(filter) => self.query.sentiment = filter,
            Intent::ToggleLike(id) => {
                let mutations = Arc::clone(&self.mutations);
                return Ok(Dispatched::Pending(tokio::spawn(async move {
                    mutations.toggle_like(id).await;
                })));
            }
            Intent::ToggleFollow(author) => {
                let mutations = Arc::clone(&self.mutations);
                return Ok(Dispatched::Pending(tokio::spawn(async move {
                    mutations.toggle_follow(&author).await;
                })));
            }
            Intent::Submit(request) => {
                self.notice = None;
                match self.mutations.submit_post(request).await {
                    Ok(post) => self.notice = Some(format!("Posted ({})", post.id)),
                    Err(e) => {
                        self.notice = Some(format!("Could not post: {}", e));
                        return Err(e);
                    }
                }
            }
        }
        Ok(Dispatched::Done)
    }

    /// Reconciled profile for `handle`, or for the signed-in user.
    pub async fn lookup_profile(&self, handle: Option<&str>) -> Result<ProfileRecord, MurmurError> {
        let viewer = self.identity.current();
        let identity = match handle {
            Some(handle) => {
                let author = self.api.fetch_author(handle, viewer.as_ref()).await?;
                let identity = author.id.clone();
                self.profiles.record_fetch(identity.clone(), author);
                identity
            }
            None => {
                let me = viewer.ok_or(MurmurError::NoIdentity)?;
                self.profiles.load_own_profile(self.api.as_ref(), &me).await?;
                me
            }
        };
        self.profiles
            .resolve(&identity, &self.store.snapshot())
            .ok_or_else(|| MurmurError::Decode(format!("no profile for {}", identity)))
    }

    /// Saves an edited own profile and shows the outcome.
    pub async fn update_profile(&mut self, edited: &Author) -> Result<Author, MurmurError> {
        let result = self.profiles.update_own_profile(self.api.as_ref(), &self.store, edited).await;
        self.notice = Some(match &result {
            Ok(_) => "Profile saved".to_string(),
            Err(e) => format!("Could not save profile: {}", e),
        });
        result
    }

    fn status_line(&self) -> String {
        let filter = format!("[{} | {}] ", self.query.variant, self.query.sentiment);
        match &self.notice {
            Some(notice) => format!("{}{}", filter, notice),
            None => format!("{}{}", filter, tui::KEY_HELP),
        }
    }
}

pub async fn start_app(mut app: App) -> Result<(), MurmurError> {
    let mut terminal = tui::setup_terminal()?;
    let res = run_app(&mut terminal, &mut app).await;
    tui::restore_terminal(&mut terminal)?;
    res
}

/// Composes text in the editor with the UI suspended; `None` if aborted.
fn compose(terminal: &mut Tui, app: &mut App, seed: &str) -> Result<Option<String>, MurmurError> {
    match tui::suspend(terminal, || feed::compose_via_editor(seed))? {
        Ok(text) if text.is_empty() => {
            app.set_notice("Nothing to post");
            Ok(None)
        }
        Ok(text) => Ok(Some(text)),
        Err(e) => {
            app.set_notice(format!("Editor failed: {}", e));
            Ok(None)
        }
    }
}

fn seed_for(action: &str, post: &Post) -> String {
    let mut seed = format!("\n# {} @{}:\n", action, post.author.handle);
    for line in post.body().lines() {
        seed.push_str(&format!("# > {}\n", line));
    }
    seed
}

async fn run_app(terminal: &mut Tui, app: &mut App) -> Result<(), MurmurError> {
    let mut selection = Selection::new();
    loop {
        if app.sync_identity().await {
            selection.reset();
        }

        let screen = app.screen();
        let status = app.status_line();
        terminal.draw(|f| tui::render_screen(f, &screen, &mut selection, &status))?;

        // Yield so spawned toggles and fetches can settle between frames.
        if !event::poll(Duration::ZERO)? {
            tokio::time::sleep(Duration::from_millis(50)).await;
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        let posts = screen.posts();
        let len = posts.len();
        let selected: Option<Post> = selection.selected().and_then(|i| posts.get(i)).map(|p| (*p).clone());

        let intent = match key.code {
            KeyCode::Char('q') => return Ok(()),
            KeyCode::Esc | KeyCode::Backspace => {
                if *app.state() == ViewState::Timeline {
                    return Ok(());
                }
                Some(Intent::Back)
            }
            KeyCode::Down | KeyCode::Char('j') => {
                selection.next(len);
                None
            }
            KeyCode::Up | KeyCode::Char('k') => {
                selection.previous(len);
                None
            }
            KeyCode::PageDown => {
                selection.jump_down(5, len);
                None
            }
            KeyCode::PageUp => {
                selection.jump_up(5, len);
                None
            }
            KeyCode::Char('g') => {
                selection.first(len);
                None
            }
            KeyCode::Char('G') => {
                selection.last(len);
                None
            }
            KeyCode::Char('h') => Some(Intent::GotoTimeline),
            KeyCode::Enter => selected.map(|p| Intent::OpenPost(p.id)),
            KeyCode::Char('a') => selected.map(|p| Intent::OpenProfile(p.author.id)),
            KeyCode::Char('l') => selected.map(|p| Intent::ToggleLike(p.id)),
            KeyCode::Char('f') => match &screen {
                Screen::Profile { record, .. } => Some(Intent::ToggleFollow(record.author.clone())),
                _ => selected.map(|p| Intent::ToggleFollow(p.author)),
            },
            KeyCode::Char('b') => selected.map(|p| Intent::Submit(SubmitPost::repost(p.id))),
            KeyCode::Char('n') => compose(terminal, app, "")?.map(|text| Intent::Submit(SubmitPost::original(text))),
            KeyCode::Char('c') => match selected {
                Some(p) => compose(terminal, app, &seed_for("replying to", &p))?
                    .map(|text| Intent::Submit(SubmitPost::reply(p.id, text))),
                None => None,
            },
            KeyCode::Char('o') => match selected {
                Some(p) => compose(terminal, app, &seed_for("quoting", &p))?
                    .map(|text| Intent::Submit(SubmitPost::quote(p.id, text))),
                None => None,
            },
            KeyCode::Char('r') => Some(Intent::Refresh),
            KeyCode::Char('v') => Some(Intent::SwitchVariant(app.query().variant.toggled())),
            KeyCode::Char('s') => Some(Intent::SetSentiment(app.query().sentiment.next())),
            _ => None,
        };

        if let Some(intent) = intent {
            let moves = matches!(
                intent,
                Intent::GotoTimeline
                    | Intent::OpenPost(_)
                    | Intent::OpenProfile(_)
                    | Intent::Back
                    | Intent::SwitchVariant(_)
                    | Intent::SetSentiment(_)
            );
            if let Err(e) = app.dispatch(intent).await {
                log::warn!("intent failed: {}", e);
            }
            if moves {
                selection.reset();
            }
        }
    }
}
