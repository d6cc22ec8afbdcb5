use crate::models::identity::Identity;
use crate::models::post::PostId;

/// Which screen is showing. Targets are not checked on entry; a missing post
/// or author turns into a not-found screen when the view is resolved.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ViewState {
    #[default]
    Timeline,
    Detail(PostId),
    Profile(Identity),
}

#[derive(Debug, Default)]
pub struct Navigator {
    state: ViewState,
}

impl Navigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn goto_timeline(&mut self) {
        self.set(ViewState::Timeline);
    }

    pub fn goto_detail(&mut self, id: PostId) {
        self.set(ViewState::Detail(id));
    }

    pub fn goto_profile(&mut self, identity: Identity) {
        self.set(ViewState::Profile(identity));
    }

    /// One level only: back always lands on the timeline.
    pub fn back(&mut self) {
        self.goto_timeline();
    }

    fn set(&mut self, next: ViewState) {
        log::debug!("view {:?} -> {:?}", self.state, next);
        self.state = next;
    }
}
