use std::fmt;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

/// Stable user id as issued by the identity provider.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Identity {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IdentityState {
    pub identity: Option<Identity>,
    pub ready: bool,
}

impl IdentityState {
    pub fn signed_in(identity: Identity) -> Self {
        Self { identity: Some(identity), ready: true }
    }

    pub fn signed_out() -> Self {
        Self { identity: None, ready: true }
    }
}

/// Publishing side of the identity provider. The handshake that produces the
/// identity lives outside this crate; whoever owns it pushes states here.
pub struct IdentityProvider {
    tx: watch::Sender<IdentityState>,
}

impl IdentityProvider {
    /// Starts out not ready and signed out.
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(IdentityState::default());
        Self { tx }
    }

    pub fn set(&self, state: IdentityState) {
        // send_replace never fails, even with no live receivers
        self.tx.send_replace(state);
    }

    pub fn subscribe(&self) -> IdentityWatch {
        IdentityWatch { rx: self.tx.subscribe() }
    }
}

impl Default for IdentityProvider {
    fn default() -> Self {
        Self::new()
    }
}

/// Read side handed to the core.
#[derive(Clone)]
pub struct IdentityWatch {
    rx: watch::Receiver<IdentityState>,
}

impl IdentityWatch {
    pub fn state(&self) -> IdentityState {
        self.rx.borrow().clone()
    }

    pub fn current(&self) -> Option<Identity> {
        let state = self.rx.borrow();
        if state.ready { state.identity.clone() } else { None }
    }

    pub fn is_ready(&self) -> bool {
        self.rx.borrow().ready
    }

    /// Waits for the next published state. Returns `None` once the provider is gone.
    pub async fn changed(&mut self) -> Option<IdentityState> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }
}
