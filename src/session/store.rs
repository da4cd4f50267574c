// Session store: the single owner and writer of session state

use super::slot::TokenSlot;
use super::types::{SessionError, SessionEvent, SessionState};
use crate::auth::CredentialVerifier;
use crate::models::{Identity, SessionToken};
use std::sync::Arc;
use tokio::sync::{Mutex, watch};
use tracing::{debug, info, warn};

/// Receiver that yields on every session transition
pub type SessionWatcher = watch::Receiver<SessionState>;

struct StoreInner {
    /// Bumped on every transition; a verification started under an older
    /// generation is discarded when it completes
    generation: u64,
    token: Option<SessionToken>,
    bootstrap_started: bool,
}

/// Holds who is logged in for the lifetime of the process.
///
/// Readers call [`SessionStore::state`] or [`SessionStore::subscribe`]. Only
/// the store's own operations write, and each write swaps the token slot and
/// the published state under one lock so no reader sees one without the other.
pub struct SessionStore {
    slot: Arc<dyn TokenSlot>,
    verifier: Arc<dyn CredentialVerifier>,
    inner: Mutex<StoreInner>,
    state: watch::Sender<SessionState>,
}

impl SessionStore {
    pub fn new(slot: Arc<dyn TokenSlot>, verifier: Arc<dyn CredentialVerifier>) -> Self {
        let (state, _) = watch::channel(SessionState::Uninitialized);
        Self {
            slot,
            verifier,
            inner: Mutex::new(StoreInner {
                generation: 0,
                token: None,
                bootstrap_started: false,
            }),
            state,
        }
    }

    /// Current state snapshot
    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> SessionWatcher {
        self.state.subscribe()
    }

    /// Token of the live session, if any
    pub async fn token(&self) -> Option<SessionToken> {
        self.inner.lock().await.token.clone()
    }

    /// Resolve the persisted token, if any, into a settled state.
    ///
    /// Never fails: an unreadable slot, a rejected token or an unreachable
    /// service all end in `Anonymous` with the slot purged. Only the first
    /// call does any work.
    pub async fn bootstrap(&self) -> SessionState {
        let (generation, token) = {
            let mut inner = self.inner.lock().await;
            if inner.bootstrap_started {
                debug!("Bootstrap already started, skipping");
                return self.state();
            }
            inner.bootstrap_started = true;

            if self.state.borrow().is_settled() {
                debug!("Session settled before bootstrap, skipping verification");
                return self.state();
            }

            let persisted = match self.slot.load() {
                Ok(token) => token,
                Err(e) => {
                    warn!("Failed to read persisted token: {}", e);
                    self.purge_slot();
                    None
                }
            };

            match persisted {
                Some(token) => (inner.generation, token),
                None => {
                    debug!("No persisted token, starting anonymous");
                    // A blank entry loads as `None` but still occupies the slot
                    self.purge_slot();
                    self.transition(&mut inner, SessionState::Anonymous);
                    return self.state();
                }
            }
        };

        debug!("Verifying persisted token");
        self.verify_and_settle(generation, token).await
    }

    /// Re-check the live token with the verifier. A rejection logs the
    /// session out.
    pub async fn revalidate(&self) -> SessionState {
        let (generation, token) = {
            let inner = self.inner.lock().await;
            let authenticated = self.state.borrow().is_authenticated();
            match (authenticated, &inner.token) {
                (true, Some(token)) => (inner.generation, token.clone()),
                _ => {
                    debug!("Nothing to revalidate");
                    return self.state();
                }
            }
        };

        self.verify_and_settle(generation, token).await
    }

    /// Persist the token and mark `identity` as logged in. Replaces any
    /// current session. If the token cannot be persisted nothing changes.
    pub async fn login(&self, identity: Identity, token: SessionToken) -> Result<(), SessionError> {
        let mut inner = self.inner.lock().await;

        self.slot.store(&token)?;

        info!(
            "Session established for {} with role {}",
            identity.email, identity.role
        );
        inner.token = Some(token);
        self.transition(&mut inner, SessionState::Authenticated(identity));
        Ok(())
    }

    /// Clear the persisted token and become anonymous.
    ///
    /// The state always ends anonymous; an error means the slot could not be
    /// cleared.
    pub async fn logout(&self) -> Result<(), SessionError> {
        let mut inner = self.inner.lock().await;

        let cleared = self.slot.clear();
        if let Err(ref e) = cleared {
            warn!("Failed to clear persisted token on logout: {}", e);
        }

        if self.state.borrow().is_authenticated() {
            info!("Session ended");
        }
        inner.token = None;
        self.transition(&mut inner, SessionState::Anonymous);

        cleared.map_err(SessionError::from)
    }

    /// Consume a session event
    pub async fn apply(&self, event: SessionEvent) -> Result<(), SessionError> {
        match event {
            SessionEvent::LoggedIn { identity, token } => self.login(identity, token).await,
            SessionEvent::LoggedOut => self.logout().await,
        }
    }

    async fn verify_and_settle(&self, generation: u64, token: SessionToken) -> SessionState {
        let result = self.verifier.verify(&token).await;

        let mut inner = self.inner.lock().await;
        if inner.generation != generation {
            debug!(
                "Discarding verification result from generation {} (now {})",
                generation, inner.generation
            );
            return self.state();
        }

        match result {
            Ok(identity) => {
                info!(
                    "Session verified for {} with role {}",
                    identity.email, identity.role
                );
                inner.token = Some(token);
                self.transition(&mut inner, SessionState::Authenticated(identity));
            }
            Err(e) => {
                info!("Stored session rejected, continuing anonymously: {}", e);
                self.purge_slot();
                inner.token = None;
                self.transition(&mut inner, SessionState::Anonymous);
            }
        }

        self.state()
    }

    fn purge_slot(&self) {
        if let Err(e) = self.slot.clear() {
            warn!("Failed to purge persisted token: {}", e);
        }
    }

    fn transition(&self, inner: &mut StoreInner, next: SessionState) {
        inner.generation += 1;
        let to = next.label();
        self.state.send_if_modified(|current| {
            if *current == next {
                return false;
            }
            debug!("Session state {} -> {}", current.label(), to);
            *current = next;
            true
        });
    }
}
