// Portal shell: owns the session store and turns navigations into screens

use crate::auth::{CredentialVerifier, HttpVerifier};
use crate::config::{PortalConfig, TokenSlotConfig};
use crate::forms::{LoginForm, RegisterForm, SubmitOutcome};
use crate::routing::{Route, RouteGuard, Screen, resolve};
use crate::session::{
    FileTokenSlot, MemoryTokenSlot, SessionError, SessionEvent, SessionState, SessionStore,
    SessionWatcher, TokenSlot,
};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

pub struct PortalApp {
    store: Arc<SessionStore>,
    verifier: Arc<dyn CredentialVerifier>,
    guard: RouteGuard,
    location: Route,
}

impl PortalApp {
    pub fn new(slot: Arc<dyn TokenSlot>, verifier: Arc<dyn CredentialVerifier>) -> Self {
        Self {
            store: Arc::new(SessionStore::new(slot, verifier.clone())),
            verifier,
            guard: RouteGuard::default(),
            location: Route::Home,
        }
    }

    /// Wire the HTTP verifier and the configured token slot
    pub fn from_config(config: &PortalConfig) -> Result<Self, String> {
        let verifier = HttpVerifier::new(&config.auth).map_err(|e| e.to_string())?;

        let slot: Arc<dyn TokenSlot> = match &config.token_slot {
            TokenSlotConfig::Memory => Arc::new(MemoryTokenSlot::new()),
            TokenSlotConfig::File { path } => Arc::new(FileTokenSlot::new(path)),
        };

        Ok(Self::new(slot, Arc::new(verifier)))
    }

    /// Kick off verification of any persisted session. Navigation keeps
    /// working meanwhile; protected routes render blank until it settles.
    pub fn start(&self) -> JoinHandle<SessionState> {
        let store = self.store.clone();
        tokio::spawn(async move { store.bootstrap().await })
    }

    pub fn session(&self) -> SessionState {
        self.store.state()
    }

    pub fn subscribe(&self) -> SessionWatcher {
        self.store.subscribe()
    }

    pub fn location(&self) -> Route {
        self.location
    }

    /// Navigate to `path`. A redirect moves the location to its target.
    pub fn navigate(&mut self, path: &str) -> Screen {
        self.go(Route::parse(path))
    }

    /// Re-render the current location, e.g. after the session changed
    pub fn current_screen(&mut self) -> Screen {
        self.go(self.location)
    }

    pub async fn submit_login(&mut self, form: &mut LoginForm) -> Result<Screen, SessionError> {
        let outcome = form.submit(self.verifier.as_ref()).await;
        self.finish_submit(outcome).await
    }

    pub async fn submit_registration(
        &mut self,
        form: &mut RegisterForm,
    ) -> Result<Screen, SessionError> {
        let outcome = form.submit(self.verifier.as_ref()).await;
        self.finish_submit(outcome).await
    }

    pub async fn logout(&mut self) -> Result<Screen, SessionError> {
        self.store.apply(SessionEvent::LoggedOut).await?;
        Ok(self.current_screen())
    }

    async fn finish_submit(&mut self, outcome: SubmitOutcome) -> Result<Screen, SessionError> {
        match outcome {
            SubmitOutcome::Succeeded(event) => {
                self.store.apply(event).await?;
                info!("Signed in, navigating home");
                Ok(self.go(Route::Home))
            }
            SubmitOutcome::Failed(_) | SubmitOutcome::Blocked => Ok(self.current_screen()),
        }
    }

    fn go(&mut self, route: Route) -> Screen {
        let state = self.store.state();
        let screen = resolve(route, &state, &self.guard);

        self.location = match &screen {
            Screen::Redirect(target) => {
                debug!("Redirecting {} -> {}", route, target);
                *target
            }
            _ => route,
        };

        screen
    }
}
