//! Session state holder.
//!
//! The only owner of the signed-in [`Session`]. Everything else reads snapshots or
//! subscribes; only `restore`, `sign_in`, `sign_out` and the avatar fallback mutate it.

use crate::log_client_error;
use crate::task::StateGuard;
use assetverse_api_client::IdentityProvider;
use assetverse_core::{ClientResult, ErrorMetadata, Role, Session};
use std::sync::Arc;
use tokio::sync::watch;

/// Observable session state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub session: Option<Session>,
    /// A provider request is in flight. Advisory: callers should disable the
    /// triggering control, nothing prevents a second request.
    pub loading: bool,
    pub error: Option<String>,
}

impl SessionState {
    /// Initial state: loading until the persisted provider session has been checked.
    pub fn restoring() -> Self {
        Self {
            session: None,
            loading: true,
            error: None,
        }
    }

    pub fn signed_out() -> Self {
        Self {
            session: None,
            loading: false,
            error: None,
        }
    }

    pub fn signed_in(session: Session) -> Self {
        Self {
            session: Some(session),
            loading: false,
            error: None,
        }
    }

    pub fn is_signed_in(&self) -> bool {
        self.session.is_some()
    }

    pub fn role(&self) -> Option<Role> {
        self.session.as_ref().map(|s| s.role)
    }
}

pub struct SessionStore {
    provider: Arc<dyn IdentityProvider>,
    state: watch::Sender<SessionState>,
}

impl SessionStore {
    pub fn new(provider: Arc<dyn IdentityProvider>) -> Self {
        let (state, _) = watch::channel(SessionState::restoring());
        Self { provider, state }
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn session(&self) -> Option<Session> {
        self.state.borrow().session.clone()
    }

    fn begin(&self) -> StateGuard<'_, SessionState, impl FnOnce(&mut SessionState)> {
        self.state.send_modify(|s| s.loading = true);
        StateGuard::new(&self.state, |s: &mut SessionState| s.loading = false)
    }

    /// Pick up a session the provider persisted earlier. Clears `loading` either way.
    #[tracing::instrument(skip(self))]
    pub async fn restore(&self) -> ClientResult<Option<Session>> {
        let guard = self.begin();
        let outcome = self.provider.current_user().await;
        guard.disarm();

        match outcome {
            Ok(user) => {
                let session = user.map(Session::from_provider);
                if let Some(ref s) = session {
                    tracing::info!(email = %s.email, role = %s.role, "Restored persisted session");
                }
                self.state.send_modify(|state| {
                    state.session = session.clone();
                    state.loading = false;
                    state.error = None;
                });
                Ok(session)
            }
            Err(err) => {
                log_client_error(&err, "restore_session");
                self.state.send_modify(|state| {
                    state.session = None;
                    state.loading = false;
                    state.error = Some(err.client_message());
                });
                Err(err)
            }
        }
    }

    /// Interactive sign-in. Never retried automatically.
    #[tracing::instrument(skip(self))]
    pub async fn sign_in(&self) -> ClientResult<Session> {
        let guard = self.begin();
        let outcome = self.provider.sign_in().await;
        guard.disarm();

        match outcome {
            Ok(user) => {
                let session = Session::from_provider(user);
                tracing::info!(email = %session.email, role = %session.role, "Signed in");
                self.state
                    .send_replace(SessionState::signed_in(session.clone()));
                Ok(session)
            }
            Err(err) => {
                log_client_error(&err, "sign_in");
                self.state.send_modify(|state| {
                    state.loading = false;
                    state.error = Some(err.client_message());
                });
                Err(err)
            }
        }
    }

    /// Ends the provider session. A failed sign-out keeps the current session.
    #[tracing::instrument(skip(self))]
    pub async fn sign_out(&self) -> ClientResult<()> {
        let guard = self.begin();
        let outcome = self.provider.sign_out().await;
        guard.disarm();

        match outcome {
            Ok(()) => {
                tracing::info!("Signed out");
                self.state.send_replace(SessionState::signed_out());
                Ok(())
            }
            Err(err) => {
                log_client_error(&err, "sign_out");
                self.state.send_modify(|state| {
                    state.loading = false;
                    state.error = Some(err.client_message());
                });
                Err(err)
            }
        }
    }

    /// The avatar image could not be loaded: drop the URL so an initials glyph is shown.
    pub fn on_avatar_load_failure(&self) {
        self.state.send_if_modified(|state| match state.session.as_mut() {
            Some(session) if session.has_avatar() => {
                tracing::debug!(avatar_url = %session.avatar_url, "Avatar failed to load");
                session.avatar_url.clear();
                true
            }
            _ => false,
        });
    }
}
