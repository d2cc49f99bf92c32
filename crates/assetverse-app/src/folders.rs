//! Folder initialization client.

use crate::log_client_error;
use crate::task::{ActionHandle, StateGuard};
use assetverse_api_client::FolderBackend;
use assetverse_core::{ClientResult, ErrorMetadata};
use std::sync::Arc;
use tokio::sync::watch;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FolderInitState {
    pub loading: bool,
    /// Last successful backend status, shown verbatim to the operator.
    pub status: Option<serde_json::Value>,
    pub error: Option<String>,
}

pub struct FolderInitializer {
    backend: Arc<dyn FolderBackend>,
    state: watch::Sender<FolderInitState>,
}

impl FolderInitializer {
    pub fn new(backend: Arc<dyn FolderBackend>) -> Self {
        let (state, _) = watch::channel(FolderInitState::default());
        Self { backend, state }
    }

    pub fn subscribe(&self) -> watch::Receiver<FolderInitState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> FolderInitState {
        self.state.borrow().clone()
    }

    /// Ask the backend to ensure both storage folders exist. Safe to repeat.
    ///
    /// A failure keeps the previous successful status until the next attempt.
    #[tracing::instrument(skip(self))]
    pub async fn initialize_folders(&self) -> ClientResult<serde_json::Value> {
        self.state.send_modify(|state| {
            state.loading = true;
            state.error = None;
        });
        let guard = StateGuard::new(&self.state, |state: &mut FolderInitState| {
            state.loading = false
        });
        let outcome = self.backend.initialize_folders().await;
        guard.disarm();

        match outcome {
            Ok(status) => {
                tracing::info!(status = %status, "Storage folders initialized");
                self.state.send_modify(|state| {
                    state.loading = false;
                    state.status = Some(status.clone());
                    state.error = None;
                });
                Ok(status)
            }
            Err(err) => {
                log_client_error(&err, "initialize_folders");
                self.state.send_modify(|state| {
                    state.loading = false;
                    state.error = Some(err.client_message());
                });
                Err(err)
            }
        }
    }

    /// Fire-and-forget variant; the outcome lands in the observable state.
    pub fn spawn_initialize(self: &Arc<Self>) -> ActionHandle<ClientResult<serde_json::Value>> {
        let folders = Arc::clone(self);
        ActionHandle::spawn("initialize_folders", async move {
            folders.initialize_folders().await
        })
    }
}
