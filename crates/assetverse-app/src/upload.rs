//! Signed-upload client.
//!
//! Two steps per attempt: the trusted backend signs the transfer, then the bytes go
//! straight to the media host with the grant's fields attached. The grant is a local
//! of [`SignedUploader::upload`] and is consumed by the transfer, so it can never be
//! reused for a second one.
//!
//! ```text
//! Idle -> SigningRequested -> Uploading -> Succeeded
//!               |                 |
//!               +----> Failed <---+
//! ```
//!
//! `Succeeded` and `Failed` go back to `Idle` on [`SignedUploader::clear`] or a new
//! selection.

use crate::log_client_error;
use crate::task::{ActionHandle, StateGuard};
use assetverse_api_client::{MediaHost, SignatureBackend};
use assetverse_core::{
    ClientError, ClientResult, ErrorMetadata, SelectedUpload, TargetFolder, UploadResult,
};
use base64::Engine;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::watch;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadPhase {
    #[default]
    Idle,
    SigningRequested,
    Uploading,
    Succeeded,
    Failed,
}

/// Observable upload state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadState {
    pub phase: UploadPhase,
    /// Folder the next selection targets. Survives success and `clear`.
    pub target_folder: TargetFolder,
    pub selected: Option<SelectedUpload>,
    /// `data:` URL of the selection, filled in once decoded.
    pub preview: Option<String>,
    pub result: Option<UploadResult>,
    pub error: Option<String>,
    /// Bumped by every selection and clear; stale completions compare against it.
    generation: u64,
}

impl UploadState {
    /// A request is in flight; the trigger control should be disabled.
    pub fn is_busy(&self) -> bool {
        matches!(
            self.phase,
            UploadPhase::SigningRequested | UploadPhase::Uploading
        )
    }

    pub fn can_upload(&self) -> bool {
        !self.is_busy() && self.selected.as_ref().is_some_and(|s| !s.is_empty())
    }
}

/// Encode bytes as a `data:` URL for local display.
pub fn preview_data_url(content_type: &str, content: &[u8]) -> String {
    format!(
        "data:{};base64,{}",
        content_type,
        base64::engine::general_purpose::STANDARD.encode(content)
    )
}

pub struct SignedUploader {
    signer: Arc<dyn SignatureBackend>,
    host: Arc<dyn MediaHost>,
    state: watch::Sender<UploadState>,
}

impl SignedUploader {
    pub fn new(signer: Arc<dyn SignatureBackend>, host: Arc<dyn MediaHost>) -> Self {
        let (state, _) = watch::channel(UploadState::default());
        Self {
            signer,
            host,
            state,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<UploadState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> UploadState {
        self.state.borrow().clone()
    }

    /// Choose the folder for the current and following selections.
    pub fn set_target_folder(&self, folder: TargetFolder) {
        self.state.send_modify(|state| {
            state.target_folder = folder;
            if let Some(selected) = state.selected.as_mut() {
                selected.target_folder = folder;
            }
        });
    }

    /// Store a new selection, replacing any unsent one, and decode its preview.
    ///
    /// Prior result and error are cleared. The selection targets the current folder.
    #[tracing::instrument(skip(self, file_name, content), fields(file_name = %file_name.as_ref()))]
    pub async fn select_file(
        &self,
        file_name: impl AsRef<str>,
        content: impl Into<bytes::Bytes>,
    ) -> ClientResult<()> {
        let mut generation = 0;
        let mut selected = None;
        self.state.send_modify(|state| {
            let upload = SelectedUpload::new(file_name.as_ref(), content, state.target_folder);
            state.generation += 1;
            state.phase = UploadPhase::Idle;
            state.selected = Some(upload.clone());
            state.preview = None;
            state.result = None;
            state.error = None;
            generation = state.generation;
            selected = Some(upload);
        });
        let Some(selected) = selected else {
            return Err(ClientError::Internal("selection was not stored".to_string()));
        };
        tracing::debug!(size = %selected.describe(), "File selected");

        let content_type = selected.content_type.clone();
        let content = selected.content.clone();
        let preview =
            tokio::task::spawn_blocking(move || preview_data_url(&content_type, &content))
                .await
                .map_err(|e| ClientError::Internal(format!("Preview decoding failed: {}", e)))?;

        self.state.send_if_modified(|state| {
            if state.generation != generation {
                return false;
            }
            state.preview = Some(preview);
            true
        });
        Ok(())
    }

    /// Read a local file and select it.
    pub async fn select_path(&self, path: &Path) -> ClientResult<()> {
        let content = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload.bin")
            .to_string();
        self.select_file(file_name, content).await
    }

    /// Sign, then transfer, the current selection.
    ///
    /// Fails with [`ClientError::NoFileSelected`] before any network call when nothing
    /// is selected. On failure the selection is kept so the user can retry.
    #[tracing::instrument(skip(self))]
    pub async fn upload(&self) -> ClientResult<UploadResult> {
        let current = self.snapshot();
        let Some(selected) = current.selected.filter(|s| !s.is_empty()) else {
            let err = ClientError::NoFileSelected;
            log_client_error(&err, "upload");
            self.state
                .send_modify(|state| state.error = Some(err.client_message()));
            return Err(err);
        };
        let generation = current.generation;

        self.state.send_modify(|state| {
            state.phase = UploadPhase::SigningRequested;
            state.result = None;
            state.error = None;
        });
        let guard = StateGuard::new(&self.state, move |state: &mut UploadState| {
            if state.generation == generation && state.is_busy() {
                state.phase = UploadPhase::Idle;
            }
        });

        let grant = match self.signer.request_signature(selected.target_folder).await {
            Ok(grant) => grant,
            Err(err) => {
                guard.disarm();
                return Err(self.fail(generation, err));
            }
        };

        let still_selected = self.state.send_if_modified(|state| {
            if state.generation != generation {
                return false;
            }
            state.phase = UploadPhase::Uploading;
            true
        });
        if !still_selected {
            guard.disarm();
            let err = ClientError::Validation(
                "Selection changed before the transfer started".to_string(),
            );
            log_client_error(&err, "upload");
            return Err(err);
        }

        let outcome = self.host.upload(&selected, grant).await;
        guard.disarm();

        match outcome {
            Ok(result) => {
                let applied = self.state.send_if_modified(|state| {
                    if state.generation != generation {
                        return false;
                    }
                    state.phase = UploadPhase::Succeeded;
                    state.result = Some(result.clone());
                    state.selected = None;
                    state.preview = None;
                    state.error = None;
                    state.generation += 1;
                    true
                });
                if !applied {
                    tracing::debug!("Upload finished after its selection was replaced");
                }
                Ok(result)
            }
            Err(err) => Err(self.fail(generation, err)),
        }
    }

    fn fail(&self, generation: u64, err: ClientError) -> ClientError {
        log_client_error(&err, "upload");
        self.state.send_if_modified(|state| {
            if state.generation != generation {
                return false;
            }
            state.phase = UploadPhase::Failed;
            state.error = Some(err.client_message());
            true
        });
        err
    }

    /// Run [`SignedUploader::upload`] on the runtime.
    pub fn spawn_upload(self: &Arc<Self>) -> ActionHandle<ClientResult<UploadResult>> {
        let uploader = Arc::clone(self);
        ActionHandle::spawn("upload", async move { uploader.upload().await })
    }

    /// Drop selection, preview, result and error. The target folder is kept.
    pub fn clear(&self) {
        self.state.send_modify(|state| {
            state.generation += 1;
            state.phase = UploadPhase::Idle;
            state.selected = None;
            state.preview = None;
            state.result = None;
            state.error = None;
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assetverse_core::UploadSignatureGrant;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Notify;

    #[derive(Default)]
    struct FakeSigner {
        calls: AtomicUsize,
        fail: Option<String>,
        folders: std::sync::Mutex<Vec<TargetFolder>>,
        gate: Option<Arc<Notify>>,
    }

    #[async_trait]
    impl SignatureBackend for FakeSigner {
        async fn request_signature(
            &self,
            folder: TargetFolder,
        ) -> ClientResult<UploadSignatureGrant> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.folders.lock().unwrap().push(folder);
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            if let Some(msg) = &self.fail {
                return Err(ClientError::SignatureRequest(msg.clone()));
            }
            Ok(UploadSignatureGrant {
                signature: "abc".to_string(),
                timestamp: 1700000000,
                cloud_name: "demo".to_string(),
                api_key: "key1".to_string(),
                folder: format!("assestverse/{}", folder),
            })
        }
    }

    #[derive(Default)]
    struct FakeHost {
        calls: AtomicUsize,
        fail: Option<String>,
        gate: Option<Arc<Notify>>,
    }

    #[async_trait]
    impl MediaHost for FakeHost {
        async fn upload(
            &self,
            upload: &SelectedUpload,
            grant: UploadSignatureGrant,
        ) -> ClientResult<UploadResult> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            if let Some(msg) = &self.fail {
                return Err(ClientError::UploadTransfer(msg.clone()));
            }
            let stem = upload.file_name.split('.').next().unwrap_or_default();
            Ok(UploadResult {
                public_id: format!("{}/{}", grant.folder, stem),
                secure_url: format!("https://host/{}", upload.file_name),
                folder: grant.folder,
                format: "jpg".to_string(),
                width: 800,
                height: 600,
            })
        }
    }

    fn uploader(
        signer: FakeSigner,
        host: FakeHost,
    ) -> (Arc<FakeSigner>, Arc<FakeHost>, SignedUploader) {
        let signer = Arc::new(signer);
        let host = Arc::new(host);
        let uploader = SignedUploader::new(signer.clone(), host.clone());
        (signer, host, uploader)
    }

    #[tokio::test]
    async fn test_upload_without_selection_makes_no_calls() {
        let (signer, host, uploader) = uploader(FakeSigner::default(), FakeHost::default());

        let err = uploader.upload().await.unwrap_err();

        assert!(matches!(err, ClientError::NoFileSelected));
        assert!(err.is_validation());
        assert_eq!(signer.calls.load(Ordering::SeqCst), 0);
        assert_eq!(host.calls.load(Ordering::SeqCst), 0);
        let state = uploader.snapshot();
        assert_eq!(state.phase, UploadPhase::Idle);
        assert_eq!(state.error.as_deref(), Some("Please select a file first"));
    }

    #[tokio::test]
    async fn test_empty_file_counts_as_no_selection() {
        let (signer, _host, uploader) = uploader(FakeSigner::default(), FakeHost::default());
        uploader.select_file("empty.png", Vec::<u8>::new()).await.unwrap();
        assert!(matches!(
            uploader.upload().await.unwrap_err(),
            ClientError::NoFileSelected
        ));
        assert_eq!(signer.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_select_file_builds_preview_and_clears_previous_outcome() {
        let (_signer, _host, uploader) = uploader(FakeSigner::default(), FakeHost::default());
        uploader.select_file("a.png", b"first".to_vec()).await.unwrap();
        uploader.upload().await.unwrap();
        assert!(uploader.snapshot().result.is_some());

        uploader.select_file("b.png", b"hi".to_vec()).await.unwrap();
        let state = uploader.snapshot();
        assert_eq!(state.phase, UploadPhase::Idle);
        assert!(state.result.is_none());
        assert!(state.error.is_none());
        assert_eq!(state.selected.unwrap().file_name, "b.png");
        assert_eq!(state.preview.as_deref(), Some("data:image/png;base64,aGk="));
    }

    #[tokio::test]
    async fn test_select_then_clear_empties_everything() {
        let (_signer, _host, uploader) = uploader(FakeSigner::default(), FakeHost::default());
        uploader.set_target_folder(TargetFolder::Users);
        uploader.select_file("a.jpg", b"bytes".to_vec()).await.unwrap();

        uploader.clear();

        let state = uploader.snapshot();
        assert!(state.selected.is_none());
        assert!(state.preview.is_none());
        assert!(state.result.is_none());
        assert!(state.error.is_none());
        assert_eq!(state.phase, UploadPhase::Idle);
        assert_eq!(state.target_folder, TargetFolder::Users);
    }

    #[tokio::test]
    async fn test_success_clears_selection_and_keeps_folder() {
        let (signer, host, uploader) = uploader(FakeSigner::default(), FakeHost::default());
        uploader.set_target_folder(TargetFolder::Users);
        uploader.select_file("me.jpg", vec![1u8; 64]).await.unwrap();

        let result = uploader.upload().await.unwrap();

        assert_eq!(result.folder, "assestverse/users");
        assert_eq!(*signer.folders.lock().unwrap(), vec![TargetFolder::Users]);
        assert_eq!(host.calls.load(Ordering::SeqCst), 1);
        let state = uploader.snapshot();
        assert_eq!(state.phase, UploadPhase::Succeeded);
        assert_eq!(state.result, Some(result));
        assert!(state.selected.is_none());
        assert!(state.preview.is_none());
        assert_eq!(state.target_folder, TargetFolder::Users);

        // A repeat needs a fresh selection.
        assert!(matches!(
            uploader.upload().await.unwrap_err(),
            ClientError::NoFileSelected
        ));
        assert_eq!(signer.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_signature_failure_keeps_selection() {
        let (_signer, host, uploader) = uploader(
            FakeSigner {
                fail: Some("Backend unavailable".to_string()),
                ..Default::default()
            },
            FakeHost::default(),
        );
        uploader.select_file("a.jpg", b"bytes".to_vec()).await.unwrap();
        let before = uploader.snapshot().selected;

        let err = uploader.upload().await.unwrap_err();

        assert!(matches!(err, ClientError::SignatureRequest(_)));
        assert_eq!(host.calls.load(Ordering::SeqCst), 0);
        let state = uploader.snapshot();
        assert_eq!(state.phase, UploadPhase::Failed);
        assert_eq!(state.error.as_deref(), Some("Backend unavailable"));
        assert!(state.result.is_none());
        assert_eq!(state.selected, before);
    }

    #[tokio::test]
    async fn test_transfer_failure_keeps_selection_and_allows_retry() {
        let (signer, _host, uploader) = uploader(
            FakeSigner::default(),
            FakeHost {
                fail: Some("Invalid Signature".to_string()),
                ..Default::default()
            },
        );
        uploader.select_file("a.jpg", b"bytes".to_vec()).await.unwrap();
        let before = uploader.snapshot().selected;

        assert!(matches!(
            uploader.upload().await.unwrap_err(),
            ClientError::UploadTransfer(_)
        ));
        let state = uploader.snapshot();
        assert_eq!(state.phase, UploadPhase::Failed);
        assert_eq!(state.error.as_deref(), Some("Invalid Signature"));
        assert!(state.result.is_none());
        assert_eq!(state.selected, before);
        assert!(state.can_upload());

        // Each retry asks for a fresh grant.
        let _ = uploader.upload().await;
        assert_eq!(signer.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_phases_are_observable() {
        let gate = Arc::new(Notify::new());
        let (_signer, _host, uploader) = uploader(
            FakeSigner::default(),
            FakeHost {
                gate: Some(gate.clone()),
                ..Default::default()
            },
        );
        let uploader = Arc::new(uploader);
        uploader.select_file("a.jpg", b"bytes".to_vec()).await.unwrap();
        let mut rx = uploader.subscribe();

        let handle = uploader.spawn_upload();
        rx.wait_for(|s| s.phase == UploadPhase::Uploading).await.unwrap();
        assert!(uploader.snapshot().is_busy());
        assert!(!uploader.snapshot().can_upload());

        gate.notify_one();
        handle.join().await.unwrap().unwrap();
        assert_eq!(uploader.snapshot().phase, UploadPhase::Succeeded);
    }

    #[tokio::test]
    async fn test_cancelled_upload_returns_to_idle_with_selection() {
        let (_signer, _host, uploader) = uploader(
            FakeSigner::default(),
            FakeHost {
                gate: Some(Arc::new(Notify::new())),
                ..Default::default()
            },
        );
        let uploader = Arc::new(uploader);
        uploader.select_file("a.jpg", b"bytes".to_vec()).await.unwrap();
        let mut rx = uploader.subscribe();

        let handle = uploader.spawn_upload();
        rx.wait_for(|s| s.phase == UploadPhase::Uploading).await.unwrap();
        handle.cancel();
        assert!(handle.join().await.is_err());

        let state = uploader.snapshot();
        assert_eq!(state.phase, UploadPhase::Idle);
        assert!(state.selected.is_some());
        assert!(state.result.is_none());
    }

    #[tokio::test]
    async fn test_late_completion_does_not_clobber_new_selection() {
        let gate = Arc::new(Notify::new());
        let (_signer, _host, uploader) = uploader(
            FakeSigner::default(),
            FakeHost {
                gate: Some(gate.clone()),
                ..Default::default()
            },
        );
        let uploader = Arc::new(uploader);
        uploader.select_file("old.jpg", b"old".to_vec()).await.unwrap();
        let mut rx = uploader.subscribe();

        let handle = uploader.spawn_upload();
        rx.wait_for(|s| s.phase == UploadPhase::Uploading).await.unwrap();
        uploader.select_file("new.jpg", b"new".to_vec()).await.unwrap();
        gate.notify_one();

        let result = handle.join().await.unwrap().unwrap();
        assert_eq!(result.secure_url, "https://host/old.jpg");

        let state = uploader.snapshot();
        assert_eq!(state.phase, UploadPhase::Idle);
        assert!(state.result.is_none());
        assert_eq!(state.selected.unwrap().file_name, "new.jpg");
    }

    #[tokio::test]
    async fn test_clear_while_signing_skips_transfer() {
        let gate = Arc::new(Notify::new());
        let (signer, host, uploader) = uploader(
            FakeSigner {
                gate: Some(gate.clone()),
                ..Default::default()
            },
            FakeHost::default(),
        );
        let uploader = Arc::new(uploader);
        uploader.select_file("old.jpg", b"old".to_vec()).await.unwrap();
        let mut rx = uploader.subscribe();

        let handle = uploader.spawn_upload();
        rx.wait_for(|s| s.phase == UploadPhase::SigningRequested)
            .await
            .unwrap();
        uploader.clear();
        gate.notify_one();

        let err = handle.join().await.unwrap().unwrap_err();
        assert!(err.is_validation());
        assert_eq!(signer.calls.load(Ordering::SeqCst), 1);
        assert_eq!(host.calls.load(Ordering::SeqCst), 0);

        let state = uploader.snapshot();
        assert_eq!(state.phase, UploadPhase::Idle);
        assert!(state.selected.is_none());
        assert!(state.error.is_none());
    }

    #[tokio::test]
    async fn test_select_path_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("laptop.webp");
        tokio::fs::write(&path, b"webp-bytes").await.unwrap();

        let (_signer, _host, uploader) = uploader(FakeSigner::default(), FakeHost::default());
        uploader.select_path(&path).await.unwrap();

        let selected = uploader.snapshot().selected.unwrap();
        assert_eq!(selected.file_name, "laptop.webp");
        assert_eq!(selected.size_bytes, 10);
        assert_eq!(selected.content_type, "image/webp");
    }

    #[tokio::test]
    async fn test_select_missing_path_is_io_error() {
        let (_signer, _host, uploader) = uploader(FakeSigner::default(), FakeHost::default());
        let err = uploader
            .select_path(Path::new("/definitely/not/here.jpg"))
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Io(_)));
        assert!(uploader.snapshot().selected.is_none());
    }
}
