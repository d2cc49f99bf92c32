//! Trusted backend: issues upload signatures and prepares storage folders.
//!
//! The backend holds the media host's signing secret; the client only ever sees the
//! resulting single-use grant.

use crate::error_body::{failure_message, MessageField};
use crate::{ApiClient, HttpFailure};
use assetverse_core::constants::{
    GENERIC_FOLDER_INIT_ERROR, GENERIC_SIGNATURE_ERROR, INIT_FOLDERS_PATH, SIGNATURE_PATH,
};
use assetverse_core::models::SignatureRequest;
use assetverse_core::{ClientError, ClientResult, TargetFolder, UploadSignatureGrant};
use async_trait::async_trait;
use validator::Validate;

/// Backend messages prefer the top-level `message` field.
const BACKEND_MESSAGE_ORDER: [MessageField; 2] = [MessageField::Message, MessageField::ErrorMessage];

/// Issues one signature grant per upload attempt.
#[async_trait]
pub trait SignatureBackend: Send + Sync {
    async fn request_signature(&self, folder: TargetFolder) -> ClientResult<UploadSignatureGrant>;
}

/// Ensures the canonical storage folders exist. Idempotent.
#[async_trait]
pub trait FolderBackend: Send + Sync {
    /// Returns the backend's opaque status payload.
    async fn initialize_folders(&self) -> ClientResult<serde_json::Value>;
}

#[derive(Clone, Debug)]
pub struct BackendClient {
    api: ApiClient,
}

impl BackendClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub fn base_url(&self) -> &str {
        self.api.base_url()
    }
}

fn backend_message(failure: &HttpFailure, fallback: &str) -> String {
    failure_message(failure, &BACKEND_MESSAGE_ORDER).unwrap_or_else(|| fallback.to_string())
}

#[async_trait]
impl SignatureBackend for BackendClient {
    #[tracing::instrument(skip(self, folder), fields(folder = %folder))]
    async fn request_signature(&self, folder: TargetFolder) -> ClientResult<UploadSignatureGrant> {
        let grant: UploadSignatureGrant = self
            .api
            .post_json(SIGNATURE_PATH, &SignatureRequest { folder })
            .await
            .map_err(|failure| {
                tracing::warn!(error = %failure, "Signature request failed");
                ClientError::SignatureRequest(backend_message(&failure, GENERIC_SIGNATURE_ERROR))
            })?;

        grant.validate().map_err(|err| {
            tracing::warn!(error = %err, "Backend returned an incomplete grant");
            ClientError::SignatureRequest(format!("{}: {}", GENERIC_SIGNATURE_ERROR, err))
        })?;

        tracing::debug!(
            cloud_name = %grant.cloud_name,
            resolved_folder = %grant.folder,
            timestamp = grant.timestamp,
            "Signature grant received"
        );
        Ok(grant)
    }
}

#[async_trait]
impl FolderBackend for BackendClient {
    #[tracing::instrument(skip(self))]
    async fn initialize_folders(&self) -> ClientResult<serde_json::Value> {
        self.api
            .post_empty(INIT_FOLDERS_PATH)
            .await
            .map_err(|failure| {
                tracing::warn!(error = %failure, "Folder initialization failed");
                ClientError::FolderInit(backend_message(&failure, GENERIC_FOLDER_INIT_ERROR))
            })
    }
}
