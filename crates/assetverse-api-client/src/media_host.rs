//! Media host: receives the binary payload directly, authorized by a backend grant.

use crate::error_body::{failure_message, MessageField};
use crate::{ApiClient, HttpFailure};
use assetverse_core::constants::GENERIC_UPLOAD_ERROR;
use assetverse_core::{
    ClientError, ClientResult, SelectedUpload, UploadResult, UploadSignatureGrant,
};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};

/// Host messages prefer the nested `error.message` field.
const HOST_MESSAGE_ORDER: [MessageField; 2] = [MessageField::ErrorMessage, MessageField::Message];

/// Performs one signed transfer.
///
/// The grant is taken by value: once handed to the host it cannot be used again.
#[async_trait]
pub trait MediaHost: Send + Sync {
    async fn upload(
        &self,
        upload: &SelectedUpload,
        grant: UploadSignatureGrant,
    ) -> ClientResult<UploadResult>;
}

#[derive(Clone, Debug)]
pub struct MediaHostClient {
    api: ApiClient,
}

impl MediaHostClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Upload path for a cloud account: `/{cloud_name}/image/upload`.
    pub fn upload_path(cloud_name: &str) -> String {
        format!("/{}/image/upload", cloud_name)
    }
}

/// Most specific message available for a failed transfer: structured host message,
/// then raw response text, then HTTP status, then the generic message.
pub fn transfer_failure_message(failure: &HttpFailure) -> String {
    if let Some(message) = failure_message(failure, &HOST_MESSAGE_ORDER) {
        return message;
    }
    match failure {
        HttpFailure::Status { status, body } => {
            let text = body.trim();
            if !text.is_empty() && text.len() <= 200 && !text.starts_with('<') {
                text.to_string()
            } else {
                format!("{} (HTTP {})", GENERIC_UPLOAD_ERROR, status.as_u16())
            }
        }
        HttpFailure::Transport(err) if err.is_timeout() => {
            format!("{}: request timed out", GENERIC_UPLOAD_ERROR)
        }
        HttpFailure::Transport(err) if err.is_connect() => {
            format!("{}: could not reach media host", GENERIC_UPLOAD_ERROR)
        }
        _ => GENERIC_UPLOAD_ERROR.to_string(),
    }
}

fn build_form(upload: &SelectedUpload, grant: UploadSignatureGrant) -> ClientResult<Form> {
    let file = Part::stream(upload.content.clone())
        .file_name(upload.file_name.clone())
        .mime_str(&upload.content_type)
        .map_err(|e| ClientError::Validation(format!("Invalid content type: {}", e)))?;

    Ok(Form::new()
        .part("file", file)
        .text("api_key", grant.api_key)
        .text("timestamp", grant.timestamp.to_string())
        .text("signature", grant.signature)
        .text("folder", grant.folder))
}

#[async_trait]
impl MediaHost for MediaHostClient {
    #[tracing::instrument(
        skip(self, upload, grant),
        fields(
            file_name = %upload.file_name,
            size_bytes = upload.size_bytes,
            cloud_name = %grant.cloud_name,
            folder = %grant.folder
        )
    )]
    async fn upload(
        &self,
        upload: &SelectedUpload,
        grant: UploadSignatureGrant,
    ) -> ClientResult<UploadResult> {
        let path = Self::upload_path(&grant.cloud_name);
        let form = build_form(upload, grant)?;

        let result: UploadResult = self
            .api
            .post_multipart(&path, form)
            .await
            .map_err(|failure| {
                tracing::warn!(error = %failure, "Media host rejected upload");
                ClientError::UploadTransfer(transfer_failure_message(&failure))
            })?;

        tracing::info!(
            public_id = %result.public_id,
            format = %result.format,
            width = result.width,
            height = result.height,
            "Upload accepted by media host"
        );
        Ok(result)
    }
}
