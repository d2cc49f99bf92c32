//! Error types module
//!
//! All client-side failures are unified under [`ClientError`]. Each variant describes
//! how it should be shown to the user through [`ErrorMetadata`]; no variant is fatal,
//! every one of them is recorded by the component that produced it and can be retried
//! by repeating the user action.

use std::io;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for remote rejections the user can act on
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata describing how an error is presented to the user.
pub trait ErrorMetadata {
    /// Machine-readable error code (e.g., "SIGNATURE_REQUEST_ERROR")
    fn error_code(&self) -> &'static str;

    /// Whether repeating the same action may succeed
    fn is_recoverable(&self) -> bool;

    /// Suggested action for the user
    fn suggested_action(&self) -> Option<&'static str>;

    /// Inline message shown next to the triggering control
    fn client_message(&self) -> String;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Sign-in or sign-out failed (cancelled, provider error, network error).
    #[error("Authentication error: {0}")]
    Auth(String),

    /// The trusted backend could not issue an upload signature.
    #[error("Signature request failed: {0}")]
    SignatureRequest(String),

    /// The media host rejected the signed transfer or the transfer broke mid-way.
    #[error("Upload transfer failed: {0}")]
    UploadTransfer(String),

    /// `upload()` was invoked with nothing selected.
    #[error("No file selected")]
    NoFileSelected,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Folder initialization failed: {0}")]
    FolderInit(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type ClientResult<T> = Result<T, ClientError>;

impl From<validator::ValidationErrors> for ClientError {
    fn from(err: validator::ValidationErrors) -> Self {
        ClientError::Validation(err.to_string())
    }
}

/// Static metadata for each variant: (error_code, recoverable, suggested_action, log_level).
fn client_error_static_metadata(
    err: &ClientError,
) -> (&'static str, bool, Option<&'static str>, LogLevel) {
    match err {
        ClientError::Auth(_) => (
            "AUTH_ERROR",
            true,
            Some("Try signing in again"),
            LogLevel::Warn,
        ),
        ClientError::SignatureRequest(_) => (
            "SIGNATURE_REQUEST_ERROR",
            true,
            Some("Retry the upload; the selected file is kept"),
            LogLevel::Warn,
        ),
        ClientError::UploadTransfer(_) => (
            "UPLOAD_TRANSFER_ERROR",
            true,
            Some("Retry the upload; the selected file is kept"),
            LogLevel::Warn,
        ),
        ClientError::NoFileSelected => (
            "NO_FILE_SELECTED",
            false,
            Some("Select a file before uploading"),
            LogLevel::Debug,
        ),
        ClientError::Validation(_) => (
            "VALIDATION_ERROR",
            false,
            Some("Check the input and try again"),
            LogLevel::Debug,
        ),
        ClientError::FolderInit(_) => (
            "FOLDER_INIT_ERROR",
            true,
            Some("Retry folder initialization"),
            LogLevel::Warn,
        ),
        ClientError::Config(_) => (
            "CONFIG_ERROR",
            false,
            Some("Check the ASSETVERSE_* environment variables"),
            LogLevel::Error,
        ),
        ClientError::Io(_) => (
            "IO_ERROR",
            true,
            Some("Check the file path and permissions"),
            LogLevel::Error,
        ),
        ClientError::Internal(_) => ("INTERNAL_ERROR", true, None, LogLevel::Error),
    }
}

impl ClientError {
    /// Get the error type name
    pub fn error_type(&self) -> &str {
        match self {
            ClientError::Auth(_) => "AuthError",
            ClientError::SignatureRequest(_) => "SignatureRequestError",
            ClientError::UploadTransfer(_) => "UploadTransferError",
            ClientError::NoFileSelected | ClientError::Validation(_) => "ValidationError",
            ClientError::FolderInit(_) => "FolderInitError",
            ClientError::Config(_) => "ConfigError",
            ClientError::Io(_) => "IoError",
            ClientError::Internal(_) => "InternalError",
        }
    }

    /// Whether this is the validation failure raised before any network call.
    pub fn is_validation(&self) -> bool {
        matches!(self, ClientError::NoFileSelected | ClientError::Validation(_))
    }
}

impl ErrorMetadata for ClientError {
    fn error_code(&self) -> &'static str {
        client_error_static_metadata(self).0
    }

    fn is_recoverable(&self) -> bool {
        client_error_static_metadata(self).1
    }

    fn suggested_action(&self) -> Option<&'static str> {
        client_error_static_metadata(self).2
    }

    fn log_level(&self) -> LogLevel {
        client_error_static_metadata(self).3
    }

    fn client_message(&self) -> String {
        match self {
            ClientError::Auth(ref msg)
            | ClientError::SignatureRequest(ref msg)
            | ClientError::UploadTransfer(ref msg)
            | ClientError::Validation(ref msg)
            | ClientError::FolderInit(ref msg) => msg.clone(),
            ClientError::NoFileSelected => "Please select a file first".to_string(),
            ClientError::Config(ref msg) => msg.clone(),
            ClientError::Io(ref err) => format!("Could not read file: {}", err),
            ClientError::Internal(_) => "Something went wrong".to_string(),
        }
    }
}
