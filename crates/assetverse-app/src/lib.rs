//! Client-side state for AssetVerse.
//!
//! Components publish their state through `tokio::sync::watch` channels; the rendering
//! layer subscribes and redraws on change. All of them are built explicitly and
//! shared through [`AppContext`] rather than living in process-wide globals.

pub mod context;
pub mod folders;
pub mod navigation;
pub mod session;
pub mod task;
pub mod upload;

pub use context::AppContext;
pub use folders::{FolderInitState, FolderInitializer};
pub use navigation::{links_for, resolve_dashboard_route, DashboardGuard, RouteDecision};
pub use session::{SessionState, SessionStore};
pub use task::ActionHandle;
pub use upload::{SignedUploader, UploadPhase, UploadState};

use assetverse_core::{ClientError, ErrorMetadata, LogLevel};

/// Log a client error at the level its metadata asks for.
pub(crate) fn log_client_error(err: &ClientError, operation: &'static str) {
    match err.log_level() {
        LogLevel::Debug => tracing::debug!(
            operation,
            error_code = err.error_code(),
            error = %err,
            "Operation failed"
        ),
        LogLevel::Warn => tracing::warn!(
            operation,
            error_code = err.error_code(),
            error = %err,
            "Operation failed"
        ),
        LogLevel::Error => tracing::error!(
            operation,
            error_code = err.error_code(),
            error = %err,
            "Operation failed"
        ),
    }
}
