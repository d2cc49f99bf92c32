//! AssetVerse Core Library
//!
//! This crate provides the domain models, error taxonomy, configuration and route
//! constants shared by the AssetVerse client crates.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult, ErrorMetadata, LogLevel};
pub use models::{
    NavIcon, NavLink, ProviderUser, Role, SelectedUpload, Session, TargetFolder, UploadResult,
    UploadSignatureGrant,
};
