use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use validator::Validate;

/// One of the two canonical storage folders an upload can target
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetFolder {
    #[default]
    Assets,
    Users,
}

impl TargetFolder {
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetFolder::Assets => "assets",
            TargetFolder::Users => "users",
        }
    }
}

impl FromStr for TargetFolder {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "assets" => Ok(TargetFolder::Assets),
            "users" => Ok(TargetFolder::Users),
            _ => Err(anyhow::anyhow!(
                "Invalid folder: {}. Must be one of: assets, users",
                s
            )),
        }
    }
}

impl Display for TargetFolder {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// A file picked for upload and not yet transferred
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedUpload {
    pub content: Bytes,
    pub file_name: String,
    pub size_bytes: u64,
    pub content_type: String,
    pub target_folder: TargetFolder,
}

impl SelectedUpload {
    pub fn new(
        file_name: impl Into<String>,
        content: impl Into<Bytes>,
        target_folder: TargetFolder,
    ) -> Self {
        let file_name = file_name.into();
        let content = content.into();
        Self {
            size_bytes: content.len() as u64,
            content_type: guess_content_type(&file_name).to_string(),
            file_name,
            content,
            target_folder,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Name and human-readable size, e.g. `photo.jpg (2.0 MB)`.
    pub fn describe(&self) -> String {
        format!("{} ({})", self.file_name, format_file_size(self.size_bytes))
    }
}

/// Body of the backend signature request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SignatureRequest {
    pub folder: TargetFolder,
}

/// Single-use credential authorizing exactly one transfer to the media host.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Validate)]
pub struct UploadSignatureGrant {
    #[validate(length(min = 1, message = "Grant is missing a signature"))]
    pub signature: String,
    /// Unix seconds the signature is bound to
    pub timestamp: i64,
    #[serde(rename = "cloudName")]
    #[validate(length(min = 1, message = "Grant is missing the cloud name"))]
    pub cloud_name: String,
    #[serde(rename = "apiKey")]
    #[validate(length(min = 1, message = "Grant is missing the API key"))]
    pub api_key: String,
    /// Folder resolved by the backend, e.g. `assestverse/assets`
    pub folder: String,
}

/// What the media host reports for an accepted upload
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UploadResult {
    pub public_id: String,
    pub secure_url: String,
    #[serde(default)]
    pub folder: String,
    #[serde(default)]
    pub format: String,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
}

/// Guess a MIME type from the file extension. Unknown extensions map to
/// `application/octet-stream`.
pub fn guess_content_type(file_name: &str) -> &'static str {
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "bmp" => "image/bmp",
        "avif" => "image/avif",
        "heic" => "image/heic",
        _ => "application/octet-stream",
    }
}

/// Format a byte count with binary units, one decimal place above bytes.
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["KB", "MB", "GB", "TB"];
    if bytes < 1024 {
        return format!("{} B", bytes);
    }
    let mut size = bytes as f64 / 1024.0;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", size, UNITS[unit])
}
