//! Configuration module
//!
//! Client configuration loaded from the environment: where the trusted backend and the
//! media host live, HTTP timeouts, and an optional operator identity used when no
//! interactive identity provider is available.

use std::env;

use crate::constants::{DEFAULT_BACKEND_URL, DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_MEDIA_HOST_URL};

/// Identity used by the operator-driven identity provider.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OperatorIdentity {
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub photo_url: Option<String>,
    pub role: Option<String>,
}

impl OperatorIdentity {
    /// An identity with neither a name nor an email cannot sign in.
    pub fn is_present(&self) -> bool {
        self.display_name.is_some() || self.email.is_some()
    }
}

/// Client configuration
#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub backend_url: String,
    pub media_host_url: String,
    pub http_timeout_secs: u64,
    pub environment: String,
    pub operator: OperatorIdentity,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            media_host_url: DEFAULT_MEDIA_HOST_URL.to_string(),
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
            environment: "development".to_string(),
            operator: OperatorIdentity::default(),
        }
    }
}

impl ClientConfig {
    /// Load from the process environment (after reading `.env` if present).
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Load from an arbitrary variable lookup.
    pub fn from_vars<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let backend_url = non_empty("ASSETVERSE_BACKEND_URL")
            .or_else(|| non_empty("API_URL"))
            .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string());

        let media_host_url = non_empty("ASSETVERSE_MEDIA_HOST_URL")
            .unwrap_or_else(|| DEFAULT_MEDIA_HOST_URL.to_string());

        let http_timeout_secs = match non_empty("ASSETVERSE_HTTP_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse().map_err(|_| {
                anyhow::anyhow!("ASSETVERSE_HTTP_TIMEOUT_SECS must be a valid number")
            })?,
            None => DEFAULT_HTTP_TIMEOUT_SECS,
        };

        let environment = non_empty("ENVIRONMENT")
            .or_else(|| non_empty("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let operator = OperatorIdentity {
            display_name: non_empty("ASSETVERSE_USER_NAME"),
            email: non_empty("ASSETVERSE_USER_EMAIL"),
            photo_url: non_empty("ASSETVERSE_USER_PHOTO_URL"),
            role: non_empty("ASSETVERSE_USER_ROLE"),
        };

        let config = ClientConfig {
            backend_url: backend_url.trim_end_matches('/').to_string(),
            media_host_url: media_host_url.trim_end_matches('/').to_string(),
            http_timeout_secs,
            environment,
            operator,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check if the client is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        for (name, url) in [
            ("ASSETVERSE_BACKEND_URL", &self.backend_url),
            ("ASSETVERSE_MEDIA_HOST_URL", &self.media_host_url),
        ] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(anyhow::anyhow!("{} must be an http(s) URL, got {}", name, url));
            }
        }

        if self.is_production() && !self.backend_url.starts_with("https://") {
            return Err(anyhow::anyhow!(
                "ASSETVERSE_BACKEND_URL must use https in production"
            ));
        }

        if self.http_timeout_secs == 0 {
            return Err(anyhow::anyhow!(
                "ASSETVERSE_HTTP_TIMEOUT_SECS must be greater than zero"
            ));
        }

        if let Some(role) = self.operator.role.as_deref() {
            role.parse::<crate::models::Role>()?;
        }

        Ok(())
    }
}
