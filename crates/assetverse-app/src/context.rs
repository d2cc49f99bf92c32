//! Application context: wires the components to their external services.

use crate::folders::FolderInitializer;
use crate::navigation::{links_for, DashboardGuard, RouteDecision};
use crate::session::SessionStore;
use crate::upload::SignedUploader;
use anyhow::{Context, Result};
use assetverse_api_client::{
    ApiClient, BackendClient, FolderBackend, IdentityProvider, MediaHost, MediaHostClient,
    SignatureBackend, StaticIdentityProvider,
};
use assetverse_core::{ClientConfig, NavLink};
use std::sync::{Arc, Mutex};

/// Every long-lived component, built once per process and passed around explicitly.
pub struct AppContext {
    config: ClientConfig,
    session: Arc<SessionStore>,
    uploader: Arc<SignedUploader>,
    folders: Arc<FolderInitializer>,
    guard: Mutex<DashboardGuard>,
}

impl AppContext {
    /// Build the context against the real backend and media host.
    pub fn from_config(config: ClientConfig) -> Result<Self> {
        let backend = Arc::new(BackendClient::new(
            ApiClient::backend(&config).context("Failed to create backend client")?,
        ));
        let host = Arc::new(MediaHostClient::new(
            ApiClient::media_host(&config).context("Failed to create media host client")?,
        ));
        let identity = Arc::new(
            StaticIdentityProvider::from_operator(&config.operator)
                .context("Invalid operator identity")?,
        );

        tracing::info!(
            backend_url = %config.backend_url,
            media_host_url = %config.media_host_url,
            environment = %config.environment,
            "AssetVerse client configured"
        );

        Ok(Self::with_services(
            config,
            identity,
            backend.clone(),
            backend,
            host,
        ))
    }

    /// Build the context from explicit service implementations.
    pub fn with_services(
        config: ClientConfig,
        identity: Arc<dyn IdentityProvider>,
        signer: Arc<dyn SignatureBackend>,
        folders: Arc<dyn FolderBackend>,
        host: Arc<dyn MediaHost>,
    ) -> Self {
        Self {
            config,
            session: Arc::new(SessionStore::new(identity)),
            uploader: Arc::new(SignedUploader::new(signer, host)),
            folders: Arc::new(FolderInitializer::new(folders)),
            guard: Mutex::new(DashboardGuard::new()),
        }
    }

    /// Restore any persisted session. Errors are recorded in the session state and
    /// leave the client signed out.
    pub async fn start(&self) {
        if self.session.restore().await.is_err() {
            tracing::warn!("Continuing without a restored session");
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    pub fn uploader(&self) -> &Arc<SignedUploader> {
        &self.uploader
    }

    pub fn folders(&self) -> &Arc<FolderInitializer> {
        &self.folders
    }

    /// Dashboard decision for `current_route` given the current session.
    pub fn route(&self, current_route: &str) -> RouteDecision {
        crate::navigation::resolve_dashboard_route(current_route, &self.session.snapshot())
    }

    /// Feed a route change to the dashboard guard; returns where to navigate, if anywhere.
    pub fn on_route_change(&self, current_route: &str) -> Option<&'static str> {
        let state = self.session.snapshot();
        match self.guard.lock() {
            Ok(mut guard) => guard.evaluate(current_route, &state),
            Err(poisoned) => poisoned.into_inner().evaluate(current_route, &state),
        }
    }

    /// Links for the signed-in role.
    pub fn nav_links(&self) -> &'static [NavLink] {
        links_for(self.session.snapshot().role())
    }

    /// Drop transient upload state before exit.
    pub fn shutdown(&self) {
        self.uploader.clear();
        tracing::info!("AssetVerse client shut down");
    }
}
