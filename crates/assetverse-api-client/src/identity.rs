//! Identity provider boundary.
//!
//! Only the client-visible contract is modelled: an interactive sign-in that yields a
//! profile, a sign-out, and a lookup of the session the provider has persisted.

use assetverse_core::config::OperatorIdentity;
use assetverse_core::{ClientError, ClientResult, ProviderUser, Role};
use async_trait::async_trait;
use tokio::sync::RwLock;

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Run the interactive handshake.
    async fn sign_in(&self) -> ClientResult<ProviderUser>;

    async fn sign_out(&self) -> ClientResult<()>;

    /// Session persisted by the provider from an earlier run, if any.
    async fn current_user(&self) -> ClientResult<Option<ProviderUser>>;
}

/// Provider backed by a fixed operator identity.
///
/// Used by the CLI harness: the configured identity counts as a persisted session, so
/// `current_user` reports it until `sign_out` is called.
#[derive(Debug)]
pub struct StaticIdentityProvider {
    identity: Option<ProviderUser>,
    signed_in: RwLock<bool>,
}

impl StaticIdentityProvider {
    pub fn new(identity: Option<ProviderUser>, signed_in: bool) -> Self {
        Self {
            identity,
            signed_in: RwLock::new(signed_in),
        }
    }

    /// Build from configuration. Fails when the configured role is not a known role.
    pub fn from_operator(operator: &OperatorIdentity) -> ClientResult<Self> {
        if !operator.is_present() {
            return Ok(Self::new(None, false));
        }

        let role = operator
            .role
            .as_deref()
            .map(str::parse::<Role>)
            .transpose()
            .map_err(|e| ClientError::Config(e.to_string()))?;

        let user = ProviderUser {
            display_name: operator.display_name.clone(),
            email: operator.email.clone(),
            photo_url: operator.photo_url.clone(),
            role,
        };
        Ok(Self::new(Some(user), true))
    }
}

#[async_trait]
impl IdentityProvider for StaticIdentityProvider {
    async fn sign_in(&self) -> ClientResult<ProviderUser> {
        let user = self.identity.clone().ok_or_else(|| {
            ClientError::Auth(
                "No identity configured. Set ASSETVERSE_USER_EMAIL or ASSETVERSE_USER_NAME"
                    .to_string(),
            )
        })?;
        *self.signed_in.write().await = true;
        Ok(user)
    }

    async fn sign_out(&self) -> ClientResult<()> {
        *self.signed_in.write().await = false;
        Ok(())
    }

    async fn current_user(&self) -> ClientResult<Option<ProviderUser>> {
        if *self.signed_in.read().await {
            Ok(self.identity.clone())
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_operator_identity_counts_as_persisted_session() {
        let provider = StaticIdentityProvider::from_operator(&OperatorIdentity {
            display_name: Some("Dana".to_string()),
            email: Some("dana@example.com".to_string()),
            photo_url: None,
            role: Some("hr".to_string()),
        })
        .unwrap();

        let current = provider.current_user().await.unwrap().unwrap();
        assert_eq!(current.role, Some(Role::Hr));

        provider.sign_out().await.unwrap();
        assert!(provider.current_user().await.unwrap().is_none());

        let again = provider.sign_in().await.unwrap();
        assert_eq!(again.email.as_deref(), Some("dana@example.com"));
        assert!(provider.current_user().await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_missing_identity_fails_sign_in() {
        let provider = StaticIdentityProvider::from_operator(&OperatorIdentity::default()).unwrap();
        assert!(provider.current_user().await.unwrap().is_none());
        let err = provider.sign_in().await.unwrap_err();
        assert!(matches!(err, ClientError::Auth(_)));
    }

    #[test]
    fn test_invalid_role_is_config_error() {
        let err = StaticIdentityProvider::from_operator(&OperatorIdentity {
            email: Some("x@example.com".to_string()),
            role: Some("superuser".to_string()),
            ..Default::default()
        })
        .unwrap_err();
        assert!(matches!(err, ClientError::Config(_)));
    }
}
