use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// Dashboard role of a signed-in user
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Employee,
    Hr,
}

impl FromStr for Role {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "employee" => Ok(Role::Employee),
            "hr" | "hr-manager" | "hr_manager" => Ok(Role::Hr),
            _ => Err(anyhow::anyhow!("Invalid role: {}", s)),
        }
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Role::Employee => write!(f, "employee"),
            Role::Hr => write!(f, "hr"),
        }
    }
}

/// User profile as reported by the identity provider. Every field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderUser {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, rename = "photoURL", alias = "photoUrl")]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub role: Option<Role>,
}

/// The signed-in identity.
///
/// Optional provider fields are normalized to empty strings once, when the session is
/// built, so readers never have to default them again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub display_name: String,
    pub email: String,
    /// Empty when the provider supplied none or the avatar failed to load.
    pub avatar_url: String,
    pub role: Role,
    pub signed_in_at: DateTime<Utc>,
}

impl Session {
    pub fn from_provider(user: ProviderUser) -> Self {
        Self {
            display_name: user.display_name.unwrap_or_default(),
            email: user.email.unwrap_or_default(),
            avatar_url: user.photo_url.unwrap_or_default(),
            role: user.role.unwrap_or_default(),
            signed_in_at: Utc::now(),
        }
    }

    pub fn has_avatar(&self) -> bool {
        !self.avatar_url.is_empty()
    }

    /// Glyph shown in place of a missing avatar: up to two initials of the display
    /// name, else the first letter of the email, else "?".
    pub fn initials(&self) -> String {
        let from_name: String = self
            .display_name
            .split_whitespace()
            .filter_map(|part| part.chars().next())
            .take(2)
            .flat_map(char::to_uppercase)
            .collect();
        if !from_name.is_empty() {
            return from_name;
        }
        self.email
            .chars()
            .next()
            .map(|c| c.to_uppercase().collect())
            .unwrap_or_else(|| "?".to_string())
    }
}
