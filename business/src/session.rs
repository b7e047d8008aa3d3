//! Session state and login/register form validation.
//!
//! The authoritative session lives on the server (cookie based). The client only keeps a
//! [`CachedSession`] so the gallery can be shown immediately on launch; it is re-validated
//! with the session check on every load and dropped as soon as the server disagrees.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ValidationError;
use crate::media::lenient_i64;

/// Key under which the optimistic session cache is persisted.
pub const SESSION_CACHE_KEY: &str = "shoebox.session_cache";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<'de> Deserialize<'de> for UserId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        lenient_i64(deserializer).map(Self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: UserId,
    pub username: String,
}

/// Last known signed-in user, persisted between launches.
///
/// Not authoritative: it only decides what to render until the session check answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedSession {
    pub user: SessionUser,
}

impl From<SessionUser> for CachedSession {
    fn from(user: SessionUser) -> Self {
        Self { user }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AuthStatus {
    #[default]
    NotAuthenticated,
    /// Restored from [`CachedSession`], waiting for the server to confirm.
    Optimistic(SessionUser),
    Authenticating,
    Authenticated(SessionUser),
    Failed(String),
}

impl AuthStatus {
    /// Restores the status shown at launch from the persisted cache.
    pub fn from_cache(cache: Option<CachedSession>) -> Self {
        match cache {
            Some(cached) => Self::Optimistic(cached.user),
            None => Self::NotAuthenticated,
        }
    }

    /// Whether the gallery (rather than the auth forms) should be shown.
    pub fn shows_gallery(&self) -> bool {
        matches!(self, Self::Optimistic(_) | Self::Authenticated(_))
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    pub fn user(&self) -> Option<&SessionUser> {
        match self {
            Self::Optimistic(user) | Self::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    pub fn username(&self) -> Option<&str> {
        self.user().map(|u| u.username.as_str())
    }

    /// Cache value that should be persisted for this status.
    pub fn cache(&self) -> Option<CachedSession> {
        self.user().cloned().map(CachedSession::from)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginInput {
    /// Username or email.
    pub credential: String,
    pub password: String,
}

impl LoginInput {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.credential.trim().is_empty() {
            return Err(ValidationError::EmptyField("Username or email"));
        }
        if self.password.is_empty() {
            return Err(ValidationError::EmptyField("Password"));
        }
        Ok(())
    }

    pub fn clear(&mut self) {
        self.credential.clear();
        self.password.clear();
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterInput {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl RegisterInput {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.username.trim().is_empty() {
            return Err(ValidationError::EmptyField("Username"));
        }
        if self.email.trim().is_empty() {
            return Err(ValidationError::EmptyField("Email"));
        }
        if self.password.is_empty() {
            return Err(ValidationError::EmptyField("Password"));
        }
        Ok(())
    }

    pub fn clear(&mut self) {
        self.username.clear();
        self.email.clear();
        self.password.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> SessionUser {
        SessionUser {
            id: UserId(1),
            username: "linh".to_string(),
        }
    }

    #[test]
    fn cache_restores_optimistic_status() {
        let status = AuthStatus::from_cache(Some(CachedSession::from(user())));
        assert_eq!(status, AuthStatus::Optimistic(user()));
        assert!(status.shows_gallery());
        assert!(!status.is_authenticated());
        assert_eq!(status.username(), Some("linh"));
    }

    #[test]
    fn missing_cache_shows_auth_forms() {
        let status = AuthStatus::from_cache(None);
        assert!(!status.shows_gallery());
        assert!(status.cache().is_none());
    }

    #[test]
    fn failed_and_authenticating_have_no_user() {
        assert!(AuthStatus::Authenticating.user().is_none());
        assert!(AuthStatus::Failed("nope".to_string()).user().is_none());
    }

    #[test]
    fn cache_roundtrips_through_json() {
        let cache = AuthStatus::Authenticated(user()).cache().expect("has user");
        let json = serde_json::to_string(&cache).expect("serialize");
        let restored: CachedSession = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(restored, cache);
    }

    #[test]
    fn login_requires_both_fields() {
        let mut input = LoginInput::default();
        assert_eq!(
            input.validate(),
            Err(ValidationError::EmptyField("Username or email"))
        );
        input.credential = "linh@example.com".to_string();
        assert_eq!(input.validate(), Err(ValidationError::EmptyField("Password")));
        input.password = "secret".to_string();
        assert_eq!(input.validate(), Ok(()));
    }

    #[test]
    fn register_requires_every_field() {
        let mut input = RegisterInput {
            username: "   ".to_string(),
            email: "linh@example.com".to_string(),
            password: "pw".to_string(),
        };
        assert_eq!(input.validate(), Err(ValidationError::EmptyField("Username")));
        input.username = "linh".to_string();
        assert_eq!(input.validate(), Ok(()));
        input.clear();
        assert_eq!(input, RegisterInput::default());
    }
}
