//! Signed-in user session

use crate::cache::{EntityCache, QueryKey};
use crate::error::{Result, SdkError};
use crate::permissions::RoleEnforcer;
use taskboard_client::User;
use tracing::info;

/// The current user and the cache that belongs to them.
///
/// Logging out drops the user and everything cached on their behalf.
pub struct Session {
    cache: EntityCache,
    user: Option<User>,
}

impl Session {
    pub fn new(cache: EntityCache) -> Self {
        Self { cache, user: None }
    }

    /// Fetch the profile behind the configured token
    pub async fn load(&mut self) -> Result<&User> {
        let user = match self.cache.fetch_as::<User>(&QueryKey::User).await {
            Ok(user) => user,
            Err(SdkError::Server { status: 401, message }) => {
                return Err(SdkError::Session(message))
            }
            Err(err) => return Err(err),
        };
        info!(user = %user.id, "session loaded");
        Ok(self.user.insert(user))
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// The user, or a session error when nobody is signed in
    pub fn require_user(&self) -> Result<&User> {
        self.user
            .as_ref()
            .ok_or_else(|| SdkError::Session("not signed in".to_string()))
    }

    /// Permission checks for the signed-in user
    pub fn enforcer(&self) -> Result<RoleEnforcer> {
        Ok(RoleEnforcer::new(self.require_user()?.id.clone()))
    }

    pub fn logout(&mut self) {
        if let Some(user) = self.user.take() {
            info!(user = %user.id, "session closed");
        }
        self.cache.clear();
    }
}
