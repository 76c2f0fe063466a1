use crate::domain::ports::UserStoreBox;
use crate::domain::user::{PasswordDigest, UserRecord, Username};
use crate::error::{Result, StorefrontError};

/// Registers and authenticates users against a `UserStore`.
///
/// Passwords are reduced to an unsalted digest before they reach storage.
pub struct CredentialStore {
    users: UserStoreBox,
}

impl CredentialStore {
    pub fn new(users: UserStoreBox) -> Self {
        Self { users }
    }

    /// Returns `false` if the username is already taken.
    pub async fn register(&self, username: &str, password: &str) -> Result<bool> {
        let username = Username::new(username)?;
        let digest = PasswordDigest::of(password);
        match self.users.create(&username, &digest).await {
            Ok(record) => {
                tracing::info!(user = %record.username, id = record.id, "registered user");
                Ok(true)
            }
            Err(StorefrontError::DuplicateUsername) => {
                tracing::debug!(user = %username, "registration rejected: username taken");
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    /// Returns `true` only if the user exists and the password digest matches.
    ///
    /// The comparison is not constant-time.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<bool> {
        let Ok(username) = Username::new(username) else {
            return Ok(false);
        };
        let matched = self
            .users
            .find(&username)
            .await?
            .is_some_and(|user| user.password_digest.matches(password));
        if !matched {
            tracing::debug!(user = %username, "authentication failed");
        }
        Ok(matched)
    }

    pub async fn find(&self, username: &str) -> Result<Option<UserRecord>> {
        let username = Username::new(username)?;
        self.users.find(&username).await
    }
}
