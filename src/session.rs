//! Session store — token, user and remembered email over an injected
//! [`KeyValueStore`].

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info, warn};

use crate::api::models::User;
use crate::error::StorageError;
use crate::storage::KeyValueStore;

/// Storage key for the bearer token.
pub const TOKEN_KEY: &str = "token";
/// Storage key for the JSON-encoded user object.
pub const USER_KEY: &str = "user";
/// Storage key for the email pre-filled on the login form.
pub const REMEMBERED_EMAIL_KEY: &str = "rememberedEmail";

/// An authenticated session.
#[derive(Debug)]
pub struct Session {
    pub token: Option<SecretString>,
    pub user: User,
    pub remembered_email: Option<String>,
}

impl Session {
    pub fn new(token: Option<SecretString>, user: User) -> Self {
        Self {
            token,
            user,
            remembered_email: None,
        }
    }
}

/// Options for [`SessionStore::save`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SaveOptions {
    /// Keep the user's email for the next login form.
    pub remember_email: bool,
}

/// Reads and writes the session through shared storage.
#[derive(Clone)]
pub struct SessionStore {
    storage: Arc<dyn KeyValueStore>,
}

impl SessionStore {
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self { storage }
    }

    /// Persist a freshly created session.
    ///
    /// The token is written only when present; the user is always written.
    /// The remembered email is set to the user's email or removed, per
    /// `options.remember_email`.
    pub async fn save(&self, session: &Session, options: SaveOptions) -> Result<(), StorageError> {
        if let Some(token) = &session.token {
            self.storage.set(TOKEN_KEY, token.expose_secret()).await?;
        }

        let user_json = serde_json::to_string(&session.user)?;
        self.storage.set(USER_KEY, &user_json).await?;

        if options.remember_email {
            self.storage
                .set(REMEMBERED_EMAIL_KEY, &session.user.email)
                .await?;
        } else {
            self.storage.remove(REMEMBERED_EMAIL_KEY).await?;
        }

        info!(
            email = %session.user.email,
            role = %session.user.role,
            has_token = session.token.is_some(),
            remember_email = options.remember_email,
            "Session saved"
        );
        Ok(())
    }

    /// The remembered email, or an empty string when none is stored.
    pub async fn remembered_email(&self) -> Result<String, StorageError> {
        Ok(self
            .storage
            .get(REMEMBERED_EMAIL_KEY)
            .await?
            .unwrap_or_default())
    }

    /// Drop token and user. The remembered email is left alone.
    pub async fn logout(&self) -> Result<(), StorageError> {
        self.storage.remove(TOKEN_KEY).await?;
        self.storage.remove(USER_KEY).await?;
        info!("Session cleared");
        Ok(())
    }

    /// The stored bearer token, if any.
    pub async fn token(&self) -> Result<Option<SecretString>, StorageError> {
        Ok(self.storage.get(TOKEN_KEY).await?.map(SecretString::from))
    }

    /// The stored user. An unreadable user entry is treated as logged out.
    pub async fn current_user(&self) -> Result<Option<User>, StorageError> {
        let Some(raw) = self.storage.get(USER_KEY).await? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(user) => Ok(Some(user)),
            Err(e) => {
                warn!(error = %e, "Stored user is not valid JSON; ignoring");
                Ok(None)
            }
        }
    }

    /// Load the whole session, or `None` when no user is stored.
    pub async fn load(&self) -> Result<Option<Session>, StorageError> {
        let Some(user) = self.current_user().await? else {
            debug!("No stored session");
            return Ok(None);
        };
        let token = self.token().await?;
        let remembered = self.remembered_email().await?;
        Ok(Some(Session {
            token,
            user,
            remembered_email: (!remembered.is_empty()).then_some(remembered),
        }))
    }

    pub async fn is_logged_in(&self) -> Result<bool, StorageError> {
        Ok(self.storage.get(USER_KEY).await?.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::UserRole;
    use crate::storage::MemoryStore;

    fn store() -> (Arc<MemoryStore>, SessionStore) {
        let storage = Arc::new(MemoryStore::new());
        let session = SessionStore::new(storage.clone());
        (storage, session)
    }

    fn session(token: Option<&str>, email: &str) -> Session {
        Session::new(
            token.map(SecretString::from),
            User::new(email, UserRole::User),
        )
    }

    #[tokio::test]
    async fn remember_then_forget_email() {
        let (_, store) = store();

        store
            .save(&session(Some("t1"), "a@b.com"), SaveOptions { remember_email: true })
            .await
            .unwrap();
        assert_eq!(store.remembered_email().await.unwrap(), "a@b.com");

        store
            .save(&session(Some("t1"), "a@b.com"), SaveOptions { remember_email: false })
            .await
            .unwrap();
        assert_eq!(store.remembered_email().await.unwrap(), "");
    }

    #[tokio::test]
    async fn save_without_token_keeps_user_only() {
        let (storage, store) = store();
        store
            .save(&session(None, "x@y.z"), SaveOptions::default())
            .await
            .unwrap();

        assert!(storage.get(TOKEN_KEY).await.unwrap().is_none());
        let user = store.current_user().await.unwrap().unwrap();
        assert_eq!(user.email, "x@y.z");
        assert!(store.is_logged_in().await.unwrap());
    }

    #[tokio::test]
    async fn logout_keeps_remembered_email() {
        let (_, store) = store();
        store
            .save(&session(Some("t1"), "a@b.com"), SaveOptions { remember_email: true })
            .await
            .unwrap();

        store.logout().await.unwrap();

        assert!(store.token().await.unwrap().is_none());
        assert!(store.current_user().await.unwrap().is_none());
        assert!(store.load().await.unwrap().is_none());
        assert_eq!(store.remembered_email().await.unwrap(), "a@b.com");
    }

    #[tokio::test]
    async fn load_reads_everything_back() {
        let (_, store) = store();
        store
            .save(&session(Some("t9"), "c@d.e"), SaveOptions { remember_email: true })
            .await
            .unwrap();

        let loaded = store.load().await.unwrap().unwrap();
        assert_eq!(loaded.token.as_ref().map(|t| t.expose_secret()), Some("t9"));
        assert_eq!(loaded.user.email, "c@d.e");
        assert_eq!(loaded.remembered_email.as_deref(), Some("c@d.e"));
    }

    #[tokio::test]
    async fn corrupt_user_entry_reads_as_logged_out() {
        let (storage, store) = store();
        storage.set(USER_KEY, "{oops").await.unwrap();
        assert!(store.current_user().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn two_handles_share_storage() {
        let (storage, first) = store();
        let second = SessionStore::new(storage);
        first
            .save(&session(Some("t1"), "a@b.com"), SaveOptions::default())
            .await
            .unwrap();
        second
            .save(&session(Some("t2"), "a@b.com"), SaveOptions::default())
            .await
            .unwrap();
        let token = first.token().await.unwrap().unwrap();
        assert_eq!(token.expose_secret(), "t2");
    }
}
