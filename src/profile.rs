//! Profile editor — the company/user profile pages' edit cycle.
//!
//! Wraps an [`EditableRecord<Profile>`], validates the working copy before
//! it leaves the client, and reports every outcome as a toast.

use std::sync::Arc;

use tracing::{info, warn};

use crate::api::ApiClient;
use crate::api::models::{Profile, ProfileKind};
use crate::editable::{EditState, EditableRecord, SaveError};
use crate::error::{EditError, Error};
use crate::notifications::NotificationManager;
use crate::validation;

/// Edit session for one profile page.
pub struct ProfileEditor {
    kind: ProfileKind,
    client: ApiClient,
    notifications: Arc<NotificationManager>,
    record: EditableRecord<Profile>,
}

impl ProfileEditor {
    /// Fetch the profile and start in Viewing. A failed fetch is shown as an
    /// error toast and returned.
    pub async fn load(
        kind: ProfileKind,
        client: ApiClient,
        notifications: Arc<NotificationManager>,
    ) -> Result<Self, Error> {
        match client.get_profile(kind).await {
            Ok(profile) => Ok(Self::with_profile(kind, client, notifications, profile)),
            Err(e) => {
                let e = Error::from(e);
                warn!(kind = ?kind, error = %e, "Failed to load profile");
                notifications
                    .error("Could not load profile", e.user_message())
                    .await;
                Err(e)
            }
        }
    }

    /// Load the profile matching the logged-in user's role.
    pub async fn load_for_current_user(
        client: ApiClient,
        notifications: Arc<NotificationManager>,
    ) -> Result<Self, Error> {
        let user = client.require_user().await?;
        Self::load(ProfileKind::from(user.role), client, notifications).await
    }

    /// Build an editor around an already fetched profile.
    pub fn with_profile(
        kind: ProfileKind,
        client: ApiClient,
        notifications: Arc<NotificationManager>,
        profile: Profile,
    ) -> Self {
        Self {
            kind,
            client,
            notifications,
            record: EditableRecord::new(profile),
        }
    }

    pub fn kind(&self) -> ProfileKind {
        self.kind
    }

    pub fn state(&self) -> EditState {
        self.record.state()
    }

    pub fn record(&self) -> &EditableRecord<Profile> {
        &self.record
    }

    /// What the page shows right now.
    pub fn current(&self) -> &Profile {
        self.record.current()
    }

    pub fn begin_edit(&mut self) -> Result<(), EditError> {
        self.record.begin_edit()
    }

    pub fn set_field(
        &mut self,
        field: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<(), EditError> {
        self.record.update(|p| p.set(field, value))
    }

    pub fn cancel(&mut self) -> Result<(), EditError> {
        self.record.cancel()
    }

    /// Validate and submit the working copy.
    ///
    /// On success the server's record replaces both copies. On any failure a
    /// toast is shown and the editor stays in Editing with the working copy
    /// untouched.
    pub async fn save(&mut self) -> Result<&Profile, Error> {
        let working = self.record.working_or_err("save")?;

        if let Err(e) = validation::validate_profile(working) {
            self.notifications
                .error("Please check the form", e.to_string())
                .await;
            return Err(e.into());
        }

        let client = self.client.clone();
        let kind = self.kind;
        let outcome = self
            .record
            .save(move |w| async move { client.update_profile(kind, &w).await })
            .await
            .map(|_| ());

        match outcome {
            Ok(()) => {
                info!(kind = ?self.kind, "Profile saved");
                self.notifications
                    .success("Profile updated", "Your changes have been saved.")
                    .await;
                Ok(self.record.view())
            }
            Err(SaveError::Rejected(e)) => {
                let e = Error::from(e);
                warn!(kind = ?self.kind, error = %e, "Profile save failed");
                self.notifications
                    .error("Could not save profile", e.user_message())
                    .await;
                Err(e)
            }
            Err(SaveError::State(e)) => Err(e.into()),
        }
    }

    /// Re-fetch the profile. Only allowed while Viewing so no edits are lost.
    pub async fn reload(&mut self) -> Result<(), Error> {
        if self.record.is_editing() {
            return Err(EditError::InvalidTransition {
                state: EditState::Editing.to_string(),
                action: "reload".to_string(),
            }
            .into());
        }
        let profile = self.client.get_profile(self.kind).await?;
        self.record.replace(profile)?;
        Ok(())
    }
}
