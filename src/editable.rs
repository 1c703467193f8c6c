//! Editable record — a view copy plus an optional working copy.
//!
//! ```text
//!   Viewing --begin_edit--> Editing --cancel--------> Viewing
//!                              |  \--save (ok)------> Viewing
//!                              \----save (err)-----> Editing
//! ```

use std::future::Future;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::EditError;

/// Which side of the edit cycle the record is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditState {
    /// Read-only display of the saved record.
    Viewing,
    /// A working copy is open and may diverge from the view copy.
    Editing,
}

impl EditState {
    /// Check if this state allows transitioning to another state.
    pub fn can_transition_to(&self, target: EditState) -> bool {
        matches!(
            (self, target),
            (Self::Viewing, Self::Editing) | (Self::Editing, Self::Viewing)
        )
    }
}

impl std::fmt::Display for EditState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Viewing => "viewing",
            Self::Editing => "editing",
        };
        write!(f, "{s}")
    }
}

/// Why [`EditableRecord::save`] failed.
#[derive(Debug, thiserror::Error)]
pub enum SaveError<E> {
    /// `save` was called outside of Editing.
    #[error(transparent)]
    State(#[from] EditError),
    /// The saver rejected the working copy. The record is still Editing.
    #[error("{0}")]
    Rejected(E),
}

/// A record with view/edit/cancel/save semantics.
///
/// The working copy only exists while Editing.
#[derive(Debug, Clone)]
pub struct EditableRecord<T> {
    view: T,
    working: Option<T>,
}

impl<T: Clone> EditableRecord<T> {
    /// Start in Viewing with `record` as the view copy.
    pub fn new(record: T) -> Self {
        Self {
            view: record,
            working: None,
        }
    }

    pub fn state(&self) -> EditState {
        if self.working.is_some() {
            EditState::Editing
        } else {
            EditState::Viewing
        }
    }

    pub fn is_editing(&self) -> bool {
        self.working.is_some()
    }

    /// The last saved record.
    pub fn view(&self) -> &T {
        &self.view
    }

    /// The working copy, if Editing.
    pub fn working(&self) -> Option<&T> {
        self.working.as_ref()
    }

    /// What a form should display: the working copy while Editing, else the
    /// view copy.
    pub fn current(&self) -> &T {
        self.working.as_ref().unwrap_or(&self.view)
    }

    /// Viewing → Editing. The working copy starts as a clone of the view.
    pub fn begin_edit(&mut self) -> Result<(), EditError> {
        self.check(EditState::Editing, "begin editing")?;
        self.working = Some(self.view.clone());
        debug!("Edit started");
        Ok(())
    }

    /// The working copy, or an error naming `action` if not Editing.
    pub fn working_or_err(&self, action: &str) -> Result<&T, EditError> {
        self.working.as_ref().ok_or_else(|| EditError::InvalidTransition {
            state: EditState::Viewing.to_string(),
            action: action.to_string(),
        })
    }

    /// Mutable access to the working copy.
    pub fn working_mut(&mut self) -> Result<&mut T, EditError> {
        self.working
            .as_mut()
            .ok_or_else(|| EditError::InvalidTransition {
                state: EditState::Viewing.to_string(),
                action: "modify the working copy".to_string(),
            })
    }

    /// Apply `f` to the working copy.
    pub fn update<F>(&mut self, f: F) -> Result<(), EditError>
    where
        F: FnOnce(&mut T),
    {
        f(self.working_mut()?);
        Ok(())
    }

    /// Editing → Viewing, discarding the working copy.
    pub fn cancel(&mut self) -> Result<(), EditError> {
        self.check(EditState::Viewing, "cancel")?;
        self.working = None;
        debug!("Edit cancelled");
        Ok(())
    }

    /// Replace the view copy outside of an edit (e.g. after a reload).
    pub fn replace(&mut self, record: T) -> Result<(), EditError> {
        if self.is_editing() {
            return Err(EditError::InvalidTransition {
                state: EditState::Editing.to_string(),
                action: "replace the record".to_string(),
            });
        }
        self.view = record;
        Ok(())
    }

    /// Hand the working copy to `saver`.
    ///
    /// On success both copies become the returned record and the state goes
    /// back to Viewing. On failure nothing changes: the working copy is kept
    /// as-is and the record stays Editing.
    pub async fn save<F, Fut, E>(&mut self, saver: F) -> Result<&T, SaveError<E>>
    where
        F: FnOnce(T) -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let working = self.working_or_err("save")?.clone();

        match saver(working).await {
            Ok(saved) => {
                self.view = saved;
                self.working = None;
                debug!("Edit saved");
                Ok(&self.view)
            }
            Err(e) => Err(SaveError::Rejected(e)),
        }
    }

    fn check(&self, target: EditState, action: &str) -> Result<(), EditError> {
        let state = self.state();
        if state.can_transition_to(target) {
            Ok(())
        } else {
            Err(EditError::InvalidTransition {
                state: state.to_string(),
                action: action.to_string(),
            })
        }
    }
}

impl<T: Clone + PartialEq> EditableRecord<T> {
    /// Whether the working copy differs from the view copy.
    pub fn is_dirty(&self) -> bool {
        self.working.as_ref().is_some_and(|w| *w != self.view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::Profile;

    fn profile() -> Profile {
        [("name", "Acme"), ("phone", "0123456789"), ("city", "Hanoi")]
            .into_iter()
            .collect()
    }

    #[test]
    fn state_transitions() {
        assert!(EditState::Viewing.can_transition_to(EditState::Editing));
        assert!(EditState::Editing.can_transition_to(EditState::Viewing));
        assert!(!EditState::Viewing.can_transition_to(EditState::Viewing));
        assert!(!EditState::Editing.can_transition_to(EditState::Editing));
    }

    #[test]
    fn cancel_restores_every_field() {
        let mut record = EditableRecord::new(profile());
        record.begin_edit().unwrap();
        record
            .update(|p| {
                p.set("name", "Other");
                p.set("phone", "999");
                p.set("website", "https://x.test");
                p.remove("city");
            })
            .unwrap();
        assert!(record.is_dirty());
        assert_eq!(record.current().get("name"), Some("Other"));

        record.cancel().unwrap();
        assert_eq!(record.state(), EditState::Viewing);
        assert_eq!(record.current(), &profile());
        assert!(!record.is_dirty());
    }

    #[test]
    fn cannot_edit_twice_or_cancel_while_viewing() {
        let mut record = EditableRecord::new(profile());
        assert!(record.cancel().is_err());
        assert!(record.working_mut().is_err());
        record.begin_edit().unwrap();
        assert!(record.begin_edit().is_err());
        assert!(record.replace(Profile::new()).is_err());
    }

    #[tokio::test]
    async fn successful_save_adopts_server_record() {
        let mut record = EditableRecord::new(profile());
        record.begin_edit().unwrap();
        record.update(|p| p.set("name", "Edited")).unwrap();

        let saved = record
            .save(|mut working| async move {
                working.set("updatedBy", "server");
                Ok::<_, String>(working)
            })
            .await
            .unwrap()
            .clone();

        assert_eq!(saved.get("updatedBy"), Some("server"));
        assert_eq!(record.state(), EditState::Viewing);
        assert_eq!(record.view(), &saved);
        assert!(record.working().is_none());
    }

    #[tokio::test]
    async fn failed_save_keeps_working_copy_and_state() {
        let mut record = EditableRecord::new(profile());
        record.begin_edit().unwrap();
        record.update(|p| p.set("name", "Draft")).unwrap();
        let before = record.working().cloned();

        let err = record
            .save(|_| async { Err::<Profile, _>("server said no") })
            .await
            .unwrap_err();
        assert!(matches!(err, SaveError::Rejected("server said no")));

        assert_eq!(record.state(), EditState::Editing);
        assert_eq!(record.working().cloned(), before);
        assert_eq!(record.view(), &profile());
    }

    #[tokio::test]
    async fn save_while_viewing_is_rejected() {
        let mut record = EditableRecord::new(profile());
        let err = record
            .save(|p| async move { Ok::<_, String>(p) })
            .await
            .unwrap_err();
        assert!(matches!(err, SaveError::State(_)));
    }

    #[test]
    fn working_copy_only_while_editing() {
        let mut record = EditableRecord::new(profile());
        let err = record.working_or_err("save").unwrap_err();
        assert_eq!(err.to_string(), "Record is viewing, cannot save");

        record.begin_edit().unwrap();
        assert_eq!(record.working_or_err("save").unwrap(), &profile());
        record.cancel().unwrap();
        assert!(record.working_or_err("save").is_err());
    }
}
