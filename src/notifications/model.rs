//! Notification data model and broadcast event types.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Visual category of a toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
    Warning,
    Info,
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        };
        write!(f, "{s}")
    }
}

/// A live toast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    /// How long the toast stays up before removing itself.
    #[serde(with = "duration_ms")]
    pub duration: Duration,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(
        kind: NotificationKind,
        title: impl Into<String>,
        message: impl Into<String>,
        duration: Duration,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            title: title.into(),
            message: message.into(),
            duration,
            created_at: Utc::now(),
        }
    }

    /// Wall-clock time at which the toast is due to disappear.
    pub fn expires_at(&self) -> DateTime<Utc> {
        chrono::Duration::from_std(self.duration)
            .ok()
            .and_then(|d| self.created_at.checked_add_signed(d))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}

/// Why a toast left the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemovalReason {
    /// Its timer ran out.
    Expired,
    /// Removed explicitly (user dismissal or `clear`).
    Dismissed,
}

/// Change events for anything rendering the toast list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NotificationEvent {
    Shown { notification: Notification },
    Removed { id: Uuid, reason: RemovalReason },
}

mod duration_ms {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique() {
        let a = Notification::new(NotificationKind::Info, "t", "m", Duration::from_secs(1));
        let b = Notification::new(NotificationKind::Info, "t", "m", Duration::from_secs(1));
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn expires_at_adds_duration() {
        let n = Notification::new(NotificationKind::Warning, "t", "m", Duration::from_millis(1500));
        assert_eq!(
            (n.expires_at() - n.created_at).num_milliseconds(),
            1500
        );
    }

    #[test]
    fn event_wire_format() {
        let n = Notification::new(NotificationKind::Success, "Saved", "Profile updated", Duration::from_millis(5000));
        let json = serde_json::to_value(NotificationEvent::Shown { notification: n }).unwrap();
        assert_eq!(json["type"], "shown");
        assert_eq!(json["notification"]["kind"], "success");
        assert_eq!(json["notification"]["duration"], 5000);
    }
}
