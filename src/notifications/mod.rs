//! Toast notifications — transient messages that remove themselves after a
//! timeout.

pub mod manager;
pub mod model;

pub use manager::NotificationManager;
pub use model::{Notification, NotificationEvent, NotificationKind, RemovalReason};
