//! WorkNow client — session, toasts, editable records and the marketplace
//! REST API.

pub mod api;
pub mod config;
pub mod editable;
pub mod error;
pub mod home;
pub mod notifications;
pub mod profile;
pub mod session;
pub mod storage;
pub mod validation;
